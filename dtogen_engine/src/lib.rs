pub mod descriptor;
pub mod dto;
pub mod error;
pub mod generator;
pub mod generics;
pub mod naming;
pub mod node_kind;
pub mod scope;
pub mod synthesis;
pub mod walker;

pub use descriptor::{DirectiveCache, GenerationDescriptor, TemplateSource};
pub use dto::{DtoField, DtoKind, DtoMethod, DtoType, MethodBody, ROW_CONTAINER_METHODS};
pub use error::{GenerationError, Result};
pub use generator::DtoGenerator;
pub use generics::AccessorSignature;
pub use node_kind::NodeKind;
pub use scope::{DtoSlot, ReplaceChain, ReplaceLink};
pub use walker::WalkEntry;
