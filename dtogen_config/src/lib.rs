pub mod directive;
pub mod model_builder;
pub mod runtime;
pub mod type_builder;

pub use directive::{
    ColumnDirective, DataDirective, DirectiveError, DirectiveKind, Directives, GenerationCommand,
    annotations,
};
pub use model_builder::ModelBuilder;
pub use type_builder::{DeclarationDsl, FormDataBuilder, ModelTypeExt, NestedTypeBuilder};
