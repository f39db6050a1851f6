pub mod accessor;
pub mod model_type;
pub mod snapshot;
pub mod type_ref;
pub mod workspace;

pub use accessor::{LookupError, ModelTypeAccessor};
pub use model_type::{
    Annotation, AnnotationValue, MemberField, MemberMethod, MethodParameter, ModelType, Modifiers,
    TypeParameter, Visibility,
};
pub use snapshot::ModelSnapshot;
pub use type_ref::{Primitive, TypeParseError, TypeRef, simple_name_of};
