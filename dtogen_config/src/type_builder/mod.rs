mod builder;

pub use builder::{
    DeclarationDsl, FormDataBuilder, ModelTypeBuilder, ModelTypeExt, NestedTypeBuilder, TypeDecl,
};
