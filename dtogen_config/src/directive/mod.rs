pub mod annotations;
mod types;
mod tests;

pub use types::{
    ColumnDirective, DataDirective, DirectiveError, DirectiveKind, Directives, GenerationCommand,
    property_directive,
};
