use dtogen_common::LookupError;
use dtogen_config::GenerationCommand;

/// Every way a generation request can fail. None of them are retryable:
/// each points at an invalid snapshot or directive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("model type `{0}` is not part of the snapshot")]
    TypeNotFound(String),

    #[error("`{node}` replaces `{target}`, but no DTO for it is in scope `{scope}`")]
    ReplaceTargetNotFound {
        node: String,
        target: String,
        scope: String,
    },

    #[error("`{node}` has command NONE but binds a value")]
    BoundFieldWithNone { node: String },

    #[error("`{node}`: type variable `{variable}` of `{template}` cannot be resolved")]
    UnresolvedTypeArgument {
        node: String,
        template: String,
        variable: String,
    },

    #[error("`{node}`: `{template}` expects {expected} type arguments but {actual} were bound")]
    TypeArgumentCount {
        node: String,
        template: String,
        expected: usize,
        actual: usize,
    },

    #[error("`{node}` produces `{name}`, which already exists in `{scope}`")]
    NameCollision {
        node: String,
        name: String,
        scope: String,
    },

    #[error("`{node}` carries an invalid directive: {message}")]
    InvalidDirective { node: String, message: String },

    #[error("`{node}` extends `{target}`, which has no DTO")]
    ExtendsTargetNotFound { node: String, target: String },

    #[error("template `{0}` depends on itself")]
    TemplateCycle(String),

    #[error("`{node}` resolves to {command} and cannot be generated as a root")]
    InvalidRoot {
        node: String,
        command: GenerationCommand,
    },

    #[error("`{node}` is CREATE but no DTO super type could be found")]
    MissingDtoSuperType { node: String },
}

impl GenerationError {
    /// Name of the model type the error is reported against
    pub fn node(&self) -> &str {
        match self {
            GenerationError::TypeNotFound(node) | GenerationError::TemplateCycle(node) => node,
            GenerationError::ReplaceTargetNotFound { node, .. }
            | GenerationError::BoundFieldWithNone { node }
            | GenerationError::UnresolvedTypeArgument { node, .. }
            | GenerationError::TypeArgumentCount { node, .. }
            | GenerationError::NameCollision { node, .. }
            | GenerationError::InvalidDirective { node, .. }
            | GenerationError::ExtendsTargetNotFound { node, .. }
            | GenerationError::InvalidRoot { node, .. }
            | GenerationError::MissingDtoSuperType { node } => node,
        }
    }
}

impl From<LookupError> for GenerationError {
    fn from(err: LookupError) -> Self {
        GenerationError::TypeNotFound(err.name)
    }
}

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;
