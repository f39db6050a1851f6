use crate::model_type::ModelType;
use crate::type_ref::TypeRef;
use std::sync::Arc;

/// Supertype hierarchies deeper than this are treated as cyclic
const MAX_HIERARCHY_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("type `{name}` is not part of the model snapshot")]
pub struct LookupError {
    pub name: String,
}

impl LookupError {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

///
/// Read-only access to the structural facts of model types. Implementors only
/// provide [`find_type`](ModelTypeAccessor::find_type); the hierarchy queries
/// are derived from it.
///
pub trait ModelTypeAccessor {
    fn find_type(&self, name: &str) -> Option<Arc<ModelType>>;

    fn require(&self, name: &str) -> Result<Arc<ModelType>, LookupError> {
        self.find_type(name).ok_or_else(|| LookupError::new(name))
    }

    /// The type itself followed by its superclasses, nearest first.
    /// Every named superclass must be part of the snapshot.
    fn superclass_chain(&self, name: &str) -> Result<Vec<Arc<ModelType>>, LookupError> {
        let mut chain = vec![self.require(name)?];
        while chain.len() < MAX_HIERARCHY_DEPTH {
            let next = chain
                .last()
                .and_then(|t| t.superclass.as_ref())
                .and_then(|s| s.name())
                .map(String::from);
            match next {
                Some(superclass) => chain.push(self.require(&superclass)?),
                None => break,
            }
        }
        Ok(chain)
    }

    /// Whether `name` is `target` or inherits from it through superclasses or
    /// interfaces. Fails on the first supertype missing from the snapshot.
    fn is_subtype_of(&self, name: &str, target: &str) -> Result<bool, LookupError> {
        fn visit<A: ModelTypeAccessor + ?Sized>(
            accessor: &A,
            name: &str,
            target: &str,
            depth: usize,
        ) -> Result<bool, LookupError> {
            if name == target {
                return Ok(true);
            }
            if depth >= MAX_HIERARCHY_DEPTH {
                return Ok(false);
            }
            let model = accessor.require(name)?;
            for supertype in model.supertypes().filter_map(|s| s.name()) {
                if visit(accessor, supertype, target, depth + 1)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        visit(self, name, target, 0)
    }

    /// Type arguments with which `ty` instantiates `target`, substituted
    /// through every intermediate level. `None` if `target` is not a supertype.
    fn supertype_arguments(&self, ty: &TypeRef, target: &str) -> Option<Vec<TypeRef>> {
        fn visit<A: ModelTypeAccessor + ?Sized>(
            accessor: &A,
            ty: &TypeRef,
            target: &str,
            depth: usize,
        ) -> Option<Vec<TypeRef>> {
            let name = ty.name()?;
            if name == target {
                return Some(ty.args().to_vec());
            }
            if depth >= MAX_HIERARCHY_DEPTH {
                return None;
            }
            let model = accessor.find_type(name)?;
            let bindings = model.bindings_for(ty.args());
            model
                .supertypes()
                .find_map(|s| visit(accessor, &s.substitute(&bindings), target, depth + 1))
        }
        visit(self, ty, target, 0)
    }

    /// The top-level type that (transitively) declares `name`
    fn outermost_type(&self, name: &str) -> Result<Arc<ModelType>, LookupError> {
        let mut current = self.require(name)?;
        while let Some(declaring) = current.declaring_type.clone() {
            current = self.require(&declaring)?;
        }
        Ok(current)
    }
}

impl<T: ModelTypeAccessor + ?Sized> ModelTypeAccessor for Arc<T> {
    fn find_type(&self, name: &str) -> Option<Arc<ModelType>> {
        (**self).find_type(name)
    }
}

impl<T: ModelTypeAccessor + ?Sized> ModelTypeAccessor for &T {
    fn find_type(&self, name: &str) -> Option<Arc<ModelType>> {
        (**self).find_type(name)
    }
}
