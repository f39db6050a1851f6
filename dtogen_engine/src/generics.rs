//! Binding generic DTO templates to the concrete types implied by a model node.

use crate::error::{GenerationError, Result};
use dtogen_common::{ModelType, ModelTypeAccessor, TypeRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MAX_TEMPLATE_DEPTH: usize = 64;

/// An accessor as seen from a subclass after substituting every template level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorSignature {
    pub declaring_type: String,
    pub name: String,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<TypeRef>,
}

fn is_accessor_name(name: &str) -> bool {
    ["get", "is", "set"].iter().any(|prefix| {
        name.strip_prefix(prefix)
            .and_then(|rest| rest.chars().next())
            .is_some_and(char::is_uppercase)
    })
}

/// Parameterizes `template` with `args`, checking the arity when the template is known
pub fn bind<A: ModelTypeAccessor + ?Sized>(
    accessor: &A,
    node: &str,
    template: &str,
    args: Vec<TypeRef>,
) -> Result<TypeRef> {
    if let Some(model) = accessor.find_type(template) {
        if model.type_parameters.len() != args.len() {
            return Err(GenerationError::TypeArgumentCount {
                node: node.to_string(),
                template: template.to_string(),
                expected: model.type_parameters.len(),
                actual: args.len(),
            });
        }
    }
    Ok(TypeRef::generic(template, args))
}

/// Accessors inherited through `superclass`, substituted level by level.
/// Any type variable left that is not in `allowed` is fatal.
pub fn bind_inherited_accessors<A: ModelTypeAccessor + ?Sized>(
    accessor: &A,
    node: &str,
    superclass: &TypeRef,
    allowed: &[String],
) -> Result<Vec<AccessorSignature>> {
    let mut accessors = Vec::new();
    let mut current = Some(superclass.clone());
    let mut depth = 0;

    while let Some(level) = current.take() {
        depth += 1;
        if depth > MAX_TEMPLATE_DEPTH {
            break;
        }
        let Some(name) = level.name() else { break };
        let Some(model) = accessor.find_type(name) else { break };
        if !level.args().is_empty() && level.args().len() != model.type_parameters.len() {
            return Err(GenerationError::TypeArgumentCount {
                node: node.to_string(),
                template: model.name.clone(),
                expected: model.type_parameters.len(),
                actual: level.args().len(),
            });
        }

        let bindings = model.bindings_for(level.args());
        let unresolved = |ty: &TypeRef| -> Result<()> {
            match ty.free_variables().into_iter().find(|v| !allowed.contains(v)) {
                Some(variable) => Err(GenerationError::UnresolvedTypeArgument {
                    node: node.to_string(),
                    template: model.name.clone(),
                    variable,
                }),
                None => Ok(()),
            }
        };

        for method in model.methods.iter().filter(|m| is_accessor_name(&m.name)) {
            let return_type = method.return_type.as_ref().map(|t| t.substitute(&bindings));
            let parameters: Vec<TypeRef> = method
                .parameters
                .iter()
                .map(|p| p.ty.substitute(&bindings))
                .collect();
            if let Some(ret) = &return_type {
                unresolved(ret)?;
            }
            for parameter in &parameters {
                unresolved(parameter)?;
            }
            accessors.push(AccessorSignature {
                declaring_type: model.name.clone(),
                name: method.name.clone(),
                return_type,
                parameters,
            });
        }

        current = model.superclass.as_ref().map(|s| s.substitute(&bindings));
        if let Some(next) = &current {
            unresolved(next)?;
        }
    }
    Ok(accessors)
}

/// Structural unification of `pattern` against `concrete`, extending `bindings`
pub fn unify(pattern: &TypeRef, concrete: &TypeRef, bindings: &mut BTreeMap<String, TypeRef>) -> bool {
    match (pattern, concrete) {
        (TypeRef::Variable(v), _) => {
            let concrete = concrete.boxed();
            match bindings.get(v) {
                Some(bound) => *bound == concrete,
                None => {
                    bindings.insert(v.clone(), concrete);
                    true
                }
            }
        }
        (
            TypeRef::Class { name: pn, args: pa },
            TypeRef::Class { name: cn, args: ca },
        ) => {
            pn == cn
                && pa.len() == ca.len()
                && pa.iter().zip(ca).all(|(p, c)| unify(p, c, bindings))
        }
        (TypeRef::Array(p), TypeRef::Array(c)) => unify(p, c, bindings),
        (TypeRef::Wildcard(Some(p)), TypeRef::Wildcard(Some(c))) => unify(p, c, bindings),
        (TypeRef::Wildcard(Some(p)), c) => unify(p, c, bindings),
        (TypeRef::Wildcard(None), _) => true,
        (p, c) => p == c,
    }
}

/// Infers the type arguments of a generic DTO template from a model value type
/// by unifying it with the template's inherited `getValue()` signature.
pub fn infer_from_value_type<A: ModelTypeAccessor + ?Sized>(
    accessor: &A,
    node: &str,
    template: &ModelType,
    value_type: &TypeRef,
) -> Result<Vec<TypeRef>> {
    let own_variables = template.type_parameter_names();
    let first_unresolved = || GenerationError::UnresolvedTypeArgument {
        node: node.to_string(),
        template: template.name.clone(),
        variable: own_variables.first().cloned().unwrap_or_default(),
    };

    let accessors =
        bind_inherited_accessors(accessor, node, &template.as_type_ref(), &own_variables)?;
    let getter = accessors
        .iter()
        .find(|a| a.name == "getValue" && a.parameters.is_empty())
        .and_then(|a| a.return_type.as_ref())
        .ok_or_else(first_unresolved)?;

    let mut bindings = BTreeMap::new();
    if !unify(getter, value_type, &mut bindings) {
        return Err(first_unresolved());
    }
    template
        .type_parameters
        .iter()
        .map(|p| {
            bindings
                .get(&p.name)
                .cloned()
                .ok_or_else(|| GenerationError::UnresolvedTypeArgument {
                    node: node.to_string(),
                    template: template.name.clone(),
                    variable: p.name.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtogen_config::runtime::names;
    use dtogen_config::{DeclarationDsl, ModelBuilder, ModelTypeExt};
    use dtogen_common::ModelSnapshot;

    fn snapshot() -> ModelSnapshot {
        let mut builder = ModelBuilder::with_runtime();
        builder
            .model_type("pkg.AbstractAmountFieldData")
            .type_parameter("N")
            .extends(&format!("{}<N>", names::ABSTRACT_VALUE_FIELD_DATA))
            .build();
        builder.snapshot().unwrap()
    }

    #[test]
    fn bind_checks_arity() {
        let snapshot = snapshot();
        let bound = bind(
            &snapshot,
            "pkg.F",
            names::ABSTRACT_VALUE_FIELD_DATA,
            vec![TypeRef::class(names::LONG)],
        )
        .unwrap();
        assert_eq!(bound.args(), &[TypeRef::class(names::LONG)]);

        let err = bind(&snapshot, "pkg.F", names::ABSTRACT_VALUE_FIELD_DATA, vec![]).unwrap_err();
        assert!(matches!(err, GenerationError::TypeArgumentCount { expected: 1, actual: 0, .. }));
    }

    #[test]
    fn inherited_accessors_propagate_across_levels() {
        let snapshot = snapshot();
        let superclass =
            TypeRef::generic("pkg.AbstractAmountFieldData", vec![TypeRef::class(names::BIG_DECIMAL)]);
        let accessors = bind_inherited_accessors(&snapshot, "pkg.F", &superclass, &[]).unwrap();
        let get_value = accessors.iter().find(|a| a.name == "getValue").unwrap();
        assert_eq!(get_value.return_type, Some(TypeRef::class(names::BIG_DECIMAL)));
        assert_eq!(get_value.declaring_type, names::ABSTRACT_VALUE_FIELD_DATA);
        let set_value = accessors.iter().find(|a| a.name == "setValue").unwrap();
        assert_eq!(set_value.parameters, vec![TypeRef::class(names::BIG_DECIMAL)]);
    }

    #[test]
    fn raw_template_leaves_an_unresolved_variable() {
        let snapshot = snapshot();
        let err = bind_inherited_accessors(
            &snapshot,
            "pkg.F",
            &TypeRef::class("pkg.AbstractAmountFieldData"),
            &[],
        )
        .unwrap_err();
        match err {
            GenerationError::UnresolvedTypeArgument { variable, .. } => assert_eq!(variable, "N"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unify_unwraps_containers() {
        let mut bindings = BTreeMap::new();
        let pattern = TypeRef::parse("java.util.Set<T>").unwrap();
        let concrete = TypeRef::parse("java.util.Set<java.lang.Long>").unwrap();
        assert!(unify(&pattern, &concrete, &mut bindings));
        assert_eq!(bindings["T"], TypeRef::class(names::LONG));

        let mut clash = BTreeMap::new();
        let pair = TypeRef::parse("java.util.Map<K, K>").unwrap();
        let mixed = TypeRef::parse("java.util.Map<java.lang.Long, java.lang.String>").unwrap();
        assert!(!unify(&pair, &mixed, &mut clash));
    }

    #[test]
    fn infer_binds_through_get_value() {
        let snapshot = snapshot();
        let list_box_data = snapshot.require(names::ABSTRACT_LIST_BOX_DATA).unwrap();
        let args = infer_from_value_type(
            &snapshot,
            "pkg.ColorsField",
            &list_box_data,
            &TypeRef::parse("java.util.Set<java.lang.Long>").unwrap(),
        )
        .unwrap();
        assert_eq!(args, vec![TypeRef::class(names::LONG)]);

        let err = infer_from_value_type(
            &snapshot,
            "pkg.ColorsField",
            &list_box_data,
            &TypeRef::class(names::STRING),
        );
        assert!(err.is_err());
    }
}
