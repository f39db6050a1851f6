use crate::type_ref::{TypeRef, simple_name_of};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Package => "",
            Visibility::Private => "private",
        }
    }
}

/// Declaration flags shared by model members and generated members
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_final: bool,
    #[serde(default)]
    pub is_abstract: bool,
}

impl Modifiers {
    pub fn public() -> Self {
        Self::default()
    }

    pub fn private_static_final() -> Self {
        Self {
            visibility: Visibility::Private,
            is_static: true,
            is_final: true,
            is_abstract: false,
        }
    }

    pub fn public_static_final() -> Self {
        Self {
            visibility: Visibility::Public,
            is_static: true,
            is_final: true,
            is_abstract: false,
        }
    }

    pub fn private() -> Self {
        Self {
            visibility: Visibility::Private,
            ..Self::default()
        }
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }
}

/// An annotation element value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Type(TypeRef),
    /// Enum constant, stored as its simple constant name
    Enum(String),
    Array(Vec<AnnotationValue>),
}

impl AnnotationValue {
    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            AnnotationValue::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AnnotationValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AnnotationValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AnnotationValue]> {
        match self {
            AnnotationValue::Array(values) => Some(values),
            _ => None,
        }
    }
}

/// An annotation occurrence with its explicitly given element values
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    /// Fully qualified annotation type name
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn value(&self, key: &str) -> Option<&AnnotationValue> {
        self.values.get(key)
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bounds: Vec<TypeRef>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberField {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodParameter {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberMethod {
    pub name: String,
    /// `None` for `void`
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<MethodParameter>,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl MemberMethod {
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }
}

///
/// Structural facts about one model type, as supplied by whatever front end
/// read the model sources. Nested types are referenced by their fully
/// qualified names and looked up through the accessor.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelType {
    /// Fully qualified name; nested types append `.Simple` to their declaring type
    pub name: String,
    #[serde(default)]
    pub declaring_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub superclass: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub is_interface: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<MemberField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MemberMethod>,
    /// Declared member types in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_types: Vec<String>,
}

impl ModelType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declaring_type: None,
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            modifiers: Modifiers::public(),
            is_interface: false,
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            nested_types: Vec::new(),
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.name)
    }

    /// Package of a top-level type. Nested types answer through their outermost type.
    pub fn package_name(&self) -> Option<&str> {
        if self.declaring_type.is_some() {
            return None;
        }
        self.name.rsplit_once('.').map(|(package, _)| package)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    pub fn type_parameter_names(&self) -> Vec<String> {
        self.type_parameters.iter().map(|p| p.name.clone()).collect()
    }

    /// This type referenced with its own type variables as arguments
    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef::generic(
            self.name.clone(),
            self.type_parameters
                .iter()
                .map(|p| TypeRef::variable(p.name.clone()))
                .collect(),
        )
    }

    /// Pairs this type's parameters with `args`. Missing arguments (raw use) stay unbound.
    pub fn bindings_for(&self, args: &[TypeRef]) -> BTreeMap<String, TypeRef> {
        self.type_parameters
            .iter()
            .zip(args.iter())
            .map(|(p, a)| (p.name.clone(), a.clone()))
            .collect()
    }

    /// Superclass first, then interfaces
    pub fn supertypes(&self) -> impl Iterator<Item = &TypeRef> {
        self.superclass.iter().chain(self.interfaces.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_types_have_no_package_of_their_own() {
        let mut nested = ModelType::new("pkg.MyForm.NameField");
        nested.declaring_type = Some("pkg.MyForm".to_string());
        assert_eq!(nested.simple_name(), "NameField");
        assert_eq!(nested.package_name(), None);
        assert_eq!(ModelType::new("pkg.sub.MyForm").package_name(), Some("pkg.sub"));
    }

    #[test]
    fn bindings_pair_parameters_with_arguments() {
        let mut generic = ModelType::new("pkg.AbstractPair");
        generic.type_parameters = vec![TypeParameter::new("A"), TypeParameter::new("B")];
        let bindings = generic.bindings_for(&[TypeRef::class("java.lang.Long")]);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings["A"], TypeRef::class("java.lang.Long"));
        assert_eq!(generic.as_type_ref().to_string(), "pkg.AbstractPair<A, B>");
    }

    #[test]
    fn annotation_lookup_uses_qualified_names() {
        let mut model = ModelType::new("pkg.MyForm");
        model.annotations.push(
            Annotation::new("pkg.annotations.Marker").with("value", AnnotationValue::Int(3)),
        );
        assert!(model.has_annotation("pkg.annotations.Marker"));
        assert!(!model.has_annotation("Marker"));
        let marker = model.annotation("pkg.annotations.Marker").unwrap();
        assert_eq!(marker.simple_name(), "Marker");
        assert_eq!(marker.value("value").and_then(|v| v.as_int()), Some(3));
    }
}
