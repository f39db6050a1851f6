use dtogen_common::{
    Annotation, MemberField, MemberMethod, MethodParameter, ModelType, Modifiers, TypeParameter,
    TypeRef, simple_name_of,
};
use dtogen_config::annotations as names;
use serde::{Deserialize, Serialize};

use crate::naming::SERIAL_VERSION_UID;

/// Names of the row-container methods, in emission order. `addRow` is declared twice.
pub const ROW_CONTAINER_METHODS: [&str; 6] = [
    "addRow",
    "createRow",
    "getRowType",
    "getRows",
    "rowAt",
    "setRows",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DtoKind {
    FormData,
    PageData,
    FieldData,
    TableData,
    TableRowData,
    PropertyData,
    RowDataExtension,
}

/// What a generated method does, so a printer can render its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodBody {
    /// `return getFieldByClass(<dto>.class);`
    FieldByClass(TypeRef),
    /// `return getPropertyByClass(<holder>.class);`
    PropertyByClass(TypeRef),
    /// Reads the value of a property holder, with a default for primitives
    PropertyValue {
        holder_getter: String,
        default_literal: Option<String>,
    },
    SetPropertyValue { holder_getter: String },
    /// `return m_x;`
    ReturnMember(String),
    /// `m_x = <parameter>;`
    AssignMember { field: String, parameter: String },
    AddRow,
    AddRowWithState,
    CreateRow,
    RowType,
    Rows,
    RowAt,
    SetRows,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtoField {
    pub name: String,
    pub ty: TypeRef,
    pub modifiers: Modifiers,
    /// Initializer expression, if any
    #[serde(default)]
    pub initializer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl DtoField {
    pub fn serial_version_uid() -> Self {
        Self {
            name: SERIAL_VERSION_UID.to_string(),
            ty: TypeRef::Primitive(dtogen_common::Primitive::Long),
            modifiers: Modifiers::private_static_final(),
            initializer: Some("1L".to_string()),
            annotations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtoMethod {
    pub name: String,
    /// `None` for `void`
    pub return_type: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<MethodParameter>,
    pub modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    pub body: MethodBody,
}

impl DtoMethod {
    pub fn new(name: impl Into<String>, return_type: Option<TypeRef>, body: MethodBody) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters: Vec::new(),
            modifiers: Modifiers::public(),
            annotations: Vec::new(),
            body,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.parameters.push(MethodParameter {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn overriding(mut self) -> Self {
        self.annotations.push(Annotation::new(names::OVERRIDE));
        self
    }

    pub fn is_override(&self) -> bool {
        self.annotations.iter().any(|a| a.name == names::OVERRIDE)
    }
}

///
/// A synthesized data class. Nested types are owned by their enclosing DTO
/// and named `<enclosing>.<simple>`.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtoType {
    pub name: String,
    pub kind: DtoKind,
    pub modifiers: Modifiers,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<TypeParameter>,
    pub superclass: TypeRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    pub fields: Vec<DtoField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<DtoMethod>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_types: Vec<DtoType>,
    /// Model type this DTO was synthesized from
    #[serde(default)]
    pub source_model: Option<String>,
    /// DTO this one takes the place of, for `Replace` nodes
    #[serde(default)]
    pub replaces: Option<String>,
}

impl DtoType {
    pub fn new(name: impl Into<String>, kind: DtoKind, superclass: TypeRef) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Modifiers::public(),
            type_parameters: Vec::new(),
            superclass,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: vec![DtoField::serial_version_uid()],
            methods: Vec::new(),
            nested_types: Vec::new(),
            source_model: None,
            replaces: None,
        }
    }

    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.name)
    }

    /// This type as a reference, parameterized by its own type variables
    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef::generic(
            self.name.clone(),
            self.type_parameters
                .iter()
                .map(|p| TypeRef::variable(p.name.clone()))
                .collect(),
        )
    }

    pub fn nested(&self, simple_name: &str) -> Option<&DtoType> {
        self.nested_types
            .iter()
            .find(|n| n.simple_name() == simple_name)
    }

    /// Depth-first search by qualified name, including this type
    pub fn find(&self, name: &str) -> Option<&DtoType> {
        if self.name == name {
            return Some(self);
        }
        self.nested_types.iter().find_map(|n| n.find(name))
    }

    pub fn method(&self, name: &str) -> Option<&DtoMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn methods_named(&self, name: &str) -> Vec<&DtoMethod> {
        self.methods.iter().filter(|m| m.name == name).collect()
    }

    pub fn field(&self, name: &str) -> Option<&DtoField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    /// Distinct row-container method names declared here, in declaration order
    pub fn row_container_method_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for method in &self.methods {
            let name = method.name.as_str();
            if ROW_CONTAINER_METHODS.contains(&name) && !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }

    /// Visits this type and all nested types, parents first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a DtoType)) {
        visit(self);
        for nested in &self.nested_types {
            nested.walk(visit);
        }
    }

    /// Structural view of this DTO, so synthesized templates can be inspected
    /// like any other type of the snapshot
    pub fn as_model(&self, declaring_type: Option<String>) -> ModelType {
        let mut model = ModelType::new(self.name.clone());
        model.declaring_type = declaring_type;
        model.type_parameters = self.type_parameters.clone();
        model.superclass = Some(self.superclass.clone());
        model.interfaces = self.interfaces.clone();
        model.modifiers = self.modifiers;
        model.annotations = self.annotations.clone();
        model.fields = self
            .fields
            .iter()
            .map(|f| MemberField {
                name: f.name.clone(),
                ty: f.ty.clone(),
                modifiers: f.modifiers,
                annotations: f.annotations.clone(),
            })
            .collect();
        model.methods = self
            .methods
            .iter()
            .map(|m| MemberMethod {
                name: m.name.clone(),
                return_type: m.return_type.clone(),
                parameters: m.parameters.clone(),
                modifiers: m.modifiers,
                annotations: m.annotations.clone(),
            })
            .collect();
        model.nested_types = self.nested_types.iter().map(|n| n.name.clone()).collect();
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_dto_starts_with_serial_version_uid() {
        let dto = DtoType::new("pkg.MyFormData", DtoKind::FormData, TypeRef::class("fw.Base"));
        assert_eq!(dto.fields.len(), 1);
        let uid = &dto.fields[0];
        assert_eq!(uid.name, "serialVersionUID");
        assert!(uid.modifiers.is_static && uid.modifiers.is_final);
        assert!(uid.annotations.is_empty());
    }

    #[test]
    fn row_container_names_are_distinct() {
        let mut dto = DtoType::new("pkg.Table", DtoKind::TableData, TypeRef::class("fw.Bean"));
        dto.methods.push(DtoMethod::new("addRow", None, MethodBody::AddRow));
        dto.methods.push(
            DtoMethod::new("addRow", None, MethodBody::AddRowWithState)
                .with_parameter("rowState", TypeRef::Primitive(dtogen_common::Primitive::Int)),
        );
        dto.methods.push(DtoMethod::new("getName", None, MethodBody::ReturnMember("m".into())));
        assert_eq!(dto.row_container_method_names(), vec!["addRow"]);
        assert_eq!(dto.methods_named("addRow").len(), 2);
    }

    #[test]
    fn nested_lookup_and_model_view() {
        let mut outer = DtoType::new("pkg.FormData", DtoKind::FormData, TypeRef::class("fw.Base"));
        outer.nested_types.push(DtoType::new(
            "pkg.FormData.Name",
            DtoKind::FieldData,
            TypeRef::class("fw.Value"),
        ));
        assert!(outer.nested("Name").is_some());
        assert!(outer.find("pkg.FormData.Name").is_some());

        let model = outer.as_model(None);
        assert_eq!(model.nested_types, vec!["pkg.FormData.Name".to_string()]);
        assert_eq!(model.superclass, Some(TypeRef::class("fw.Base")));
    }
}
