use super::annotations as names;
use dtogen_common::{Annotation, AnnotationValue, MemberMethod, ModelType, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Controls whether and how a model node contributes a DTO
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationCommand {
    /// Emit a DTO for the node
    #[default]
    Create,
    /// Emit nothing, reuse an existing DTO
    Use,
    /// Emit nothing and skip the node's subtree
    Ignore,
    /// Structural node: emit nothing, children attach to the enclosing DTO
    None,
}

impl GenerationCommand {
    pub fn constant(self) -> &'static str {
        match self {
            GenerationCommand::Create => "CREATE",
            GenerationCommand::Use => "USE",
            GenerationCommand::Ignore => "IGNORE",
            GenerationCommand::None => "NONE",
        }
    }

    pub fn from_constant(constant: &str) -> Option<Self> {
        match constant {
            "CREATE" | "DEFAULT" => Some(GenerationCommand::Create),
            "USE" => Some(GenerationCommand::Use),
            "IGNORE" => Some(GenerationCommand::Ignore),
            "NONE" => Some(GenerationCommand::None),
            _ => None,
        }
    }
}

impl fmt::Display for GenerationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constant())
    }
}

/// Which annotation a data directive was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveKind {
    FormData,
    PageData,
}

impl DirectiveKind {
    pub fn annotation_name(self) -> &'static str {
        match self {
            DirectiveKind::FormData => names::FORM_DATA,
            DirectiveKind::PageData => names::PAGE_DATA,
        }
    }
}

///
/// A `FormData` or `PageData` directive. `command` applies to the declaring
/// type, `subtype_command` to every subtype that has no directive of its own.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataDirective {
    pub kind: DirectiveKind,
    /// DTO type to create (CREATE) or to use (USE)
    #[serde(default)]
    pub value: Option<TypeRef>,
    #[serde(default)]
    pub command: GenerationCommand,
    #[serde(default)]
    pub subtype_command: GenerationCommand,
    /// Index of the declaring type's type parameter that binds the DTO's type argument
    #[serde(default)]
    pub generic_ordinal: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<TypeRef>,
}

impl DataDirective {
    pub fn form_data() -> Self {
        Self {
            kind: DirectiveKind::FormData,
            value: None,
            command: GenerationCommand::Create,
            subtype_command: GenerationCommand::Create,
            generic_ordinal: None,
            type_arguments: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    /// `PageData` creates for the annotated page and is used by its subclasses
    pub fn page_data(value: TypeRef) -> Self {
        Self {
            kind: DirectiveKind::PageData,
            value: Some(value),
            command: GenerationCommand::Create,
            subtype_command: GenerationCommand::Use,
            generic_ordinal: None,
            type_arguments: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    pub fn from_annotation(annotation: &Annotation) -> Result<Option<Self>, DirectiveError> {
        if annotation.name == names::PAGE_DATA {
            let value = type_element(annotation, names::VALUE)?.ok_or_else(|| {
                DirectiveError::new(annotation, "PageData requires a value")
            })?;
            return Ok(Some(Self::page_data(value)));
        }
        if annotation.name != names::FORM_DATA {
            return Ok(None);
        }

        let mut directive = Self::form_data();
        directive.value = type_element(annotation, names::VALUE)?;
        if let Some(command) = command_element(annotation, names::SDK_COMMAND)? {
            directive.command = command;
        }
        if let Some(command) = command_element(annotation, names::DEFAULT_SUBTYPE_SDK_COMMAND)? {
            directive.subtype_command = command;
        }
        directive.generic_ordinal = match annotation.value(names::GENERIC_ORDINAL) {
            None => None,
            Some(AnnotationValue::Int(i)) if *i < 0 => None,
            Some(AnnotationValue::Int(i)) => Some(*i as usize),
            Some(_) => {
                return Err(DirectiveError::new(annotation, "genericOrdinal must be an integer"));
            }
        };
        directive.type_arguments = type_array_element(annotation, names::TYPE_ARGUMENTS)?;
        directive.interfaces = type_array_element(annotation, names::INTERFACES)?;
        Ok(Some(directive))
    }

    pub fn to_annotation(&self) -> Annotation {
        let mut annotation = Annotation::new(self.kind.annotation_name());
        if let Some(value) = &self.value {
            annotation = annotation.with(names::VALUE, AnnotationValue::Type(value.clone()));
        }
        if self.kind == DirectiveKind::PageData {
            return annotation;
        }
        annotation = annotation
            .with(names::SDK_COMMAND, AnnotationValue::Enum(self.command.constant().into()))
            .with(
                names::DEFAULT_SUBTYPE_SDK_COMMAND,
                AnnotationValue::Enum(self.subtype_command.constant().into()),
            );
        if let Some(ordinal) = self.generic_ordinal {
            annotation = annotation.with(names::GENERIC_ORDINAL, AnnotationValue::Int(ordinal as i64));
        }
        if !self.type_arguments.is_empty() {
            annotation = annotation.with(names::TYPE_ARGUMENTS, type_array(&self.type_arguments));
        }
        if !self.interfaces.is_empty() {
            annotation = annotation.with(names::INTERFACES, type_array(&self.interfaces));
        }
        annotation
    }
}

/// Per-column opt out of row generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDirective {
    pub command: GenerationCommand,
}

impl ColumnDirective {
    pub fn from_annotation(annotation: &Annotation) -> Result<Option<Self>, DirectiveError> {
        if annotation.name != names::COLUMN_DATA {
            return Ok(None);
        }
        let command = command_element(annotation, names::VALUE)?.unwrap_or_default();
        match command {
            GenerationCommand::Create | GenerationCommand::Ignore => Ok(Some(Self { command })),
            other => Err(DirectiveError::new(
                annotation,
                format!("ColumnData does not support {other}"),
            )),
        }
    }

    pub fn to_annotation(&self) -> Annotation {
        Annotation::new(names::COLUMN_DATA).with(
            names::VALUE,
            AnnotationValue::Enum(self.command.constant().into()),
        )
    }
}

/// Every directive declared directly on one model type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    pub data: Option<DataDirective>,
    pub column: Option<ColumnDirective>,
    pub replace: bool,
    pub extends: Option<TypeRef>,
}

impl Directives {
    pub fn read(model: &ModelType) -> Result<Self, DirectiveError> {
        let mut directives = Directives::default();
        for annotation in &model.annotations {
            if let Some(data) = DataDirective::from_annotation(annotation)? {
                if directives.data.is_some() {
                    return Err(DirectiveError::new(
                        annotation,
                        "only one of FormData and PageData may be declared",
                    ));
                }
                directives.data = Some(data);
            } else if let Some(column) = ColumnDirective::from_annotation(annotation)? {
                directives.column = Some(column);
            } else if annotation.name == names::REPLACE {
                directives.replace = true;
            } else if annotation.name == names::EXTENDS {
                directives.extends = Some(type_element(annotation, names::VALUE)?.ok_or_else(
                    || DirectiveError::new(annotation, "Extends requires a value"),
                )?);
            }
        }
        Ok(directives)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none() && self.column.is_none() && !self.replace && self.extends.is_none()
    }
}

/// A bean property getter marked for generation, i.e. `getX()`/`isX()` carrying `FormData`
pub fn property_directive(method: &MemberMethod) -> Result<Option<DataDirective>, DirectiveError> {
    match method.annotation(names::FORM_DATA) {
        Some(annotation) => DataDirective::from_annotation(annotation),
        None => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid `{annotation}` annotation: {message}")]
pub struct DirectiveError {
    pub annotation: String,
    pub message: String,
}

impl DirectiveError {
    fn new(annotation: &Annotation, message: impl Into<String>) -> Self {
        Self {
            annotation: annotation.simple_name().to_string(),
            message: message.into(),
        }
    }
}

fn type_element(annotation: &Annotation, key: &str) -> Result<Option<TypeRef>, DirectiveError> {
    match annotation.value(key) {
        None => Ok(None),
        Some(AnnotationValue::Type(t)) => Ok(Some(t.clone())),
        Some(_) => Err(DirectiveError::new(annotation, format!("`{key}` must be a type"))),
    }
}

fn type_array_element(annotation: &Annotation, key: &str) -> Result<Vec<TypeRef>, DirectiveError> {
    let Some(value) = annotation.value(key) else {
        return Ok(Vec::new());
    };
    let items: &[AnnotationValue] = match value {
        AnnotationValue::Array(items) => items,
        single => std::slice::from_ref(single),
    };
    items
        .iter()
        .map(|item| {
            item.as_type().cloned().ok_or_else(|| {
                DirectiveError::new(annotation, format!("`{key}` must contain types"))
            })
        })
        .collect()
}

fn command_element(
    annotation: &Annotation,
    key: &str,
) -> Result<Option<GenerationCommand>, DirectiveError> {
    let Some(value) = annotation.value(key) else {
        return Ok(None);
    };
    let constant = value
        .as_enum()
        .ok_or_else(|| DirectiveError::new(annotation, format!("`{key}` must be an enum constant")))?;
    GenerationCommand::from_constant(constant)
        .map(Some)
        .ok_or_else(|| DirectiveError::new(annotation, format!("unknown command `{constant}`")))
}

fn type_array(types: &[TypeRef]) -> AnnotationValue {
    AnnotationValue::Array(types.iter().cloned().map(AnnotationValue::Type).collect())
}
