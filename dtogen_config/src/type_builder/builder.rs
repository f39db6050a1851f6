use crate::directive::annotations as names;
use crate::directive::{ColumnDirective, DataDirective, GenerationCommand};
use crate::model_builder::ModelBuilder;
use dtogen_common::{
    Annotation, MemberField, MemberMethod, MethodParameter, ModelType, Modifiers, TypeParameter,
    TypeParseError, TypeRef,
};

/// Extension trait that adds model type declarations to ModelBuilder
pub trait ModelTypeExt {
    /// Start declaring a top-level model type
    fn model_type(&mut self, name: impl Into<String>) -> ModelTypeBuilder<'_>;
}

impl ModelTypeExt for ModelBuilder {
    fn model_type(&mut self, name: impl Into<String>) -> ModelTypeBuilder<'_> {
        ModelTypeBuilder {
            parent: self,
            decl: TypeDecl::new(name.into(), None),
        }
    }
}

/// A type under construction together with its nested declarations
#[derive(Debug)]
pub struct TypeDecl {
    model: ModelType,
    nested: Vec<TypeDecl>,
    errors: Vec<TypeParseError>,
}

impl TypeDecl {
    fn new(name: String, declaring_type: Option<String>) -> Self {
        let mut model = ModelType::new(name);
        model.declaring_type = declaring_type;
        model.modifiers = model.modifiers.with_static(model.declaring_type.is_some());
        Self {
            model,
            nested: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn parse(&mut self, signature: &str) -> Option<TypeRef> {
        match TypeRef::parse(signature) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                self.errors.push(err);
                None
            }
        }
    }

    fn flatten(self, types: &mut Vec<ModelType>, errors: &mut Vec<TypeParseError>) {
        types.push(self.model);
        errors.extend(self.errors);
        for nested in self.nested {
            nested.flatten(types, errors);
        }
    }
}

/// Declaration methods shared by top-level and nested type builders
pub trait DeclarationDsl: Sized {
    fn decl(&mut self) -> &mut TypeDecl;

    /// Set the superclass, e.g. `fw.AbstractValueField<java.lang.Long>`
    fn extends(mut self, signature: &str) -> Self {
        let decl = self.decl();
        decl.model.superclass = decl.parse(signature);
        self
    }

    fn implements(mut self, signature: &str) -> Self {
        let decl = self.decl();
        if let Some(parsed) = decl.parse(signature) {
            decl.model.interfaces.push(parsed);
        }
        self
    }

    fn type_parameter(mut self, name: &str) -> Self {
        self.decl().model.type_parameters.push(TypeParameter::new(name));
        self
    }

    fn bounded_type_parameter(mut self, name: &str, bound: &str) -> Self {
        let decl = self.decl();
        let mut parameter = TypeParameter::new(name);
        parameter.bounds.extend(decl.parse(bound));
        decl.model.type_parameters.push(parameter);
        self
    }

    fn abstract_type(mut self) -> Self {
        self.decl().model.modifiers.is_abstract = true;
        self
    }

    fn interface_type(mut self) -> Self {
        let model = &mut self.decl().model;
        model.is_interface = true;
        model.modifiers.is_abstract = true;
        self
    }

    fn annotate(mut self, annotation: Annotation) -> Self {
        self.decl().model.annotations.push(annotation);
        self
    }

    /// Attach a `FormData` directive configured through [`FormDataBuilder`]
    fn form_data<F>(mut self, f: F) -> Self
    where
        F: FnOnce(FormDataBuilder) -> FormDataBuilder,
    {
        let built = f(FormDataBuilder::new());
        let decl = self.decl();
        decl.errors.extend(built.errors);
        decl.model.annotations.push(built.directive.to_annotation());
        self
    }

    fn page_data(mut self, value: &str) -> Self {
        let decl = self.decl();
        if let Some(value) = decl.parse(value) {
            decl.model
                .annotations
                .push(DataDirective::page_data(value).to_annotation());
        }
        self
    }

    fn column_data(mut self, command: GenerationCommand) -> Self {
        self.decl()
            .model
            .annotations
            .push(ColumnDirective { command }.to_annotation());
        self
    }

    fn replace(mut self) -> Self {
        self.decl().model.annotations.push(Annotation::new(names::REPLACE));
        self
    }

    /// Mark the type as contributing to `target` through `Extends`
    fn extension_of(mut self, target: &str) -> Self {
        let decl = self.decl();
        if let Some(target) = decl.parse(target) {
            decl.model.annotations.push(
                Annotation::new(names::EXTENDS)
                    .with(names::VALUE, dtogen_common::AnnotationValue::Type(target)),
            );
        }
        self
    }

    fn field(mut self, name: &str, signature: &str) -> Self {
        let decl = self.decl();
        if let Some(ty) = decl.parse(signature) {
            decl.model.fields.push(MemberField {
                name: name.to_string(),
                ty,
                modifiers: Modifiers::private(),
                annotations: Vec::new(),
            });
        }
        self
    }

    fn method(mut self, method: MemberMethod) -> Self {
        self.decl().model.methods.push(method);
        self
    }

    /// Declare a bean property marked for generation: getter and setter carrying `FormData`
    fn property(mut self, name: &str, signature: &str) -> Self {
        let decl = self.decl();
        let Some(ty) = decl.parse(signature) else {
            return self;
        };
        let bean = capitalize(name);
        let getter_prefix = if ty == TypeRef::Primitive(dtogen_common::Primitive::Boolean) {
            "is"
        } else {
            "get"
        };
        let marker = DataDirective::form_data().to_annotation();
        decl.model.methods.push(MemberMethod {
            name: format!("{getter_prefix}{bean}"),
            return_type: Some(ty.clone()),
            parameters: Vec::new(),
            modifiers: Modifiers::public(),
            annotations: vec![marker.clone()],
        });
        decl.model.methods.push(MemberMethod {
            name: format!("set{bean}"),
            return_type: None,
            parameters: vec![MethodParameter {
                name: name.to_string(),
                ty,
            }],
            modifiers: Modifiers::public(),
            annotations: vec![marker],
        });
        self
    }

    /// Declare a member type; its qualified name is this type's name plus `simple_name`
    fn nested<F>(mut self, simple_name: &str, f: F) -> Self
    where
        F: FnOnce(NestedTypeBuilder) -> NestedTypeBuilder,
    {
        let decl = self.decl();
        let name = format!("{}.{}", decl.model.name, simple_name);
        let nested = f(NestedTypeBuilder {
            decl: TypeDecl::new(name.clone(), Some(decl.model.name.clone())),
        });
        decl.model.nested_types.push(name);
        decl.nested.push(nested.decl);
        self
    }
}

/// Builder for a top-level type; `build` hands it back to the ModelBuilder
pub struct ModelTypeBuilder<'a> {
    parent: &'a mut ModelBuilder,
    decl: TypeDecl,
}

impl<'a> ModelTypeBuilder<'a> {
    /// Finalize the type and its nested types and return to the parent builder
    pub fn build(self) -> &'a mut ModelBuilder {
        let mut types = Vec::new();
        let mut errors = Vec::new();
        self.decl.flatten(&mut types, &mut errors);
        for model in types {
            self.parent.push(model);
        }
        self.parent.record_errors(errors);
        self.parent
    }
}

impl DeclarationDsl for ModelTypeBuilder<'_> {
    fn decl(&mut self) -> &mut TypeDecl {
        &mut self.decl
    }
}

/// Builder handed to `nested` closures
pub struct NestedTypeBuilder {
    decl: TypeDecl,
}

impl DeclarationDsl for NestedTypeBuilder {
    fn decl(&mut self) -> &mut TypeDecl {
        &mut self.decl
    }
}

/// Builder for the elements of a `FormData` directive
pub struct FormDataBuilder {
    directive: DataDirective,
    errors: Vec<TypeParseError>,
}

impl FormDataBuilder {
    fn new() -> Self {
        Self {
            directive: DataDirective::form_data(),
            errors: Vec::new(),
        }
    }

    fn parse(&mut self, signature: &str) -> Option<TypeRef> {
        TypeRef::parse(signature)
            .map_err(|err| self.errors.push(err))
            .ok()
    }

    pub fn value(mut self, signature: &str) -> Self {
        self.directive.value = self.parse(signature);
        self
    }

    pub fn command(mut self, command: GenerationCommand) -> Self {
        self.directive.command = command;
        self
    }

    pub fn subtype_command(mut self, command: GenerationCommand) -> Self {
        self.directive.subtype_command = command;
        self
    }

    pub fn generic_ordinal(mut self, ordinal: usize) -> Self {
        self.directive.generic_ordinal = Some(ordinal);
        self
    }

    pub fn type_argument(mut self, signature: &str) -> Self {
        if let Some(parsed) = self.parse(signature) {
            self.directive.type_arguments.push(parsed);
        }
        self
    }

    pub fn interface(mut self, signature: &str) -> Self {
        if let Some(parsed) = self.parse(signature) {
            self.directive.interfaces.push(parsed);
        }
        self
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
