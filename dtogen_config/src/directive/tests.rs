#[cfg(test)]
mod tests {
    use super::super::annotations as names;
    use super::super::*;
    use dtogen_common::{Annotation, AnnotationValue, ModelType, TypeRef};

    fn enum_value(constant: &str) -> AnnotationValue {
        AnnotationValue::Enum(constant.to_string())
    }

    #[test]
    fn form_data_defaults_to_create_everywhere() {
        let directive = DataDirective::from_annotation(&Annotation::new(names::FORM_DATA))
            .unwrap()
            .unwrap();
        assert_eq!(directive.command, GenerationCommand::Create);
        assert_eq!(directive.subtype_command, GenerationCommand::Create);
        assert!(directive.value.is_none());
        assert!(directive.generic_ordinal.is_none());
    }

    #[test]
    fn form_data_reads_every_element() {
        let annotation = Annotation::new(names::FORM_DATA)
            .with(names::VALUE, AnnotationValue::Type(TypeRef::class("fw.AbstractValueFieldData")))
            .with(names::SDK_COMMAND, enum_value("USE"))
            .with(names::DEFAULT_SUBTYPE_SDK_COMMAND, enum_value("CREATE"))
            .with(names::GENERIC_ORDINAL, AnnotationValue::Int(0))
            .with(
                names::INTERFACES,
                AnnotationValue::Type(TypeRef::class("pkg.IMarker")),
            );

        let directive = DataDirective::from_annotation(&annotation).unwrap().unwrap();
        assert_eq!(directive.command, GenerationCommand::Use);
        assert_eq!(directive.generic_ordinal, Some(0));
        assert_eq!(directive.interfaces, vec![TypeRef::class("pkg.IMarker")]);

        let roundtrip = DataDirective::from_annotation(&directive.to_annotation())
            .unwrap()
            .unwrap();
        assert_eq!(roundtrip, directive);
    }

    #[test]
    fn page_data_is_used_by_subclasses() {
        let annotation = Annotation::new(names::PAGE_DATA).with(
            names::VALUE,
            AnnotationValue::Type(TypeRef::class("pkg.PersonTablePageData")),
        );
        let directive = DataDirective::from_annotation(&annotation).unwrap().unwrap();
        assert_eq!(directive.kind, DirectiveKind::PageData);
        assert_eq!(directive.command, GenerationCommand::Create);
        assert_eq!(directive.subtype_command, GenerationCommand::Use);

        let missing = DataDirective::from_annotation(&Annotation::new(names::PAGE_DATA));
        assert!(missing.is_err());
    }

    #[test]
    fn unknown_commands_are_rejected() {
        let annotation =
            Annotation::new(names::FORM_DATA).with(names::SDK_COMMAND, enum_value("MAYBE"));
        let err = DataDirective::from_annotation(&annotation).unwrap_err();
        assert_eq!(err.annotation, "FormData");
        assert!(err.message.contains("MAYBE"));
    }

    #[test]
    fn column_data_only_creates_or_ignores() {
        let ignore = Annotation::new(names::COLUMN_DATA).with(names::VALUE, enum_value("IGNORE"));
        assert_eq!(
            ColumnDirective::from_annotation(&ignore).unwrap(),
            Some(ColumnDirective { command: GenerationCommand::Ignore })
        );
        let use_ = Annotation::new(names::COLUMN_DATA).with(names::VALUE, enum_value("USE"));
        assert!(ColumnDirective::from_annotation(&use_).is_err());
    }

    #[test]
    fn directives_collect_markers() {
        let mut model = ModelType::new("pkg.ExtendedForm.ExtendedNameField");
        model.annotations = vec![
            Annotation::new(names::REPLACE),
            Annotation::new(names::ORDER).with(names::VALUE, AnnotationValue::Int(10)),
            Annotation::new(names::EXTENDS).with(
                names::VALUE,
                AnnotationValue::Type(TypeRef::class("pkg.BaseForm.MainBox")),
            ),
        ];
        let directives = Directives::read(&model).unwrap();
        assert!(directives.replace);
        assert!(directives.data.is_none());
        assert_eq!(directives.extends, Some(TypeRef::class("pkg.BaseForm.MainBox")));
    }

    #[test]
    fn two_data_directives_conflict() {
        let mut model = ModelType::new("pkg.Confused");
        model.annotations = vec![
            Annotation::new(names::FORM_DATA),
            Annotation::new(names::PAGE_DATA)
                .with(names::VALUE, AnnotationValue::Type(TypeRef::class("pkg.Data"))),
        ];
        assert!(Directives::read(&model).is_err());
    }

    #[test]
    fn framework_annotations_are_not_copied() {
        assert!(!names::is_copied_to_dto(names::CLASS_ID));
        assert!(!names::is_copied_to_dto(names::REPLACE));
        assert!(names::is_copied_to_dto("pkg.annotations.Audited"));
    }
}
