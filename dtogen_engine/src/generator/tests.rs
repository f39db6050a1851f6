#[cfg(test)]
mod tests {
    use crate::dto::{DtoKind, MethodBody};
    use crate::error::GenerationError;
    use crate::generator::DtoGenerator;
    use crate::node_kind::NodeKind;
    use dtogen_common::{ModelSnapshot, TypeRef};
    use dtogen_config::annotations;
    use dtogen_config::runtime::names;
    use dtogen_config::{DeclarationDsl, GenerationCommand, ModelBuilder, ModelTypeExt};

    fn person_form(builder: &mut ModelBuilder) {
        builder
            .model_type("pkg.PersonForm")
            .extends(names::ABSTRACT_FORM)
            .nested("MainBox", |b| {
                b.extends(names::ABSTRACT_GROUP_BOX)
                    .nested("NameField", |f| f.extends(names::ABSTRACT_STRING_FIELD))
                    .nested("PersonsField", |f| {
                        f.extends(&format!(
                            "{}<pkg.PersonForm.MainBox.PersonsField.Table>",
                            names::ABSTRACT_TABLE_FIELD
                        ))
                        .nested("Table", |t| {
                            t.extends(names::ABSTRACT_TABLE)
                                .nested("FirstNameColumn", |c| {
                                    c.extends(names::ABSTRACT_STRING_COLUMN)
                                })
                                .nested("AgeColumn", |c| c.extends(names::ABSTRACT_INTEGER_COLUMN))
                        })
                    })
                    .nested("OkButton", |f| f.extends(names::ABSTRACT_BUTTON))
            })
            .build();
    }

    fn generator_for(declare: impl FnOnce(&mut ModelBuilder)) -> DtoGenerator<ModelSnapshot> {
        let mut builder = ModelBuilder::with_runtime();
        declare(&mut builder);
        DtoGenerator::new(builder.snapshot().unwrap())
    }

    #[test]
    fn walk_visits_fields_before_tables_and_stops_at_ignore() {
        let generator = generator_for(person_form);
        let entries = generator.walk("pkg.PersonForm").unwrap();
        let visited: Vec<(&str, NodeKind, GenerationCommand)> = entries
            .iter()
            .map(|e| (e.model.simple_name(), e.kind(), e.command()))
            .collect();
        assert_eq!(
            visited,
            vec![
                ("PersonForm", NodeKind::Form, GenerationCommand::Create),
                ("MainBox", NodeKind::Composite, GenerationCommand::None),
                ("NameField", NodeKind::ValueField, GenerationCommand::Create),
                ("PersonsField", NodeKind::TableField, GenerationCommand::Create),
                ("Table", NodeKind::Table, GenerationCommand::None),
                ("FirstNameColumn", NodeKind::Column, GenerationCommand::Create),
                ("AgeColumn", NodeKind::Column, GenerationCommand::Create),
                ("OkButton", NodeKind::Button, GenerationCommand::Ignore),
            ]
        );

        // the group box is transparent: fields are owned by the form
        assert_eq!(entries[2].owner, Some(0));
        assert_eq!(entries[2].parent, Some(1));
        assert_eq!(entries[2].scope.as_deref(), Some("pkg.PersonFormData"));
        assert_eq!(entries[5].owner, Some(3));
        assert_eq!(entries[5].depth, 4);
    }

    #[test]
    fn value_field_binds_its_value_type() {
        let generator = generator_for(person_form);
        let dto = generator.generate("pkg.PersonForm").unwrap().unwrap();
        assert_eq!(dto.name, "pkg.PersonFormData");
        assert_eq!(dto.superclass, TypeRef::class(names::ABSTRACT_FORM_DATA));
        assert!(dto.has_annotation(annotations::GENERATED));
        assert!(!dto.modifiers.is_static);

        let name = dto.nested("Name").unwrap();
        assert_eq!(name.kind, DtoKind::FieldData);
        assert_eq!(
            name.superclass,
            TypeRef::generic(names::ABSTRACT_VALUE_FIELD_DATA, vec![TypeRef::class(names::STRING)])
        );
        assert!(name.modifiers.is_static);

        let getter = dto.method("getName").unwrap();
        assert_eq!(getter.body, MethodBody::FieldByClass(TypeRef::class("pkg.PersonFormData.Name")));
        assert!(dto.method("getOk").is_none());
    }

    #[test]
    fn table_field_gets_row_methods_and_row_type() {
        let generator = generator_for(person_form);
        let dto = generator.generate("pkg.PersonForm").unwrap().unwrap();
        let persons = dto.nested("Persons").unwrap();
        assert_eq!(persons.kind, DtoKind::TableData);
        assert_eq!(persons.row_container_method_names().len(), 6);
        assert_eq!(persons.methods.iter().filter(|m| m.is_override()).count(), 6);
        assert!(!persons.method("setRows").unwrap().is_override());

        let row = persons.nested("PersonsRowData").unwrap();
        assert_eq!(row.kind, DtoKind::TableRowData);
        assert_eq!(row.superclass, TypeRef::class(names::ABSTRACT_TABLE_ROW_DATA));
        assert_eq!(row.fields.len(), 2 * 2 + 1);
        assert_eq!(row.field("firstName").unwrap().initializer.as_deref(), Some("\"firstName\""));
        assert_eq!(row.field("m_age").unwrap().ty, TypeRef::class(names::INTEGER));
        assert!(row.method("getFirstName").is_some());
        assert!(row.method("setAge").is_some());
    }

    #[test]
    fn ignored_column_is_left_out_of_the_row() {
        let generator = generator_for(|builder| {
            builder
                .model_type("pkg.OrderPage")
                .extends(&format!("{}<pkg.OrderPage.Table>", names::ABSTRACT_PAGE_WITH_TABLE))
                .page_data("pkg.OrderPageData")
                .nested("Table", |t| {
                    t.extends(names::ABSTRACT_TABLE)
                        .nested("IdColumn", |c| c.extends(names::ABSTRACT_LONG_COLUMN))
                        .nested("InternalColumn", |c| {
                            c.extends(names::ABSTRACT_STRING_COLUMN)
                                .column_data(GenerationCommand::Ignore)
                        })
                })
                .build();
        });
        let dto = generator.generate("pkg.OrderPage").unwrap().unwrap();
        assert_eq!(dto.name, "pkg.OrderPageData");
        assert_eq!(dto.kind, DtoKind::PageData);
        assert_eq!(dto.superclass, TypeRef::class(names::ABSTRACT_TABLE_PAGE_DATA));
        let row = dto.nested("OrderRowData").unwrap();
        assert_eq!(row.fields.len(), 3);
        assert!(row.field("internal").is_none());
    }

    #[test]
    fn bean_properties_become_holders() {
        let generator = generator_for(|builder| {
            builder
                .model_type("pkg.SettingsForm")
                .extends(names::ABSTRACT_FORM)
                .property("active", "boolean")
                .property("comment", names::STRING)
                .build();
        });
        let dto = generator.generate("pkg.SettingsForm").unwrap().unwrap();

        let holder = dto.nested("ActiveProperty").unwrap();
        assert_eq!(holder.kind, DtoKind::PropertyData);
        assert_eq!(
            holder.superclass,
            TypeRef::generic(names::ABSTRACT_PROPERTY_DATA, vec![TypeRef::class(names::BOOLEAN)])
        );
        assert_eq!(holder.fields.len(), 1);
        assert!(holder.methods.is_empty());
        assert!(!holder.has_annotation(annotations::GENERATED));

        let is_active = dto.method("isActive").unwrap();
        assert_eq!(
            is_active.body,
            MethodBody::PropertyValue {
                holder_getter: "getActiveProperty".to_string(),
                default_literal: Some("false".to_string()),
            }
        );
        assert!(dto.method("getActive").is_none());
        assert!(dto.method("getCommentProperty").is_some());
        assert!(dto.method("getComment").is_some());
        assert_eq!(dto.method("setComment").unwrap().parameters[0].name, "comment");
    }

    #[test]
    fn use_root_generates_nothing_and_ignore_root_is_rejected() {
        let generator = generator_for(|builder| {
            builder
                .model_type("pkg.SharedForm")
                .extends(names::ABSTRACT_FORM)
                .form_data(|d| d.value("pkg.SharedFormData").command(GenerationCommand::Use))
                .build();
            builder
                .model_type("pkg.HiddenForm")
                .extends(names::ABSTRACT_FORM)
                .form_data(|d| d.command(GenerationCommand::Ignore))
                .build();
        });
        assert_eq!(generator.generate("pkg.SharedForm").unwrap(), None);
        let err = generator.generate("pkg.HiddenForm").unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidRoot {
                command: GenerationCommand::Ignore,
                ..
            }
        ));
        assert_eq!(err.node(), "pkg.HiddenForm");
    }

    #[test]
    fn none_on_a_bound_field_is_fatal() {
        let generator = generator_for(|builder| {
            builder
                .model_type("pkg.BrokenForm")
                .extends(names::ABSTRACT_FORM)
                .nested("NameField", |f| {
                    f.extends(names::ABSTRACT_STRING_FIELD)
                        .form_data(|d| d.command(GenerationCommand::None))
                })
                .build();
        });
        let err = generator.generate("pkg.BrokenForm").unwrap_err();
        assert_eq!(
            err,
            GenerationError::BoundFieldWithNone {
                node: "pkg.BrokenForm.NameField".to_string()
            }
        );
    }

    #[test]
    fn missing_replace_target_is_fatal() {
        let generator = generator_for(|builder| {
            person_form(builder);
            builder
                .model_type("pkg.OtherForm")
                .extends(names::ABSTRACT_FORM)
                .nested("MyNameField", |f| {
                    f.extends("pkg.PersonForm.MainBox.NameField").replace()
                })
                .build();
        });
        match generator.generate("pkg.OtherForm").unwrap_err() {
            GenerationError::ReplaceTargetNotFound {
                node,
                target,
                scope,
            } => {
                assert_eq!(node, "pkg.OtherForm.MyNameField");
                assert_eq!(target, "pkg.PersonForm.MainBox.NameField");
                assert_eq!(scope, "pkg.OtherFormData");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn field_extending_an_unknown_type_is_fatal() {
        let generator = generator_for(|builder| {
            builder
                .model_type("pkg.F")
                .extends(names::ABSTRACT_FORM)
                .nested("NameField", |f| f.extends("pkg.NotOnClasspathField"))
                .build();
        });
        assert_eq!(
            generator.generate("pkg.F").unwrap_err(),
            GenerationError::TypeNotFound("pkg.NotOnClasspathField".to_string())
        );
        assert!(generator.walk("pkg.F").is_err());
    }

    #[test]
    fn duplicate_nested_names_collide() {
        let generator = generator_for(|builder| {
            builder
                .model_type("pkg.TwinForm")
                .extends(names::ABSTRACT_FORM)
                .nested("MainBox", |b| {
                    b.extends(names::ABSTRACT_GROUP_BOX)
                        .nested("NameField", |f| f.extends(names::ABSTRACT_STRING_FIELD))
                        .nested("DetailBox", |d| {
                            d.extends(names::ABSTRACT_GROUP_BOX)
                                .nested("NameField", |f| f.extends(names::ABSTRACT_STRING_FIELD))
                        })
                })
                .build();
        });
        let err = generator.generate("pkg.TwinForm").unwrap_err();
        assert!(matches!(err, GenerationError::NameCollision { ref name, .. } if name == "Name"));
    }

    #[test]
    fn extends_points_at_the_target_dto() {
        let generator = generator_for(|builder| {
            person_form(builder);
            builder
                .model_type("ext.SalaryField")
                .extends(names::ABSTRACT_LONG_FIELD)
                .extension_of("pkg.PersonForm.MainBox")
                .build();
        });
        let dto = generator.generate("ext.SalaryField").unwrap().unwrap();
        assert_eq!(dto.name, "ext.SalaryFieldData");
        let extends = dto.annotation(annotations::EXTENDS).unwrap();
        assert_eq!(
            extends.value(annotations::VALUE).and_then(|v| v.as_type()),
            Some(&TypeRef::class("pkg.PersonFormData"))
        );
        assert!(generator.template_dto("pkg.PersonForm").is_some());
    }

    #[test]
    fn table_extension_extends_the_row_type() {
        let generator = generator_for(|builder| {
            person_form(builder);
            builder
                .model_type("ext.PersonTableExtension")
                .extends(&format!(
                    "{}<pkg.PersonForm.MainBox.PersonsField.Table>",
                    names::ABSTRACT_TABLE_EXTENSION
                ))
                .nested("SalaryColumn", |c| c.extends(names::ABSTRACT_LONG_COLUMN))
                .build();
        });
        let dto = generator.generate("ext.PersonTableExtension").unwrap().unwrap();
        assert_eq!(dto.kind, DtoKind::RowDataExtension);
        assert_eq!(dto.superclass, TypeRef::class(names::ABSTRACT_TABLE_ROW_DATA));
        assert_eq!(dto.fields.len(), 3);
        let extends = dto.annotation(annotations::EXTENDS).unwrap();
        assert_eq!(
            extends.value(annotations::VALUE).and_then(|v| v.as_type()),
            Some(&TypeRef::class("pkg.PersonFormData.Persons.PersonsRowData"))
        );
    }

    #[test]
    fn extending_the_form_being_generated_is_a_cycle() {
        let generator = generator_for(|builder| {
            builder
                .model_type("pkg.LoopForm")
                .extends(names::ABSTRACT_FORM)
                .nested("NameField", |f| {
                    f.extends(names::ABSTRACT_STRING_FIELD)
                        .extension_of("pkg.LoopForm")
                })
                .build();
        });
        let err = generator.generate("pkg.LoopForm").unwrap_err();
        assert_eq!(err, GenerationError::TemplateCycle("pkg.LoopForm".to_string()));
    }

    #[test]
    fn unknown_root_is_a_lookup_failure() {
        let generator = generator_for(|_| {});
        assert_eq!(
            generator.generate("pkg.Missing").unwrap_err(),
            GenerationError::TypeNotFound("pkg.Missing".to_string())
        );
    }

    #[test]
    fn clones_share_caches_across_threads() {
        let generator = generator_for(person_form);
        let first = generator.generate("pkg.PersonForm").unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || generator.generate("pkg.PersonForm").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), first);
        }
    }
}
