use super::place_nested;
use crate::dto::{DtoKind, DtoMethod, DtoType, MethodBody};
use crate::error::{GenerationError, Result};
use crate::naming::{self, PropertyNames};
use dtogen_common::{ModelType, Modifiers, TypeRef};
use dtogen_config::GenerationCommand;
use dtogen_config::directive::property_directive;
use dtogen_config::runtime::names;

/// Bean properties of `model` marked with `FormData`: a holder type each,
/// plus the holder accessor and value getter/setter on `dto`
pub(super) fn add_properties(dto: &mut DtoType, model: &ModelType) -> Result<()> {
    for method in &model.methods {
        let directive =
            property_directive(method).map_err(|err| GenerationError::InvalidDirective {
                node: model.name.clone(),
                message: format!("{}: {err}", method.name),
            })?;
        let Some(directive) = directive else {
            continue;
        };
        if directive.command == GenerationCommand::Ignore || !method.parameters.is_empty() {
            continue;
        }
        let (Some(property), Some(ty)) = (
            PropertyNames::from_getter(&method.name),
            method.return_type.clone(),
        ) else {
            continue;
        };

        let holder_name = format!("{}.{}", dto.name, property.holder);
        let holder_ty = TypeRef::class(holder_name.clone());
        let mut holder = DtoType::new(
            holder_name,
            DtoKind::PropertyData,
            TypeRef::generic(names::ABSTRACT_PROPERTY_DATA, vec![ty.boxed()]),
        );
        holder.modifiers = Modifiers::public().with_static(true);
        holder.source_model = Some(model.name.clone());

        dto.methods.push(DtoMethod::new(
            property.holder_getter.clone(),
            Some(holder_ty.clone()),
            MethodBody::PropertyByClass(holder_ty),
        ));
        dto.methods.push(DtoMethod::new(
            naming::getter_name(&property.bean, &ty),
            Some(ty.clone()),
            MethodBody::PropertyValue {
                holder_getter: property.holder_getter.clone(),
                default_literal: ty.primitive().map(|p| p.default_literal().to_string()),
            },
        ));
        dto.methods.push(
            DtoMethod::new(
                naming::setter_name(&property.bean),
                None,
                MethodBody::SetPropertyValue {
                    holder_getter: property.holder_getter.clone(),
                },
            )
            .with_parameter(naming::decapitalize(&property.bean), ty),
        );
        place_nested(dto, holder, &model.name)?;
    }
    Ok(())
}
