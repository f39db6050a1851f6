use crate::dto::{DtoField, DtoKind, DtoMethod, DtoType, MethodBody};
use crate::naming::{self, ColumnNames};
use crate::walker::WalkEntry;
use dtogen_common::{Modifiers, Primitive, TypeRef};
use dtogen_config::runtime::names;

/// `addRow()`, `addRow(int)`, `createRow()`, `getRowType()`, `getRows()`,
/// `rowAt(int)` and `setRows(R[])`. Only `setRows` is not an override.
pub(super) fn row_methods(row: &TypeRef) -> Vec<DtoMethod> {
    let int = TypeRef::Primitive(Primitive::Int);
    let rows = TypeRef::array_of(row.clone());
    let row_class = TypeRef::generic(
        names::CLASS,
        vec![TypeRef::wildcard_extends(TypeRef::class(
            names::ABSTRACT_TABLE_ROW_DATA,
        ))],
    );
    vec![
        DtoMethod::new("addRow", Some(row.clone()), MethodBody::AddRow).overriding(),
        DtoMethod::new("addRow", Some(row.clone()), MethodBody::AddRowWithState)
            .with_parameter("rowState", int.clone())
            .overriding(),
        DtoMethod::new("createRow", Some(row.clone()), MethodBody::CreateRow).overriding(),
        DtoMethod::new("getRowType", Some(row_class), MethodBody::RowType).overriding(),
        DtoMethod::new("getRows", Some(rows.clone()), MethodBody::Rows).overriding(),
        DtoMethod::new("rowAt", Some(row.clone()), MethodBody::RowAt)
            .with_parameter("index", int)
            .overriding(),
        DtoMethod::new("setRows", None, MethodBody::SetRows).with_parameter("rows", rows),
    ]
}

/// The row type of a table container
pub(super) fn row_type(
    name: &str,
    superclass: TypeRef,
    container_model: &str,
    columns: &[&WalkEntry],
) -> DtoType {
    let mut row = DtoType::new(name, DtoKind::TableRowData, superclass);
    row.modifiers = Modifiers::public().with_static(true);
    row.source_model = Some(container_model.to_string());
    add_column_members(&mut row, columns);
    row
}

/// Per column: a property name constant, a backing field and its accessors.
/// Constants come first, then the backing fields.
pub(super) fn add_column_members(dto: &mut DtoType, columns: &[&WalkEntry]) {
    let mut members = Vec::with_capacity(columns.len());
    for entry in columns {
        let column_names = ColumnNames::from_column(entry.model.simple_name());
        let ty = entry
            .descriptor
            .value_type
            .clone()
            .unwrap_or_else(|| TypeRef::class(names::OBJECT));
        dto.fields.push(DtoField {
            name: column_names.property.clone(),
            ty: TypeRef::class(names::STRING),
            modifiers: Modifiers::public_static_final(),
            initializer: Some(format!("\"{}\"", column_names.property)),
            annotations: Vec::new(),
        });
        members.push((column_names, ty));
    }

    for (column, ty) in members {
        dto.fields.push(DtoField {
            name: column.field.clone(),
            ty: ty.clone(),
            modifiers: Modifiers::private(),
            initializer: None,
            annotations: Vec::new(),
        });
        dto.methods.push(DtoMethod::new(
            naming::getter_name(&column.bean, &ty),
            Some(ty.clone()),
            MethodBody::ReturnMember(column.field.clone()),
        ));
        dto.methods.push(
            DtoMethod::new(
                naming::setter_name(&column.bean),
                None,
                MethodBody::AssignMember {
                    field: column.field.clone(),
                    parameter: column.property.clone(),
                },
            )
            .with_parameter(column.property, ty),
        );
    }
}
