//! The framework types every model snapshot builds on: model base classes and
//! interfaces, plus the DTO templates generated classes extend.

use crate::directive::GenerationCommand;
use crate::model_builder::ModelBuilder;
use crate::type_builder::{DeclarationDsl, ModelTypeExt};
use dtogen_common::{MemberMethod, MethodParameter, Modifiers, TypeRef};

pub mod names {
    // model side
    pub const IFORM: &str = "org.eclipse.scout.rt.client.ui.form.IForm";
    pub const ABSTRACT_FORM: &str = "org.eclipse.scout.rt.client.ui.form.AbstractForm";
    pub const IFORM_FIELD: &str = "org.eclipse.scout.rt.client.ui.form.fields.IFormField";
    pub const ABSTRACT_FORM_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.AbstractFormField";
    pub const IVALUE_FIELD: &str = "org.eclipse.scout.rt.client.ui.form.fields.IValueField";
    pub const ABSTRACT_VALUE_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.AbstractValueField";
    pub const ICOMPOSITE_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.ICompositeField";
    pub const ABSTRACT_COMPOSITE_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.AbstractCompositeField";
    pub const IGROUP_BOX: &str = "org.eclipse.scout.rt.client.ui.form.fields.groupbox.IGroupBox";
    pub const ABSTRACT_GROUP_BOX: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.groupbox.AbstractGroupBox";
    pub const ABSTRACT_SEQUENCE_BOX: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.sequencebox.AbstractSequenceBox";
    pub const ABSTRACT_TAB_BOX: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.tabbox.AbstractTabBox";
    pub const IBUTTON: &str = "org.eclipse.scout.rt.client.ui.form.fields.button.IButton";
    pub const ABSTRACT_BUTTON: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.button.AbstractButton";
    pub const ABSTRACT_STRING_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.stringfield.AbstractStringField";
    pub const ABSTRACT_LONG_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.longfield.AbstractLongField";
    pub const ABSTRACT_INTEGER_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.integerfield.AbstractIntegerField";
    pub const ABSTRACT_BIG_DECIMAL_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.bigdecimalfield.AbstractBigDecimalField";
    pub const ABSTRACT_DATE_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.datefield.AbstractDateField";
    pub const ABSTRACT_BOOLEAN_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.booleanfield.AbstractBooleanField";
    pub const ABSTRACT_SMART_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.smartfield.AbstractSmartField";
    pub const ABSTRACT_LIST_BOX: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.listbox.AbstractListBox";
    pub const ITABLE_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.tablefield.ITableField";
    pub const ABSTRACT_TABLE_FIELD: &str =
        "org.eclipse.scout.rt.client.ui.form.fields.tablefield.AbstractTableField";
    pub const ITABLE: &str = "org.eclipse.scout.rt.client.ui.basic.table.ITable";
    pub const ABSTRACT_TABLE: &str = "org.eclipse.scout.rt.client.ui.basic.table.AbstractTable";
    pub const ICOLUMN: &str = "org.eclipse.scout.rt.client.ui.basic.table.columns.IColumn";
    pub const ABSTRACT_COLUMN: &str =
        "org.eclipse.scout.rt.client.ui.basic.table.columns.AbstractColumn";
    pub const ABSTRACT_STRING_COLUMN: &str =
        "org.eclipse.scout.rt.client.ui.basic.table.columns.AbstractStringColumn";
    pub const ABSTRACT_LONG_COLUMN: &str =
        "org.eclipse.scout.rt.client.ui.basic.table.columns.AbstractLongColumn";
    pub const ABSTRACT_INTEGER_COLUMN: &str =
        "org.eclipse.scout.rt.client.ui.basic.table.columns.AbstractIntegerColumn";
    pub const ABSTRACT_BIG_DECIMAL_COLUMN: &str =
        "org.eclipse.scout.rt.client.ui.basic.table.columns.AbstractBigDecimalColumn";
    pub const ABSTRACT_DATE_COLUMN: &str =
        "org.eclipse.scout.rt.client.ui.basic.table.columns.AbstractDateColumn";
    pub const ABSTRACT_BOOLEAN_COLUMN: &str =
        "org.eclipse.scout.rt.client.ui.basic.table.columns.AbstractBooleanColumn";
    pub const ABSTRACT_SMART_COLUMN: &str =
        "org.eclipse.scout.rt.client.ui.basic.table.columns.AbstractSmartColumn";
    pub const ITABLE_EXTENSION: &str =
        "org.eclipse.scout.rt.client.extension.ui.basic.table.ITableExtension";
    pub const ABSTRACT_TABLE_EXTENSION: &str =
        "org.eclipse.scout.rt.client.extension.ui.basic.table.AbstractTableExtension";
    pub const IPAGE_WITH_TABLE: &str =
        "org.eclipse.scout.rt.client.ui.desktop.outline.pages.IPageWithTable";
    pub const ABSTRACT_PAGE_WITH_TABLE: &str =
        "org.eclipse.scout.rt.client.ui.desktop.outline.pages.AbstractPageWithTable";

    // data side
    pub const ABSTRACT_FORM_DATA: &str = "org.eclipse.scout.rt.shared.data.form.AbstractFormData";
    pub const ABSTRACT_FORM_FIELD_DATA: &str =
        "org.eclipse.scout.rt.shared.data.form.fields.AbstractFormFieldData";
    pub const ABSTRACT_VALUE_FIELD_DATA: &str =
        "org.eclipse.scout.rt.shared.data.form.fields.AbstractValueFieldData";
    pub const ABSTRACT_LIST_BOX_DATA: &str =
        "org.eclipse.scout.rt.shared.data.form.fields.listbox.AbstractListBoxData";
    pub const ABSTRACT_PROPERTY_DATA: &str =
        "org.eclipse.scout.rt.shared.data.form.properties.AbstractPropertyData";
    pub const ABSTRACT_TABLE_FIELD_BEAN_DATA: &str =
        "org.eclipse.scout.rt.shared.data.form.fields.tablefield.AbstractTableFieldBeanData";
    pub const ABSTRACT_TABLE_PAGE_DATA: &str =
        "org.eclipse.scout.rt.shared.data.page.AbstractTablePageData";
    pub const ABSTRACT_TABLE_ROW_DATA: &str =
        "org.eclipse.scout.rt.shared.data.basic.table.AbstractTableRowData";

    // platform
    pub const OBJECT: &str = "java.lang.Object";
    pub const STRING: &str = "java.lang.String";
    pub const LONG: &str = "java.lang.Long";
    pub const INTEGER: &str = "java.lang.Integer";
    pub const BOOLEAN: &str = "java.lang.Boolean";
    pub const BIG_DECIMAL: &str = "java.math.BigDecimal";
    pub const DATE: &str = "java.util.Date";
    pub const SET: &str = "java.util.Set";
    pub const CLASS: &str = "java.lang.Class";
}

use names::*;

/// Typed value fields and the value type they bind
const VALUE_FIELDS: &[(&str, &str)] = &[
    (ABSTRACT_STRING_FIELD, STRING),
    (ABSTRACT_LONG_FIELD, LONG),
    (ABSTRACT_INTEGER_FIELD, INTEGER),
    (ABSTRACT_BIG_DECIMAL_FIELD, BIG_DECIMAL),
    (ABSTRACT_DATE_FIELD, DATE),
    (ABSTRACT_BOOLEAN_FIELD, BOOLEAN),
];

const COLUMNS: &[(&str, &str)] = &[
    (ABSTRACT_STRING_COLUMN, STRING),
    (ABSTRACT_LONG_COLUMN, LONG),
    (ABSTRACT_INTEGER_COLUMN, INTEGER),
    (ABSTRACT_BIG_DECIMAL_COLUMN, BIG_DECIMAL),
    (ABSTRACT_DATE_COLUMN, DATE),
    (ABSTRACT_BOOLEAN_COLUMN, BOOLEAN),
];

/// Adds the framework model types and DTO templates to `builder`
pub fn register_runtime(builder: &mut ModelBuilder) {
    register_model_types(builder);
    register_data_types(builder);
    log::debug!("registered {} runtime types", builder.types.len());
}

fn register_model_types(builder: &mut ModelBuilder) {
    builder.model_type(IFORM).interface_type().build();
    builder
        .model_type(ABSTRACT_FORM)
        .abstract_type()
        .implements(IFORM)
        .form_data(|d| {
            d.value(ABSTRACT_FORM_DATA)
                .command(GenerationCommand::Use)
                .subtype_command(GenerationCommand::Create)
        })
        .build();

    builder.model_type(IFORM_FIELD).interface_type().build();
    builder
        .model_type(ABSTRACT_FORM_FIELD)
        .abstract_type()
        .implements(IFORM_FIELD)
        .form_data(|d| {
            d.value(ABSTRACT_FORM_FIELD_DATA)
                .command(GenerationCommand::Use)
                .subtype_command(GenerationCommand::Create)
        })
        .build();

    builder
        .model_type(IVALUE_FIELD)
        .interface_type()
        .type_parameter("VALUE")
        .implements(IFORM_FIELD)
        .build();
    builder
        .model_type(ABSTRACT_VALUE_FIELD)
        .abstract_type()
        .type_parameter("VALUE")
        .extends(ABSTRACT_FORM_FIELD)
        .implements(&format!("{IVALUE_FIELD}<VALUE>"))
        .form_data(|d| {
            d.value(ABSTRACT_VALUE_FIELD_DATA)
                .command(GenerationCommand::Use)
                .subtype_command(GenerationCommand::Create)
                .generic_ordinal(0)
        })
        .method(getter("getValue", TypeRef::variable("VALUE")))
        .build();
    for (field, value) in VALUE_FIELDS {
        builder
            .model_type(*field)
            .abstract_type()
            .extends(&format!("{ABSTRACT_VALUE_FIELD}<{value}>"))
            .build();
    }
    builder
        .model_type(ABSTRACT_SMART_FIELD)
        .abstract_type()
        .type_parameter("VALUE")
        .extends(&format!("{ABSTRACT_VALUE_FIELD}<VALUE>"))
        .build();
    builder
        .model_type(ABSTRACT_LIST_BOX)
        .abstract_type()
        .type_parameter("KEY")
        .extends(&format!("{ABSTRACT_VALUE_FIELD}<{SET}<KEY>>"))
        .form_data(|d| {
            d.value(ABSTRACT_LIST_BOX_DATA)
                .command(GenerationCommand::Use)
                .subtype_command(GenerationCommand::Create)
                .generic_ordinal(0)
        })
        .build();

    builder
        .model_type(ICOMPOSITE_FIELD)
        .interface_type()
        .implements(IFORM_FIELD)
        .build();
    builder
        .model_type(ABSTRACT_COMPOSITE_FIELD)
        .abstract_type()
        .extends(ABSTRACT_FORM_FIELD)
        .implements(ICOMPOSITE_FIELD)
        .form_data(|d| {
            d.command(GenerationCommand::None)
                .subtype_command(GenerationCommand::None)
        })
        .build();
    builder
        .model_type(IGROUP_BOX)
        .interface_type()
        .implements(ICOMPOSITE_FIELD)
        .build();
    builder
        .model_type(ABSTRACT_GROUP_BOX)
        .abstract_type()
        .extends(ABSTRACT_COMPOSITE_FIELD)
        .implements(IGROUP_BOX)
        .build();
    for composite in [ABSTRACT_SEQUENCE_BOX, ABSTRACT_TAB_BOX] {
        builder
            .model_type(composite)
            .abstract_type()
            .extends(ABSTRACT_COMPOSITE_FIELD)
            .build();
    }

    builder
        .model_type(IBUTTON)
        .interface_type()
        .implements(IFORM_FIELD)
        .build();
    builder
        .model_type(ABSTRACT_BUTTON)
        .abstract_type()
        .extends(ABSTRACT_FORM_FIELD)
        .implements(IBUTTON)
        .form_data(|d| {
            d.command(GenerationCommand::Ignore)
                .subtype_command(GenerationCommand::Ignore)
        })
        .build();

    builder.model_type(ITABLE).interface_type().build();
    builder
        .model_type(ABSTRACT_TABLE)
        .abstract_type()
        .implements(ITABLE)
        .build();
    builder
        .model_type(ITABLE_FIELD)
        .interface_type()
        .bounded_type_parameter("T", ITABLE)
        .implements(IFORM_FIELD)
        .build();
    builder
        .model_type(ABSTRACT_TABLE_FIELD)
        .abstract_type()
        .bounded_type_parameter("T", ITABLE)
        .extends(ABSTRACT_FORM_FIELD)
        .implements(&format!("{ITABLE_FIELD}<T>"))
        .form_data(|d| {
            d.value(ABSTRACT_TABLE_FIELD_BEAN_DATA)
                .command(GenerationCommand::Use)
                .subtype_command(GenerationCommand::Create)
        })
        .build();

    builder
        .model_type(ICOLUMN)
        .interface_type()
        .type_parameter("VALUE")
        .build();
    builder
        .model_type(ABSTRACT_COLUMN)
        .abstract_type()
        .type_parameter("VALUE")
        .implements(&format!("{ICOLUMN}<VALUE>"))
        .build();
    for (column, value) in COLUMNS {
        builder
            .model_type(*column)
            .abstract_type()
            .extends(&format!("{ABSTRACT_COLUMN}<{value}>"))
            .build();
    }
    builder
        .model_type(ABSTRACT_SMART_COLUMN)
        .abstract_type()
        .type_parameter("VALUE")
        .extends(&format!("{ABSTRACT_COLUMN}<VALUE>"))
        .build();

    builder
        .model_type(ITABLE_EXTENSION)
        .interface_type()
        .bounded_type_parameter("TABLE", ITABLE)
        .build();
    builder
        .model_type(ABSTRACT_TABLE_EXTENSION)
        .abstract_type()
        .bounded_type_parameter("TABLE", ITABLE)
        .implements(&format!("{ITABLE_EXTENSION}<TABLE>"))
        .build();

    builder
        .model_type(IPAGE_WITH_TABLE)
        .interface_type()
        .bounded_type_parameter("T", ITABLE)
        .build();
    builder
        .model_type(ABSTRACT_PAGE_WITH_TABLE)
        .abstract_type()
        .bounded_type_parameter("T", ITABLE)
        .implements(&format!("{IPAGE_WITH_TABLE}<T>"))
        .page_data(ABSTRACT_TABLE_PAGE_DATA)
        .build();
}

fn register_data_types(builder: &mut ModelBuilder) {
    builder.model_type(OBJECT).build();
    builder.model_type(ABSTRACT_FORM_DATA).abstract_type().build();
    builder
        .model_type(ABSTRACT_FORM_FIELD_DATA)
        .abstract_type()
        .build();

    for (template, superclass) in [
        (ABSTRACT_VALUE_FIELD_DATA, ABSTRACT_FORM_FIELD_DATA),
        (ABSTRACT_PROPERTY_DATA, OBJECT),
    ] {
        builder
            .model_type(template)
            .abstract_type()
            .type_parameter("T")
            .extends(superclass)
            .method(getter("getValue", TypeRef::variable("T")))
            .method(setter("setValue", TypeRef::variable("T")))
            .build();
    }
    builder
        .model_type(ABSTRACT_LIST_BOX_DATA)
        .abstract_type()
        .type_parameter("T")
        .extends(&format!("{ABSTRACT_VALUE_FIELD_DATA}<{SET}<T>>"))
        .build();

    builder
        .model_type(ABSTRACT_TABLE_ROW_DATA)
        .abstract_type()
        .method(getter("getRowState", TypeRef::Primitive(dtogen_common::Primitive::Int)))
        .build();
    let row = TypeRef::class(ABSTRACT_TABLE_ROW_DATA);
    for holder in [ABSTRACT_TABLE_FIELD_BEAN_DATA, ABSTRACT_TABLE_PAGE_DATA] {
        builder
            .model_type(holder)
            .abstract_type()
            .extends(if holder == ABSTRACT_TABLE_FIELD_BEAN_DATA {
                ABSTRACT_FORM_FIELD_DATA
            } else {
                OBJECT
            })
            .method(getter("createRow", row.clone()))
            .method(getter(
                "getRowType",
                TypeRef::generic(CLASS, vec![TypeRef::wildcard_extends(row.clone())]),
            ))
            .method(getter("getRows", TypeRef::array_of(row.clone())))
            .build();
    }
}

fn getter(name: &str, ty: TypeRef) -> MemberMethod {
    MemberMethod {
        name: name.to_string(),
        return_type: Some(ty),
        parameters: Vec::new(),
        modifiers: Modifiers::public(),
        annotations: Vec::new(),
    }
}

fn setter(name: &str, ty: TypeRef) -> MemberMethod {
    MemberMethod {
        name: name.to_string(),
        return_type: None,
        parameters: vec![MethodParameter {
            name: "value".to_string(),
            ty,
        }],
        modifiers: Modifiers::public(),
        annotations: Vec::new(),
    }
}
