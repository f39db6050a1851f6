use dtogen_common::{Primitive, TypeRef};

pub const SERIAL_VERSION_UID: &str = "serialVersionUID";
pub const ROW_DATA_SUFFIX: &str = "RowData";
pub const PROPERTY_SUFFIX: &str = "Property";
const DATA_SUFFIX: &str = "Data";
const FIELD_SUFFIX: &str = "Field";
const COLUMN_SUFFIX: &str = "Column";
const ROW_STRIPPED_SUFFIXES: &[&str] = &["PageData", "FieldData", "Data"];

/// Default root DTO name: same package, simple name plus `Data`
pub fn root_dto_name(package: Option<&str>, simple_name: &str) -> String {
    match package {
        Some(package) if !package.is_empty() => format!("{package}.{simple_name}{DATA_SUFFIX}"),
        _ => format!("{simple_name}{DATA_SUFFIX}"),
    }
}

/// `NameField` becomes `Name`; names without the suffix are kept
pub fn nested_dto_name(model_simple_name: &str) -> String {
    strip_suffix_keeping_stem(model_simple_name, FIELD_SUFFIX).to_string()
}

/// Row type of a table container DTO: `Table` → `TableRowData`,
/// `PersonTablePageData` → `PersonTableRowData`
pub fn row_type_name(container_simple_name: &str) -> String {
    let stem = ROW_STRIPPED_SUFFIXES
        .iter()
        .find(|suffix| {
            container_simple_name.len() > suffix.len() && container_simple_name.ends_with(*suffix)
        })
        .map(|suffix| &container_simple_name[..container_simple_name.len() - suffix.len()])
        .unwrap_or(container_simple_name);
    format!("{stem}{ROW_DATA_SUFFIX}")
}

/// Names derived from a column model type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    /// Capitalized bean name used in accessors, e.g. `First`
    pub bean: String,
    /// Constant name and value, e.g. `first`
    pub property: String,
    /// Backing field, e.g. `m_first`
    pub field: String,
}

impl ColumnNames {
    pub fn from_column(column_simple_name: &str) -> Self {
        let bean = strip_suffix_keeping_stem(column_simple_name, COLUMN_SUFFIX).to_string();
        let property = decapitalize(&bean);
        let field = format!("m_{property}");
        Self {
            bean,
            property,
            field,
        }
    }
}

/// Names derived from a bean property getter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNames {
    pub bean: String,
    pub holder: String,
    pub holder_getter: String,
}

impl PropertyNames {
    /// `None` if the method is not named like a getter
    pub fn from_getter(method_name: &str) -> Option<Self> {
        let bean = method_name
            .strip_prefix("get")
            .or_else(|| method_name.strip_prefix("is"))
            .filter(|rest| rest.chars().next().is_some_and(char::is_uppercase))?;
        let holder = format!("{bean}{PROPERTY_SUFFIX}");
        Some(Self {
            bean: bean.to_string(),
            holder_getter: format!("get{holder}"),
            holder,
        })
    }
}

/// `isX` for primitive booleans, `getX` otherwise
pub fn getter_name(bean: &str, ty: &TypeRef) -> String {
    if ty.primitive() == Some(Primitive::Boolean) {
        format!("is{bean}")
    } else {
        format!("get{bean}")
    }
}

pub fn setter_name(bean: &str) -> String {
    format!("set{bean}")
}

/// Bean decapitalization: `FirstName` → `firstName`, but `URL` stays `URL`
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) && first.is_uppercase() {
        return name.to_string();
    }
    first.to_lowercase().chain(name.chars().skip(1)).collect()
}

fn strip_suffix_keeping_stem<'a>(name: &'a str, suffix: &str) -> &'a str {
    match name.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() => stem,
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_names_drop_field_suffix() {
        assert_eq!(nested_dto_name("NameField"), "Name");
        assert_eq!(nested_dto_name("MyTemplateBox"), "MyTemplateBox");
        assert_eq!(nested_dto_name("Field"), "Field");
    }

    #[test]
    fn row_type_names() {
        assert_eq!(row_type_name("Table"), "TableRowData");
        assert_eq!(row_type_name("PersonTablePageData"), "PersonTableRowData");
        assert_eq!(row_type_name("AbstractCompanyTableFieldData"), "AbstractCompanyTableRowData");
        assert_eq!(row_type_name("Data"), "DataRowData");
    }

    #[test]
    fn column_names() {
        let names = ColumnNames::from_column("FirstColumn");
        assert_eq!(names.bean, "First");
        assert_eq!(names.property, "first");
        assert_eq!(names.field, "m_first");
        assert_eq!(ColumnNames::from_column("URLColumn").property, "URL");
    }

    #[test]
    fn property_names() {
        let names = PropertyNames::from_getter("getFirstName").unwrap();
        assert_eq!(names.holder, "FirstNameProperty");
        assert_eq!(names.holder_getter, "getFirstNameProperty");
        assert_eq!(PropertyNames::from_getter("isActive").unwrap().bean, "Active");
        assert!(PropertyNames::from_getter("getter").is_none());
        assert!(PropertyNames::from_getter("compute").is_none());
    }

    #[test]
    fn accessor_prefixes_follow_the_primitive_rule() {
        assert_eq!(getter_name("Active", &TypeRef::Primitive(Primitive::Boolean)), "isActive");
        assert_eq!(getter_name("Count", &TypeRef::Primitive(Primitive::Int)), "getCount");
        assert_eq!(getter_name("Flag", &TypeRef::class("java.lang.Boolean")), "getFlag");
        assert_eq!(root_dto_name(Some("pkg"), "MyForm"), "pkg.MyFormData");
        assert_eq!(root_dto_name(None, "MyForm"), "MyFormData");
    }
}
