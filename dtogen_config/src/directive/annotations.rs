//! Fully qualified names of the annotations the generator understands.

pub const FORM_DATA: &str = "org.eclipse.scout.rt.client.dto.FormData";
pub const PAGE_DATA: &str = "org.eclipse.scout.rt.client.dto.PageData";
pub const COLUMN_DATA: &str = "org.eclipse.scout.rt.client.dto.ColumnData";
pub const REPLACE: &str = "org.eclipse.scout.rt.platform.Replace";
pub const EXTENDS: &str = "org.eclipse.scout.rt.platform.extension.Extends";
pub const ORDER: &str = "org.eclipse.scout.rt.platform.Order";
pub const CLASS_ID: &str = "org.eclipse.scout.rt.platform.classid.ClassId";
pub const GENERATED: &str = "javax.annotation.Generated";
pub const OVERRIDE: &str = "java.lang.Override";

// element names
pub const VALUE: &str = "value";
pub const SDK_COMMAND: &str = "sdkCommand";
pub const DEFAULT_SUBTYPE_SDK_COMMAND: &str = "defaultSubtypeSdkCommand";
pub const GENERIC_ORDINAL: &str = "genericOrdinal";
pub const TYPE_ARGUMENTS: &str = "typeArguments";
pub const INTERFACES: &str = "interfaces";
pub const COMMENTS: &str = "comments";

const FRAMEWORK_INTERNAL: &[&str] = &[FORM_DATA, PAGE_DATA, COLUMN_DATA, ORDER, CLASS_ID, GENERATED];

/// Annotations that drive generation or tooling and never reach a DTO.
/// `Replace` and `Extends` are not in this list: the engine emits its own versions.
pub fn is_framework_internal(name: &str) -> bool {
    FRAMEWORK_INTERNAL.contains(&name)
}

/// Annotations copied verbatim from a model node onto its DTO
pub fn is_copied_to_dto(name: &str) -> bool {
    !is_framework_internal(name) && name != REPLACE && name != EXTENDS
}
