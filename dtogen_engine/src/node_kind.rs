use dtogen_common::{LookupError, ModelTypeAccessor};
use dtogen_config::runtime::names;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a model type in the UI hierarchy, derived from the framework interface it implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Form,
    Page,
    TableExtension,
    TableField,
    Table,
    Column,
    Button,
    ValueField,
    Composite,
    FormField,
    Other,
}

/// Checked in order; the first matching interface wins
const CLASSIFICATION: &[(&str, NodeKind)] = &[
    (names::IFORM, NodeKind::Form),
    (names::IPAGE_WITH_TABLE, NodeKind::Page),
    (names::ITABLE_EXTENSION, NodeKind::TableExtension),
    (names::ITABLE_FIELD, NodeKind::TableField),
    (names::ITABLE, NodeKind::Table),
    (names::ICOLUMN, NodeKind::Column),
    (names::IBUTTON, NodeKind::Button),
    (names::IVALUE_FIELD, NodeKind::ValueField),
    (names::ICOMPOSITE_FIELD, NodeKind::Composite),
    (names::IFORM_FIELD, NodeKind::FormField),
];

impl NodeKind {
    /// Fails if a supertype of `model` is missing from the snapshot
    pub fn classify<A: ModelTypeAccessor + ?Sized>(
        accessor: &A,
        model: &str,
    ) -> Result<NodeKind, LookupError> {
        for (interface, kind) in CLASSIFICATION {
            if accessor.is_subtype_of(model, interface)? {
                return Ok(*kind);
            }
        }
        Ok(NodeKind::Other)
    }

    /// Nodes visited by the form-field pass of the walker
    pub fn is_form_field(self) -> bool {
        matches!(
            self,
            NodeKind::TableField
                | NodeKind::Button
                | NodeKind::ValueField
                | NodeKind::Composite
                | NodeKind::FormField
        )
    }

    /// Containers whose DTO carries a row type
    pub fn is_table_container(self) -> bool {
        matches!(self, NodeKind::TableField | NodeKind::Page)
    }

    /// Nodes without a bound model of their own
    pub fn is_structural(self) -> bool {
        matches!(self, NodeKind::Composite | NodeKind::Table | NodeKind::Other)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
