//! Turns a walked hierarchy into the DTO graph of its root.

mod properties;
mod table;

use crate::descriptor::TemplateSource;
use crate::dto::{DtoKind, DtoMethod, DtoType, MethodBody};
use crate::error::{GenerationError, Result};
use crate::naming;
use crate::node_kind::NodeKind;
use crate::scope::{DtoSlot, ScopeFrame, ScopeResolver};
use crate::walker::WalkEntry;
use dtogen_common::{Annotation, AnnotationValue, ModelTypeAccessor, Modifiers, TypeRef, simple_name_of};
use dtogen_config::GenerationCommand;
use dtogen_config::annotations;
use dtogen_config::runtime::names;
use std::sync::Arc;

/// Value of the `Generated` marker on synthesized DTOs
pub const GENERATOR_NAME: &str = "dtogen";

/// Template lookups synthesis needs on top of descriptor resolution
pub trait SlotSource: TemplateSource {
    /// Slot of a template root synthesized through `ensure_template`
    fn template_slot(&self, template_model: &str) -> Option<Arc<DtoSlot>>;
}

pub struct Synthesizer<'a, S: SlotSource + ?Sized> {
    source: &'a S,
    entries: &'a [WalkEntry],
    scopes: ScopeResolver,
}

impl<'a, S: SlotSource + ?Sized> Synthesizer<'a, S> {
    pub fn new(source: &'a S, entries: &'a [WalkEntry]) -> Self {
        Self {
            source,
            entries,
            scopes: ScopeResolver::new(),
        }
    }

    /// Synthesizes the root entry and everything it owns
    pub fn run(mut self) -> Result<(DtoType, Arc<DtoSlot>)> {
        let root = self
            .entries
            .first()
            .ok_or_else(|| GenerationError::TypeNotFound("<empty walk>".to_string()))?;
        if root.command() != GenerationCommand::Create {
            return Err(GenerationError::InvalidRoot {
                node: root.model.name.clone(),
                command: root.command(),
            });
        }
        self.emit(0)
    }

    fn emit(&mut self, index: usize) -> Result<(DtoType, Arc<DtoSlot>)> {
        let entries = self.entries;
        let entry = &entries[index];
        let descriptor = &entry.descriptor;
        let node = entry.model.name.as_str();
        let name = entry
            .dto_name()
            .ok_or_else(|| GenerationError::MissingDtoSuperType {
                node: node.to_string(),
            })?
            .to_string();

        let replaced = match &descriptor.replaces {
            Some(target) => Some(self.replaced_slot(node, target)?),
            None => None,
        };
        let template = descriptor
            .template_model
            .as_deref()
            .and_then(|t| self.source.template_slot(t));

        let superclass = match &replaced {
            Some(slot) => TypeRef::class(slot.dto.clone()),
            None => descriptor.dto_super_type.clone().ok_or_else(|| {
                GenerationError::MissingDtoSuperType {
                    node: node.to_string(),
                }
            })?,
        };

        let mut dto = DtoType::new(name.clone(), dto_kind(entry.kind()), superclass);
        dto.modifiers = Modifiers::public()
            .with_static(entry.owner.is_some())
            .with_abstract(entry.model.is_abstract());
        dto.type_parameters = descriptor.type_parameters.clone();
        dto.interfaces = descriptor.interfaces.clone();
        dto.source_model = Some(node.to_string());
        dto.annotations = entry
            .model
            .annotations
            .iter()
            .filter(|a| annotations::is_copied_to_dto(&a.name))
            .cloned()
            .collect();
        dto.annotations.push(
            Annotation::new(annotations::GENERATED)
                .with(annotations::VALUE, AnnotationValue::Str(GENERATOR_NAME.to_string())),
        );
        if let Some(slot) = &replaced {
            dto.annotations.push(Annotation::new(annotations::REPLACE));
            dto.replaces = Some(slot.dto.clone());
        }

        let inherited_row = replaced
            .as_ref()
            .and_then(|s| s.row_type.clone())
            .or_else(|| template.as_ref().and_then(|t| t.row_type.clone()));
        let declares_table = entry.kind().is_table_container()
            && entries
                .iter()
                .any(|e| e.parent == Some(index) && e.kind() == NodeKind::Table);
        let own_row = declares_table
            .then(|| format!("{name}.{}", naming::row_type_name(simple_name_of(&name))));

        let mut frame = ScopeFrame::new(index, node, name.clone());
        frame.row_type = own_row.clone().or_else(|| inherited_row.clone());
        match (&replaced, &template) {
            (Some(slot), _) => {
                frame.chain = slot.chain.extended(node, name.clone());
                frame.inherited = slot.namespace.clone();
            }
            (None, Some(template)) => frame.inherited = template.namespace.clone(),
            (None, None) => {}
        }
        self.scopes.enter(frame);

        self.emit_children(index, &mut dto)?;

        if let Some(row) = &own_row {
            let row_super = TypeRef::class(
                inherited_row
                    .clone()
                    .unwrap_or_else(|| names::ABSTRACT_TABLE_ROW_DATA.to_string()),
            );
            let columns = self.columns_of(index);
            dto.methods.extend(table::row_methods(&TypeRef::class(row.clone())));
            let row_dto = table::row_type(row, row_super, node, &columns);
            place_nested(&mut dto, row_dto, node)?;
        }

        if entry.kind() == NodeKind::TableExtension {
            let columns = self.columns_of(index);
            table::add_column_members(&mut dto, &columns);
            let target = self.extension_row_target(entry)?;
            dto.annotations.push(extends_annotation(&target));
        } else if let Some(target) = &descriptor.extends_target {
            let target_name = target.name().unwrap_or_default();
            let slot = self.target_slot(node, target_name)?;
            dto.annotations.push(extends_annotation(&slot.dto));
        }

        properties::add_properties(&mut dto, &entry.model)?;

        let slot = self
            .scopes
            .leave()
            .ok_or_else(|| GenerationError::TypeNotFound(node.to_string()))?;
        log::debug!(
            "synthesized {} ({} nested, {} methods)",
            dto.name,
            dto.nested_types.len(),
            dto.methods.len()
        );
        Ok((dto, slot))
    }

    /// Child DTOs and accessors of everything `owner` owns, in walk order
    fn emit_children(&mut self, owner: usize, dto: &mut DtoType) -> Result<()> {
        let entries = self.entries;
        for (index, child) in entries.iter().enumerate() {
            if child.owner != Some(owner) || child.kind() == NodeKind::Column {
                continue;
            }
            match child.command() {
                GenerationCommand::Create => {
                    let (child_dto, _) = self.emit(index)?;
                    if child.kind().is_form_field() {
                        let ty = child_dto.as_type_ref();
                        dto.methods.push(DtoMethod::new(
                            format!("get{}", child_dto.simple_name()),
                            Some(ty.clone()),
                            MethodBody::FieldByClass(ty),
                        ));
                    }
                    place_nested(dto, child_dto, &child.model.name)?;
                }
                GenerationCommand::Use if child.kind().is_form_field() => {
                    if let Some(used) = &child.descriptor.dto_type {
                        dto.methods.push(DtoMethod::new(
                            format!("get{}", naming::nested_dto_name(child.model.simple_name())),
                            Some(used.clone()),
                            MethodBody::FieldByClass(used.clone()),
                        ));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// CREATE columns whose rows belong to `container`: columns of a table
    /// declared directly in it, or columns declared on a table extension
    fn columns_of(&self, container: usize) -> Vec<&'a WalkEntry> {
        let entries = self.entries;
        entries
            .iter()
            .filter(|e| e.kind() == NodeKind::Column && e.is_create())
            .filter(|e| match e.parent {
                Some(p) if p == container => entries[p].kind() == NodeKind::TableExtension,
                Some(p) => {
                    entries[p].kind() == NodeKind::Table && entries[p].parent == Some(container)
                }
                None => false,
            })
            .collect()
    }

    fn replaced_slot(&self, node: &str, target: &str) -> Result<Arc<DtoSlot>> {
        self.scopes
            .resolve(target)
            .or_else(|| self.source.template_slot(target))
            .ok_or_else(|| GenerationError::ReplaceTargetNotFound {
                node: node.to_string(),
                target: target.to_string(),
                scope: self.scopes.scope_name(),
            })
    }

    /// Slot of an `Extends` target: the target's own slot, else that of the
    /// nearest declaring type that has one. Synthesizes the target's root.
    fn target_slot(&self, node: &str, target: &str) -> Result<Arc<DtoSlot>> {
        let not_found = || GenerationError::ExtendsTargetNotFound {
            node: node.to_string(),
            target: target.to_string(),
        };
        let outermost = self.source.outermost_type(target)?;
        self.source.ensure_template(&outermost.name)?;
        let root = self
            .source
            .template_slot(&outermost.name)
            .ok_or_else(not_found)?;

        let mut current = Some(target.to_string());
        while let Some(name) = current {
            if name == root.model {
                return Ok(root);
            }
            if let Some(slot) = root.namespace.find_deep(&name) {
                return Ok(slot);
            }
            current = self
                .source
                .find_type(&name)
                .and_then(|m| m.declaring_type.clone());
        }
        Err(not_found())
    }

    /// Row type of the table a table extension contributes to
    fn extension_row_target(&self, entry: &WalkEntry) -> Result<String> {
        let node = entry.model.name.as_str();
        let table = entry
            .descriptor
            .extends_target
            .clone()
            .or_else(|| {
                self.source
                    .supertype_arguments(&entry.model.as_type_ref(), names::ITABLE_EXTENSION)
                    .and_then(|args| args.into_iter().next())
            })
            .and_then(|t| t.name().map(str::to_string))
            .ok_or_else(|| GenerationError::ExtendsTargetNotFound {
                node: node.to_string(),
                target: names::ITABLE.to_string(),
            })?;
        let container = self
            .source
            .require(&table)?
            .declaring_type
            .clone()
            .unwrap_or_else(|| table.clone());
        self.target_slot(node, &container)?
            .row_type
            .clone()
            .ok_or(GenerationError::ExtendsTargetNotFound {
                node: node.to_string(),
                target: table,
            })
    }
}

fn dto_kind(kind: NodeKind) -> DtoKind {
    match kind {
        NodeKind::Form => DtoKind::FormData,
        NodeKind::Page => DtoKind::PageData,
        NodeKind::TableExtension => DtoKind::RowDataExtension,
        NodeKind::TableField => DtoKind::TableData,
        _ => DtoKind::FieldData,
    }
}

fn extends_annotation(target_dto: &str) -> Annotation {
    Annotation::new(annotations::EXTENDS).with(
        annotations::VALUE,
        AnnotationValue::Type(TypeRef::class(target_dto)),
    )
}

/// Adds `nested` to `owner`; two nested types may not share a simple name
fn place_nested(owner: &mut DtoType, nested: DtoType, node: &str) -> Result<()> {
    if owner.nested(nested.simple_name()).is_some() {
        return Err(GenerationError::NameCollision {
            node: node.to_string(),
            name: nested.simple_name().to_string(),
            scope: owner.name.clone(),
        });
    }
    owner.nested_types.push(nested);
    Ok(())
}
