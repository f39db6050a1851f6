use crate::descriptor::{
    DescriptorResolver, DirectiveCache, GenerationDescriptor, ResolveContext, TemplateSource,
};
use crate::error::Result;
use crate::node_kind::NodeKind;
use dtogen_common::{ModelType, ModelTypeAccessor};
use dtogen_config::GenerationCommand;
use std::sync::Arc;

/// One visited model node
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub model: Arc<ModelType>,
    pub descriptor: Arc<GenerationDescriptor>,
    /// Containment parent
    pub parent: Option<usize>,
    /// Nearest CREATE ancestor, the DTO this node's output attaches to
    pub owner: Option<usize>,
    pub depth: usize,
    /// DTO the node was resolved in, `None` for the root
    pub scope: Option<String>,
}

impl WalkEntry {
    pub fn kind(&self) -> NodeKind {
        self.descriptor.kind
    }

    pub fn command(&self) -> GenerationCommand {
        self.descriptor.command
    }

    pub fn is_create(&self) -> bool {
        self.command() == GenerationCommand::Create
    }

    pub fn dto_name(&self) -> Option<&str> {
        self.descriptor.dto_type.as_ref().and_then(|t| t.name())
    }
}

/// Pre-order traversal of a model hierarchy. For every node the nested form
/// fields are visited first, then nested tables and columns.
pub struct HierarchyWalker<'a, S: TemplateSource + ?Sized> {
    source: &'a S,
    resolver: DescriptorResolver<'a, S>,
}

impl<'a, S: TemplateSource + ?Sized> HierarchyWalker<'a, S> {
    pub fn new(source: &'a S, cache: &'a DirectiveCache) -> Self {
        Self {
            source,
            resolver: DescriptorResolver::new(source, cache),
        }
    }

    pub fn walk(&self, root: &Arc<ModelType>) -> Result<Vec<WalkEntry>> {
        let mut entries = Vec::new();
        self.visit(root.clone(), None, None, 0, &mut entries)?;
        log::debug!("walked {} nodes below {}", entries.len(), root.name);
        Ok(entries)
    }

    fn visit(
        &self,
        model: Arc<ModelType>,
        parent: Option<usize>,
        owner: Option<usize>,
        depth: usize,
        entries: &mut Vec<WalkEntry>,
    ) -> Result<()> {
        let scope = owner
            .and_then(|o| entries[o].dto_name())
            .map(str::to_string);
        let descriptor = {
            let ctx = ResolveContext {
                enclosing: parent.map(|p| entries[p].descriptor.as_ref()),
                owner_dto: scope.as_deref(),
            };
            self.resolver.resolve(&model, ctx)?
        };

        let index = entries.len();
        let command = descriptor.command;
        entries.push(WalkEntry {
            model: model.clone(),
            descriptor: Arc::new(descriptor),
            parent,
            owner,
            depth,
            scope,
        });

        if command == GenerationCommand::Ignore {
            return Ok(());
        }
        let child_owner = if command == GenerationCommand::Create {
            Some(index)
        } else {
            owner
        };
        for child in self.children(&model)? {
            self.visit(child, Some(index), child_owner, depth + 1, entries)?;
        }
        Ok(())
    }

    /// Nested form fields in declaration order, then tables, then columns
    fn children(&self, model: &ModelType) -> Result<Vec<Arc<ModelType>>> {
        let mut nested = Vec::with_capacity(model.nested_types.len());
        for name in &model.nested_types {
            let child = self.source.require(name)?;
            nested.push((child, NodeKind::classify(self.source, name)?));
        }

        let mut ordered = Vec::with_capacity(nested.len());
        let passes: [fn(NodeKind) -> bool; 3] = [
            NodeKind::is_form_field,
            |kind| kind == NodeKind::Table,
            |kind| kind == NodeKind::Column,
        ];
        for pass in passes {
            ordered.extend(
                nested
                    .iter()
                    .filter(|(_, kind)| pass(*kind))
                    .map(|(child, _)| child.clone()),
            );
        }
        Ok(ordered)
    }
}
