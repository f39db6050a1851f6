mod tests;

use crate::descriptor::{DirectiveCache, TemplateSource};
use crate::dto::DtoType;
use crate::error::{GenerationError, Result};
use crate::generics::{self, AccessorSignature};
use crate::scope::{DtoSlot, ReplaceChain};
use crate::synthesis::{SlotSource, Synthesizer};
use crate::walker::{HierarchyWalker, WalkEntry};
use dtogen_common::{ModelType, ModelTypeAccessor};
use dtogen_config::GenerationCommand;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

/// A model type synthesized because another node extends or replaces its DTO
#[derive(Debug)]
struct Template {
    dto: DtoType,
    slot: Arc<DtoSlot>,
}

#[derive(Debug, Default)]
struct TemplateStore {
    by_model: Mutex<HashMap<String, Arc<Template>>>,
    /// Structural views of every synthesized DTO, nested ones included
    dto_models: Mutex<HashMap<String, Arc<ModelType>>>,
    in_progress: Mutex<HashSet<(ThreadId, String)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a root as being synthesized on this thread until dropped
struct InProgress<'a> {
    store: &'a TemplateStore,
    key: (ThreadId, String),
}

impl<'a> InProgress<'a> {
    fn mark(store: &'a TemplateStore, model: &str) -> Result<Self> {
        let key = (thread::current().id(), model.to_string());
        if !lock(&store.in_progress).insert(key.clone()) {
            return Err(GenerationError::TemplateCycle(model.to_string()));
        }
        Ok(Self { store, key })
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        lock(&self.store.in_progress).remove(&self.key);
    }
}

///
/// Entry point of the engine. Wraps a model accessor and caches directive
/// facts and synthesized templates; clones share those caches.
///
/// ```ignore
/// let generator = DtoGenerator::new(snapshot);
/// let dto = generator.generate("pkg.MyForm")?;
/// ```
///
#[derive(Debug, Clone)]
pub struct DtoGenerator<A> {
    accessor: A,
    directives: Arc<DirectiveCache>,
    templates: Arc<TemplateStore>,
}

impl<A: ModelTypeAccessor> DtoGenerator<A> {
    pub fn new(accessor: A) -> Self {
        Self {
            accessor,
            directives: Arc::new(DirectiveCache::new()),
            templates: Arc::new(TemplateStore::default()),
        }
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    /// The DTO graph of `root`. `Ok(None)` when the root's command is USE.
    pub fn generate(&self, root: &str) -> Result<Option<DtoType>> {
        let _guard = InProgress::mark(&self.templates, root)?;
        let entries = self.walk(root)?;
        let Some(first) = entries.first() else {
            return Err(GenerationError::TypeNotFound(root.to_string()));
        };
        match first.command() {
            GenerationCommand::Use => {
                log::info!("{root} reuses an existing DTO, nothing to generate");
                Ok(None)
            }
            GenerationCommand::Create => {
                let (dto, _) = Synthesizer::new(self, &entries).run()?;
                log::info!(
                    "generated {} from {root} ({} nested types)",
                    dto.name,
                    dto.nested_types.len()
                );
                Ok(Some(dto))
            }
            command => Err(GenerationError::InvalidRoot {
                node: root.to_string(),
                command,
            }),
        }
    }

    /// The traversal `generate` performs, with a descriptor per node
    pub fn walk(&self, root: &str) -> Result<Vec<WalkEntry>> {
        let model = self.require(root)?;
        HierarchyWalker::new(self, &self.directives).walk(&model)
    }

    /// Replace chain ending at `model`, or `None` if no DTO stands for it
    pub fn replace_chain(&self, model: &str) -> Result<Option<ReplaceChain>> {
        let outermost = self.outermost_type(model)?;
        self.ensure_template(&outermost.name)?;
        let Some(root) = self.template_slot(&outermost.name) else {
            return Ok(None);
        };
        if root.model == model {
            return Ok(Some(root.chain.clone()));
        }
        Ok(root.namespace.find_deep(model).map(|slot| slot.chain.clone()))
    }

    /// Accessors `dto` inherits from its superclass chain, fully bound
    pub fn inherited_accessors(&self, dto: &DtoType) -> Result<Vec<AccessorSignature>> {
        let allowed: Vec<String> = dto.type_parameters.iter().map(|p| p.name.clone()).collect();
        generics::bind_inherited_accessors(self, &dto.name, &dto.superclass, &allowed)
    }

    /// DTO synthesized for a template model, if one was needed so far
    pub fn template_dto(&self, model: &str) -> Option<DtoType> {
        lock(&self.templates.by_model)
            .get(model)
            .map(|t| t.dto.clone())
    }

    fn register_models(&self, dto: &DtoType, declaring_type: Option<String>) {
        lock(&self.templates.dto_models)
            .entry(dto.name.clone())
            .or_insert_with(|| Arc::new(dto.as_model(declaring_type)));
        for nested in &dto.nested_types {
            self.register_models(nested, Some(dto.name.clone()));
        }
    }
}

impl<A: ModelTypeAccessor> ModelTypeAccessor for DtoGenerator<A> {
    fn find_type(&self, name: &str) -> Option<Arc<ModelType>> {
        self.accessor
            .find_type(name)
            .or_else(|| lock(&self.templates.dto_models).get(name).cloned())
    }
}

impl<A: ModelTypeAccessor> TemplateSource for DtoGenerator<A> {
    fn snapshot_type(&self, name: &str) -> Option<Arc<ModelType>> {
        self.accessor.find_type(name)
    }

    fn ensure_template(&self, template_model: &str) -> Result<()> {
        if lock(&self.templates.by_model).contains_key(template_model) {
            return Ok(());
        }
        let (dto, slot) = {
            let _guard = InProgress::mark(&self.templates, template_model)?;
            log::debug!("synthesizing template {template_model}");
            let entries = self.walk(template_model)?;
            Synthesizer::new(self, &entries).run()?
        };
        self.register_models(&dto, None);
        lock(&self.templates.by_model)
            .entry(template_model.to_string())
            .or_insert_with(|| Arc::new(Template { dto, slot }));
        Ok(())
    }
}

impl<A: ModelTypeAccessor> SlotSource for DtoGenerator<A> {
    fn template_slot(&self, template_model: &str) -> Option<Arc<DtoSlot>> {
        lock(&self.templates.by_model)
            .get(template_model)
            .map(|t| t.slot.clone())
    }
}
