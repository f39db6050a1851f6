use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One element of a replace chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceLink {
    pub model: String,
    pub dto: String,
}

///
/// DTOs produced by following consecutive `Replace` links, base first. Each
/// element's DTO extends its predecessor's.
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceChain {
    pub links: Vec<ReplaceLink>,
}

impl ReplaceChain {
    pub fn starting_at(model: impl Into<String>, dto: impl Into<String>) -> Self {
        Self {
            links: vec![ReplaceLink {
                model: model.into(),
                dto: dto.into(),
            }],
        }
    }

    /// A new chain with one more link
    pub fn extended(&self, model: impl Into<String>, dto: impl Into<String>) -> Self {
        let mut links = self.links.clone();
        links.push(ReplaceLink {
            model: model.into(),
            dto: dto.into(),
        });
        Self { links }
    }

    pub fn head(&self) -> Option<&ReplaceLink> {
        self.links.first()
    }

    pub fn last(&self) -> Option<&ReplaceLink> {
        self.links.last()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn dto_names(&self) -> Vec<&str> {
        self.links.iter().map(|l| l.dto.as_str()).collect()
    }
}

/// A DTO occupying the place of one model type, with the namespace of DTOs nested in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtoSlot {
    pub model: String,
    pub dto: String,
    pub row_type: Option<String>,
    pub chain: ReplaceChain,
    pub namespace: Namespace,
}

/// Slots keyed by the model type they stand for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    slots: BTreeMap<String, Arc<DtoSlot>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: impl Into<String>, slot: Arc<DtoSlot>) {
        self.slots.insert(model.into(), slot);
    }

    pub fn get(&self, model: &str) -> Option<&Arc<DtoSlot>> {
        self.slots.get(model)
    }

    /// Entries of `other` win over entries of `self`
    pub fn overlay(&mut self, other: &Namespace) {
        for (model, slot) in &other.slots {
            self.slots.insert(model.clone(), slot.clone());
        }
    }

    /// Searches this namespace and every nested one, shallowest first
    pub fn find_deep(&self, model: &str) -> Option<Arc<DtoSlot>> {
        if let Some(slot) = self.slots.get(model) {
            return Some(slot.clone());
        }
        self.slots
            .values()
            .find_map(|slot| slot.namespace.find_deep(model))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Scope of one CREATE node while its subtree is synthesized
#[derive(Debug, Clone)]
pub struct ScopeFrame {
    /// Walk entry that opened the frame
    pub entry: usize,
    pub model: String,
    pub dto: String,
    pub row_type: Option<String>,
    pub chain: ReplaceChain,
    /// Template or replaced-slot namespace the node inherits
    pub inherited: Namespace,
    /// Slots of the node's own descendants, in emission order
    pub own: Namespace,
}

impl ScopeFrame {
    pub fn new(entry: usize, model: impl Into<String>, dto: impl Into<String>) -> Self {
        let model = model.into();
        let dto = dto.into();
        Self {
            entry,
            chain: ReplaceChain::starting_at(model.clone(), dto.clone()),
            model,
            dto,
            row_type: None,
            inherited: Namespace::new(),
            own: Namespace::new(),
        }
    }

    fn lookup(&self, model: &str) -> Option<&Arc<DtoSlot>> {
        self.own.get(model).or_else(|| self.inherited.get(model))
    }

    fn into_slot(self) -> DtoSlot {
        let mut namespace = self.inherited;
        namespace.overlay(&self.own);
        DtoSlot {
            model: self.model,
            dto: self.dto,
            row_type: self.row_type,
            chain: self.chain,
            namespace,
        }
    }
}

/// Stack of scope frames, one per CREATE node on the current branch
#[derive(Debug, Default)]
pub struct ScopeResolver {
    frames: Vec<ScopeFrame>,
}

impl ScopeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self, frame: ScopeFrame) {
        log::trace!(
            "enter scope {} ({} inherited slots)",
            frame.dto,
            frame.inherited.len()
        );
        self.frames.push(frame);
    }

    pub fn current(&self) -> Option<&ScopeFrame> {
        self.frames.last()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Name of the innermost scope, for error reporting
    pub fn scope_name(&self) -> String {
        self.current()
            .map(|f| f.dto.clone())
            .unwrap_or_else(|| "<root>".to_string())
    }

    /// Pops the innermost frame and registers its slot in the enclosing frame
    /// under every model of its replace chain, so the newest replacement wins.
    pub fn leave(&mut self) -> Option<Arc<DtoSlot>> {
        let frame = self.frames.pop()?;
        log::trace!("leave scope {}", frame.dto);
        let slot = Arc::new(frame.into_slot());
        if let Some(parent) = self.frames.last_mut() {
            for link in &slot.chain.links {
                parent.own.insert(link.model.clone(), slot.clone());
            }
        }
        Some(slot)
    }

    /// Slot currently standing for `model`, innermost frame first
    pub fn resolve(&self, model: &str) -> Option<Arc<DtoSlot>> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.lookup(model).cloned())
    }
}
