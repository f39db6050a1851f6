use crate::error::{GenerationError, Result};
use crate::generics;
use crate::naming;
use crate::node_kind::NodeKind;
use dtogen_common::{ModelType, ModelTypeAccessor, TypeParameter, TypeRef};
use dtogen_config::runtime::names;
use dtogen_config::{ColumnDirective, DataDirective, Directives, GenerationCommand};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What the resolver needs beyond plain model lookups: access to the
/// unmodified snapshot and on-demand synthesis of DTO templates.
pub trait TemplateSource: ModelTypeAccessor {
    /// Looks a type up in the snapshot only, ignoring synthesized templates
    fn snapshot_type(&self, name: &str) -> Option<Arc<ModelType>>;

    /// Synthesizes the DTO of `template_model` so that `find_type` can see it
    fn ensure_template(&self, template_model: &str) -> Result<()>;
}

/// Directive facts of one model type
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveFacts {
    pub own: Directives,
    /// Nearest proper superclass declaring a data directive, with that directive
    pub inherited: Option<(Arc<ModelType>, DataDirective)>,
    pub inherited_column: Option<ColumnDirective>,
}

/// Caches directive facts per model type. Population is check, compute
/// unlocked, insert; two threads may compute the same entry.
#[derive(Debug, Default)]
pub struct DirectiveCache {
    facts: Mutex<HashMap<String, Arc<DirectiveFacts>>>,
}

impl DirectiveCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<DirectiveFacts>>> {
        self.facts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn facts<A: ModelTypeAccessor + ?Sized>(
        &self,
        accessor: &A,
        name: &str,
    ) -> Result<Arc<DirectiveFacts>> {
        if let Some(hit) = self.lock().get(name) {
            return Ok(hit.clone());
        }
        let computed = Arc::new(Self::compute(accessor, name)?);
        Ok(self
            .lock()
            .entry(name.to_string())
            .or_insert(computed)
            .clone())
    }

    fn compute<A: ModelTypeAccessor + ?Sized>(accessor: &A, name: &str) -> Result<DirectiveFacts> {
        let chain = accessor.superclass_chain(name)?;
        let own = read_directives(&chain[0])?;

        let mut inherited = None;
        let mut inherited_column = None;
        for ancestor in chain.iter().skip(1) {
            let directives = read_directives(ancestor)?;
            if inherited.is_none() {
                if let Some(data) = directives.data {
                    inherited = Some((ancestor.clone(), data));
                }
            }
            if inherited_column.is_none() {
                inherited_column = directives.column;
            }
            if inherited.is_some() && inherited_column.is_some() {
                break;
            }
        }

        Ok(DirectiveFacts {
            own,
            inherited,
            inherited_column,
        })
    }
}

fn read_directives(model: &ModelType) -> Result<Directives> {
    Directives::read(model).map_err(|err| GenerationError::InvalidDirective {
        node: model.name.clone(),
        message: err.to_string(),
    })
}

///
/// Everything the walker and the synthesis engine need to know about one
/// node, computed once. `dto_super_type` is the default super type; for
/// `Replace` nodes synthesis substitutes the replaced slot's DTO.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationDescriptor {
    pub model: String,
    pub kind: NodeKind,
    pub command: GenerationCommand,
    /// A directive was found on the node or one of its superclasses
    pub declared: bool,
    /// Command of the nearest declared node along the containment path
    pub declared_command: Option<GenerationCommand>,
    /// Own DTO for CREATE nodes, the reused DTO for USE nodes
    pub dto_type: Option<TypeRef>,
    pub dto_super_type: Option<TypeRef>,
    /// Model type whose synthesized DTO is `dto_super_type`
    pub template_model: Option<String>,
    /// Replaced model type
    pub replaces: Option<String>,
    pub extends_target: Option<TypeRef>,
    pub type_arguments: Vec<TypeRef>,
    pub value_type: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    /// Type parameters the DTO declares when it is itself a generic template
    pub type_parameters: Vec<TypeParameter>,
}

/// Where in the containment hierarchy a node is resolved
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveContext<'a> {
    pub enclosing: Option<&'a GenerationDescriptor>,
    /// Qualified name of the nearest enclosing DTO
    pub owner_dto: Option<&'a str>,
}

/// The DTO a node's super type resolution landed on
struct SuperResolution {
    dto: String,
    declaring: Arc<ModelType>,
    directive: DataDirective,
    template_model: Option<String>,
}

pub struct DescriptorResolver<'a, S: TemplateSource + ?Sized> {
    source: &'a S,
    cache: &'a DirectiveCache,
}

impl<'a, S: TemplateSource + ?Sized> DescriptorResolver<'a, S> {
    pub fn new(source: &'a S, cache: &'a DirectiveCache) -> Self {
        Self { source, cache }
    }

    pub fn resolve(&self, model: &ModelType, ctx: ResolveContext<'_>) -> Result<GenerationDescriptor> {
        let facts = self.cache.facts(self.source, &model.name)?;
        let kind = NodeKind::classify(self.source, &model.name)?;
        let (command, declared) = self.command(kind, &facts, ctx);
        let value_type = self.value_type(model, kind);

        let mut descriptor = GenerationDescriptor {
            model: model.name.clone(),
            kind,
            command,
            declared,
            declared_command: if declared {
                Some(command)
            } else {
                ctx.enclosing.and_then(|e| e.declared_command)
            },
            dto_type: None,
            dto_super_type: None,
            template_model: None,
            replaces: None,
            extends_target: facts.own.extends.clone(),
            type_arguments: Vec::new(),
            value_type,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
        };

        if command == GenerationCommand::None
            && kind == NodeKind::ValueField
            && descriptor.value_type.is_some()
        {
            return Err(GenerationError::BoundFieldWithNone {
                node: model.name.clone(),
            });
        }
        if facts.own.replace {
            descriptor.replaces = model.superclass.as_ref().and_then(|s| s.name()).map(String::from);
        }

        match command {
            GenerationCommand::Create => self.resolve_create(model, &facts, ctx, &mut descriptor)?,
            GenerationCommand::Use => self.resolve_use(model, &facts, &mut descriptor)?,
            GenerationCommand::Ignore | GenerationCommand::None => {}
        }

        log::debug!(
            "resolved {} as {} {} (dto: {}, super: {})",
            model.name,
            descriptor.kind,
            descriptor.command,
            descriptor.dto_type.as_ref().map(|t| t.to_string()).unwrap_or_default(),
            descriptor
                .dto_super_type
                .as_ref()
                .map(|t| t.to_string())
                .unwrap_or_default(),
        );
        Ok(descriptor)
    }

    fn command(
        &self,
        kind: NodeKind,
        facts: &DirectiveFacts,
        ctx: ResolveContext<'_>,
    ) -> (GenerationCommand, bool) {
        if let Some(own) = &facts.own.data {
            return (own.command, true);
        }
        if kind == NodeKind::Column {
            let column = facts.own.column.or(facts.inherited_column);
            let command = column.map(|c| c.command).unwrap_or(GenerationCommand::Create);
            return (command, column.is_some());
        }
        if let Some((_, inherited)) = &facts.inherited {
            return (inherited.subtype_command, true);
        }
        let command = match ctx.enclosing {
            Some(e) if e.command == GenerationCommand::Ignore => GenerationCommand::Ignore,
            None if matches!(kind, NodeKind::Form | NodeKind::Page | NodeKind::TableExtension) => {
                GenerationCommand::Create
            }
            _ if kind.is_structural() => GenerationCommand::None,
            Some(e) => e.declared_command.unwrap_or(GenerationCommand::None),
            None => GenerationCommand::None,
        };
        (command, false)
    }

    fn value_type(&self, model: &ModelType, kind: NodeKind) -> Option<TypeRef> {
        let interface = match kind {
            NodeKind::ValueField => names::IVALUE_FIELD,
            NodeKind::Column => names::ICOLUMN,
            _ => return None,
        };
        self.source
            .supertype_arguments(&model.as_type_ref(), interface)
            .and_then(|args| args.into_iter().next())
    }

    fn resolve_create(
        &self,
        model: &ModelType,
        facts: &DirectiveFacts,
        ctx: ResolveContext<'_>,
        descriptor: &mut GenerationDescriptor,
    ) -> Result<()> {
        descriptor.interfaces = facts
            .own
            .data
            .as_ref()
            .map(|d| d.interfaces.clone())
            .unwrap_or_default();

        // columns only contribute row members
        if descriptor.kind == NodeKind::Column {
            return Ok(());
        }

        let own_name = match (ctx.owner_dto, &facts.own.data) {
            (Some(owner), _) => format!("{owner}.{}", naming::nested_dto_name(model.simple_name())),
            (None, Some(DataDirective { value: Some(value), .. })) => value.to_string(),
            (None, _) => self.root_dto_name(model)?,
        };
        descriptor.dto_type = Some(TypeRef::class(own_name));

        if descriptor.kind == NodeKind::TableExtension {
            descriptor.dto_super_type = Some(TypeRef::class(names::ABSTRACT_TABLE_ROW_DATA));
            return Ok(());
        }

        let resolution = self
            .resolve_super(model)?
            .ok_or_else(|| GenerationError::MissingDtoSuperType {
                node: model.name.clone(),
            })?;
        let (super_type, type_arguments, type_parameters) =
            self.bind_super(model, facts, descriptor.value_type.as_ref(), &resolution)?;
        descriptor.dto_super_type = Some(super_type);
        descriptor.type_arguments = type_arguments;
        descriptor.type_parameters = type_parameters;
        descriptor.template_model = resolution.template_model;
        Ok(())
    }

    fn resolve_use(
        &self,
        model: &ModelType,
        facts: &DirectiveFacts,
        descriptor: &mut GenerationDescriptor,
    ) -> Result<()> {
        if let Some(own) = &facts.own.data {
            descriptor.dto_type = own.value.clone();
            return Ok(());
        }
        if let Some(resolution) = self.resolve_super(model)? {
            let (used, type_arguments, _) =
                self.bind_super(model, facts, descriptor.value_type.as_ref(), &resolution)?;
            descriptor.dto_type = Some(used);
            descriptor.type_arguments = type_arguments;
        }
        Ok(())
    }

    /// Default DTO name of a root or template model type
    pub fn root_dto_name(&self, model: &ModelType) -> Result<String> {
        let outermost = self.source.outermost_type(&model.name)?;
        Ok(naming::root_dto_name(
            outermost.package_name(),
            model.simple_name(),
        ))
    }

    /// Walks the superclasses of `model` for the DTO to extend. CREATE
    /// directives contribute their DTO, USE directives with a value contribute
    /// that value, everything else elides itself.
    fn resolve_super(&self, model: &ModelType) -> Result<Option<SuperResolution>> {
        let chain = self.source.superclass_chain(&model.name)?;
        for ancestor in chain.iter().skip(1) {
            let facts = self.cache.facts(self.source, &ancestor.name)?;
            let Some(directive) = facts.own.data.clone() else {
                continue;
            };
            match (directive.command, &directive.value) {
                (GenerationCommand::Create, value) => {
                    let dto = match value {
                        Some(value) => value.name().unwrap_or_default().to_string(),
                        None => self.root_dto_name(ancestor)?,
                    };
                    let template_model = if self.source.snapshot_type(&dto).is_some() {
                        log::debug!("{dto} exists in the snapshot, using it as is");
                        None
                    } else {
                        self.source.ensure_template(&ancestor.name)?;
                        Some(ancestor.name.clone())
                    };
                    return Ok(Some(SuperResolution {
                        dto,
                        declaring: ancestor.clone(),
                        directive,
                        template_model,
                    }));
                }
                (GenerationCommand::Use, Some(value)) => {
                    return Ok(Some(SuperResolution {
                        dto: value.name().unwrap_or_default().to_string(),
                        declaring: ancestor.clone(),
                        directive,
                        template_model: None,
                    }));
                }
                _ => continue,
            }
        }
        Ok(None)
    }

    /// Binds the resolved DTO's type parameters: explicit arguments first, then
    /// the generic ordinal, then unification with the template's `getValue()`.
    fn bind_super(
        &self,
        model: &ModelType,
        facts: &DirectiveFacts,
        value_type: Option<&TypeRef>,
        resolution: &SuperResolution,
    ) -> Result<(TypeRef, Vec<TypeRef>, Vec<TypeParameter>)> {
        let node = model.name.as_str();
        let template = self.source.find_type(&resolution.dto);
        let arity = template.as_ref().map_or(0, |t| t.type_parameters.len());

        let explicit = facts
            .own
            .data
            .as_ref()
            .map(|d| d.type_arguments.clone())
            .filter(|args| !args.is_empty())
            .unwrap_or_else(|| resolution.directive.type_arguments.clone());

        let args = if !explicit.is_empty() {
            explicit
        } else if arity == 0 {
            Vec::new()
        } else if let Some(ordinal) = resolution.directive.generic_ordinal {
            let bound = self
                .source
                .supertype_arguments(&model.as_type_ref(), &resolution.declaring.name)
                .and_then(|args| args.into_iter().nth(ordinal))
                .ok_or_else(|| GenerationError::UnresolvedTypeArgument {
                    node: node.to_string(),
                    template: resolution.declaring.name.clone(),
                    variable: resolution
                        .declaring
                        .type_parameters
                        .get(ordinal)
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| format!("#{ordinal}")),
                })?;
            vec![bound]
        } else {
            let template = template.as_ref().ok_or_else(|| GenerationError::TypeNotFound(
                resolution.dto.clone(),
            ))?;
            let value_type = value_type.ok_or_else(|| GenerationError::UnresolvedTypeArgument {
                node: node.to_string(),
                template: template.name.clone(),
                variable: template
                    .type_parameters
                    .first()
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
            })?;
            generics::infer_from_value_type(self.source, node, template, value_type)?
        };
        let args: Vec<TypeRef> = args.iter().map(TypeRef::boxed).collect();

        // variables left must be the node's own; the DTO then declares them
        let own_variables = model.type_parameter_names();
        let mut used = Vec::new();
        for arg in &args {
            for variable in arg.free_variables() {
                if !own_variables.contains(&variable) {
                    return Err(GenerationError::UnresolvedTypeArgument {
                        node: node.to_string(),
                        template: resolution.dto.clone(),
                        variable,
                    });
                }
                if !used.contains(&variable) {
                    used.push(variable);
                }
            }
        }
        let type_parameters = model
            .type_parameters
            .iter()
            .filter(|p| used.contains(&p.name))
            .cloned()
            .collect();

        let bound = generics::bind(self.source, node, &resolution.dto, args.clone())?;
        generics::bind_inherited_accessors(self.source, node, &bound, &used)?;
        Ok((bound, args, type_parameters))
    }
}
