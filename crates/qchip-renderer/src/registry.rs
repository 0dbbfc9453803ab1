use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use qchip_core::OptionsModel;

use crate::descriptor::RendererDescriptor;
use crate::design::{ensure_bound, Design, DesignHandle};
use crate::error::{Advisory, RendererError};
use crate::identity::RendererId;
use crate::instance::RendererInstance;
use crate::resolver::{peek_template, resolve_instance_options, resolve_template, TemplateSource};
use crate::schema::{SchemaExtension, SchemaExtensionRegistry};

/// A live renderer, shared between the registry and the host.
pub type SharedRenderer = Arc<Mutex<RendererInstance>>;

/// Per-call instantiation parameters.
#[derive(Debug, Clone)]
pub struct InstantiateOptions {
    /// Merged over the template for this instance only.
    pub options_override: Option<OptionsModel>,
    /// Used instead of the gathered defaults if the design has no template yet.
    pub template_override: Option<OptionsModel>,
    /// Template key in the design; the renderer identity when unset.
    pub template_key: Option<String>,
    /// Run the one-time setup as part of instantiation.
    pub initiate: bool,
}

impl Default for InstantiateOptions {
    fn default() -> Self {
        Self {
            options_override: None,
            template_override: None,
            template_key: None,
            initiate: true,
        }
    }
}

impl InstantiateOptions {
    pub fn with_options(mut self, options: OptionsModel) -> Self {
        self.options_override = Some(options);
        self
    }

    pub fn with_template(mut self, template: OptionsModel) -> Self {
        self.template_override = Some(template);
        self
    }

    pub fn with_template_key(mut self, key: &str) -> Self {
        self.template_key = Some(key.to_string());
        self
    }

    pub fn deferred(mut self) -> Self {
        self.initiate = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { columns: usize },
    AlreadyLoaded,
}

/// Result of [`RendererRegistry::instantiate`].
#[derive(Debug)]
pub struct Instantiated {
    pub renderer: SharedRenderer,
    /// The instance previously tracked for this identity. It is not torn
    /// down; what happens to it is up to the caller.
    pub replaced: Option<SharedRenderer>,
    pub template_source: TemplateSource,
    pub advisories: Vec<Advisory>,
}

/// Loaded renderers, their schema columns, and the live instance per identity.
///
/// Owned by the host application. Mutation goes through `&mut self`; a host
/// sharing the registry between tasks wraps it in a single mutex.
#[derive(Debug, Default)]
pub struct RendererRegistry {
    loaded: IndexMap<RendererId, Arc<RendererDescriptor>>,
    schema: SchemaExtensionRegistry,
    instances: HashMap<RendererId, SharedRenderer>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Register a renderer and its schema columns. Loading an identity a
    /// second time changes nothing and reports `AlreadyLoaded`. Short names
    /// key per-design column data, so they must be unique too.
    pub fn load(&mut self, descriptor: impl Into<Arc<RendererDescriptor>>) -> Result<LoadOutcome, RendererError> {
        let descriptor = descriptor.into();
        let identity = descriptor.identity().clone();

        if self.loaded.contains_key(&identity) {
            log::warn!("{}", Advisory::AlreadyLoaded(identity));
            return Ok(LoadOutcome::AlreadyLoaded);
        }
        if let Some(existing) = self.loaded.values().find(|d| d.name() == descriptor.name()) {
            return Err(RendererError::DuplicateName {
                name: descriptor.name().to_string(),
                existing: existing.identity().clone(),
                identity,
            });
        }

        let columns = self.schema.register(&identity, &descriptor.schema_extension())?;
        log::info!("Loaded renderer '{}' ({} schema columns)", identity, columns);
        self.loaded.insert(identity, descriptor);
        Ok(LoadOutcome::Loaded { columns })
    }

    pub fn is_loaded(&self, identity: &RendererId) -> bool {
        self.loaded.contains_key(identity)
    }

    pub fn descriptor(&self, identity: &RendererId) -> Option<&Arc<RendererDescriptor>> {
        self.loaded.get(identity)
    }

    /// Identities in load order.
    pub fn loaded_identities(&self) -> impl Iterator<Item = &RendererId> {
        self.loaded.keys()
    }

    pub fn schema(&self) -> &SchemaExtensionRegistry {
        &self.schema
    }

    // ── Instances ────────────────────────────────────────────────────

    /// Bind a loaded renderer to `design` and track it as the live instance
    /// for its identity.
    ///
    /// Setup runs before anything is written to the design. If it fails, the
    /// design keeps no template, columns, or default data from this call.
    pub fn instantiate(
        &mut self,
        identity: &RendererId,
        design: &DesignHandle,
        options: InstantiateOptions,
    ) -> Result<Instantiated, RendererError> {
        let descriptor = self
            .loaded
            .get(identity)
            .cloned()
            .ok_or_else(|| RendererError::NotLoaded(identity.clone()))?;

        let key = options
            .template_key
            .clone()
            .unwrap_or_else(|| identity.to_string());

        let preview = {
            let guard = design.read();
            ensure_bound(&*guard)?;
            let template = peek_template(&*guard, &key, &descriptor, options.template_override.as_ref())?;
            resolve_instance_options(&template, options.options_override.as_ref())
        };

        let mut instance = RendererInstance::bind(Arc::clone(&descriptor), Arc::clone(design), preview);
        if options.initiate {
            instance.initiate(false)?;
        }

        let (template_source, advisories) = {
            let mut guard = design.write();
            let design: &mut dyn Design = &mut *guard;
            let template = resolve_template(design, &key, &descriptor, options.template_override.as_ref())?;

            let mut advisories = Vec::new();
            if template.source == TemplateSource::Missing {
                advisories.push(Advisory::TemplateMissing {
                    identity: identity.clone(),
                    design: design.name().to_string(),
                    key: key.clone(),
                });
            }
            advisories.extend(add_table_columns(
                design,
                descriptor.name(),
                &self.schema.owned_columns(identity),
            ));
            advisories.extend(add_table_data(design, &descriptor));

            *instance.options_mut() =
                resolve_instance_options(&template.template, options.options_override.as_ref());
            (template.source, advisories)
        };

        let renderer = Arc::new(Mutex::new(instance));
        let replaced = self.instances.insert(identity.clone(), Arc::clone(&renderer));
        if replaced.is_some() {
            log::info!("Renderer '{}' replaced the previously tracked instance", identity);
        }

        Ok(Instantiated {
            renderer,
            replaced,
            template_source,
            advisories,
        })
    }

    /// The live instance for `identity`.
    pub fn get_instance(&self, identity: &RendererId) -> Result<SharedRenderer, RendererError> {
        if !self.loaded.contains_key(identity) {
            return Err(RendererError::NotLoaded(identity.clone()));
        }
        self.instances
            .get(identity)
            .cloned()
            .ok_or_else(|| RendererError::NotFound(identity.clone()))
    }

    /// Stop tracking the live instance for `identity` and hand it back.
    pub fn evict(&mut self, identity: &RendererId) -> Option<SharedRenderer> {
        self.instances.remove(identity)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }
}

/// Declare the renderer's typed columns in the design's geometry tables,
/// creating any table the renderer adds.
fn add_table_columns(design: &mut dyn Design, renderer: &str, columns: &SchemaExtension) -> Vec<Advisory> {
    let mut rejected = Vec::new();
    if let Some(tables) = design.qgeometry_mut() {
        for (table, kinds) in columns {
            for (column, kind) in kinds {
                let status = tables.add_renderer_column(table.as_str(), renderer, column, *kind);
                if !status.is_accepted() {
                    rejected.push(Advisory::TableDataRejected {
                        table: table.to_string(),
                        column: column.clone(),
                        status: status.code(),
                    });
                }
            }
        }
    }
    if let Some(logger) = design.logger() {
        for advisory in &rejected {
            logger.warning(advisory);
        }
    }
    rejected
}

/// Push the renderer's column defaults into the design's geometry tables.
fn add_table_data(design: &mut dyn Design, descriptor: &RendererDescriptor) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    for (table, columns) in descriptor.element_table_data() {
        for (column, value) in columns {
            let status = design.add_default_data_for_qgeometry_tables(table.as_str(), descriptor.name(), column, value);
            if status.is_some_and(|s| s.is_accepted()) {
                continue;
            }
            let advisory = Advisory::TableDataRejected {
                table: table.to_string(),
                column: column.clone(),
                status: status.map_or(0, |s| s.code()),
            };
            if let Some(logger) = design.logger() {
                logger.warning(&advisory);
            }
            advisories.push(advisory);
        }
    }
    advisories
}
