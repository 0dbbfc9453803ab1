use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use qchip_core::{ColumnValue, ElementCategory, OptionsModel};

use crate::backend::RenderBackend;
use crate::identity::RendererId;
use crate::schema::SchemaExtension;

/// Example value per column, per table: `category -> column -> value`.
pub type ElementTableData = IndexMap<ElementCategory, IndexMap<String, ColumnValue>>;

/// Builds a fresh backend for every instance of a renderer.
pub type BackendFactory = Arc<dyn Fn() -> Box<dyn RenderBackend> + Send + Sync>;

/// One link of a renderer's lineage, optionally contributing default options.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsProvider {
    pub class_name: String,
    pub defaults: Option<OptionsModel>,
}

/// Everything the framework knows about one renderer implementation: its
/// identity, the ordered chain of default-option providers (most general
/// first), the renderer columns it adds to the geometry tables, and how to
/// build its backend.
#[derive(Clone)]
pub struct RendererDescriptor {
    identity: RendererId,
    name: String,
    lineage: Vec<OptionsProvider>,
    element_table_data: ElementTableData,
    factory: BackendFactory,
}

impl RendererDescriptor {
    pub fn new<B, F>(identity: RendererId, name: &str, factory: F) -> Self
    where
        B: RenderBackend + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        Self {
            identity,
            name: name.to_string(),
            lineage: Vec::new(),
            element_table_data: IndexMap::new(),
            factory: Arc::new(move || Box::new(factory()) as Box<dyn RenderBackend>),
        }
    }

    /// Descriptor whose identity is the backend's type name.
    pub fn of<B>(name: &str) -> Self
    where
        B: RenderBackend + Default + 'static,
    {
        Self::new(RendererId::of::<B>(), name, B::default)
    }

    /// A renderer specialising `parent`: inherits its lineage and column
    /// data, then adds its own on top.
    pub fn derive<B, F>(parent: &RendererDescriptor, identity: RendererId, name: &str, factory: F) -> Self
    where
        B: RenderBackend + 'static,
        F: Fn() -> B + Send + Sync + 'static,
    {
        let mut descriptor = Self::new(identity, name, factory);
        descriptor.lineage = parent.lineage.clone();
        descriptor.element_table_data = parent.element_table_data.clone();
        descriptor
    }

    /// Append a lineage link that contributes default options.
    pub fn with_defaults(mut self, class_name: &str, defaults: OptionsModel) -> Self {
        self.lineage.push(OptionsProvider {
            class_name: class_name.to_string(),
            defaults: Some(defaults),
        });
        self
    }

    /// Append a lineage link without default options of its own.
    pub fn with_ancestor(mut self, class_name: &str) -> Self {
        self.lineage.push(OptionsProvider {
            class_name: class_name.to_string(),
            defaults: None,
        });
        self
    }

    /// Declare a renderer column with its example (default) value.
    pub fn with_table_data(mut self, table: &str, column: &str, value: impl Into<ColumnValue>) -> Self {
        self.element_table_data
            .entry(ElementCategory::new(table))
            .or_default()
            .insert(column.to_string(), value.into());
        self
    }

    pub fn identity(&self) -> &RendererId {
        &self.identity
    }

    /// Short name, used as the owner of per-design column data.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lineage(&self) -> &[OptionsProvider] {
        &self.lineage
    }

    pub fn element_table_data(&self) -> &ElementTableData {
        &self.element_table_data
    }

    pub fn declares_category(&self, category: &str) -> bool {
        self.element_table_data.contains_key(category)
    }

    /// Column kinds inferred from the declared example values.
    pub fn schema_extension(&self) -> SchemaExtension {
        self.element_table_data
            .iter()
            .map(|(category, columns)| {
                let kinds = columns
                    .iter()
                    .map(|(column, value)| (column.clone(), value.kind()))
                    .collect();
                (category.clone(), kinds)
            })
            .collect()
    }

    pub fn create_backend(&self) -> Box<dyn RenderBackend> {
        (self.factory)()
    }
}

impl fmt::Debug for RendererDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererDescriptor")
            .field("identity", &self.identity)
            .field("name", &self.name)
            .field("lineage", &self.lineage)
            .field("element_table_data", &self.element_table_data)
            .finish_non_exhaustive()
    }
}
