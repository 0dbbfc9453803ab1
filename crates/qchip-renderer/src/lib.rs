//! # QChip Renderer
//!
//! Plugin framework for exporting QChip designs to external tools.
//!
//! A renderer is described once by a [`RendererDescriptor`]: its identity,
//! an ordered lineage of default-option providers, and the columns it adds
//! to the design's geometry tables. The host loads descriptors into a
//! [`RendererRegistry`], which claims the columns and later binds renderer
//! instances to designs. Binding resolves options in three layers
//! (lineage defaults, the design's per-renderer template, per-instance
//! overrides) and the bound [`RendererInstance`] drives its
//! [`RenderBackend`] through chips, components, and geometry rows.

pub mod backend;
pub mod descriptor;
pub mod design;
pub mod error;
pub mod identity;
pub mod instance;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod settings;

#[cfg(test)]
mod testing;

pub use backend::{RenderBackend, RenderContext};
pub use descriptor::{BackendFactory, ElementTableData, OptionsProvider, RendererDescriptor};
pub use design::{design_handle, ensure_bound, Design, DesignHandle, TemplateOptions};
pub use error::{Advisory, RendererError};
pub use identity::RendererId;
pub use instance::{InitOutcome, RendererInstance, RendererStatus};
pub use pipeline::RenderSummary;
pub use registry::{InstantiateOptions, Instantiated, LoadOutcome, RendererRegistry, SharedRenderer};
pub use resolver::{gather_defaults, resolve_instance_options, resolve_template, ResolvedTemplate, TemplateSource};
pub use schema::{SchemaColumn, SchemaExtension, SchemaExtensionRegistry};
pub use settings::{RendererConfig, RendererSettings};
