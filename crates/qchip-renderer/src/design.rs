//! The capabilities a design must expose to host renderers.

use std::sync::Arc;

use parking_lot::RwLock;
use qchip_core::{
    Chip, ColumnValue, Component, DesignLogger, OptionsModel, QDesign, QGeometryElement,
    QGeometryTables, TableDataStatus, TemplateStore,
};

use crate::error::RendererError;

/// Keyed store of renderer templates with first-write-wins semantics.
pub trait TemplateOptions {
    fn get(&self, key: &str) -> Option<Arc<OptionsModel>>;

    /// Store `template` unless `key` is taken. Returns true if written.
    fn set_if_absent(&mut self, key: &str, template: OptionsModel) -> bool;
}

impl TemplateOptions for TemplateStore {
    fn get(&self, key: &str) -> Option<Arc<OptionsModel>> {
        TemplateStore::get(self, key)
    }

    fn set_if_absent(&mut self, key: &str, template: OptionsModel) -> bool {
        TemplateStore::set_if_absent(self, key, template)
    }
}

/// A design that renderers can bind to.
///
/// The template store, the logger, and the geometry tables are optional
/// capabilities; a design lacking any of them cannot host a renderer.
pub trait Design: Send + Sync {
    fn name(&self) -> &str;

    fn logger(&self) -> Option<&DesignLogger>;

    fn template_options(&self) -> Option<&dyn TemplateOptions>;

    fn template_options_mut(&mut self) -> Option<&mut dyn TemplateOptions>;

    fn qgeometry(&self) -> Option<&QGeometryTables>;

    fn qgeometry_mut(&mut self) -> Option<&mut QGeometryTables>;

    fn chips(&self) -> Vec<&Chip>;

    /// Components in design order.
    fn components(&self) -> Vec<&Component>;

    fn component(&self, name: &str) -> Option<&Component>;

    fn component_elements(&self, name: &str) -> Vec<&QGeometryElement> {
        self.qgeometry()
            .map(|tables| tables.component_elements(name))
            .unwrap_or_default()
    }

    /// Register the default value of a renderer-owned column. `None` if the
    /// design has no geometry tables.
    fn add_default_data_for_qgeometry_tables(
        &mut self,
        table: &str,
        renderer: &str,
        column: &str,
        value: &ColumnValue,
    ) -> Option<TableDataStatus> {
        self.qgeometry_mut()
            .map(|tables| tables.add_default_data(table, renderer, column, value))
    }
}

/// Shared handle to a design. Renderers hold one; the design outlives them.
pub type DesignHandle = Arc<RwLock<dyn Design>>;

pub fn design_handle<D: Design + 'static>(design: D) -> DesignHandle {
    Arc::new(RwLock::new(design))
}

/// Fail with `NotBoundDesign` unless every capability is present.
pub fn ensure_bound(design: &dyn Design) -> Result<(), RendererError> {
    let missing = if design.template_options().is_none() {
        Some("a template option store")
    } else if design.logger().is_none() {
        Some("a logger")
    } else if design.qgeometry().is_none() {
        Some("geometry tables")
    } else {
        None
    };

    match missing {
        Some(missing) => Err(RendererError::NotBoundDesign {
            design: design.name().to_string(),
            missing,
        }),
        None => Ok(()),
    }
}

impl Design for QDesign {
    fn name(&self) -> &str {
        &self.name
    }

    fn logger(&self) -> Option<&DesignLogger> {
        Some(QDesign::logger(self))
    }

    fn template_options(&self) -> Option<&dyn TemplateOptions> {
        Some(QDesign::template_options(self))
    }

    fn template_options_mut(&mut self) -> Option<&mut dyn TemplateOptions> {
        Some(QDesign::template_options_mut(self))
    }

    fn qgeometry(&self) -> Option<&QGeometryTables> {
        Some(QDesign::qgeometry(self))
    }

    fn qgeometry_mut(&mut self) -> Option<&mut QGeometryTables> {
        Some(QDesign::qgeometry_mut(self))
    }

    fn chips(&self) -> Vec<&Chip> {
        QDesign::chips(self).collect()
    }

    fn components(&self) -> Vec<&Component> {
        QDesign::components(self).collect()
    }

    fn component(&self, name: &str) -> Option<&Component> {
        QDesign::component(self, name)
    }
}
