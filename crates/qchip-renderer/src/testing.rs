//! Shared fixtures for the unit tests: a backend that records every hook
//! call, a sample design, and a design wrapper with capabilities removed.

use std::sync::Arc;

use parking_lot::Mutex;
use qchip_core::{
    Chip, Component, DesignLogger, OptionsModel, Path, Point, Polygon, QDesign, QGeometryElement,
    QGeometryTables,
};

use crate::backend::{RenderBackend, RenderContext};
use crate::descriptor::RendererDescriptor;
use crate::design::{Design, TemplateOptions};
use crate::error::RendererError;
use crate::identity::RendererId;

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ── Backends ─────────────────────────────────────────────────────────

/// Hook calls in the order they happened, shared across backend instances.
#[derive(Debug, Clone, Default)]
pub(crate) struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub(crate) fn push(&self, entry: String) {
        self.0.lock().push(entry);
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.0.lock().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub(crate) log: CallLog,
    pub(crate) fail_setup: bool,
}

impl RenderBackend for RecordingBackend {
    fn initiate_renderer(&mut self, _ctx: &RenderContext<'_>) -> Result<(), RendererError> {
        self.log.push("initiate".to_string());
        if self.fail_setup {
            return Err(RendererError::Backend("simulator not reachable".to_string()));
        }
        Ok(())
    }

    fn render_chip(&mut self, _ctx: &RenderContext<'_>, chip: &Chip) -> Result<(), RendererError> {
        self.log.push(format!("chip:{}", chip.name));
        Ok(())
    }

    fn render_component(&mut self, _ctx: &RenderContext<'_>, component: &Component) -> Result<(), RendererError> {
        self.log.push(format!("component:{}", component.name));
        Ok(())
    }

    fn render_element_path(&mut self, _ctx: &RenderContext<'_>, element: &QGeometryElement) -> Result<(), RendererError> {
        self.log.push(format!("path:{}.{}", element.component, element.name));
        Ok(())
    }

    fn render_element_poly(&mut self, _ctx: &RenderContext<'_>, element: &QGeometryElement) -> Result<(), RendererError> {
        self.log.push(format!("poly:{}.{}", element.component, element.name));
        Ok(())
    }

    fn render_element_extension(
        &mut self,
        _ctx: &RenderContext<'_>,
        element: &QGeometryElement,
    ) -> Result<(), RendererError> {
        self.log.push(format!("{}:{}.{}", element.category, element.component, element.name));
        Ok(())
    }

    fn post_render(&mut self, _ctx: &RenderContext<'_>) -> Result<(), RendererError> {
        self.log.push("post_render".to_string());
        Ok(())
    }
}

/// Implements only the hooks that have no default.
#[derive(Debug, Default)]
pub(crate) struct MinimalBackend;

impl RenderBackend for MinimalBackend {
    fn render_chip(&mut self, _ctx: &RenderContext<'_>, _chip: &Chip) -> Result<(), RendererError> {
        Ok(())
    }

    fn render_component(&mut self, _ctx: &RenderContext<'_>, _component: &Component) -> Result<(), RendererError> {
        Ok(())
    }

    fn render_element_path(&mut self, _ctx: &RenderContext<'_>, _element: &QGeometryElement) -> Result<(), RendererError> {
        Ok(())
    }

    fn render_element_poly(&mut self, _ctx: &RenderContext<'_>, _element: &QGeometryElement) -> Result<(), RendererError> {
        Ok(())
    }
}

/// Descriptor whose identity and name are both `name`, recording into `log`.
pub(crate) fn recording_descriptor(name: &str, log: &CallLog) -> RendererDescriptor {
    let log = log.clone();
    RendererDescriptor::new(RendererId::new(name), name, move || RecordingBackend {
        log: log.clone(),
        fail_setup: false,
    })
}

// ── Designs ──────────────────────────────────────────────────────────

fn square(component: &str, name: &str, x: f64) -> QGeometryElement {
    QGeometryElement::poly(
        component,
        name,
        Polygon::new(vec![
            Point::new(x, 0.0),
            Point::new(x + 0.1, 0.0),
            Point::new(x + 0.1, 0.1),
            Point::new(x, 0.1),
        ]),
    )
}

/// `sample`: component `c1` with a `trace` path and a `pad` polygon, then
/// component `c2` with a `pad` polygon, all on chip `main`.
pub(crate) fn sample_design() -> QDesign {
    let mut design = QDesign::new("sample");
    for name in ["c1", "c2"] {
        design
            .add_component(Component::new(name, "TransmonPocket"))
            .expect("fresh component");
    }
    design
        .add_element(QGeometryElement::path(
            "c1",
            "trace",
            Path::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)], 0.01),
        ))
        .expect("c1 trace");
    design.add_element(square("c1", "pad", 0.0)).expect("c1 pad");
    design.add_element(square("c2", "pad", 2.0)).expect("c2 pad");
    design
}

/// Accepts nothing and returns nothing.
#[derive(Debug, Default)]
struct RejectingStore;

impl TemplateOptions for RejectingStore {
    fn get(&self, _key: &str) -> Option<Arc<OptionsModel>> {
        None
    }

    fn set_if_absent(&mut self, _key: &str, _template: OptionsModel) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Templates {
    Present,
    Absent,
    Rejecting,
}

/// A `QDesign` with one of its capabilities hidden.
pub(crate) struct PartialDesign {
    inner: QDesign,
    templates: Templates,
    rejecting: RejectingStore,
    logger: bool,
    tables: bool,
}

impl PartialDesign {
    fn wrap(inner: QDesign) -> Self {
        Self {
            inner,
            templates: Templates::Present,
            rejecting: RejectingStore,
            logger: true,
            tables: true,
        }
    }

    pub(crate) fn without_templates(inner: QDesign) -> Self {
        Self {
            templates: Templates::Absent,
            ..Self::wrap(inner)
        }
    }

    pub(crate) fn rejecting_templates(inner: QDesign) -> Self {
        Self {
            templates: Templates::Rejecting,
            ..Self::wrap(inner)
        }
    }

    pub(crate) fn without_logger(inner: QDesign) -> Self {
        Self {
            logger: false,
            ..Self::wrap(inner)
        }
    }

    pub(crate) fn without_tables(inner: QDesign) -> Self {
        Self {
            tables: false,
            ..Self::wrap(inner)
        }
    }
}

impl Design for PartialDesign {
    fn name(&self) -> &str {
        &self.inner.name
    }

    fn logger(&self) -> Option<&DesignLogger> {
        self.logger.then(|| self.inner.logger())
    }

    fn template_options(&self) -> Option<&dyn TemplateOptions> {
        match self.templates {
            Templates::Present => Some(self.inner.template_options() as &dyn TemplateOptions),
            Templates::Rejecting => Some(&self.rejecting as &dyn TemplateOptions),
            Templates::Absent => None,
        }
    }

    fn template_options_mut(&mut self) -> Option<&mut dyn TemplateOptions> {
        match self.templates {
            Templates::Present => Some(self.inner.template_options_mut() as &mut dyn TemplateOptions),
            Templates::Rejecting => Some(&mut self.rejecting as &mut dyn TemplateOptions),
            Templates::Absent => None,
        }
    }

    fn qgeometry(&self) -> Option<&QGeometryTables> {
        self.tables.then(|| self.inner.qgeometry())
    }

    fn qgeometry_mut(&mut self) -> Option<&mut QGeometryTables> {
        if self.tables {
            Some(self.inner.qgeometry_mut())
        } else {
            None
        }
    }

    fn chips(&self) -> Vec<&Chip> {
        self.inner.chips().collect()
    }

    fn components(&self) -> Vec<&Component> {
        self.inner.components().collect()
    }

    fn component(&self, name: &str) -> Option<&Component> {
        self.inner.component(name)
    }
}
