//! Design traversal: chips first, then components, then each component's
//! geometry rows dispatched by table.

use std::sync::Arc;

use qchip_core::{Component, ElementCategory, QGeometryElement};

use crate::backend::{RenderBackend, RenderContext};
use crate::error::RendererError;
use crate::instance::RendererInstance;

/// Counts of what a render pass visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub chips: usize,
    pub components: usize,
    pub elements: usize,
}

struct RenderPass<'a> {
    backend: &'a mut dyn RenderBackend,
    ctx: RenderContext<'a>,
    summary: RenderSummary,
}

impl<'a> RenderPass<'a> {
    fn chips(&mut self) -> Result<(), RendererError> {
        let design = self.ctx.design;
        for chip in design.chips() {
            self.backend.render_chip(&self.ctx, chip)?;
            self.summary.chips += 1;
        }
        Ok(())
    }

    fn components(&mut self, selection: &[&str]) -> Result<(), RendererError> {
        let design = self.ctx.design;
        // Resolve the whole selection up front so an unknown name fails
        // before anything is drawn.
        let components: Vec<&Component> = if selection.is_empty() {
            design.components()
        } else {
            selection
                .iter()
                .map(|name| {
                    design
                        .component(name)
                        .ok_or_else(|| RendererError::UnknownComponent(name.to_string()))
                })
                .collect::<Result<_, _>>()?
        };

        for component in components {
            self.component(component)?;
        }
        Ok(())
    }

    fn component(&mut self, component: &Component) -> Result<(), RendererError> {
        let design = self.ctx.design;
        self.backend.render_component(&self.ctx, component)?;
        self.summary.components += 1;
        for element in design.component_elements(&component.name) {
            self.element(element)?;
        }
        Ok(())
    }

    fn element(&mut self, element: &QGeometryElement) -> Result<(), RendererError> {
        match element.category.as_str() {
            ElementCategory::PATH => self.backend.render_element_path(&self.ctx, element)?,
            ElementCategory::POLY => self.backend.render_element_poly(&self.ctx, element)?,
            other if self.ctx.descriptor.declares_category(other) => {
                self.backend.render_element_extension(&self.ctx, element)?
            }
            other => {
                return Err(RendererError::UnknownElementCategory {
                    category: other.to_string(),
                    element: format!("{}.{}", element.component, element.name),
                })
            }
        }
        self.summary.elements += 1;
        Ok(())
    }
}

impl RendererInstance {
    fn run<T>(&mut self, f: impl FnOnce(&mut RenderPass<'_>) -> Result<T, RendererError>) -> Result<T, RendererError> {
        let handle = Arc::clone(&self.design);
        let design = handle.read();
        let mut pass = RenderPass {
            backend: self.backend.as_mut(),
            ctx: RenderContext::new(&self.descriptor, &self.options, &*design),
            summary: RenderSummary::default(),
        };
        f(&mut pass)
    }

    /// Render every chip, then every component, then run `post_render`.
    /// Setup runs first if it has not been attempted yet.
    pub fn render_design(&mut self) -> Result<RenderSummary, RendererError> {
        self.initiate(false)?;
        let summary = self.run(|pass| {
            pass.chips()?;
            pass.components(&[])?;
            pass.backend.post_render(&pass.ctx)?;
            Ok(pass.summary)
        })?;
        log::info!(
            "Renderer '{}' rendered {} chips, {} components, {} elements",
            self.identity(),
            summary.chips,
            summary.components,
            summary.elements
        );
        Ok(summary)
    }

    pub fn render_chips(&mut self) -> Result<RenderSummary, RendererError> {
        self.run(|pass| {
            pass.chips()?;
            Ok(pass.summary)
        })
    }

    /// Render the named components in exactly the given order, or all
    /// components in design order when `selection` is empty.
    pub fn render_components(&mut self, selection: &[&str]) -> Result<RenderSummary, RendererError> {
        self.run(|pass| {
            pass.components(selection)?;
            Ok(pass.summary)
        })
    }

    pub fn render_component(&mut self, name: &str) -> Result<RenderSummary, RendererError> {
        self.render_components(&[name])
    }

    pub fn render_element(&mut self, element: &QGeometryElement) -> Result<(), RendererError> {
        self.run(|pass| pass.element(element))
    }
}

#[cfg(test)]
mod tests {
    use qchip_core::{OptionsModel, Path, Point, QDesign};

    use super::*;
    use crate::descriptor::RendererDescriptor;
    use crate::design::design_handle;
    use crate::identity::RendererId;
    use crate::testing::{sample_design, CallLog, MinimalBackend, RecordingBackend};

    fn renderer(design: QDesign, descriptor: RendererDescriptor) -> RendererInstance {
        RendererInstance::bind(Arc::new(descriptor), design_handle(design), OptionsModel::new())
    }

    fn recording(log: &CallLog) -> RendererDescriptor {
        let log = log.clone();
        RendererDescriptor::new(RendererId::new("rec"), "rec", move || RecordingBackend {
            log: log.clone(),
            fail_setup: false,
        })
    }

    #[test]
    fn test_render_design_order() {
        let log = CallLog::default();
        let mut r = renderer(sample_design(), recording(&log));

        let summary = r.render_design().unwrap();
        assert_eq!(
            log.entries(),
            vec![
                "initiate",
                "chip:main",
                "component:c1",
                "path:c1.trace",
                "poly:c1.pad",
                "component:c2",
                "poly:c2.pad",
                "post_render",
            ]
        );
        assert_eq!(
            summary,
            RenderSummary {
                chips: 1,
                components: 2,
                elements: 3
            }
        );
    }

    #[test]
    fn test_render_design_initiates_only_once() {
        let log = CallLog::default();
        let mut r = renderer(sample_design(), recording(&log));
        r.render_design().unwrap();
        r.render_design().unwrap();
        assert_eq!(log.count("initiate"), 1);
        assert_eq!(log.count("post_render"), 2);
    }

    #[test]
    fn test_selection_order_is_preserved() {
        let log = CallLog::default();
        let mut r = renderer(sample_design(), recording(&log));

        r.render_components(&["c2", "c1"]).unwrap();
        let components: Vec<String> = log
            .entries()
            .into_iter()
            .filter(|e| e.starts_with("component:"))
            .collect();
        assert_eq!(components, vec!["component:c2", "component:c1"]);
    }

    #[test]
    fn test_unknown_selection_renders_nothing() {
        let log = CallLog::default();
        let mut r = renderer(sample_design(), recording(&log));

        let err = r.render_components(&["c1", "ghost"]).unwrap_err();
        assert!(matches!(err, RendererError::UnknownComponent(name) if name == "ghost"));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn test_undeclared_category_is_fatal() {
        let log = CallLog::default();
        let mut design = sample_design();
        design.qgeometry_mut().register_table(ElementCategory::new("junction"));
        let mut junction = QGeometryElement::path(
            "c1",
            "jj",
            Path::new(vec![Point::new(0.0, 0.0), Point::new(0.0, 0.02)], 0.01),
        );
        junction.category = ElementCategory::new("junction");
        design.add_element(junction).unwrap();

        let mut r = renderer(design, recording(&log));
        let err = r.render_component("c1").unwrap_err();
        assert!(matches!(
            err,
            RendererError::UnknownElementCategory { ref category, .. } if category == "junction"
        ));
    }

    #[test]
    fn test_declared_category_without_hook_is_not_implemented() {
        let log = CallLog::default();
        let mut design = sample_design();
        design.qgeometry_mut().register_table(ElementCategory::new("junction"));
        let mut junction = QGeometryElement::path(
            "c2",
            "jj",
            Path::new(vec![Point::new(0.0, 0.0), Point::new(0.0, 0.02)], 0.01),
        );
        junction.category = ElementCategory::new("junction");
        design.add_element(junction).unwrap();

        let descriptor = RendererDescriptor::of::<MinimalBackend>("minimal").with_table_data("junction", "inductance", "10nH");
        let mut r = renderer(design, descriptor);
        match r.render_component("c2").unwrap_err() {
            RendererError::NotImplemented { operation } => assert_eq!(operation, "render_element_junction"),
            other => panic!("expected NotImplemented, got {other:?}"),
        }
    }

    #[test]
    fn test_render_element_dispatches_by_table() {
        let log = CallLog::default();
        let mut r = renderer(sample_design(), recording(&log));
        let trace = QGeometryElement::path("c1", "loose", Path::new(vec![Point::new(0.0, 0.0)], 0.01));
        r.render_element(&trace).unwrap();
        assert_eq!(log.entries(), vec!["path:c1.loose"]);
    }
}
