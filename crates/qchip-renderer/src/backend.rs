use qchip_core::{Chip, ColumnValue, Component, OptionsModel, QGeometryElement};

use crate::descriptor::RendererDescriptor;
use crate::design::Design;
use crate::error::RendererError;
use crate::identity::RendererId;

/// What a backend sees while it is being driven: its own descriptor and
/// resolved options, and read access to the bound design.
pub struct RenderContext<'a> {
    pub descriptor: &'a RendererDescriptor,
    pub options: &'a OptionsModel,
    pub design: &'a dyn Design,
}

impl<'a> RenderContext<'a> {
    pub fn new(descriptor: &'a RendererDescriptor, options: &'a OptionsModel, design: &'a dyn Design) -> Self {
        Self {
            descriptor,
            options,
            design,
        }
    }

    pub fn identity(&self) -> &RendererId {
        self.descriptor.identity()
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// This renderer's value of `column` for `element`, falling back to the
    /// design's default for the element's table.
    pub fn column_value(&self, element: &'a QGeometryElement, column: &str) -> Option<&'a ColumnValue> {
        self.design
            .qgeometry()?
            .element_value(element, self.descriptor.name(), column)
    }
}

/// The hooks a concrete renderer supplies. The framework owns traversal
/// order; backends only draw.
///
/// Chips, components, paths, and polygons have no default and must be
/// implemented. Tables the renderer declares beyond `path` and `poly` go
/// through [`RenderBackend::render_element_extension`], which fails with
/// `NotImplemented` unless overridden.
pub trait RenderBackend: Send {
    /// One-time setup before the first render, e.g. connecting to an
    /// external tool or loading material libraries.
    fn initiate_renderer(&mut self, _ctx: &RenderContext<'_>) -> Result<(), RendererError> {
        Ok(())
    }

    fn render_chip(&mut self, ctx: &RenderContext<'_>, chip: &Chip) -> Result<(), RendererError>;

    /// Called once per component, before its elements are dispatched.
    fn render_component(&mut self, ctx: &RenderContext<'_>, component: &Component) -> Result<(), RendererError>;

    fn render_element_path(&mut self, ctx: &RenderContext<'_>, element: &QGeometryElement) -> Result<(), RendererError>;

    fn render_element_poly(&mut self, ctx: &RenderContext<'_>, element: &QGeometryElement) -> Result<(), RendererError>;

    fn render_element_extension(
        &mut self,
        _ctx: &RenderContext<'_>,
        element: &QGeometryElement,
    ) -> Result<(), RendererError> {
        Err(RendererError::not_implemented(&format!(
            "render_element_{}",
            element.category
        )))
    }

    /// Runs after a full design render.
    fn post_render(&mut self, _ctx: &RenderContext<'_>) -> Result<(), RendererError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use qchip_core::{Path, Point};

    use super::*;
    use crate::testing::{recording_descriptor, sample_design, CallLog};

    #[test]
    fn test_column_value_prefers_row_over_default() {
        let mut design = sample_design();
        design.add_default_data_for_qgeometry_tables("path", "gds", "color", &ColumnValue::from("blue"));
        let descriptor = recording_descriptor("gds", &CallLog::default());
        let options = OptionsModel::new();
        let ctx = RenderContext::new(&descriptor, &options, &design);

        let plain = QGeometryElement::path("c1", "feed", Path::new(vec![Point::new(0.0, 0.0)], 0.01));
        let colored = plain.clone().with_value("gds", "color", "red");
        assert_eq!(ctx.column_value(&plain, "color"), Some(&ColumnValue::from("blue")));
        assert_eq!(ctx.column_value(&colored, "color"), Some(&ColumnValue::from("red")));
        assert_eq!(ctx.column_value(&plain, "thickness"), None);
        assert_eq!(ctx.name(), "gds");
    }
}
