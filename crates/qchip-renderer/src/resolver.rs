//! Option resolution: lineage defaults → per-design template → per-instance options.

use std::sync::Arc;

use qchip_core::OptionsModel;

use crate::descriptor::RendererDescriptor;
use crate::design::Design;
use crate::error::{Advisory, RendererError};

/// Merge the defaults of every lineage link, most general first, so the most
/// specific link wins on overlapping keys.
pub fn gather_defaults(descriptor: &RendererDescriptor) -> OptionsModel {
    descriptor
        .lineage()
        .iter()
        .filter_map(|provider| provider.defaults.as_ref())
        .fold(OptionsModel::new(), |mut acc, defaults| {
            acc.merge(defaults);
            acc
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    /// The design already held a template under the key.
    Existing,
    /// The template was computed and stored by this call.
    Created,
    /// The design refused the write; an empty template is used.
    Missing,
}

#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub template: Arc<OptionsModel>,
    pub source: TemplateSource,
}

/// Return the design's template under `key`, creating it on first use from
/// `template_override` or the descriptor's gathered defaults.
pub fn resolve_template(
    design: &mut dyn Design,
    key: &str,
    descriptor: &RendererDescriptor,
    template_override: Option<&OptionsModel>,
) -> Result<ResolvedTemplate, RendererError> {
    let design_name = design.name().to_string();
    let store = design
        .template_options_mut()
        .ok_or_else(|| RendererError::NotBoundDesign {
            design: design_name.clone(),
            missing: "a template option store",
        })?;

    if let Some(template) = store.get(key) {
        return Ok(ResolvedTemplate {
            template,
            source: TemplateSource::Existing,
        });
    }

    let template = match template_override {
        Some(template) => template.clone(),
        None => gather_defaults(descriptor),
    };
    store.set_if_absent(key, template);

    if let Some(template) = store.get(key) {
        return Ok(ResolvedTemplate {
            template,
            source: TemplateSource::Created,
        });
    }

    let advisory = Advisory::TemplateMissing {
        identity: descriptor.identity().clone(),
        design: design_name,
        key: key.to_string(),
    };
    match design.logger() {
        Some(logger) => logger.error(&advisory),
        None => log::error!("{}", advisory),
    }
    Ok(ResolvedTemplate {
        template: Arc::new(OptionsModel::new()),
        source: TemplateSource::Missing,
    })
}

/// The template `resolve_template` would settle on, without writing it: the
/// stored entry under `key` if any, else `template_override` or the gathered
/// defaults.
pub fn peek_template(
    design: &dyn Design,
    key: &str,
    descriptor: &RendererDescriptor,
    template_override: Option<&OptionsModel>,
) -> Result<Arc<OptionsModel>, RendererError> {
    let store = design
        .template_options()
        .ok_or_else(|| RendererError::NotBoundDesign {
            design: design.name().to_string(),
            missing: "a template option store",
        })?;
    if let Some(template) = store.get(key) {
        return Ok(template);
    }
    Ok(Arc::new(match template_override {
        Some(template) => template.clone(),
        None => gather_defaults(descriptor),
    }))
}

/// Deep copy of `template` with `options_override` merged on top. The result
/// shares nothing with the template.
pub fn resolve_instance_options(template: &OptionsModel, options_override: Option<&OptionsModel>) -> OptionsModel {
    let mut options = template.clone();
    if let Some(overrides) = options_override {
        options.merge(overrides);
    }
    options
}
