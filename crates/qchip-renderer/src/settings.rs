//! Host-side renderer configuration, read from JSON.
//!
//! ```json
//! {
//!   "renderers": {
//!     "gds": {
//!       "options": { "precision": 1e-9 },
//!       "template": { "max_points": 199 },
//!       "template_key": "gds.default",
//!       "initiate": false
//!     }
//!   }
//! }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use qchip_core::OptionsModel;
use serde::{Deserialize, Serialize};

use crate::error::RendererError;
use crate::identity::RendererId;
use crate::registry::InstantiateOptions;

/// Instantiation settings for one renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub options: Option<OptionsModel>,
    pub template: Option<OptionsModel>,
    pub template_key: Option<String>,
    pub initiate: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            options: None,
            template: None,
            template_key: None,
            initiate: true,
        }
    }
}

impl From<&RendererConfig> for InstantiateOptions {
    fn from(config: &RendererConfig) -> Self {
        InstantiateOptions {
            options_override: config.options.clone(),
            template_override: config.template.clone(),
            template_key: config.template_key.clone(),
            initiate: config.initiate,
        }
    }
}

/// Per-renderer settings keyed by renderer identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RendererSettings {
    #[serde(default)]
    pub renderers: IndexMap<String, RendererConfig>,
}

impl RendererSettings {
    pub fn from_json(json: &str) -> Result<Self, RendererError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, RendererError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings for {} renderers from {}",
            settings.renderers.len(),
            path.display()
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, RendererError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, identity: &RendererId) -> Option<&RendererConfig> {
        self.renderers.get(identity.as_str())
    }

    /// Options for instantiating `identity`; defaults when it is not configured.
    pub fn instantiate_options(&self, identity: &RendererId) -> InstantiateOptions {
        self.get(identity).map(InstantiateOptions::from).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use qchip_core::OptionValue;

    use super::*;

    const SETTINGS: &str = r#"{
        "renderers": {
            "gds": {
                "options": { "precision": 1e-9 },
                "template": { "max_points": 199, "fabricate": false },
                "initiate": false
            },
            "hfss": { "template_key": "hfss.eigenmode" }
        }
    }"#;

    #[test]
    fn test_parse_settings() {
        let settings = RendererSettings::from_json(SETTINGS).unwrap();
        let gds = settings.get(&RendererId::new("gds")).unwrap();
        assert!(!gds.initiate);
        assert_eq!(
            gds.template.as_ref().and_then(|t| t.get("max_points")),
            Some(&OptionValue::Int(199))
        );

        let hfss = settings.instantiate_options(&RendererId::new("hfss"));
        assert!(hfss.initiate);
        assert_eq!(hfss.template_key.as_deref(), Some("hfss.eigenmode"));
        assert!(hfss.options_override.is_none());
    }

    #[test]
    fn test_unconfigured_renderer_gets_defaults() {
        let settings = RendererSettings::from_json(SETTINGS).unwrap();
        let options = settings.instantiate_options(&RendererId::new("q3d"));
        assert!(options.initiate);
        assert!(options.template_override.is_none());
        assert!(options.template_key.is_none());
    }

    #[test]
    fn test_settings_json_roundtrip() {
        let settings = RendererSettings::from_json(SETTINGS).unwrap();
        let json = settings.to_json().unwrap();
        assert_eq!(RendererSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_settings_are_reported() {
        let err = RendererSettings::from_json(r#"{"renderers": {"gds": {"initiate": "yes"}}}"#).unwrap_err();
        assert!(matches!(err, RendererError::Settings(_)));

        let err = RendererSettings::load(Path::new("/nonexistent/renderers.json")).unwrap_err();
        assert!(matches!(err, RendererError::Io(_)));
    }
}
