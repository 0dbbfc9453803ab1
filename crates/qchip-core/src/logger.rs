use std::fmt::Display;

/// Log sink scoped to one design. Messages go through the `log` facade under
/// the target `qchip::design::<design name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignLogger {
    target: String,
}

impl DesignLogger {
    pub fn new(design_name: &str) -> Self {
        Self {
            target: format!("qchip::design::{design_name}"),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn debug(&self, message: impl Display) {
        log::debug!(target: self.target.as_str(), "{}", message);
    }

    pub fn info(&self, message: impl Display) {
        log::info!(target: self.target.as_str(), "{}", message);
    }

    pub fn warning(&self, message: impl Display) {
        log::warn!(target: self.target.as_str(), "{}", message);
    }

    pub fn error(&self, message: impl Display) {
        log::error!(target: self.target.as_str(), "{}", message);
    }
}

impl Default for DesignLogger {
    fn default() -> Self {
        Self {
            target: "qchip::design".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_is_scoped_to_design() {
        assert_eq!(DesignLogger::new("planar").target(), "qchip::design::planar");
        assert_eq!(DesignLogger::default().target(), "qchip::design");
    }
}
