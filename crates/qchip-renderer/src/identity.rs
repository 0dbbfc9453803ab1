use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable, process-unique key of a renderer implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RendererId(String);

impl RendererId {
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Identity derived from the fully-qualified name of the backend type,
    /// e.g. `qchip_gds::GdsRenderer`.
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RendererId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RendererId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
