use std::collections::HashMap;
use std::sync::Arc;

use crate::options::OptionsModel;

/// Per-design store of renderer template options, keyed by renderer identity.
///
/// Entries are written once and handed out behind an `Arc`; there is no
/// mutable access to a stored template.
#[derive(Debug, Default, Clone)]
pub struct TemplateStore {
    entries: HashMap<String, Arc<OptionsModel>>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<OptionsModel>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `template` under `key` unless an entry already exists.
    /// Returns true if the template was written.
    pub fn set_if_absent(&mut self, key: &str, template: OptionsModel) -> bool {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), Arc::new(template));
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
