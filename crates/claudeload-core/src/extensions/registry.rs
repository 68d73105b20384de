//! Registry of extensions that plugin manifests can name

use std::collections::BTreeMap;
use std::sync::Arc;

use super::types::Extension;
use crate::intercept::FetchHook;

/// Extensions keyed by entry id
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    extensions: BTreeMap<String, Arc<dyn Extension>>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every extension shipped in this crate
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(FetchHook::ENTRY, Arc::new(FetchHook));
        registry
    }

    /// Register an extension, replacing any previous one with the same id
    pub fn register(&mut self, entry: impl Into<String>, extension: Arc<dyn Extension>) {
        self.extensions.insert(entry.into(), extension);
    }

    pub fn get(&self, entry: &str) -> Option<Arc<dyn Extension>> {
        self.extensions.get(entry).cloned()
    }

    /// Registered entry ids in sorted order
    pub fn entries(&self) -> Vec<&str> {
        self.extensions.keys().map(String::as_str).collect()
    }
}
