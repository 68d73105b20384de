//! Plugin manifest types
//!
//! A plugin file is a small TOML document naming the extension to run:
//!
//! ```toml
//! entry = "fetch-hook"
//! description = "Log Anthropic API traffic"
//! ```
//!
//! Both keys are optional; without `entry` the file stem is used, so an empty
//! `fetch-hook.toml` runs the fetch hook.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid plugin manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("plugin {0} has no entry and no usable file stem")]
    MissingEntry(String),
}

/// Contents of a plugin file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginManifest {
    /// Registry id of the extension to run
    #[serde(default)]
    pub entry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PluginManifest {
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(text)?)
    }

    /// Extension id to run for a plugin stored at `path`
    pub fn resolve_entry(&self, path: &Path) -> Result<String, ManifestError> {
        if let Some(entry) = self.entry.as_deref().filter(|e| !e.trim().is_empty()) {
            return Ok(entry.trim().to_string());
        }

        path.file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ManifestError::MissingEntry(path.display().to_string()))
    }
}
