//! Startup extension system
//!
//! Plugin manifests in the plugin directory name built-in extensions; the
//! loader runs each one once, in file name order, isolating failures.

pub mod loader;
pub mod manifest;
pub mod registry;
pub mod types;

pub use loader::{discover_plugins, load_plugins, PLUGIN_SUFFIX};
pub use manifest::{ManifestError, PluginManifest};
pub use registry::ExtensionRegistry;
pub use types::{Extension, HostEnv, Plugin};
