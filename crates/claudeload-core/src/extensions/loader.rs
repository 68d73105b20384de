//! Plugin discovery and best-effort loading
//!
//! Nothing here fails the host: a missing directory is a no-op and every
//! broken plugin is logged and skipped.

use anyhow::{anyhow, Context, Result};
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::manifest::PluginManifest;
use super::registry::ExtensionRegistry;
use super::types::{HostEnv, Plugin};

/// File name suffix of plugin files
pub const PLUGIN_SUFFIX: &str = ".toml";

/// Serializes tests that swap the process panic hook
#[cfg(test)]
pub(crate) static PANIC_HOOK_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

/// Plugin files directly inside `dir`, sorted by file name
///
/// Subdirectories are skipped, not descended into. An unreadable or missing
/// directory yields no plugins.
pub fn discover_plugins(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };

    let mut plugins: Vec<(String, PathBuf)> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .filter_map(|e| {
            let name = e.file_name().into_string().ok()?;
            name.ends_with(PLUGIN_SUFFIX).then(|| (name, e.path()))
        })
        .collect();

    plugins.sort_by(|a, b| a.0.cmp(&b.0));
    plugins.into_iter().map(|(_, path)| path).collect()
}

/// Run every plugin in `dir` once, in ascending file name order
pub fn load_plugins(dir: &Path, registry: &ExtensionRegistry, env: &HostEnv) {
    if !dir.is_dir() {
        debug!("No plugin directory at {}", dir.display());
        return;
    }

    let plugins = discover_plugins(dir);
    info!("Loading {} plugin(s) from {}", plugins.len(), dir.display());

    with_quiet_panics(|| {
        for path in &plugins {
            match run_plugin(path, registry, env) {
                Ok(()) => info!("Loaded plugin: {}", path.display()),
                Err(e) => warn!("Skipping plugin {}: {:#}", path.display(), e),
            }
        }
    });
}

/// Run `f` with the process panic hook replaced by one that only traces
///
/// Plugin panics are caught by `run_plugin`; this keeps the default hook from
/// printing them to stderr first. `f` must not unwind, or the previous hook
/// is not restored.
fn with_quiet_panics<T>(f: impl FnOnce() -> T) -> T {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| debug!("Plugin panicked: {}", info)));
    let result = f();
    panic::set_hook(previous);
    result
}

fn run_plugin(path: &Path, registry: &ExtensionRegistry, env: &HostEnv) -> Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let manifest = PluginManifest::parse(&text)?;
    let entry = manifest.resolve_entry(path)?;
    let extension = registry
        .get(&entry)
        .with_context(|| format!("unknown extension entry: {entry}"))?;

    let plugin = Plugin {
        file_name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        manifest,
    };

    match panic::catch_unwind(AssertUnwindSafe(|| extension.install(env, &plugin))) {
        Ok(result) => result.with_context(|| format!("extension {entry} failed to install")),
        Err(payload) => Err(anyhow!(
            "extension {entry} panicked: {}",
            panic_message(&*payload)
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
