//! `claudeload plugin` subcommands

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use claudeload_core::extensions::{discover_plugins, PluginManifest, PLUGIN_SUFFIX};
use claudeload_core::ExtensionRegistry;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum PluginAction {
    /// List installed plugins in load order.
    List,
    /// Install a plugin manifest.
    Add { file: PathBuf },
    /// Remove an installed plugin.
    Remove { name: String },
}

pub fn handle(action: PluginAction, dir: &Path) -> Result<()> {
    match action {
        PluginAction::List => {
            if !dir.is_dir() {
                println!("[*] Plugin directory does not exist: {}", dir.display());
                return Ok(());
            }
            let plugins = list(dir);
            if plugins.is_empty() {
                println!("[*] No plugins installed in {}", dir.display());
                return Ok(());
            }
            println!("[*] Plugins in {}:", dir.display());
            for name in plugins {
                println!("    {name}");
            }
            Ok(())
        }
        PluginAction::Add { file } => {
            let installed = add(dir, &file)?;
            println!("[*] Installed plugin: {}", installed.display());
            Ok(())
        }
        PluginAction::Remove { name } => {
            let removed = remove(dir, &name)?;
            println!("[*] Removed plugin: {removed}");
            Ok(())
        }
    }
}

/// Installed plugin file names in load order
fn list(dir: &Path) -> Vec<String> {
    discover_plugins(dir)
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

/// Copy a validated manifest into the plugin directory
fn add(dir: &Path, src: &Path) -> Result<PathBuf> {
    let Some(file_name) = src
        .file_name()
        .filter(|n| n.to_string_lossy().ends_with(PLUGIN_SUFFIX))
    else {
        bail!("Plugin file must have a {PLUGIN_SUFFIX} extension.");
    };

    let text =
        fs::read_to_string(src).with_context(|| format!("failed to read {}", src.display()))?;
    let manifest = PluginManifest::parse(&text)?;
    let entry = manifest.resolve_entry(src)?;
    let registry = ExtensionRegistry::builtin();
    if registry.get(&entry).is_none() {
        bail!(
            "unknown extension entry {entry:?} (available: {})",
            registry.entries().join(", ")
        );
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create plugin directory {}", dir.display()))?;
    let dst = dir.join(file_name);
    fs::write(&dst, text).with_context(|| format!("failed to install plugin {}", dst.display()))?;
    Ok(dst)
}

/// Delete an installed plugin by name, suffix optional
fn remove(dir: &Path, name: &str) -> Result<String> {
    let mut name = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("invalid plugin name: {name}"))?;
    if !name.ends_with(PLUGIN_SUFFIX) {
        name.push_str(PLUGIN_SUFFIX);
    }

    match fs::remove_file(dir.join(&name)) {
        Ok(()) => Ok(name),
        Err(e) if e.kind() == ErrorKind::NotFound => bail!("Plugin not found: {name}"),
        Err(e) => Err(e).with_context(|| format!("failed to remove plugin {name}")),
    }
}
