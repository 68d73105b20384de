//! Extension types

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio_util::task::TaskTracker;

use super::manifest::PluginManifest;
use crate::fetch::FetchSlot;

/// Ambient capabilities handed to every extension
#[derive(Clone)]
pub struct HostEnv {
    exe_dir: PathBuf,
    fetch: FetchSlot,
    tasks: TaskTracker,
}

impl HostEnv {
    pub fn new(exe_dir: impl Into<PathBuf>, fetch: FetchSlot) -> Self {
        Self {
            exe_dir: exe_dir.into(),
            fetch,
            tasks: TaskTracker::new(),
        }
    }

    /// Directory containing the host executable
    pub fn exe_dir(&self) -> &Path {
        &self.exe_dir
    }

    /// The fetch binding extensions may wrap or replace
    pub fn fetch(&self) -> &FetchSlot {
        &self.fetch
    }

    /// Detached background work spawned by extensions
    pub fn tasks(&self) -> &TaskTracker {
        &self.tasks
    }

    /// Wait for all background work spawned so far.
    ///
    /// Tasks spawned afterwards are still tracked.
    pub async fn drain(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}

/// A plugin file selected by the loader
#[derive(Debug, Clone)]
pub struct Plugin {
    /// File name inside the plugin directory
    pub file_name: String,
    pub manifest: PluginManifest,
}

/// Code that runs once at startup with full access to the host environment
pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    fn install(&self, env: &HostEnv, plugin: &Plugin) -> Result<()>;
}
