//! The `fetch-hook` extension

use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tracing::info;

use super::fetcher::InterceptingFetcher;
use super::log::{InterceptLog, LogTag};
use crate::extensions::{Extension, HostEnv, Plugin};
use crate::paths;

/// Installs [`InterceptingFetcher`] around the host's fetch slot.
///
/// Every install wraps again; loading the hook twice logs each call twice.
pub struct FetchHook;

impl FetchHook {
    pub const ENTRY: &'static str = "fetch-hook";
}

impl Extension for FetchHook {
    fn name(&self) -> &str {
        Self::ENTRY
    }

    fn install(&self, env: &HostEnv, plugin: &Plugin) -> Result<()> {
        let log = InterceptLog::shared(paths::intercept_log_path(env.exe_dir()));

        // Written before the wrapper is visible so it precedes any call entries
        log.append(
            LogTag::PayloadLoaded,
            [Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)],
        );

        let tasks = env.tasks().clone();
        let hook_log = log.clone();
        env.fetch().wrap(move |inner| {
            Arc::new(InterceptingFetcher::new(inner, hook_log, tasks))
        });

        info!(
            "Fetch hook from {} logging to {}",
            plugin.file_name,
            log.path().display()
        );
        Ok(())
    }
}
