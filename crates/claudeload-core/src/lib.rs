//! Core library for claudeload
//!
//! - Startup plugin discovery and best-effort loading
//! - Swappable process-wide fetch capability
//! - Network interceptor extension with its append-only log

pub mod extensions;
pub mod fetch;
pub mod intercept;
pub mod paths;

pub use extensions::{load_plugins, Extension, ExtensionRegistry, HostEnv, Plugin};
pub use fetch::{FetchError, FetchInput, FetchSlot, Fetcher, RequestInit, Response};
