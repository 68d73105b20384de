//! Network interceptor
//!
//! Logs Anthropic API traffic that goes through the process-wide fetch slot.

pub mod fetcher;
pub mod hook;
pub mod log;

pub use fetcher::InterceptingFetcher;
pub use hook::FetchHook;
pub use log::{InterceptLog, LogTag};

/// Calls whose URL contains this are logged
pub const TARGET_DOMAIN: &str = "anthropic.com";

/// URLs containing this are never logged
pub const EXCLUDED_MARKER: &str = "data:";

/// Cap for logged request and buffered response bodies, in characters
pub const MAX_LOGGED_CHARS: usize = 2000;

/// Logged in place of bodies that are not text
pub const NON_STRING_BODY: &str = "(non-string)";

/// Whether a call to `url` is logged
pub fn is_observed(url: &str) -> bool {
    url.contains(TARGET_DOMAIN) && !url.contains(EXCLUDED_MARKER)
}
