//! Intercepting fetch decorator
//!
//! Observed calls are logged before they are dispatched; their responses are
//! teed and the copy is logged by a detached task while the caller gets the
//! other half untouched.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::debug;

use super::log::{truncate_chars, InterceptLog, LogTag};
use super::{is_observed, MAX_LOGGED_CHARS, NON_STRING_BODY};
use crate::fetch::{FetchError, FetchInput, Fetcher, RequestBody, RequestInit, Response};

/// Wraps another fetcher and logs matching traffic
pub struct InterceptingFetcher {
    inner: Arc<dyn Fetcher>,
    log: InterceptLog,
    tasks: TaskTracker,
}

impl InterceptingFetcher {
    /// `tasks` receives the background readers that log response bodies
    pub fn new(inner: Arc<dyn Fetcher>, log: InterceptLog, tasks: TaskTracker) -> Self {
        Self { inner, log, tasks }
    }

    fn log_request(&self, url: &str, init: &RequestInit) {
        self.log.append(LogTag::Request, [url]);

        match &init.body {
            Some(RequestBody::Text(text)) if !text.is_empty() => {
                self.log
                    .append(LogTag::Body, [truncate_chars(text, MAX_LOGGED_CHARS)]);
            }
            Some(RequestBody::Bytes(_)) => {
                self.log.append(LogTag::Body, [NON_STRING_BODY]);
            }
            _ => {}
        }
    }

    fn observe(&self, response: Response) {
        let log = self.log.clone();
        if response.is_event_stream() {
            self.tasks.spawn(log_stream(response, log));
        } else {
            self.tasks.spawn(log_body(response, log));
        }
    }
}

#[async_trait]
impl Fetcher for InterceptingFetcher {
    async fn fetch(&self, input: FetchInput, init: RequestInit) -> Result<Response, FetchError> {
        let url = input.resolved_url().into_owned();
        if !is_observed(&url) {
            return self.inner.fetch(input, init).await;
        }

        self.log_request(&url, &init);

        let response = self.inner.fetch(input, init).await?;
        let (caller, observed) = response.tee();
        self.observe(observed);
        Ok(caller)
    }
}

/// Log each chunk of a streamed body as it arrives
async fn log_stream(mut response: Response, log: InterceptLog) {
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                log.append(LogTag::StreamChunk, [String::from_utf8_lossy(&chunk)]);
            }
            Ok(None) => break,
            Err(e) => {
                log.append(LogTag::StreamError, [e.message()]);
                break;
            }
        }
    }
}

/// Log a buffered body once it has been read in full
async fn log_body(response: Response, log: InterceptLog) {
    match response.text().await {
        Ok(text) => log.append(LogTag::Response, [truncate_chars(&text, MAX_LOGGED_CHARS)]),
        Err(e) => debug!("Dropping unreadable intercepted response body: {}", e),
    }
}
