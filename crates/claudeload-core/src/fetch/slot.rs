//! The process-wide fetch binding
//!
//! Extensions replace the installed fetcher (usually by wrapping it); every
//! subsequent call through the slot reaches the newest fetcher.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

use super::client::HttpFetcher;
use super::error::FetchError;
use super::request::{FetchInput, RequestInit};
use super::response::Response;
use super::Fetcher;

static GLOBAL: Lazy<FetchSlot> = Lazy::new(|| FetchSlot::new(Arc::new(HttpFetcher::default())));

/// A swappable, shared fetcher binding
#[derive(Clone)]
pub struct FetchSlot {
    current: Arc<RwLock<Arc<dyn Fetcher>>>,
}

impl FetchSlot {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            current: Arc::new(RwLock::new(fetcher)),
        }
    }

    /// The slot used by the whole process, initially a plain [`HttpFetcher`]
    pub fn global() -> &'static FetchSlot {
        &GLOBAL
    }

    /// Fetcher currently bound
    pub fn current(&self) -> Arc<dyn Fetcher> {
        self.current.read().clone()
    }

    /// Bind a new fetcher, returning the previous one
    pub fn replace(&self, fetcher: Arc<dyn Fetcher>) -> Arc<dyn Fetcher> {
        std::mem::replace(&mut *self.current.write(), fetcher)
    }

    /// Replace the bound fetcher with a decorator built around it.
    ///
    /// Read and swap happen under one write lock, so concurrent wraps nest
    /// instead of losing each other. Wrapping twice nests twice.
    pub fn wrap<F>(&self, decorate: F)
    where
        F: FnOnce(Arc<dyn Fetcher>) -> Arc<dyn Fetcher>,
    {
        let mut current = self.current.write();
        let inner = current.clone();
        *current = decorate(inner);
    }

    /// Fetch through whatever is currently bound
    pub async fn fetch(
        &self,
        input: impl Into<FetchInput>,
        init: RequestInit,
    ) -> Result<Response, FetchError> {
        let fetcher = self.current();
        fetcher.fetch(input.into(), init).await
    }
}
