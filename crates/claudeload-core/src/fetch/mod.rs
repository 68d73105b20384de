//! Fetch capability
//!
//! A single async entry point for outbound requests. The process holds one
//! swappable binding ([`FetchSlot`]); decorators such as the interceptor wrap
//! whatever fetcher is currently installed.

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod slot;

pub use client::HttpFetcher;
pub use error::{BodyError, FetchError};
pub use request::{FetchInput, RequestBody, RequestDescriptor, RequestInit};
pub use response::{BodyStream, Response};
pub use slot::FetchSlot;

use async_trait::async_trait;

/// Anything that can perform a fetch
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, input: FetchInput, init: RequestInit) -> Result<Response, FetchError>;
}
