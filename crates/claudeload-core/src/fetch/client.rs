//! Base fetcher backed by reqwest

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use reqwest::Method;
use tracing::debug;
use url::Url;

use super::error::{BodyError, FetchError};
use super::request::{FetchInput, RequestBody, RequestInit};
use super::response::Response;
use super::Fetcher;

/// Performs real network requests
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, input: FetchInput, init: RequestInit) -> Result<Response, FetchError> {
        let (raw_url, base_method, mut headers) = match input {
            FetchInput::Request(descriptor) => {
                (descriptor.url, descriptor.method, descriptor.headers)
            }
            other => (other.resolved_url().into_owned(), Method::GET, HeaderMap::new()),
        };

        let url = Url::parse(&raw_url).map_err(|e| FetchError::InvalidUrl {
            url: raw_url.clone(),
            reason: e.to_string(),
        })?;
        let method = init.method.unwrap_or(base_method);
        headers.extend(init.headers);

        debug!("fetch {} {}", method, url);

        let mut request = self.client.request(method, url).headers(headers);
        request = match init.body {
            Some(RequestBody::Text(text)) => request.body(text),
            Some(RequestBody::Bytes(bytes)) => request.body(bytes),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        debug!("fetch response: status={}", status);

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(BodyError::from))
            .boxed();
        Ok(Response::new(status, headers, body))
    }
}
