//! Request types accepted by [`Fetcher`](super::Fetcher)

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use std::borrow::Cow;
use url::Url;

/// First argument of a fetch call
#[derive(Debug, Clone)]
pub enum FetchInput {
    /// Plain URL text
    Text(String),
    /// Prepared request; its `url` is what gets fetched
    Request(RequestDescriptor),
    /// Parsed URL, stringified when a URL is needed
    Url(Url),
}

impl FetchInput {
    /// The URL this input resolves to
    pub fn resolved_url(&self) -> Cow<'_, str> {
        match self {
            Self::Text(url) => Cow::Borrowed(url),
            Self::Request(descriptor) => Cow::Borrowed(&descriptor.url),
            Self::Url(url) => Cow::Owned(url.to_string()),
        }
    }
}

impl From<&str> for FetchInput {
    fn from(url: &str) -> Self {
        Self::Text(url.to_string())
    }
}

impl From<String> for FetchInput {
    fn from(url: String) -> Self {
        Self::Text(url)
    }
}

impl From<Url> for FetchInput {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

impl From<RequestDescriptor> for FetchInput {
    fn from(descriptor: RequestDescriptor) -> Self {
        Self::Request(descriptor)
    }
}

/// A request value carrying its own URL, method and headers
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub headers: HeaderMap,
}

impl RequestDescriptor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::GET,
            headers: HeaderMap::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}

/// Request body
#[derive(Debug, Clone)]
pub enum RequestBody {
    Text(String),
    Bytes(Bytes),
}

impl RequestBody {
    /// Textual content, if this is a text body
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bytes(_) => None,
        }
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(Bytes::from(bytes))
    }
}

/// Options for a fetch call (second argument)
#[derive(Debug, Clone, Default)]
pub struct RequestInit {
    /// Overrides the descriptor's method; GET when neither is set
    pub method: Option<Method>,
    /// Merged over the descriptor's headers
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

impl RequestInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }
}
