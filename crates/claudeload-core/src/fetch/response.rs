//! Fetch responses with a single-pass body stream

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use std::fmt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::error::BodyError;

/// Body chunks as they arrive
pub type BodyStream = BoxStream<'static, Result<Bytes, BodyError>>;

const EVENT_STREAM: &str = "text/event-stream";

/// A response whose body can be read exactly once
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: BodyStream,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: BodyStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Response with the whole body available as one chunk
    pub fn from_bytes(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self::from_chunks(status, headers, vec![Ok(body)])
    }

    /// Response delivering the given chunks in order
    pub fn from_chunks(
        status: StatusCode,
        headers: HeaderMap,
        chunks: Vec<Result<Bytes, BodyError>>,
    ) -> Self {
        Self::new(status, headers, stream::iter(chunks).boxed())
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of the content-type header, empty when absent or not text
    pub fn content_type(&self) -> &str {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    }

    /// Whether the body is delivered as a server-sent event stream
    pub fn is_event_stream(&self) -> bool {
        self.content_type().contains(EVENT_STREAM)
    }

    /// Next body chunk, `None` once the body is exhausted
    pub async fn chunk(&mut self) -> Result<Option<Bytes>, BodyError> {
        self.body.next().await.transpose()
    }

    /// Read the remaining body
    pub async fn bytes(mut self) -> Result<Bytes, BodyError> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.chunk().await? {
            buf.extend_from_slice(&chunk);
        }
        Ok(buf.freeze())
    }

    /// Read the remaining body as text, replacing invalid UTF-8
    pub async fn text(self) -> Result<String, BodyError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn into_body(self) -> BodyStream {
        self.body
    }

    /// Split into two responses that each see the full body.
    ///
    /// A pump task drains the source body into two unbounded channels, so
    /// a slow, dropped, or failing reader never holds up the other one. An
    /// upstream error is delivered to both readers and ends both bodies.
    /// Must be called inside a Tokio runtime.
    pub fn tee(self) -> (Response, Response) {
        let (left_tx, left_rx) = mpsc::unbounded_channel();
        let (right_tx, right_rx) = mpsc::unbounded_channel();
        let mut body = self.body;

        tokio::spawn(async move {
            while let Some(item) = body.next().await {
                let failed = item.is_err();
                let left_open = left_tx.send(item.clone()).is_ok();
                let right_open = right_tx.send(item).is_ok();
                if failed || (!left_open && !right_open) {
                    break;
                }
            }
        });

        let left = Response::new(
            self.status,
            self.headers.clone(),
            UnboundedReceiverStream::new(left_rx).boxed(),
        );
        let right = Response::new(
            self.status,
            self.headers,
            UnboundedReceiverStream::new(right_rx).boxed(),
        );
        (left, right)
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
