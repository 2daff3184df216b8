//! HTTP transport used by the resolver.
//!
//! The resolver only needs "GET this URL, give me the status and the body".
//! [`HyperTransport`] is the production implementation; tests substitute their own.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Hyper-based client transport
pub mod client;

pub use client::HyperTransport;

/// Status and full body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, read to the end.
    pub body: Bytes,
}

impl HttpResponse {
    /// Builds a response from a status code and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single GET request.
///
/// Implementations report transport failures (DNS, connect, TLS, timeout,
/// body read) as [`crate::Error::Network`]. Non-2xx responses are returned as
/// normal responses; interpreting the status is up to the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Fetches `url` and reads the whole response body.
    async fn get(&self, url: &str) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url).await
    }
}
