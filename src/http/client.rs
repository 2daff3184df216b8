use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{header::USER_AGENT, Method, Request, Uri};
use http_body_util::{BodyExt, Empty};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time::timeout;

use super::{HttpResponse, HttpTransport};
use crate::error::{Error, Result};
use crate::utils::logging::log_timeout;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT_VALUE: &str = concat!("auto-timezone/", env!("CARGO_PKG_VERSION"));

type HyperClient = Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

/// HTTP/HTTPS transport on a pooled hyper client with rustls and webpki roots.
///
/// Every request, including reading the body, is bounded by the configured timeout.
#[derive(Clone)]
pub struct HyperTransport {
    client: HyperClient,
    timeout: Duration,
}

impl HyperTransport {
    /// Creates a transport with the given per-request timeout.
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let https = HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(rustls::crypto::ring::default_provider())
            .map_err(|e| Error::Network(format!("failed to configure TLS: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https);

        Ok(Self {
            client,
            timeout: request_timeout,
        })
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(&self, uri: Uri) -> Result<HttpResponse> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .body(Empty::<Bytes>::new())
            .map_err(|e| Error::Network(format!("failed to build request: {}", e)))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| Error::Network(describe_client_error(&e)))?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::Network(format!("failed to read response body: {}", e)))?
            .to_bytes();

        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for HyperTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let uri: Uri = url
            .parse()
            .map_err(|e| Error::Network(format!("invalid URL '{}': {}", url, e)))?;

        match timeout(self.timeout, self.send(uri)).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                log_timeout("HTTP GET", timeout_ms, Some(url));
                Err(Error::Network(format!(
                    "request to {} timed out after {}ms",
                    url, timeout_ms
                )))
            }
        }
    }
}

/// Flattens the error chain; the legacy client's top-level message alone is
/// just "client error (Connect)".
fn describe_client_error(error: &hyper_util::client::legacy::Error) -> String {
    let mut message = error.to_string();
    let mut source = StdError::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = StdError::source(cause);
    }
    message
}
