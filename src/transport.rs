//! The HTTP exchange underneath every gateway call.
//!
//! [`Transport`] is the narrow seam between the request pipeline and the network:
//! it takes a URL, headers, a body and a deadline and hands back a status and a
//! body. [`ReqwestTransport`] is the default implementation; tests and callers
//! with their own HTTP stack can plug in anything else.

use http::{HeaderMap, StatusCode};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A single outbound POST.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Deadline for the whole exchange, including reading the body.
    pub timeout: Duration,
}

/// What came back, whatever the status.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Errors surfaced by a [`Transport`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request deadline exceeded")]
    Timeout,
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Executes HTTP POST exchanges for the client.
///
/// Implementations must give up once `request.timeout` has elapsed and report
/// that as [`TransportError::Timeout`].
pub trait Transport: Send + Sync {
    fn post(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn post(
        &self,
        request: TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        self.as_ref().post(request)
    }
}

/// [`Transport`] backed by a shared [`reqwest::Client`].
///
/// Connection pooling and TLS are left entirely to reqwest.
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client, e.g. one with a proxy or custom root certificates.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Http(Box::new(error))
        }
    }
}

impl Transport for ReqwestTransport {
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(request.url)
            .headers(request.headers)
            .body(request.body)
            .timeout(request.timeout)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}
