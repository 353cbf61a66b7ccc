//! The request/response pipeline shared by every gateway method.
//!
//! [`PaycomClient::send`] is the single path to the gateway:
//!
//! 1. pick the call's timeout (per-call override, else the configured default),
//! 2. serialize the `{id, method, params}` envelope,
//! 3. set `X-Auth` for the requested [`AuthMode`],
//! 4. post through the [`Transport`] under the timeout,
//! 5. decode the response envelope,
//! 6. turn a gateway `error` into a typed [`GatewayError`].
//!
//! Nothing is retried. [`PaycomClient::call`] layers the per-method types of
//! [`paycom_types::proto::receipts`] on top, adding local validation and typed
//! decoding of `result`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use paycom_rs::{ClientConfig, PaycomClient};
//!
//! # async fn example() -> Result<(), paycom_rs::PaycomError> {
//! let config = ClientConfig::new("merchant-id", "merchant-key").with_test_mode(true);
//! let client = PaycomClient::new(config)?;
//! let state = client.receipt_state("5e730e8e0b852a417aa49ceb").await?;
//! println!("{state:?}");
//! # Ok(())
//! # }
//! ```

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue};
use paycom_types::error_code::GatewayErrorKind;
use paycom_types::proto::{AuthMode, GatewayMethod, RpcRequest, RpcResponse, generate_request_id};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::config::{ClientConfig, ConfigError};
use crate::error::{GatewayError, PaycomError};
use crate::transport::{ReqwestTransport, Transport, TransportError, TransportRequest};

/// Header carrying merchant credentials.
pub const X_AUTH: HeaderName = HeaderName::from_static("x-auth");

/// Immutable per-client state, shared by all clones.
struct ClientInner {
    config: ClientConfig,
    endpoint: Url,
    /// `X-Auth: <merchant id>`
    id_auth: HeaderValue,
    /// `X-Auth: <merchant id>:<merchant key>`
    key_auth: HeaderValue,
}

/// A client for the Paycom receipts API.
///
/// Cheap to clone and safe to share between tasks: it holds only immutable
/// configuration and the transport.
pub struct PaycomClient<T = ReqwestTransport> {
    inner: Arc<ClientInner>,
    transport: T,
}

impl<T: Clone> Clone for PaycomClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            transport: self.transport.clone(),
        }
    }
}

impl<T> std::fmt::Debug for PaycomClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaycomClient")
            .field("config", &self.inner.config)
            .field("endpoint", &self.inner.endpoint.as_str())
            .finish()
    }
}

impl PaycomClient<ReqwestTransport> {
    /// Builds a client that talks to the gateway through reqwest.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T> PaycomClient<T> {
    /// Builds a client over a caller-supplied transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let endpoint = config.endpoint()?;
        let id_auth = HeaderValue::from_str(config.merchant_id())
            .map_err(|_| ConfigError::InvalidCredentials)?;
        let mut key_auth =
            HeaderValue::from_str(&format!("{}:{}", config.merchant_id(), config.merchant_key()))
                .map_err(|_| ConfigError::InvalidCredentials)?;
        key_auth.set_sensitive(true);
        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                endpoint,
                id_auth,
                key_auth,
            }),
            transport,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The URL every call is posted to.
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn auth_header(&self, auth: AuthMode) -> HeaderValue {
        match auth {
            AuthMode::MerchantId => self.inner.id_auth.clone(),
            AuthMode::MerchantIdAndKey => self.inner.key_auth.clone(),
        }
    }
}

impl<T: Transport> PaycomClient<T> {
    /// Sends one envelope and decodes the reply.
    ///
    /// `timeout` overrides the configured default for this call only. A reply
    /// without an `error` member (or with error code `0`) is a success whatever
    /// the HTTP status was.
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "paycom.client.send",
            skip_all,
            fields(
                method = %method,
                request_id = %request_id,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            ),
            err
        )
    )]
    pub async fn send<P>(
        &self,
        request_id: &str,
        method: &str,
        params: &P,
        auth: AuthMode,
        timeout: Option<Duration>,
    ) -> Result<RpcResponse, PaycomError>
    where
        P: Serialize + ?Sized,
    {
        let timeout = timeout.unwrap_or_else(|| self.inner.config.timeout());
        let result = self
            .send_inner(request_id, method, params, auth, timeout)
            .await;
        record_result_on_span(&result);
        result
    }

    async fn send_inner<P>(
        &self,
        request_id: &str,
        method: &str,
        params: &P,
        auth: AuthMode,
        timeout: Duration,
    ) -> Result<RpcResponse, PaycomError>
    where
        P: Serialize + ?Sized,
    {
        let envelope = RpcRequest {
            id: request_id,
            method,
            params,
        };
        let body = serde_json::to_vec(&envelope).map_err(PaycomError::Serialization)?;

        let mut headers = HeaderMap::new();
        headers.insert(X_AUTH, self.auth_header(auth));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let request = TransportRequest {
            url: self.inner.endpoint.clone(),
            headers,
            body,
            timeout,
        };

        tracing::debug!(method, request_id, ?timeout, "Sending request to Paycom");

        let response = match tokio::time::timeout(timeout, self.transport.post(request)).await {
            Err(_elapsed) => return Err(PaycomError::Timeout { after: timeout }),
            Ok(Err(TransportError::Timeout)) => return Err(PaycomError::Timeout { after: timeout }),
            Ok(Err(source)) => return Err(PaycomError::Transport { source }),
            Ok(Ok(response)) => response,
        };

        let envelope: RpcResponse =
            serde_json::from_slice(&response.body).map_err(|source| PaycomError::Decode {
                source,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            })?;

        if let Some(detail) = &envelope.error {
            if let Some(kind) = GatewayErrorKind::from_code(detail.code) {
                tracing::warn!(
                    method,
                    request_id,
                    status = %response.status,
                    code = detail.code,
                    message = %detail.message,
                    "Paycom returned an error"
                );
                return Err(GatewayError {
                    kind,
                    method: method.to_string(),
                    request_id: request_id.to_string(),
                    detail: detail.clone(),
                }
                .into());
            }
        }

        Ok(envelope)
    }

    /// Calls a gateway method with a generated correlation id and the default timeout.
    pub async fn call<M: GatewayMethod>(&self, params: &M) -> Result<M::Output, PaycomError> {
        let request_id = generate_request_id(M::REQUEST_PREFIX);
        self.call_with(&request_id, params, None).await
    }

    /// Calls a gateway method with an explicit correlation id and optional timeout override.
    ///
    /// Parameters are validated locally first; an absent `result` yields the
    /// output type's default value.
    pub async fn call_with<M: GatewayMethod>(
        &self,
        request_id: &str,
        params: &M,
        timeout: Option<Duration>,
    ) -> Result<M::Output, PaycomError> {
        params.validate()?;
        let envelope = self
            .send(request_id, M::METHOD, params, M::AUTH, timeout)
            .await?;
        decode_result(envelope.result)
    }
}

/// Decodes an envelope's `result`, treating an absent or `null` result as the default value.
fn decode_result<R>(result: Option<Value>) -> Result<R, PaycomError>
where
    R: DeserializeOwned + Default,
{
    match result {
        None | Some(Value::Null) => Ok(R::default()),
        Some(value) => {
            let body = value.to_string();
            serde_json::from_value(value).map_err(|source| PaycomError::Decode { source, body })
        }
    }
}

/// Records the outcome of a request on a tracing span, including status and errors.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
        }
    }
}

/// Records the outcome of a request on a tracing span, including status and errors.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}
