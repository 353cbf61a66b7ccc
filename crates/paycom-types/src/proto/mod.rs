//! Wire envelopes exchanged with the gateway.
//!
//! Every call is a single HTTP POST whose body is a JSON-RPC-like envelope:
//!
//! ```json
//! { "id": "ReceiptsCheck:1700000000000000000", "method": "receipts.check", "params": { "id": "..." } }
//! ```
//!
//! and whose response carries either a `result` or an `error`:
//!
//! ```json
//! { "jsonrpc": "2.0", "id": "...", "error": { "code": -31401, "message": "receipt not found" } }
//! ```
//!
//! Per-method parameter types live in [`receipts`]; each implements
//! [`GatewayMethod`], which ties the parameters to the method name, the
//! authentication mode and the typed result.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::SystemTime;

use crate::de;
use crate::error_code::GatewayErrorKind;
use crate::validation::ValidationError;

pub mod receipts;

/// How the `X-Auth` header is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// `X-Auth: <merchant id>`; used by the cards family of methods.
    MerchantId,
    /// `X-Auth: <merchant id>:<merchant key>`; used by the receipts family.
    MerchantIdAndKey,
}

/// A gateway method: its parameters, name, auth mode and result type.
pub trait GatewayMethod: Serialize {
    /// Method name on the wire, e.g. `receipts.create`.
    const METHOD: &'static str;
    /// Prefix of generated correlation ids, e.g. `ReceiptsCreate`.
    const REQUEST_PREFIX: &'static str;
    const AUTH: AuthMode = AuthMode::MerchantIdAndKey;

    /// Typed `result`. An absent `result` decodes to `Default::default()`.
    type Output: DeserializeOwned + Default;

    /// Local checks run before the request is sent.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Outbound envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a, P: ?Sized> {
    pub id: &'a str,
    pub method: &'a str,
    pub params: &'a P,
}

/// Inbound envelope.
///
/// At most one of `result` and `error` is set; neither is a legal empty success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub jsonrpc: String,
    #[serde(default, deserialize_with = "de::text_or_json")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail>,
}

impl RpcResponse {
    /// The gateway-reported failure, if the envelope carries one with a non-zero code.
    pub fn error_kind(&self) -> Option<GatewayErrorKind> {
        self.error
            .as_ref()
            .and_then(|e| GatewayErrorKind::from_code(e.code))
    }
}

/// The `error` member of an inbound envelope.
///
/// Only `code` drives behaviour. `message` arrives either as a string or as a
/// localized object (`{"ru": ..., "uz": ..., "en": ...}`); the latter is kept as
/// raw JSON text. `data` is kept as text the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default, deserialize_with = "de::text_or_json")]
    pub message: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub code: i64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de::optional_text_or_json"
    )]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// Correlation id of the form `<prefix>:<unix nanos>`.
///
/// It only correlates a request with its response; reusing it does not make a
/// call idempotent.
pub fn generate_request_id(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{prefix}:{nanos}")
}
