//! Client configuration.
//!
//! A [`ClientConfig`] is assembled once, either in code through the `with_*`
//! builders or by deserializing a JSON document, and is immutable once a
//! [`PaycomClient`](crate::PaycomClient) has been built from it.
//!
//! ```json
//! {
//!   "merchant_id": "5e730e8e0b852a417aa49ceb",
//!   "merchant_key": "$PAYCOM_KEY",
//!   "test_mode": true,
//!   "requisite_name": "order_id",
//!   "timeout_secs": 15
//! }
//! ```
//!
//! String fields accept `$VAR` / `${VAR}` references, resolved while deserializing.

use paycom_types::account::{Account, RequisiteName};
use paycom_types::config::{LiteralOrEnv, PRODUCTION_ENDPOINT, TEST_ENDPOINT};
use serde::Deserialize;
use std::fmt::{Debug, Formatter};
use std::time::Duration;
use url::Url;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Merchant credentials and call defaults.
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(deserialize_with = "env::resolve")]
    merchant_id: String,
    #[serde(deserialize_with = "env::resolve")]
    merchant_key: String,
    #[serde(default)]
    test_mode: bool,
    #[serde(default)]
    requisite_name: RequisiteName,
    #[serde(
        rename = "timeout_secs",
        default = "config_defaults::default_timeout",
        deserialize_with = "config_defaults::timeout_from_secs"
    )]
    timeout: Duration,
    #[serde(default, deserialize_with = "env::resolve_optional")]
    base_url: Option<Url>,
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Merchant id must not be empty")]
    EmptyMerchantId,
    #[error("Merchant key must not be empty")]
    EmptyMerchantKey,
    #[error("Merchant credentials contain characters not allowed in an HTTP header")]
    InvalidCredentials,
    #[error("Invalid gateway URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
}

impl ClientConfig {
    pub fn new(merchant_id: impl Into<String>, merchant_key: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            merchant_key: merchant_key.into(),
            test_mode: false,
            requisite_name: RequisiteName::default(),
            timeout: DEFAULT_TIMEOUT,
            base_url: None,
        }
    }

    /// Targets the test gateway unless a base URL override is set.
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_requisite_name(mut self, requisite_name: RequisiteName) -> Self {
        self.requisite_name = requisite_name;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the gateway endpoint regardless of test mode.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Parses and sets the gateway endpoint override.
    pub fn try_with_base_url(self, base_url: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(self.with_base_url(url))
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn merchant_key(&self) -> &str {
        &self.merchant_key
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn requisite_name(&self) -> RequisiteName {
        self.requisite_name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Starts an `account` parameter keyed by the configured requisite.
    pub fn account(&self, value: impl Into<String>) -> Account {
        self.requisite_name.account(value)
    }

    /// The endpoint every call is posted to: the override if set, otherwise the
    /// test or production gateway.
    pub fn endpoint(&self) -> Result<Url, ConfigError> {
        if let Some(url) = &self.base_url {
            return Ok(url.clone());
        }
        let url = if self.test_mode {
            TEST_ENDPOINT
        } else {
            PRODUCTION_ENDPOINT
        };
        Url::parse(url).map_err(|source| ConfigError::InvalidBaseUrl {
            url: url.to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.merchant_id.is_empty() {
            return Err(ConfigError::EmptyMerchantId);
        }
        if self.merchant_key.is_empty() {
            return Err(ConfigError::EmptyMerchantKey);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

impl Debug for ClientConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("merchant_id", &self.merchant_id)
            .field("merchant_key", &"<redacted>")
            .field("test_mode", &self.test_mode)
            .field("requisite_name", &self.requisite_name)
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish()
    }
}

mod env {
    use super::*;
    use serde::Deserializer;
    use std::str::FromStr;

    pub fn resolve<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        LiteralOrEnv::<T>::deserialize(deserializer).map(LiteralOrEnv::into_inner)
    }

    pub fn resolve_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Option::<LiteralOrEnv<T>>::deserialize(deserializer)
            .map(|value| value.map(LiteralOrEnv::into_inner))
    }
}

mod config_defaults {
    use super::*;
    use serde::Deserializer;

    pub fn default_timeout() -> Duration {
        DEFAULT_TIMEOUT
    }

    pub fn timeout_from_secs<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
