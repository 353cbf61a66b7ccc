//! Configuration helpers shared by the client and the CLI.
//!
//! # Environment Variable Resolution
//!
//! The [`LiteralOrEnv`] wrapper lets a configuration value be written either
//! literally or as a reference to an environment variable, which keeps merchant
//! keys out of configuration files:
//!
//! ```json
//! {
//!   "merchant_id": "5e730e8e0b852a417aa49ceb",   // Literal value
//!   "merchant_key": "$PAYCOM_KEY",               // Simple env var
//!   "base_url": "${PAYCOM_BASE_URL}"             // Braced env var
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::str::FromStr;

/// Gateway endpoint used when test mode is on.
pub const TEST_ENDPOINT: &str = "https://checkout.test.paycom.uz/api";
/// Gateway endpoint used in production.
pub const PRODUCTION_ENDPOINT: &str = "https://checkout.paycom.uz/api";

/// A transparent wrapper that resolves environment variables during deserialization.
///
/// Supports both literal values and environment variable references:
/// - Literal: `"https://checkout.paycom.uz/api"`
/// - Simple env var: `"$PAYCOM_KEY"`
/// - Braced env var: `"${PAYCOM_KEY}"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralOrEnv<T>(T);

impl<T> LiteralOrEnv<T> {
    pub fn from_literal(value: T) -> Self {
        Self(value)
    }

    pub fn inner(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }

    /// Returns the variable name if the string matches `$VAR` or `${VAR}` syntax.
    fn parse_env_var_syntax(s: &str) -> Option<&str> {
        if let Some(name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
            Some(name)
        } else if let Some(name) = s.strip_prefix('$') {
            let valid = !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_');
            valid.then_some(name)
        } else {
            None
        }
    }
}

impl<T> Deref for LiteralOrEnv<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de, T> Deserialize<'de> for LiteralOrEnv<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        let value = match Self::parse_env_var_syntax(&s) {
            Some(var_name) => std::env::var(var_name).map_err(|_| {
                serde::de::Error::custom(format!(
                    "Environment variable '{}' not found (referenced as '{}')",
                    var_name, s
                ))
            })?,
            None => s,
        };

        let parsed = value
            .parse::<T>()
            .map_err(|e| serde::de::Error::custom(format!("Failed to parse value: {}", e)))?;

        Ok(LiteralOrEnv(parsed))
    }
}

impl<T> Serialize for LiteralOrEnv<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}
