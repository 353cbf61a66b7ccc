//! Local shape checks run before any request leaves the client.
//!
//! These are coarse: a value that passes here can still be rejected by the
//! gateway, which stays authoritative.

use crate::error_code::GatewayErrorKind;
use crate::receipt::ReceiptState;

/// Largest amount, in minor units, accepted by [`validate_amount`].
pub const MAX_AMOUNT: i64 = 999_999_999_999;

pub const CARD_TOKEN_MIN_LEN: usize = 10;
pub const CARD_TOKEN_MAX_LEN: usize = 100;

pub const RECEIPT_ID_MIN_LEN: usize = 5;
pub const RECEIPT_ID_MAX_LEN: usize = 100;

/// A value rejected locally, tagged with the gateway error kind the gateway
/// itself would have reported for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {reason}")]
pub struct ValidationError {
    pub kind: GatewayErrorKind,
    pub reason: String,
}

impl ValidationError {
    pub fn new(kind: GatewayErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// Checks `0 < amount <= 999_999_999_999` (minor units).
pub fn validate_amount(amount: i64) -> Result<(), ValidationError> {
    if amount <= 0 {
        return Err(ValidationError::new(
            GatewayErrorKind::InvalidAmount,
            format!("amount must be positive, got {amount}"),
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::new(
            GatewayErrorKind::InvalidAmount,
            format!("amount must not exceed {MAX_AMOUNT}, got {amount}"),
        ));
    }
    Ok(())
}

pub fn validate_card_token(token: &str) -> Result<(), ValidationError> {
    if token.is_empty() {
        return Err(ValidationError::new(
            GatewayErrorKind::InvalidFormatToken,
            "card token is empty",
        ));
    }
    if !(CARD_TOKEN_MIN_LEN..=CARD_TOKEN_MAX_LEN).contains(&token.len()) {
        return Err(ValidationError::new(
            GatewayErrorKind::InvalidFormatToken,
            format!(
                "card token length must be between {CARD_TOKEN_MIN_LEN} and {CARD_TOKEN_MAX_LEN}, got {}",
                token.len()
            ),
        ));
    }
    Ok(())
}

pub fn validate_receipt_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::new(
            GatewayErrorKind::ReceiptNotFound,
            "receipt id is empty",
        ));
    }
    if !(RECEIPT_ID_MIN_LEN..=RECEIPT_ID_MAX_LEN).contains(&id.len()) {
        return Err(ValidationError::new(
            GatewayErrorKind::ReceiptNotFound,
            format!(
                "receipt id length must be between {RECEIPT_ID_MIN_LEN} and {RECEIPT_ID_MAX_LEN}, got {}",
                id.len()
            ),
        ));
    }
    Ok(())
}

/// Supported ISO 4217 numeric currency codes: UZS, USD, EUR.
pub fn is_valid_currency(code: u16) -> bool {
    matches!(code, 860 | 840 | 978)
}

pub fn is_valid_receipt_state(state: i32) -> bool {
    !matches!(ReceiptState::from(state), ReceiptState::Other(_))
}
