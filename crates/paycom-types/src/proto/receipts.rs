//! Parameters and results of the `receipts.*` methods.
//!
//! One parameter type per method, each carrying exactly the fields that method
//! takes. All of them authenticate with merchant id and key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::account::Account;
use crate::amount::Amount;
use crate::error_code::GatewayErrorKind;
use crate::proto::GatewayMethod;
use crate::receipt::{Receipt, ReceiptState};
use crate::timestamp::UnixMillis;
use crate::validation::{
    ValidationError, validate_amount, validate_card_token, validate_receipt_id,
};

/// Result of the methods that answer with a single receipt.
///
/// `success` is set by methods that acknowledge rather than echo the receipt
/// (`receipts.send`, `receipts.set_fiscal_data`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptResponse {
    #[serde(default)]
    pub receipt: Option<Receipt>,
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        deserialize_with = "crate::de::null_as_default"
    )]
    pub success: bool,
}

pub type CreateReceiptResponse = ReceiptResponse;
pub type PayReceiptResponse = ReceiptResponse;
pub type SendReceiptResponse = ReceiptResponse;
pub type CancelReceiptResponse = ReceiptResponse;
pub type GetReceiptResponse = ReceiptResponse;
pub type SetFiscalDataResponse = ReceiptResponse;

/// Result of `receipts.check`.
///
/// The gateway answers either with a bare `{"state": ..}` or with a full
/// receipt; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckReceiptResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ReceiptState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
}

impl CheckReceiptResponse {
    pub fn state(&self) -> Option<ReceiptState> {
        self.state.or_else(|| self.receipt.as_ref().map(|r| r.state))
    }
}

/// Result of `receipts.get_all`: a bare JSON array.
pub type GetAllReceiptsResponse = Vec<Receipt>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptsCreate {
    pub amount: Amount,
    pub account: Account,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl GatewayMethod for ReceiptsCreate {
    const METHOD: &'static str = "receipts.create";
    const REQUEST_PREFIX: &'static str = "ReceiptsCreate";
    type Output = CreateReceiptResponse;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_amount(self.amount.minor())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptsPay {
    pub id: String,
    pub token: String,
}

impl GatewayMethod for ReceiptsPay {
    const METHOD: &'static str = "receipts.pay";
    const REQUEST_PREFIX: &'static str = "ReceiptsPay";
    type Output = PayReceiptResponse;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_receipt_id(&self.id)?;
        validate_card_token(&self.token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptsSend {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl GatewayMethod for ReceiptsSend {
    const METHOD: &'static str = "receipts.send";
    const REQUEST_PREFIX: &'static str = "ReceiptsSend";
    type Output = SendReceiptResponse;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_receipt_id(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptsCancel {
    pub id: String,
}

impl GatewayMethod for ReceiptsCancel {
    const METHOD: &'static str = "receipts.cancel";
    const REQUEST_PREFIX: &'static str = "ReceiptsCancel";
    type Output = CancelReceiptResponse;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_receipt_id(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptsCheck {
    pub id: String,
}

impl GatewayMethod for ReceiptsCheck {
    const METHOD: &'static str = "receipts.check";
    const REQUEST_PREFIX: &'static str = "ReceiptsCheck";
    type Output = CheckReceiptResponse;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_receipt_id(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptsGet {
    pub id: String,
}

impl GatewayMethod for ReceiptsGet {
    const METHOD: &'static str = "receipts.get";
    const REQUEST_PREFIX: &'static str = "ReceiptsGet";
    type Output = GetReceiptResponse;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_receipt_id(&self.id)
    }
}

/// `from`/`to` bound the receipts' creation time; `count` caps the page size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptsGetAll {
    pub from: UnixMillis,
    pub to: UnixMillis,
    pub count: u32,
}

impl GatewayMethod for ReceiptsGetAll {
    const METHOD: &'static str = "receipts.get_all";
    const REQUEST_PREFIX: &'static str = "ReceiptsGetAll";
    type Output = GetAllReceiptsResponse;

    fn validate(&self) -> Result<(), ValidationError> {
        if self.from > self.to {
            return Err(ValidationError::new(
                GatewayErrorKind::InvalidParams,
                format!("window start {} is after its end {}", self.from, self.to),
            ));
        }
        if self.count == 0 {
            return Err(ValidationError::new(
                GatewayErrorKind::InvalidParams,
                "count must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptsSetFiscalData {
    pub id: String,
    pub fiscal_data: Value,
}

impl GatewayMethod for ReceiptsSetFiscalData {
    const METHOD: &'static str = "receipts.set_fiscal_data";
    const REQUEST_PREFIX: &'static str = "ReceiptsSetFiscalData";
    type Output = SetFiscalDataResponse;

    fn validate(&self) -> Result<(), ValidationError> {
        validate_receipt_id(&self.id)
    }
}
