//! Receipt and transaction records as returned by the gateway.
//!
//! Receipts are owned by the gateway; these types are read-only snapshots of
//! whatever a call returned. Every field is optional on the wire and falls back
//! to its zero value, so partially populated receipts (e.g. the short form
//! returned by `receipts.check`) decode without error.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::amount::{Amount, Currency};
use crate::de;
use crate::timestamp::UnixMillis;

/// Lifecycle state of a receipt.
///
/// States outside the four documented ones are preserved in [`ReceiptState::Other`]
/// rather than failing the decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReceiptState {
    #[default]
    Created,
    Paid,
    Cancelled,
    Expired,
    Other(i32),
}

impl ReceiptState {
    pub fn as_i32(&self) -> i32 {
        match self {
            ReceiptState::Created => 0,
            ReceiptState::Paid => 1,
            ReceiptState::Cancelled => -1,
            ReceiptState::Expired => -2,
            ReceiptState::Other(state) => *state,
        }
    }
}

impl From<i32> for ReceiptState {
    fn from(value: i32) -> Self {
        match value {
            0 => ReceiptState::Created,
            1 => ReceiptState::Paid,
            -1 => ReceiptState::Cancelled,
            -2 => ReceiptState::Expired,
            other => ReceiptState::Other(other),
        }
    }
}

impl Serialize for ReceiptState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.as_i32())
    }
}

impl<'de> Deserialize<'de> for ReceiptState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i32::deserialize(deserializer).map(ReceiptState::from)
    }
}

/// A payment receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Receipt {
    #[serde(
        rename = "_id",
        skip_serializing_if = "String::is_empty",
        deserialize_with = "de::null_as_default"
    )]
    pub id: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub create_time: UnixMillis,
    #[serde(deserialize_with = "de::null_as_default")]
    pub pay_time: UnixMillis,
    #[serde(deserialize_with = "de::null_as_default")]
    pub cancel_time: UnixMillis,
    #[serde(deserialize_with = "de::null_as_default")]
    pub state: ReceiptState,
    #[serde(rename = "type", deserialize_with = "de::null_as_default")]
    pub receipt_type: i32,
    #[serde(deserialize_with = "de::null_as_default")]
    pub external: bool,
    #[serde(deserialize_with = "de::null_as_default")]
    pub operation: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ReceiptCategory>,
    pub error: Option<Value>,
    #[serde(
        skip_serializing_if = "String::is_empty",
        deserialize_with = "de::null_as_default"
    )]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ReceiptDetail>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub amount: Amount,
    #[serde(deserialize_with = "de::null_as_default")]
    pub currency: Currency,
    #[serde(deserialize_with = "de::null_as_default")]
    pub commission: Amount,
    #[serde(deserialize_with = "de::null_as_default")]
    pub account: Vec<ReceiptAccount>,
    pub card: Option<Value>,
    pub creator: Option<Value>,
    pub payer: Option<Value>,
    pub sender_card: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant: Option<ReceiptMerchant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ReceiptMeta>,
    pub processing_id: Option<Value>,
}

impl Receipt {
    pub fn is_paid(&self) -> bool {
        self.state == ReceiptState::Paid
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == ReceiptState::Cancelled
    }

    pub fn is_expired(&self) -> bool {
        self.state == ReceiptState::Expired
    }

    /// The account entry flagged as main, if any.
    pub fn main_account(&self) -> Option<&ReceiptAccount> {
        self.account.iter().find(|a| a.main)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptCategory {
    #[serde(rename = "_id", deserialize_with = "de::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub title: Map<String, Value>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub color: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub sort: i32,
    #[serde(deserialize_with = "de::null_as_default")]
    pub operation: i32,
    #[serde(deserialize_with = "de::null_as_default")]
    pub indoor: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcc: Option<ReceiptMcc>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub icon: String,
}

/// Merchant category codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptMcc {
    #[serde(deserialize_with = "de::null_as_default")]
    pub visa: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptDetail {
    pub discount: Option<Value>,
    pub shipping: Option<Value>,
    pub items: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptAccount {
    #[serde(deserialize_with = "de::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub title: Map<String, Value>,
    pub value: Value,
    #[serde(deserialize_with = "de::null_as_default")]
    pub main: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptMerchant {
    #[serde(rename = "_id", deserialize_with = "de::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub organization: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub address: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub business_id: String,
    pub epos: Option<ReceiptEpos>,
    pub restrictions: Option<Value>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub date: UnixMillis,
    pub logo: Option<Value>,
    #[serde(rename = "type", deserialize_with = "de::null_as_default")]
    pub merchant_type: Map<String, Value>,
    pub terms: Option<Value>,
}

/// EPOS terminal bound to the merchant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReceiptEpos {
    #[serde(deserialize_with = "de::null_as_default")]
    pub merchant_id: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub terminal_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptMeta {
    #[serde(deserialize_with = "de::null_as_default")]
    pub source: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub owner: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub host: String,
}

/// A payment transaction. `receipt_id` is not checked against any receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    #[serde(rename = "_id", deserialize_with = "de::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub create_time: UnixMillis,
    #[serde(deserialize_with = "de::null_as_default")]
    pub perform_time: UnixMillis,
    #[serde(deserialize_with = "de::null_as_default")]
    pub cancel_time: UnixMillis,
    #[serde(deserialize_with = "de::null_as_default")]
    pub state: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<i32>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub amount: Amount,
    #[serde(deserialize_with = "de::null_as_default")]
    pub currency: Currency,
    #[serde(deserialize_with = "de::null_as_default")]
    pub receipt_id: String,
}

/// A tokenized payment card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    #[serde(deserialize_with = "de::null_as_default")]
    pub number: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub expire: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub token: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub recurrent: bool,
    #[serde(deserialize_with = "de::null_as_default")]
    pub verify: bool,
    #[serde(rename = "type", deserialize_with = "de::null_as_default")]
    pub card_type: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub number_hash: String,
}

impl Card {
    /// Card number with everything but the first and last four digits hidden.
    pub fn masked_number(&self) -> String {
        mask_card_number(&self.number)
    }
}

/// Masks a card number as `8600****1234`. Numbers shorter than eight
/// characters are fully masked.
pub fn mask_card_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    if chars.len() < 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}

/// Card reference used when paying a merchant receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    pub id: String,
    pub token: String,
}

/// One side of a merchant order: the order id and the card paying for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentData {
    pub order_id: String,
    pub card_data: CardData,
}

/// Everything needed to create and pay a merchant receipt.
///
/// `amount` is in major units (som).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub client: PaymentData,
    #[serde(default)]
    pub driver: PaymentData,
    pub amount: i64,
}
