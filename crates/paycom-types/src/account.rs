//! The `account` parameter of `receipts.create`.
//!
//! Merchants name the field that identifies the paying account in their
//! dashboard ("requisite"). The gateway only accepts one of three names, so the
//! name is a closed [`RequisiteName`] and an [`Account`] can only be built
//! through it.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Requisite field name configured in the merchant dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequisiteName {
    ChargeId,
    OrderId,
    #[default]
    Id,
}

impl RequisiteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequisiteName::ChargeId => "charge_id",
            RequisiteName::OrderId => "order_id",
            RequisiteName::Id => "id",
        }
    }

    /// Starts an [`Account`] keyed by this requisite.
    pub fn account(self, value: impl Into<String>) -> Account {
        Account::new(self, value)
    }
}

impl Display for RequisiteName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown requisite name {0:?}, expected one of charge_id, order_id, id")]
pub struct UnknownRequisiteName(pub String);

impl FromStr for RequisiteName {
    type Err = UnknownRequisiteName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "charge_id" => Ok(RequisiteName::ChargeId),
            "order_id" => Ok(RequisiteName::OrderId),
            "id" => Ok(RequisiteName::Id),
            other => Err(UnknownRequisiteName(other.to_string())),
        }
    }
}

/// Account map sent to the gateway: the requisite entry plus any extra fields.
///
/// ```
/// use paycom_types::account::RequisiteName;
///
/// let account = RequisiteName::ChargeId.account("123");
/// assert_eq!(serde_json::to_string(&account).unwrap(), r#"{"charge_id":"123"}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    requisite: RequisiteName,
    value: String,
    extra: BTreeMap<String, Value>,
}

impl Account {
    pub fn new(requisite: RequisiteName, value: impl Into<String>) -> Self {
        Self {
            requisite,
            value: value.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Adds an extra field. A field named like the requisite is ignored.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != self.requisite.as_str() {
            self.extra.insert(key, value.into());
        }
        self
    }

    pub fn requisite(&self) -> RequisiteName {
        self.requisite
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }
}

impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.extra.len()))?;
        map.serialize_entry(self.requisite.as_str(), &self.value)?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
