//! Gateway error codes and the canonical kinds they resolve to.
//!
//! The gateway reports failures as a JSON-RPC `error` object whose numeric `code`
//! is the only field that carries meaning. [`GatewayErrorKind::from_code`] turns
//! that code into one of a closed set of kinds, and [`GatewayErrorKind::code`]
//! goes back the other way.
//!
//! Two gateway codes (`-31400` and `-31300`) both mean "card not found", so the
//! reverse direction picks `-31400` as the representative. Any non-zero code that
//! is not listed resolves to [`GatewayErrorKind::GenericGatewayError`].
//!
//! ```
//! use paycom_types::error_code::GatewayErrorKind;
//!
//! let kind = GatewayErrorKind::from_code(-31300).unwrap();
//! assert_eq!(kind, GatewayErrorKind::CardNotFound);
//! assert_eq!(kind.code(), -31400);
//! assert_eq!(GatewayErrorKind::from_code(0), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod codes {
    pub const INVALID_AMOUNT: i64 = -31611;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const RECEIPT_NOT_FOUND: i64 = -31401;
    pub const RECEIPT_ALREADY_PAID: i64 = -31402;
    pub const RECEIPT_EXPIRED: i64 = -31403;

    pub const CARD_NOT_FOUND: i64 = -31400;
    pub const INVALID_FORMAT_TOKEN: i64 = -32500;
    pub const CARD_NUMBER_NOT_FOUND: i64 = -31300;
    pub const CARD_EXPIRED: i64 = -31301;
    pub const P2P_IDENTICAL_CARDS: i64 = -31630;

    pub const PAYCOM_SERVICE_UNAVAILABLE: i64 = -31001;
    pub const PROCESSING_CENTER_UNAVAILABLE: i64 = -31002;

    pub const PERMISSION_DENIED: i64 = -32504;
    pub const PARSE_ERROR: i64 = -32700;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_REQUEST: i64 = -32600;

    /// Gateway "system error". Not part of the mapped table, so it stands in for
    /// every unlisted code.
    pub const SYSTEM_ERROR: i64 = -32400;
}

/// Canonical error kinds reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorKind {
    InvalidAmount,
    InvalidParams,
    ReceiptNotFound,
    ReceiptAlreadyPaid,
    ReceiptExpired,
    CardNotFound,
    InvalidFormatToken,
    CardExpired,
    P2PIdenticalCards,
    PaycomServiceUnavailable,
    ProcessingCenterUnavailable,
    PermissionDenied,
    ParseError,
    MethodNotFound,
    InvalidRequest,
    GenericGatewayError,
}

impl GatewayErrorKind {
    /// Every kind, in table order.
    pub const ALL: [GatewayErrorKind; 16] = [
        GatewayErrorKind::InvalidAmount,
        GatewayErrorKind::InvalidParams,
        GatewayErrorKind::ReceiptNotFound,
        GatewayErrorKind::ReceiptAlreadyPaid,
        GatewayErrorKind::ReceiptExpired,
        GatewayErrorKind::CardNotFound,
        GatewayErrorKind::InvalidFormatToken,
        GatewayErrorKind::CardExpired,
        GatewayErrorKind::P2PIdenticalCards,
        GatewayErrorKind::PaycomServiceUnavailable,
        GatewayErrorKind::ProcessingCenterUnavailable,
        GatewayErrorKind::PermissionDenied,
        GatewayErrorKind::ParseError,
        GatewayErrorKind::MethodNotFound,
        GatewayErrorKind::InvalidRequest,
        GatewayErrorKind::GenericGatewayError,
    ];

    /// Resolves a gateway error code.
    ///
    /// Returns `None` for `0`, which the gateway uses for "no error".
    pub fn from_code(code: i64) -> Option<Self> {
        use codes::*;
        let kind = match code {
            0 => return None,
            INVALID_AMOUNT => GatewayErrorKind::InvalidAmount,
            INVALID_PARAMS => GatewayErrorKind::InvalidParams,
            RECEIPT_NOT_FOUND => GatewayErrorKind::ReceiptNotFound,
            RECEIPT_ALREADY_PAID => GatewayErrorKind::ReceiptAlreadyPaid,
            RECEIPT_EXPIRED => GatewayErrorKind::ReceiptExpired,
            CARD_NOT_FOUND | CARD_NUMBER_NOT_FOUND => GatewayErrorKind::CardNotFound,
            INVALID_FORMAT_TOKEN => GatewayErrorKind::InvalidFormatToken,
            CARD_EXPIRED => GatewayErrorKind::CardExpired,
            P2P_IDENTICAL_CARDS => GatewayErrorKind::P2PIdenticalCards,
            PAYCOM_SERVICE_UNAVAILABLE => GatewayErrorKind::PaycomServiceUnavailable,
            PROCESSING_CENTER_UNAVAILABLE => GatewayErrorKind::ProcessingCenterUnavailable,
            PERMISSION_DENIED => GatewayErrorKind::PermissionDenied,
            PARSE_ERROR => GatewayErrorKind::ParseError,
            METHOD_NOT_FOUND => GatewayErrorKind::MethodNotFound,
            INVALID_REQUEST => GatewayErrorKind::InvalidRequest,
            _ => GatewayErrorKind::GenericGatewayError,
        };
        Some(kind)
    }

    /// Canonical wire code for this kind.
    pub fn code(&self) -> i64 {
        use codes::*;
        match self {
            GatewayErrorKind::InvalidAmount => INVALID_AMOUNT,
            GatewayErrorKind::InvalidParams => INVALID_PARAMS,
            GatewayErrorKind::ReceiptNotFound => RECEIPT_NOT_FOUND,
            GatewayErrorKind::ReceiptAlreadyPaid => RECEIPT_ALREADY_PAID,
            GatewayErrorKind::ReceiptExpired => RECEIPT_EXPIRED,
            GatewayErrorKind::CardNotFound => CARD_NOT_FOUND,
            GatewayErrorKind::InvalidFormatToken => INVALID_FORMAT_TOKEN,
            GatewayErrorKind::CardExpired => CARD_EXPIRED,
            GatewayErrorKind::P2PIdenticalCards => P2P_IDENTICAL_CARDS,
            GatewayErrorKind::PaycomServiceUnavailable => PAYCOM_SERVICE_UNAVAILABLE,
            GatewayErrorKind::ProcessingCenterUnavailable => PROCESSING_CENTER_UNAVAILABLE,
            GatewayErrorKind::PermissionDenied => PERMISSION_DENIED,
            GatewayErrorKind::ParseError => PARSE_ERROR,
            GatewayErrorKind::MethodNotFound => METHOD_NOT_FOUND,
            GatewayErrorKind::InvalidRequest => INVALID_REQUEST,
            GatewayErrorKind::GenericGatewayError => SYSTEM_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            GatewayErrorKind::InvalidAmount => "invalid amount",
            GatewayErrorKind::InvalidParams => "invalid parameters",
            GatewayErrorKind::ReceiptNotFound => "receipt not found",
            GatewayErrorKind::ReceiptAlreadyPaid => "receipt already paid",
            GatewayErrorKind::ReceiptExpired => "receipt expired",
            GatewayErrorKind::CardNotFound => "card not found",
            GatewayErrorKind::InvalidFormatToken => "invalid format token",
            GatewayErrorKind::CardExpired => "card expired",
            GatewayErrorKind::P2PIdenticalCards => {
                "similar cards cannot be used for P2P processing"
            }
            GatewayErrorKind::PaycomServiceUnavailable => "paycom service not available",
            GatewayErrorKind::ProcessingCenterUnavailable => "processing center not available",
            GatewayErrorKind::PermissionDenied => "permission denied",
            GatewayErrorKind::ParseError => "parse error",
            GatewayErrorKind::MethodNotFound => "method not found",
            GatewayErrorKind::InvalidRequest => "invalid request",
            GatewayErrorKind::GenericGatewayError => "paycom gateway error",
        }
    }
}

impl Display for GatewayErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TABLE: [(i64, GatewayErrorKind); 16] = [
        (-31611, GatewayErrorKind::InvalidAmount),
        (-32602, GatewayErrorKind::InvalidParams),
        (-31401, GatewayErrorKind::ReceiptNotFound),
        (-31402, GatewayErrorKind::ReceiptAlreadyPaid),
        (-31403, GatewayErrorKind::ReceiptExpired),
        (-31400, GatewayErrorKind::CardNotFound),
        (-31300, GatewayErrorKind::CardNotFound),
        (-32500, GatewayErrorKind::InvalidFormatToken),
        (-31301, GatewayErrorKind::CardExpired),
        (-31630, GatewayErrorKind::P2PIdenticalCards),
        (-31001, GatewayErrorKind::PaycomServiceUnavailable),
        (-31002, GatewayErrorKind::ProcessingCenterUnavailable),
        (-32504, GatewayErrorKind::PermissionDenied),
        (-32700, GatewayErrorKind::ParseError),
        (-32601, GatewayErrorKind::MethodNotFound),
        (-32600, GatewayErrorKind::InvalidRequest),
    ];

    #[test]
    fn test_table_codes_resolve_to_expected_kinds() {
        for (code, kind) in TABLE {
            assert_eq!(GatewayErrorKind::from_code(code), Some(kind), "code {code}");
        }
    }

    #[test]
    fn test_table_codes_round_trip_through_kind() {
        for (code, _) in TABLE {
            let kind = GatewayErrorKind::from_code(code).unwrap();
            assert_eq!(GatewayErrorKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn test_card_not_found_representative_code() {
        assert_eq!(GatewayErrorKind::CardNotFound.code(), -31400);
    }

    #[test]
    fn test_zero_is_not_an_error() {
        assert_eq!(GatewayErrorKind::from_code(0), None);
    }

    #[test]
    fn test_unknown_code_is_generic() {
        assert_eq!(
            GatewayErrorKind::from_code(-1),
            Some(GatewayErrorKind::GenericGatewayError)
        );
        assert_eq!(
            GatewayErrorKind::from_code(GatewayErrorKind::GenericGatewayError.code()),
            Some(GatewayErrorKind::GenericGatewayError)
        );
    }

    #[test]
    fn test_every_kind_round_trips() {
        for kind in GatewayErrorKind::ALL {
            assert_eq!(GatewayErrorKind::from_code(kind.code()), Some(kind));
        }
    }

    proptest! {
        #[test]
        fn test_nonzero_codes_are_total_and_stable(code in any::<i64>().prop_filter("non-zero", |c| *c != 0)) {
            let kind = GatewayErrorKind::from_code(code);
            prop_assert!(kind.is_some());
            let kind = kind.unwrap();
            prop_assert_eq!(GatewayErrorKind::from_code(kind.code()), Some(kind));
        }
    }
}
