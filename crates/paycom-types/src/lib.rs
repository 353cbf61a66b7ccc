#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Core types for the Paycom receipts API.
//!
//! This crate holds everything about the gateway that does not involve I/O:
//! the wire envelopes, the receipt records, the error-code taxonomy and the
//! local validation rules. The HTTP client lives in the `paycom-rs` crate.
//!
//! # Modules
//!
//! - [`account`] - Requisite names and the `account` parameter builder
//! - [`amount`] - Minor-unit amounts and currencies
//! - [`config`] - Gateway endpoints and environment variable resolution
//! - [`error_code`] - Gateway error codes and their canonical kinds
//! - [`proto`] - Request/response envelopes and per-method parameter types
//! - [`receipt`] - Receipt, transaction and card records
//! - [`timestamp`] - Millisecond Unix timestamps
//! - [`validation`] - Local shape checks run before any network call

pub mod account;
pub mod amount;
pub mod config;
mod de;
pub mod error_code;
pub mod proto;
pub mod receipt;
pub mod timestamp;
pub mod validation;
