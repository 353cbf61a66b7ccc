//! Rust client for the [Paycom](https://paycom.uz) receipts API.
//!
//! The gateway speaks a JSON-RPC-like protocol over a single HTTP endpoint.
//! This crate wraps it in a typed, async client: every operation validates its
//! input locally, sends one request, and returns either the typed result or a
//! [`PaycomError`] that carries the gateway's error taxonomy.
//!
//! # Modules
//!
//! - [`client`] - [`PaycomClient`] and the shared request/response pipeline.
//! - [`config`] - [`ClientConfig`]: credentials, endpoint selection and timeouts.
//! - [`error`] - [`PaycomError`] and [`GatewayError`].
//! - [`receipts`] - One method per `receipts.*` gateway call, plus status helpers.
//! - [`transport`] - The [`Transport`] seam and its reqwest implementation.
//! - [`workflows`] - Create-and-pay, best-effort batches, filtered listings and
//!   merchant-order receipts.
//!
//! Wire types, receipt records and validation rules live in [`types`]
//! (the `paycom-types` crate).
//!
//! # Example
//!
//! ```rust,no_run
//! use paycom_rs::{ClientConfig, PaycomClient};
//! use paycom_rs::types::account::RequisiteName;
//! use paycom_rs::types::amount::Amount;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("merchant-id", "merchant-key")
//!     .with_test_mode(true)
//!     .with_requisite_name(RequisiteName::OrderId);
//! let client = PaycomClient::new(config)?;
//!
//! let account = client.config().account("order-42");
//! let created = client
//!     .create_receipt(Amount::parse("150.00")?, account, "Order 42", None)
//!     .await?;
//! println!("{:?}", created.receipt.map(|r| r.id));
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - `telemetry`: wraps each gateway call in a tracing span and records its outcome.

pub mod client;
pub mod config;
pub mod error;
pub mod receipts;
pub mod transport;
pub mod workflows;

pub use client::PaycomClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{GatewayError, PaycomError};
pub use paycom_types as types;
pub use transport::{ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse};
