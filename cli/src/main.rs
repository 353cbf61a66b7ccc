//! Paycom receipts command-line client.
//!
//! Runs a single gateway operation and prints the result as JSON on stdout.
//! Logs go to stderr.
//!
//! Environment:
//! - `.env` values loaded at startup
//! - `PAYCOM_CONFIG` points at the JSON client configuration (default `paycom.json`)
//! - `RUST_LOG` controls log verbosity
//! - `OTEL_*` variables enable trace export when built with the `telemetry` feature

mod config;
mod run;
mod telemetry;

use std::process;

use crate::run::run;

#[tokio::main]
async fn main() {
    let result = run().await;
    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1)
    }
}
