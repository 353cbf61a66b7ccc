//! Command-line arguments and the client configuration file.

use clap::{Parser, Subcommand};
use paycom_rs::ClientConfig;
use paycom_types::amount::Amount;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI arguments for the Paycom client.
#[derive(Parser, Debug)]
#[command(name = "paycom")]
#[command(about = "Paycom receipts API client")]
pub struct CliArgs {
    /// Path to the JSON client configuration file
    #[arg(long, short, env = "PAYCOM_CONFIG", default_value = "paycom.json")]
    pub config: PathBuf,
    /// Per-call timeout in seconds, overriding the configuration file
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

/// One gateway operation per subcommand. Amounts are in som, e.g. `100.50`.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a receipt
    Create {
        #[arg(long)]
        amount: Amount,
        /// Value of the configured requisite, e.g. the order id
        #[arg(long)]
        account: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Receipt detail as a JSON object
        #[arg(long, value_parser = parse_json)]
        detail: Option<Value>,
    },
    /// Pay a receipt with a card token
    Pay { id: String, token: String },
    /// Send a receipt to its payer or to a phone number
    Send {
        id: String,
        #[arg(long)]
        phone: Option<String>,
    },
    Cancel { id: String },
    Check { id: String },
    Get { id: String },
    /// Print the current state of a receipt
    State { id: String },
    /// List receipts created within a window of Unix milliseconds
    List {
        #[arg(long)]
        from: i64,
        #[arg(long)]
        to: i64,
        #[arg(long, default_value_t = 50)]
        count: u32,
    },
    /// Attach fiscal data (a JSON object) to a receipt
    SetFiscalData {
        id: String,
        #[arg(value_parser = parse_json)]
        fiscal_data: Value,
    },
    /// Create a receipt and pay it straight away
    CreateAndPay {
        #[arg(long)]
        amount: Amount,
        #[arg(long)]
        account: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        token: String,
    },
    /// Cancel several receipts, continuing past failures
    CancelMany {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn parse_json(input: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(input)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {0}: {1}")]
    FileRead(PathBuf, std::io::Error),
    #[error("Failed to parse config file: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Client configuration plus the operation to run.
#[derive(Debug)]
pub struct Config {
    client: ClientConfig,
    command: Command,
}

impl Config {
    pub fn client(&self) -> &ClientConfig {
        &self.client
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Parses the command line and loads the configuration file it points at.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_args(CliArgs::parse())
    }

    fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let mut client = Self::load_from_path(&args.config)?;
        if let Some(secs) = args.timeout_secs {
            client = client.with_timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client,
            command: args.command,
        })
    }

    fn load_from_path(path: &Path) -> Result<ClientConfig, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(path.to_path_buf(), e))?;
        let config: ClientConfig = serde_json::from_str(&content)?;
        Ok(config)
    }
}
