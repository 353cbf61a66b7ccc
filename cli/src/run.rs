//! Runs one gateway operation and prints its result as JSON.

use dotenvy::dotenv;
use paycom_rs::PaycomClient;
use paycom_rs::workflows::BatchOutcome;
use paycom_types::timestamp::UnixMillis;
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt::Display;

use crate::config::{Command, Config};
use crate::telemetry::Telemetry;

/// Loads `.env`, sets up logging, reads the configuration and runs the requested command.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let _telemetry = Telemetry::init();

    let config = Config::load()?;
    let client = PaycomClient::new(config.client().clone())?;
    tracing::debug!(endpoint = %client.endpoint(), "Using Paycom gateway");

    let output = execute(&client, config.command()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn execute(client: &PaycomClient, command: &Command) -> Result<Value, Box<dyn std::error::Error>> {
    let output = match command {
        Command::Create {
            amount,
            account,
            description,
            detail,
        } => to_json(
            client
                .create_receipt(
                    *amount,
                    client.config().account(account.as_str()),
                    description.as_str(),
                    detail.clone(),
                )
                .await?,
        )?,
        Command::Pay { id, token } => to_json(client.pay_receipt(id, token).await?)?,
        Command::Send { id, phone } => {
            to_json(client.send_receipt(id, phone.as_deref()).await?)?
        }
        Command::Cancel { id } => to_json(client.cancel_receipt(id).await?)?,
        Command::Check { id } => to_json(client.check_receipt(id).await?)?,
        Command::Get { id } => to_json(client.get_receipt(id).await?)?,
        Command::State { id } => {
            let state = client.receipt_state(id).await?;
            json!({"id": id, "state": state})
        }
        Command::List { from, to, count } => to_json(
            client
                .get_all_receipts(
                    UnixMillis::from_millis(*from),
                    UnixMillis::from_millis(*to),
                    *count,
                )
                .await?,
        )?,
        Command::SetFiscalData { id, fiscal_data } => {
            to_json(client.set_fiscal_data(id, fiscal_data.clone()).await?)?
        }
        Command::CreateAndPay {
            amount,
            account,
            description,
            token,
        } => to_json(
            client
                .create_and_pay(
                    *amount,
                    client.config().account(account.as_str()),
                    description.as_str(),
                    None,
                    token,
                )
                .await?,
        )?,
        Command::CancelMany { ids } => batch_json(&client.cancel_multiple_receipts(ids).await),
    };
    Ok(output)
}

fn to_json<T: Serialize>(value: T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

fn batch_json<T: Serialize, I: Display>(outcome: &BatchOutcome<T, I>) -> Value {
    let failed: Vec<Value> = outcome
        .failed
        .iter()
        .map(|failure| {
            json!({
                "index": failure.index,
                "item": failure.item.to_string(),
                "code": failure.error.gateway_code(),
                "error": failure.error.to_string(),
            })
        })
        .collect();
    json!({"succeeded": outcome.succeeded, "failed": failed})
}
