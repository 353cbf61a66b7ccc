//! Receipt operations.
//!
//! One method per `receipts.*` gateway call, plus status helpers built on
//! `receipts.check`. Each call validates its parameters locally, goes through
//! [`PaycomClient::call`] once and returns the typed result unchanged.

use paycom_types::account::Account;
use paycom_types::amount::Amount;
use paycom_types::proto::GatewayMethod;
use paycom_types::proto::receipts::{
    CancelReceiptResponse, CheckReceiptResponse, CreateReceiptResponse, GetAllReceiptsResponse,
    GetReceiptResponse, PayReceiptResponse, ReceiptsCancel, ReceiptsCheck, ReceiptsCreate,
    ReceiptsGet, ReceiptsGetAll, ReceiptsPay, ReceiptsSend, ReceiptsSetFiscalData,
    SendReceiptResponse, SetFiscalDataResponse,
};
use paycom_types::receipt::ReceiptState;
use paycom_types::timestamp::UnixMillis;
use serde_json::Value;

use crate::client::PaycomClient;
use crate::error::PaycomError;
use crate::transport::Transport;

impl<T: Transport> PaycomClient<T> {
    /// Creates a receipt for `amount` (minor units) payable against `account`.
    pub async fn create_receipt(
        &self,
        amount: Amount,
        account: Account,
        description: impl Into<String>,
        detail: Option<Value>,
    ) -> Result<CreateReceiptResponse, PaycomError> {
        self.call(&ReceiptsCreate {
            amount,
            account,
            description: description.into(),
            detail,
        })
        .await
    }

    /// Pays a receipt with a tokenized card.
    pub async fn pay_receipt(
        &self,
        receipt_id: &str,
        token: &str,
    ) -> Result<PayReceiptResponse, PaycomError> {
        self.call(&ReceiptsPay {
            id: receipt_id.to_string(),
            token: token.to_string(),
        })
        .await
    }

    /// Sends a receipt to its payer, or to `phone` when given.
    pub async fn send_receipt(
        &self,
        receipt_id: &str,
        phone: Option<&str>,
    ) -> Result<SendReceiptResponse, PaycomError> {
        self.call(&ReceiptsSend {
            id: receipt_id.to_string(),
            phone: phone.map(str::to_string),
        })
        .await
    }

    pub async fn cancel_receipt(
        &self,
        receipt_id: &str,
    ) -> Result<CancelReceiptResponse, PaycomError> {
        self.call(&ReceiptsCancel {
            id: receipt_id.to_string(),
        })
        .await
    }

    pub async fn check_receipt(
        &self,
        receipt_id: &str,
    ) -> Result<CheckReceiptResponse, PaycomError> {
        self.call(&ReceiptsCheck {
            id: receipt_id.to_string(),
        })
        .await
    }

    pub async fn get_receipt(&self, receipt_id: &str) -> Result<GetReceiptResponse, PaycomError> {
        self.call(&ReceiptsGet {
            id: receipt_id.to_string(),
        })
        .await
    }

    /// Lists at most `count` receipts created within `[from, to]`.
    pub async fn get_all_receipts(
        &self,
        from: UnixMillis,
        to: UnixMillis,
        count: u32,
    ) -> Result<GetAllReceiptsResponse, PaycomError> {
        self.call(&ReceiptsGetAll { from, to, count }).await
    }

    /// Attaches fiscal receipt data to a paid receipt.
    pub async fn set_fiscal_data(
        &self,
        receipt_id: &str,
        fiscal_data: Value,
    ) -> Result<SetFiscalDataResponse, PaycomError> {
        self.call(&ReceiptsSetFiscalData {
            id: receipt_id.to_string(),
            fiscal_data,
        })
        .await
    }

    /// Current lifecycle state of a receipt, fetched fresh on every call.
    pub async fn receipt_state(&self, receipt_id: &str) -> Result<ReceiptState, PaycomError> {
        self.check_receipt(receipt_id)
            .await?
            .state()
            .ok_or(PaycomError::EmptyResult {
                method: ReceiptsCheck::METHOD,
            })
    }

    pub async fn is_receipt_paid(&self, receipt_id: &str) -> Result<bool, PaycomError> {
        Ok(self.receipt_state(receipt_id).await? == ReceiptState::Paid)
    }

    pub async fn is_receipt_cancelled(&self, receipt_id: &str) -> Result<bool, PaycomError> {
        Ok(self.receipt_state(receipt_id).await? == ReceiptState::Cancelled)
    }

    pub async fn is_receipt_expired(&self, receipt_id: &str) -> Result<bool, PaycomError> {
        Ok(self.receipt_state(receipt_id).await? == ReceiptState::Expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_client;
    use paycom_types::account::RequisiteName;
    use paycom_types::amount::Currency;
    use paycom_types::error_code::GatewayErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_result(server: &MockServer, gateway_method: &str, result: Value) {
        Mock::given(method("POST"))
            .and(path("/api"))
            .and(body_partial_json(json!({"method": gateway_method})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"jsonrpc": "2.0", "id": "1", "result": result})),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_create_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "receipts.create",
                "params": {
                    "amount": 10000,
                    "account": {"charge_id": "123"},
                    "description": "Test receipt"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"receipt": {"_id": "r1", "amount": 10000, "currency": 860, "state": 0}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = client
            .create_receipt(
                Amount::from_minor(10_000),
                RequisiteName::ChargeId.account("123"),
                "Test receipt",
                None,
            )
            .await
            .unwrap();
        let receipt = response.receipt.unwrap();
        assert_eq!(receipt.id, "r1");
        assert_eq!(receipt.state, ReceiptState::Created);
        assert_eq!(receipt.amount, Amount::from_minor(10_000));
        assert_eq!(receipt.currency, Currency::Uzs);
    }

    #[tokio::test]
    async fn test_create_receipt_rejects_zero_amount_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let error = client
            .create_receipt(Amount::ZERO, RequisiteName::Id.account("1"), "", None)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), Some(GatewayErrorKind::InvalidAmount));
    }

    #[tokio::test]
    async fn test_check_missing_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "receipts.check", "params": {"id": "r-missing"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"error": {"code": -31401, "message": "not found"}})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server);
        let error = client.check_receipt("r-missing").await.unwrap_err();
        assert_eq!(error.kind(), Some(GatewayErrorKind::ReceiptNotFound));
        assert!(matches!(error, PaycomError::Gateway(_)));
    }

    #[tokio::test]
    async fn test_pay_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "receipts.pay",
                "params": {"id": "receipt-1", "token": "card-token-0001"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": {"receipt": {"_id": "receipt-1", "state": 1}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = client
            .pay_receipt("receipt-1", "card-token-0001")
            .await
            .unwrap();
        assert_eq!(response.receipt.unwrap().state, ReceiptState::Paid);
    }

    #[tokio::test]
    async fn test_send_receipt_with_phone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "receipts.send",
                "params": {"id": "receipt-1", "phone": "998901234567"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"success": true}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = client
            .send_receipt("receipt-1", Some("998901234567"))
            .await
            .unwrap();
        assert!(response.success);
        assert!(response.receipt.is_none());
    }

    #[tokio::test]
    async fn test_get_all_receipts_decodes_array() {
        let server = MockServer::start().await;
        mount_result(
            &server,
            "receipts.get_all",
            json!([
                {"_id": "r1", "amount": 500, "state": 1, "create_time": 1700000000000i64},
                {"_id": "r2", "amount": 900, "state": -1}
            ]),
        )
        .await;

        let client = test_client(&server);
        let receipts = client
            .get_all_receipts(
                UnixMillis::from_millis(0),
                UnixMillis::from_millis(1_800_000_000_000),
                10,
            )
            .await
            .unwrap();
        assert_eq!(receipts.len(), 2);
        assert_eq!(receipts[0].create_time, UnixMillis::from_millis(1_700_000_000_000));
        assert_eq!(receipts[1].state, ReceiptState::Cancelled);
    }

    #[tokio::test]
    async fn test_get_all_receipts_rejects_inverted_window() {
        let server = MockServer::start().await;
        let client = test_client(&server);
        let error = client
            .get_all_receipts(UnixMillis::from_millis(10), UnixMillis::from_millis(1), 10)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), Some(GatewayErrorKind::InvalidParams));
    }

    #[tokio::test]
    async fn test_set_fiscal_data_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "receipts.set_fiscal_data",
                "params": {"id": "receipt-1", "fiscal_data": {"qr_code_url": "https://ofd.example/r"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"success": true}})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let response = client
            .set_fiscal_data("receipt-1", json!({"qr_code_url": "https://ofd.example/r"}))
            .await
            .unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_status_helpers() {
        let server = MockServer::start().await;
        mount_result(&server, "receipts.check", json!({"state": 1})).await;

        let client = test_client(&server);
        assert_eq!(
            client.receipt_state("receipt-1").await.unwrap(),
            ReceiptState::Paid
        );
        assert!(client.is_receipt_paid("receipt-1").await.unwrap());
        assert!(!client.is_receipt_cancelled("receipt-1").await.unwrap());
        assert!(!client.is_receipt_expired("receipt-1").await.unwrap());
        // No caching: one gateway call per helper.
        assert_eq!(server.received_requests().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_state_from_full_receipt() {
        let server = MockServer::start().await;
        mount_result(
            &server,
            "receipts.check",
            json!({"receipt": {"_id": "receipt-1", "state": -2}}),
        )
        .await;

        let client = test_client(&server);
        assert_eq!(
            client.receipt_state("receipt-1").await.unwrap(),
            ReceiptState::Expired
        );
    }

    #[tokio::test]
    async fn test_state_missing_from_result() {
        let server = MockServer::start().await;
        mount_result(&server, "receipts.check", json!({})).await;

        let client = test_client(&server);
        let error = client.receipt_state("receipt-1").await.unwrap_err();
        assert!(matches!(error, PaycomError::EmptyResult { method: "receipts.check" }));
        assert_eq!(error.kind(), Some(GatewayErrorKind::ReceiptNotFound));
    }
}
