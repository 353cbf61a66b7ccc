//! Multi-step workflows built from the receipt operations.
//!
//! Nothing here is transactional: steps run one after another and a failure
//! part-way leaves earlier steps in place. In particular [`PaycomClient::create_and_pay`]
//! does not cancel a receipt whose payment failed.

use paycom_types::account::Account;
use paycom_types::amount::Amount;
use paycom_types::error_code::GatewayErrorKind;
use paycom_types::proto::GatewayMethod;
use paycom_types::proto::receipts::{
    PayReceiptResponse, ReceiptResponse, ReceiptsCreate, ReceiptsPay,
};
use paycom_types::receipt::{PaymentDetails, Receipt, ReceiptState};
use paycom_types::timestamp::UnixMillis;
use paycom_types::validation::ValidationError;
use serde_json::Value;
use std::time::Duration;

use crate::client::PaycomClient;
use crate::error::PaycomError;
use crate::transport::Transport;

/// How far back the filtering helpers look.
pub const RECEIPTS_LOOKBACK: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// `account.reason` sent with merchant receipts: payment for an order.
pub const MERCHANT_PAYMENT_REASON: &str = "6";

/// One receipt to create in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReceipt {
    pub amount: Amount,
    pub account: Account,
    pub description: String,
    pub detail: Option<Value>,
}

impl NewReceipt {
    pub fn new(amount: Amount, account: Account, description: impl Into<String>) -> Self {
        Self {
            amount,
            account,
            description: description.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    fn params(&self) -> ReceiptsCreate {
        ReceiptsCreate {
            amount: self.amount,
            account: self.account.clone(),
            description: self.description.clone(),
            detail: self.detail.clone(),
        }
    }
}

/// A batch item that failed, with its position in the input.
#[derive(Debug)]
pub struct BatchFailure<I> {
    pub index: usize,
    pub item: I,
    pub error: PaycomError,
}

/// Result of a best-effort batch: what went through and what did not.
#[derive(Debug)]
pub struct BatchOutcome<T, I> {
    pub succeeded: Vec<T>,
    pub failed: Vec<BatchFailure<I>>,
}

impl<T, I> Default for BatchOutcome<T, I> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<T, I> BatchOutcome<T, I> {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Id of the receipt carried by a create/pay result.
fn created_id(response: ReceiptResponse, method: &'static str) -> Result<String, PaycomError> {
    response
        .receipt
        .map(|receipt| receipt.id)
        .filter(|id| !id.is_empty())
        .ok_or(PaycomError::EmptyResult { method })
}

impl<T: Transport> PaycomClient<T> {
    /// Creates a receipt and pays it with `token`.
    ///
    /// Stops at the first failing step and returns its error. A receipt created
    /// before a failed payment stays open on the gateway.
    pub async fn create_and_pay(
        &self,
        amount: Amount,
        account: Account,
        description: impl Into<String>,
        detail: Option<Value>,
        token: &str,
    ) -> Result<PayReceiptResponse, PaycomError> {
        let created = self
            .create_receipt(amount, account, description, detail)
            .await?;
        let receipt_id = created_id(created, ReceiptsCreate::METHOD)?;
        self.pay_receipt(&receipt_id, token).await
    }

    /// Creates each receipt in turn, skipping over failures.
    ///
    /// `succeeded` holds the new receipt ids in input order.
    pub async fn create_multiple_receipts(
        &self,
        receipts: Vec<NewReceipt>,
    ) -> BatchOutcome<String, NewReceipt> {
        let mut outcome = BatchOutcome::default();
        for (index, receipt) in receipts.into_iter().enumerate() {
            let result = match self.call(&receipt.params()).await {
                Ok(response) => created_id(response, ReceiptsCreate::METHOD),
                Err(error) => Err(error),
            };
            match result {
                Ok(id) => outcome.succeeded.push(id),
                Err(error) => {
                    tracing::warn!(index, error = %error, "Failed to create receipt");
                    outcome.failed.push(BatchFailure {
                        index,
                        item: receipt,
                        error,
                    });
                }
            }
        }
        outcome
    }

    /// Cancels each receipt in turn, skipping over failures.
    pub async fn cancel_multiple_receipts(
        &self,
        receipt_ids: &[String],
    ) -> BatchOutcome<String, String> {
        let mut outcome = BatchOutcome::default();
        for (index, receipt_id) in receipt_ids.iter().enumerate() {
            match self.cancel_receipt(receipt_id).await {
                Ok(_) => outcome.succeeded.push(receipt_id.clone()),
                Err(error) => {
                    tracing::warn!(receipt_id, error = %error, "Failed to cancel receipt");
                    outcome.failed.push(BatchFailure {
                        index,
                        item: receipt_id.clone(),
                        error,
                    });
                }
            }
        }
        outcome
    }

    /// Receipts created within `[from, to]`, at most `limit` of them.
    pub async fn get_receipts_by_date_range(
        &self,
        from: UnixMillis,
        to: UnixMillis,
        limit: u32,
    ) -> Result<Vec<Receipt>, PaycomError> {
        self.get_all_receipts(from, to, limit).await
    }

    /// Receipts from the last [`RECEIPTS_LOOKBACK`] in the given state.
    ///
    /// Filtering happens after the fetch, so fewer than `limit` may come back.
    pub async fn get_receipts_by_state(
        &self,
        state: ReceiptState,
        limit: u32,
    ) -> Result<Vec<Receipt>, PaycomError> {
        let mut receipts = self.recent_receipts(limit).await?;
        receipts.retain(|receipt| receipt.state == state);
        Ok(receipts)
    }

    /// Receipts from the last [`RECEIPTS_LOOKBACK`] whose amount lies in `[min, max]`.
    pub async fn get_receipts_by_amount_range(
        &self,
        min: Amount,
        max: Amount,
        limit: u32,
    ) -> Result<Vec<Receipt>, PaycomError> {
        let mut receipts = self.recent_receipts(limit).await?;
        receipts.retain(|receipt| (min..=max).contains(&receipt.amount));
        Ok(receipts)
    }

    async fn recent_receipts(&self, limit: u32) -> Result<Vec<Receipt>, PaycomError> {
        let to = UnixMillis::now();
        let from = to - RECEIPTS_LOOKBACK;
        self.get_all_receipts(from, to, limit).await
    }

    /// Creates a receipt for a merchant order and returns its id.
    ///
    /// The account carries the order id under the configured requisite, the
    /// client card id and the payment reason.
    pub async fn create_merchant_receipt(
        &self,
        details: &PaymentDetails,
    ) -> Result<String, PaycomError> {
        let order_id = &details.client.order_id;
        let amount = Amount::from_major(details.amount).map_err(|e| {
            ValidationError::new(GatewayErrorKind::InvalidAmount, e.to_string())
        })?;
        let account = self
            .config()
            .account(order_id.as_str())
            .with_field("card_id", details.client.card_data.id.as_str())
            .with_field("reason", MERCHANT_PAYMENT_REASON);
        let params = ReceiptsCreate {
            amount,
            account,
            description: format!("Merchant transaction for order - {order_id}"),
            detail: None,
        };
        let request_id = format!("{}:MerchantTransaction:{order_id}", ReceiptsCreate::REQUEST_PREFIX);

        let created = self.call_with(&request_id, &params, None).await?;
        let receipt_id = created_id(created, ReceiptsCreate::METHOD)?;
        tracing::info!(order_id, request_id, receipt_id, "Merchant receipt created");
        Ok(receipt_id)
    }

    /// Pays a merchant receipt with the client's card token and returns the paid receipt id.
    ///
    /// A pay result without a receipt id is reported as [`PaycomError::EmptyResult`]
    /// rather than as an empty id.
    pub async fn pay_merchant_receipt(
        &self,
        details: &PaymentDetails,
        receipt_id: &str,
    ) -> Result<String, PaycomError> {
        let order_id = &details.client.order_id;
        let params = ReceiptsPay {
            id: receipt_id.to_string(),
            token: details.client.card_data.token.clone(),
        };
        let request_id = format!("{}:{order_id}", ReceiptsPay::REQUEST_PREFIX);

        let paid = self.call_with(&request_id, &params, None).await?;
        let paid_id = created_id(paid, ReceiptsPay::METHOD)?;
        tracing::info!(order_id, request_id, receipt_id = paid_id, "Merchant receipt paid");
        Ok(paid_id)
    }

    /// [`create_merchant_receipt`](Self::create_merchant_receipt) followed by
    /// [`pay_merchant_receipt`](Self::pay_merchant_receipt).
    pub async fn create_and_pay_merchant_receipt(
        &self,
        details: &PaymentDetails,
    ) -> Result<String, PaycomError> {
        let receipt_id = self.create_merchant_receipt(details).await?;
        self.pay_merchant_receipt(details, &receipt_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_client;
    use crate::config::ClientConfig;
    use paycom_types::account::RequisiteName;
    use paycom_types::receipt::{CardData, PaymentData};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn receipt_result(id: &str, state: i32) -> Value {
        json!({"result": {"receipt": {"_id": id, "state": state}}})
    }

    fn gateway_error(code: i64) -> Value {
        json!({"error": {"code": code, "message": "rejected"}})
    }

    #[tokio::test]
    async fn test_create_and_pay() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "receipts.create"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(receipt_result("receipt-1", 0)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "receipts.pay",
                "params": {"id": "receipt-1", "token": "card-token-0001"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(receipt_result("receipt-1", 1)))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let paid = client
            .create_and_pay(
                Amount::from_minor(10_000),
                RequisiteName::OrderId.account("42"),
                "Order 42",
                None,
                "card-token-0001",
            )
            .await
            .unwrap();
        assert!(paid.receipt.unwrap().is_paid());
    }

    #[tokio::test]
    async fn test_create_and_pay_returns_pay_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "receipts.create"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(receipt_result("receipt-1", 0)))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "receipts.pay"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(gateway_error(-31301)))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "receipts.cancel"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let error = client
            .create_and_pay(
                Amount::from_minor(10_000),
                RequisiteName::OrderId.account("42"),
                "Order 42",
                None,
                "card-token-0001",
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind(), Some(GatewayErrorKind::CardExpired));
    }

    #[tokio::test]
    async fn test_create_and_pay_without_receipt_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "receipts.create"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "receipts.pay"})))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let error = client
            .create_and_pay(
                Amount::from_minor(500),
                RequisiteName::Id.account("1"),
                "",
                None,
                "card-token-0001",
            )
            .await
            .unwrap_err();
        assert!(matches!(error, PaycomError::EmptyResult { method: "receipts.create" }));
    }

    #[tokio::test]
    async fn test_create_multiple_keeps_going_after_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"params": {"account": {"id": "bad"}}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(gateway_error(-31611)))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"params": {"account": {"id": "a"}}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(receipt_result("receipt-a", 0)))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"params": {"account": {"id": "c"}}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(receipt_result("receipt-c", 0)))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let outcome = client
            .create_multiple_receipts(vec![
                NewReceipt::new(Amount::from_minor(100), RequisiteName::Id.account("a"), "a"),
                NewReceipt::new(Amount::from_minor(100), RequisiteName::Id.account("bad"), "b"),
                NewReceipt::new(Amount::ZERO, RequisiteName::Id.account("zero"), "z"),
                NewReceipt::new(Amount::from_minor(100), RequisiteName::Id.account("c"), "c"),
            ])
            .await;

        assert_eq!(outcome.succeeded, vec!["receipt-a", "receipt-c"]);
        assert!(!outcome.is_complete());
        let failed: Vec<_> = outcome
            .failed
            .iter()
            .map(|f| (f.index, f.error.kind()))
            .collect();
        assert_eq!(
            failed,
            vec![
                (1, Some(GatewayErrorKind::InvalidAmount)),
                (2, Some(GatewayErrorKind::InvalidAmount)),
            ]
        );
        assert_eq!(outcome.failed[1].item.description, "z");
        // The zero amount never reaches the gateway.
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_cancel_multiple() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"params": {"id": "receipt-gone"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(gateway_error(-31401)))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "receipts.cancel"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(receipt_result("any", -1)))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let ids = vec![
            "receipt-1".to_string(),
            "receipt-gone".to_string(),
            "receipt-3".to_string(),
        ];
        let outcome = client.cancel_multiple_receipts(&ids).await;
        assert_eq!(outcome.succeeded, vec!["receipt-1", "receipt-3"]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].index, 1);
        assert_eq!(outcome.failed[0].item, "receipt-gone");
        assert_eq!(
            outcome.failed[0].error.kind(),
            Some(GatewayErrorKind::ReceiptNotFound)
        );
    }

    async fn mount_receipt_list(server: &MockServer) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "receipts.get_all"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": [
                {"_id": "r1", "amount": 100, "state": 1},
                {"_id": "r2", "amount": 500, "state": 0},
                {"_id": "r3", "amount": 1000, "state": 1},
                {"_id": "r4", "amount": 1001, "state": -1}
            ]})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_filter_by_state() {
        let server = MockServer::start().await;
        mount_receipt_list(&server).await;

        let client = test_client(&server);
        let paid = client
            .get_receipts_by_state(ReceiptState::Paid, 50)
            .await
            .unwrap();
        let ids: Vec<_> = paid.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r3"]);
    }

    #[tokio::test]
    async fn test_filter_by_amount_is_inclusive() {
        let server = MockServer::start().await;
        mount_receipt_list(&server).await;

        let client = test_client(&server);
        let receipts = client
            .get_receipts_by_amount_range(Amount::from_minor(500), Amount::from_minor(1000), 50)
            .await
            .unwrap();
        let ids: Vec<_> = receipts.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r3"]);
    }

    #[tokio::test]
    async fn test_lookback_window() {
        let server = MockServer::start().await;
        mount_receipt_list(&server).await;

        let client = test_client(&server);
        client
            .get_receipts_by_state(ReceiptState::Created, 10)
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let from = body["params"]["from"].as_i64().unwrap();
        let to = body["params"]["to"].as_i64().unwrap();
        assert_eq!(to - from, RECEIPTS_LOOKBACK.as_millis() as i64);
        assert_eq!(body["params"]["count"], 10);
    }

    fn payment_details() -> PaymentDetails {
        PaymentDetails {
            client: PaymentData {
                order_id: "order-77".to_string(),
                card_data: CardData {
                    id: "card-9".to_string(),
                    token: "client-card-token".to_string(),
                },
            },
            driver: PaymentData::default(),
            amount: 150,
        }
    }

    #[tokio::test]
    async fn test_create_and_pay_merchant_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "id": "ReceiptsCreate:MerchantTransaction:order-77",
                "method": "receipts.create",
                "params": {
                    "amount": 15000,
                    "account": {"order_id": "order-77", "card_id": "card-9", "reason": "6"},
                    "description": "Merchant transaction for order - order-77"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(receipt_result("receipt-77", 0)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "id": "ReceiptsPay:order-77",
                "method": "receipts.pay",
                "params": {"id": "receipt-77", "token": "client-card-token"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(receipt_result("receipt-77", 1)))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::new("merchant-1", "secret-key")
            .with_requisite_name(RequisiteName::OrderId)
            .try_with_base_url(&format!("{}/api", server.uri()))
            .unwrap();
        let client = PaycomClient::new(config).unwrap();
        let paid = client
            .create_and_pay_merchant_receipt(&payment_details())
            .await
            .unwrap();
        assert_eq!(paid, "receipt-77");
    }

    #[tokio::test]
    async fn test_merchant_receipt_rejects_overflowing_amount() {
        let server = MockServer::start().await;
        let client = test_client(&server);
        let mut details = payment_details();
        details.amount = i64::MAX;
        let error = client.create_merchant_receipt(&details).await.unwrap_err();
        assert_eq!(error.kind(), Some(GatewayErrorKind::InvalidAmount));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pay_merchant_receipt_without_receipt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "receipts.pay"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
            .expect(1)
            .mount(&server)
            .await;
        let client = test_client(&server);
        let error = client
            .pay_merchant_receipt(&payment_details(), "receipt-77")
            .await
            .unwrap_err();
        assert!(matches!(error, PaycomError::EmptyResult { method: "receipts.pay" }));
    }
}
