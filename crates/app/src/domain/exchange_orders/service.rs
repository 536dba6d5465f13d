//! Exchange orders service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::exchange_orders::{
        errors::ExchangeOrdersServiceError,
        models::{
            ExchangeOrder, ExchangeOrderId, ExchangeOrderResponse, StatusUpdate,
            StatusUpdateResponse,
        },
    },
    http::ApiClient,
};

#[derive(Debug, Clone)]
pub struct HttpExchangeOrdersService {
    client: ApiClient,
}

impl HttpExchangeOrdersService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ExchangeOrdersService for HttpExchangeOrdersService {
    async fn get_order(
        &self,
        id: &ExchangeOrderId,
    ) -> Result<ExchangeOrder, ExchangeOrdersServiceError> {
        let response: ExchangeOrderResponse = self.client.get(&format!("co2-orders/{id}")).await?;

        response.into_order()
    }

    async fn update_status(
        &self,
        id: &ExchangeOrderId,
        update: &StatusUpdate,
    ) -> Result<(), ExchangeOrdersServiceError> {
        let response: StatusUpdateResponse = self
            .client
            .put(&format!("co2-orders/{id}/status"), update)
            .await?;

        response.into_result()
    }
}

#[automock]
#[async_trait]
pub trait ExchangeOrdersService: Send + Sync {
    /// Retrieve a single exchange order.
    async fn get_order(
        &self,
        id: &ExchangeOrderId,
    ) -> Result<ExchangeOrder, ExchangeOrdersServiceError>;

    /// Store a new status for an exchange order.
    async fn update_status(
        &self,
        id: &ExchangeOrderId,
        update: &StatusUpdate,
    ) -> Result<(), ExchangeOrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use carbo::lifecycle::OrderStatus;
    use testresult::TestResult;

    use crate::test::server::serve_once;

    use super::*;

    const ORDER_ID: &str = "65f1a2b3c4d5e6f708192a3b";

    fn service(base_url: String) -> HttpExchangeOrdersService {
        HttpExchangeOrdersService::new(ApiClient::new(base_url, Some("admin".to_string())))
    }

    #[tokio::test]
    async fn get_order_reads_the_backend_document() -> TestResult {
        let (base_url, request) = serve_once(
            200,
            r#"{"success": true, "order": {
                "_id": "65f1a2b3c4d5e6f708192a3b",
                "orderNumber": "CO2-1003",
                "status": "confirmed",
                "subtotal": "35.00",
                "deliveryCharge": "0",
                "discount": "0",
                "total": "35.00",
                "createdAt": "2026-03-01T10:00:00Z",
                "updatedAt": "2026-03-01T10:00:00Z"
            }}"#,
        )
        .await?;

        let order = service(base_url)
            .get_order(&ExchangeOrderId::new(ORDER_ID))
            .await?;
        let request = request.await??;

        assert_eq!(
            request.request_line,
            format!("GET /co2-orders/{ORDER_ID} HTTP/1.1")
        );
        assert_eq!(order.id().as_str(), ORDER_ID);
        assert_eq!(order.status(), OrderStatus::Confirmed);

        Ok(())
    }

    #[tokio::test]
    async fn missing_order_is_not_found() -> TestResult {
        let (base_url, request) =
            serve_once(404, r#"{"success": false, "message": "Order not found"}"#).await?;

        let result = service(base_url)
            .get_order(&ExchangeOrderId::new(ORDER_ID))
            .await;
        request.await??;

        assert!(matches!(
            result,
            Err(ExchangeOrdersServiceError::NotFound { message: Some(m) }) if m == "Order not found"
        ));

        Ok(())
    }

    #[tokio::test]
    async fn update_status_puts_status_and_notes() -> TestResult {
        let (base_url, request) = serve_once(200, r#"{"success": true}"#).await?;

        service(base_url)
            .update_status(
                &ExchangeOrderId::new(ORDER_ID),
                &StatusUpdate {
                    status: OrderStatus::PickupScheduled,
                    notes: Some("Tomorrow 9am".to_string()),
                },
            )
            .await?;
        let request = request.await??;

        assert_eq!(
            request.request_line,
            format!("PUT /co2-orders/{ORDER_ID}/status HTTP/1.1")
        );
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&request.body)?,
            serde_json::json!({"status": "pickup_scheduled", "notes": "Tomorrow 9am"})
        );

        Ok(())
    }

    #[tokio::test]
    async fn refused_update_is_rejected_with_the_backend_message() -> TestResult {
        let (base_url, request) =
            serve_once(400, r#"{"success": false, "message": "Order is locked"}"#).await?;

        let result = service(base_url)
            .update_status(
                &ExchangeOrderId::new(ORDER_ID),
                &StatusUpdate {
                    status: OrderStatus::Cancelled,
                    notes: None,
                },
            )
            .await;
        request.await??;

        assert!(matches!(
            result,
            Err(ExchangeOrdersServiceError::Rejected { message: Some(m) }) if m == "Order is locked"
        ));

        Ok(())
    }
}
