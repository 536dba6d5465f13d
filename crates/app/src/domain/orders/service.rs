//! Order backend.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::orders::{
        errors::OrderBackendError,
        models::{CreateOrderResponse, CreatedOrder, NewOrder},
    },
    http::ApiClient,
};

impl CreateOrderResponse {
    fn into_result(self) -> Result<CreatedOrder, OrderBackendError> {
        match (self.success, self.order_id) {
            (true, Some(order_id)) => Ok(CreatedOrder { order_id }),
            (true, None) => Err(OrderBackendError::Rejected {
                code: self.code,
                message: Some("order was created without an id".to_string()),
            }),
            (false, _) => Err(OrderBackendError::Rejected {
                code: self.code,
                message: self.message,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpOrderBackend {
    client: ApiClient,
}

impl HttpOrderBackend {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, OrderBackendError> {
        let response: CreateOrderResponse = self.client.post("orders", order).await?;

        response.into_result()
    }

    async fn create_guest_order(
        &self,
        order: &NewOrder,
    ) -> Result<CreatedOrder, OrderBackendError> {
        let response: CreateOrderResponse = self.client.post("orders/guest", order).await?;

        response.into_result()
    }
}

#[automock]
#[async_trait]
pub trait OrderBackend: Send + Sync {
    /// Create an order for a signed-in customer.
    async fn create_order(&self, order: &NewOrder) -> Result<CreatedOrder, OrderBackendError>;

    /// Create an order without an account.
    async fn create_guest_order(&self, order: &NewOrder)
    -> Result<CreatedOrder, OrderBackendError>;
}
