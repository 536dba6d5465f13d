//! Guarded admin status changes.

use std::sync::Arc;

use carbo::lifecycle::OrderStatus;
use jiff::Timestamp;
use tracing::info;

use crate::domain::exchange_orders::{
    errors::ExchangeOrderAdminError,
    models::{ExchangeOrder, ExchangeOrderId, StatusUpdate},
    service::ExchangeOrdersService,
};

/// Applies admin status requests to exchange orders.
///
/// Every request is checked against the lifecycle table before anything is sent to the backend,
/// so an illegal request never reaches it.
#[derive(Clone)]
pub struct ExchangeOrderAdmin {
    orders: Arc<dyn ExchangeOrdersService>,
}

impl std::fmt::Debug for ExchangeOrderAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeOrderAdmin").finish_non_exhaustive()
    }
}

impl ExchangeOrderAdmin {
    #[must_use]
    pub fn new(orders: Arc<dyn ExchangeOrdersService>) -> Self {
        Self { orders }
    }

    /// Move an order to `next`, returning the updated order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be fetched, the transition is not allowed, or the
    /// backend rejects the update.
    pub async fn change_status(
        &self,
        id: &ExchangeOrderId,
        next: OrderStatus,
        notes: Option<String>,
    ) -> Result<ExchangeOrder, ExchangeOrderAdminError> {
        let mut order = self.orders.get_order(id).await?;

        let change = order.apply_status_change(next, notes, Timestamp::now())?;

        self.orders
            .update_status(
                id,
                &StatusUpdate {
                    status: change.to,
                    notes: change.notes,
                },
            )
            .await?;

        info!(
            order = %id,
            order_number = order.order_number(),
            from = %change.from,
            to = %change.to,
            "exchange order status changed"
        );

        Ok(order)
    }
}
