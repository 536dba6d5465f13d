//! Order submission.

use std::sync::Arc;

use carbo::{
    cart::Cart,
    checkout::{CheckoutForm, validate_form},
    pricing::PricingEngine,
    settings::CartSettings,
};
use tracing::info;

use crate::domain::{
    checkout::{attempt::CheckoutAttempt, errors::CheckoutError, validator::CheckoutValidator},
    orders::{
        OrderBackend,
        models::{CreatedOrder, Customer, NewOrder, major_units},
    },
    payments::{PaymentGateway, models::PaymentRequest},
};

/// Where the payment gateway sends the customer afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub return_url: String,
    pub cancel_url: String,
}

/// A created order awaiting payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: String,
    pub payment_url: String,
    pub attempt: CheckoutAttempt,
}

/// Validates, prices and places orders, then hands the customer to the payment gateway.
#[derive(Clone)]
pub struct CheckoutService {
    validator: CheckoutValidator,
    orders: Arc<dyn OrderBackend>,
    payments: Arc<dyn PaymentGateway>,
    settings: CartSettings<'static>,
    urls: CheckoutUrls,
}

impl std::fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService")
            .field("urls", &self.urls)
            .finish_non_exhaustive()
    }
}

impl CheckoutService {
    #[must_use]
    pub fn new(
        validator: CheckoutValidator,
        orders: Arc<dyn OrderBackend>,
        payments: Arc<dyn PaymentGateway>,
        settings: CartSettings<'static>,
        urls: CheckoutUrls,
    ) -> Self {
        Self {
            validator,
            orders,
            payments,
            settings,
            urls,
        }
    }

    /// Place an order for `cart` and start payment.
    ///
    /// Nothing is sent to the backend unless the form is complete and every line is confirmed by
    /// the catalog. Failures are not retried; resubmitting the same `attempt` reuses its
    /// idempotency key.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] describing the first step that failed.
    pub async fn submit(
        &self,
        attempt: &CheckoutAttempt,
        cart: &Cart<'_>,
        form: &CheckoutForm,
        customer: &Customer,
    ) -> Result<OrderReceipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        validate_form(form)?;

        let report = self.validator.validate_for_payment(cart).await;

        if !report.is_valid() {
            return Err(CheckoutError::InvalidCart {
                errors: report.errors,
            });
        }

        let priced = PricingEngine::new(self.settings).price(cart, form.delivery)?;
        let order =
            NewOrder::from_checkout(attempt.idempotency_key(), cart, &priced, form, customer)
                .with_notes(self.settings.order_note(cart));

        let CreatedOrder { order_id } = if customer.is_guest() {
            self.orders.create_guest_order(&order).await?
        } else {
            self.orders.create_order(&order).await?
        };

        info!(
            order_id = %order_id,
            attempt = %attempt.uuid(),
            guest = customer.is_guest(),
            total = %order.total,
            "order created"
        );

        let request = PaymentRequest {
            amount: major_units(&priced.total()),
            currency: order.currency.to_string(),
            order_id: order_id.clone(),
            customer_email: form.address.email.clone(),
            customer_name: form.address.full_name.clone(),
            description: format!("Order {order_id}"),
            return_url: self.urls.return_url.clone(),
            cancel_url: self.urls.cancel_url.clone(),
        };

        let redirect = self
            .payments
            .initiate(form.payment_method, customer.is_guest(), &request)
            .await?;

        info!(order_id = %order_id, method = %form.payment_method, "payment initiated");

        Ok(OrderReceipt {
            order_id,
            payment_url: redirect.payment_url,
            attempt: *attempt,
        })
    }
}
