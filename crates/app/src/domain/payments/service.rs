//! Payment gateways.

use async_trait::async_trait;
use carbo::checkout::PaymentMethod;
use mockall::automock;

use crate::{
    domain::payments::{
        errors::PaymentError,
        models::{PaymentRedirect, PaymentRequest, PaymentResponse},
    },
    http::ApiClient,
};

/// Initiation endpoint for a payment method.
#[must_use]
pub fn payment_path(method: PaymentMethod, guest: bool) -> String {
    let suffix = if guest { "/guest" } else { "" };

    format!("payments/{}{suffix}", method.gateway_slug())
}

#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: ApiClient,
}

impl HttpPaymentGateway {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate(
        &self,
        method: PaymentMethod,
        guest: bool,
        request: &PaymentRequest,
    ) -> Result<PaymentRedirect, PaymentError> {
        let response: PaymentResponse = self
            .client
            .post(&payment_path(method, guest), request)
            .await?;

        response.into_redirect()
    }
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Start a payment for an existing order and return the gateway redirect.
    async fn initiate(
        &self,
        method: PaymentMethod,
        guest: bool,
        request: &PaymentRequest,
    ) -> Result<PaymentRedirect, PaymentError>;
}
