//! Payment Models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::payments::errors::PaymentError;

/// Payment initiation payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub currency: String,
    pub order_id: String,
    pub customer_email: String,
    pub customer_name: String,
    pub description: String,
    pub return_url: String,
    pub cancel_url: String,
}

/// Where to send the customer to pay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRedirect {
    pub payment_url: String,
}

/// `{success, paymentUrl?, message?, responseCode?}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentResponse {
    pub success: bool,

    #[serde(default)]
    pub payment_url: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub response_code: Option<Value>,
}

impl PaymentResponse {
    pub(crate) fn into_redirect(self) -> Result<PaymentRedirect, PaymentError> {
        if !self.success {
            return Err(PaymentError::Declined {
                message: self.message,
                response_code: self.response_code.map(|code| match code {
                    Value::String(code) => code,
                    other => other.to_string(),
                }),
            });
        }

        match self.payment_url {
            Some(payment_url) if !payment_url.trim().is_empty() => {
                Ok(PaymentRedirect { payment_url })
            }
            _ => Err(PaymentError::MissingRedirect),
        }
    }
}
