//! Order Models

use carbo::{
    cart::{Cart, CartLine, ReferenceKind},
    checkout::{CheckoutForm, PaymentMethod, ShippingAddress},
    delivery::DeliveryOption,
    pricing::PricedOrder,
};
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is placing the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Customer {
    Guest,
    SignedIn { user_id: String },
}

impl Customer {
    #[must_use]
    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }
}

/// Convert a money amount to a decimal in major units (e.g., `149.99`).
#[must_use]
pub fn major_units(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}

/// Order line as sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub reference_kind: ReferenceKind,
    pub reference_id: Option<String>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub is_free_gift: bool,
}

impl From<&CartLine<'_>> for OrderItem {
    fn from(line: &CartLine<'_>) -> Self {
        Self {
            reference_kind: line.reference_kind(),
            reference_id: line.reference_id().map(ToString::to_string),
            name: line.name().to_string(),
            unit_price: major_units(line.unit_price()),
            quantity: line.quantity(),
            is_free_gift: line.is_free_gift(),
        }
    }
}

/// Order creation payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub idempotency_key: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub delivery_option: DeliveryOption,
    pub payment_method: PaymentMethod,
    pub currency: &'static str,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewOrder {
    /// Build the payload for a priced cart. The cart note is not included; see
    /// [`NewOrder::with_notes`].
    #[must_use]
    pub fn from_checkout(
        idempotency_key: Uuid,
        cart: &Cart<'_>,
        priced: &PricedOrder<'_>,
        form: &CheckoutForm,
        customer: &Customer,
    ) -> Self {
        Self {
            idempotency_key,
            user_id: match customer {
                Customer::SignedIn { user_id } => Some(user_id.clone()),
                Customer::Guest => None,
            },
            items: cart.iter().map(OrderItem::from).collect(),
            shipping_address: form.address.clone(),
            delivery_option: priced.delivery(),
            payment_method: form.payment_method,
            currency: cart.currency().iso_alpha_code,
            subtotal: major_units(&priced.subtotal()),
            shipping_cost: major_units(&priced.shipping_cost()),
            tax: major_units(&priced.tax()),
            discount: major_units(&priced.discount()),
            total: major_units(&priced.total()),
            notes: None,
        }
    }

    /// Attach a note for the order.
    #[must_use]
    pub fn with_notes(mut self, notes: Option<&str>) -> Self {
        self.notes = notes.map(ToString::to_string);
        self
    }
}

/// `{success, orderId?, code?, message?}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderResponse {
    pub success: bool,

    #[serde(default)]
    pub order_id: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

/// An order the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedOrder {
    pub order_id: String,
}
