//! Exchange Order Models

use std::{fmt, str::FromStr};

use carbo::lifecycle::{CylinderStatus, OrderStatus, PaymentStatus, TransitionError};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::exchange_orders::errors::{ExchangeOrderError, ExchangeOrdersServiceError};

/// Backend identifier of an exchange order. Opaque; only its text is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeOrderId(String);

impl ExchangeOrderId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExchangeOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ExchangeOrderId {
    type Err = ExchangeOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();

        if id.is_empty() || id.contains('/') {
            return Err(ExchangeOrderError::InvalidId(s.to_string()));
        }

        Ok(Self::new(id))
    }
}

/// Amounts fixed when the order was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub delivery_charge: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Tracking record for one cylinder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CylinderRecord {
    pub serial: String,

    #[serde(default)]
    pub status: CylinderStatus,

    #[serde(default)]
    pub pickup_date: Option<Timestamp>,

    #[serde(default)]
    pub refill_date: Option<Timestamp>,

    #[serde(default)]
    pub delivery_date: Option<Timestamp>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl CylinderRecord {
    #[must_use]
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            status: CylinderStatus::Pending,
            pickup_date: None,
            refill_date: None,
            delivery_date: None,
            notes: None,
        }
    }
}

/// Changes to a cylinder record. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CylinderUpdate {
    pub status: Option<CylinderStatus>,
    pub pickup_date: Option<Timestamp>,
    pub refill_date: Option<Timestamp>,
    pub delivery_date: Option<Timestamp>,
    pub notes: Option<String>,
}

/// One entry in the status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,

    #[serde(default)]
    pub notes: Option<String>,

    pub at: Timestamp,
}

/// CO2 cylinder pickup, refill and delivery order.
///
/// The status only changes through [`ExchangeOrder::apply_status_change`], which enforces the
/// lifecycle table. Totals are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeOrder {
    #[serde(alias = "_id")]
    id: ExchangeOrderId,
    order_number: String,

    #[serde(default)]
    status: OrderStatus,

    #[serde(default)]
    payment_status: PaymentStatus,

    #[serde(default)]
    cylinders: Vec<CylinderRecord>,

    #[serde(flatten)]
    totals: OrderTotals,

    #[serde(default)]
    status_history: Vec<StatusChange>,

    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ExchangeOrder {
    /// A freshly placed, unpaid order.
    #[must_use]
    pub fn new(
        id: ExchangeOrderId,
        order_number: impl Into<String>,
        totals: OrderTotals,
        cylinders: Vec<CylinderRecord>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            order_number: order_number.into(),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            cylinders,
            totals,
            status_history: Vec::new(),
            created_at,
            updated_at: created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ExchangeOrderId {
        &self.id
    }

    #[must_use]
    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    #[must_use]
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    #[must_use]
    pub fn cylinders(&self) -> &[CylinderRecord] {
        &self.cylinders
    }

    #[must_use]
    pub fn totals(&self) -> &OrderTotals {
        &self.totals
    }

    #[must_use]
    pub fn status_history(&self) -> &[StatusChange] {
        &self.status_history
    }

    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Move the order to `next`, recording the change.
    ///
    /// Notes are stored with the history entry and have no effect on the status. On error the
    /// order is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] when `next` is not allowed from the current status.
    pub fn apply_status_change(
        &mut self,
        next: OrderStatus,
        notes: Option<String>,
        at: Timestamp,
    ) -> Result<StatusChange, TransitionError> {
        let from = self.status;

        self.status = from.transition_to(next)?;
        self.updated_at = at;

        let change = StatusChange {
            from,
            to: next,
            notes: notes.filter(|n| !n.trim().is_empty()),
            at,
        };

        self.status_history.push(change.clone());

        Ok(change)
    }

    /// Update one cylinder's tracking record. The order status is not affected.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeOrderError::UnknownCylinder`] if no cylinder has `serial`.
    pub fn update_cylinder(
        &mut self,
        serial: &str,
        update: CylinderUpdate,
        at: Timestamp,
    ) -> Result<&CylinderRecord, ExchangeOrderError> {
        let cylinder = self
            .cylinders
            .iter_mut()
            .find(|c| c.serial == serial)
            .ok_or_else(|| ExchangeOrderError::UnknownCylinder(serial.to_string()))?;

        if let Some(status) = update.status {
            cylinder.status = status;
        }

        cylinder.pickup_date = update.pickup_date.or(cylinder.pickup_date);
        cylinder.refill_date = update.refill_date.or(cylinder.refill_date);
        cylinder.delivery_date = update.delivery_date.or(cylinder.delivery_date);

        if update.notes.is_some() {
            cylinder.notes = update.notes;
        }

        self.updated_at = at;

        Ok(cylinder)
    }

    /// Record a payment status. Independent of the order status.
    pub fn set_payment_status(&mut self, status: PaymentStatus, at: Timestamp) {
        self.payment_status = status;
        self.updated_at = at;
    }
}

/// Status change request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// `{success, order?, message?}`
#[derive(Debug, Deserialize)]
pub(crate) struct ExchangeOrderResponse {
    pub success: bool,

    #[serde(default)]
    pub order: Option<ExchangeOrder>,

    #[serde(default)]
    pub message: Option<String>,
}

impl ExchangeOrderResponse {
    /// The order, or `NotFound` with the backend's message when there is none.
    pub(crate) fn into_order(self) -> Result<ExchangeOrder, ExchangeOrdersServiceError> {
        match self {
            Self {
                success: true,
                order: Some(order),
                ..
            } => Ok(order),
            Self { message, .. } => Err(ExchangeOrdersServiceError::NotFound { message }),
        }
    }
}

/// `{success, message?}`
#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdateResponse {
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,
}

impl StatusUpdateResponse {
    pub(crate) fn into_result(self) -> Result<(), ExchangeOrdersServiceError> {
        if self.success {
            Ok(())
        } else {
            Err(ExchangeOrdersServiceError::Rejected {
                message: self.message,
            })
        }
    }
}
