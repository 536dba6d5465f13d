//! Exchange Order Lifecycle
//!
//! A CO2 exchange order moves forward one stage at a time:
//!
//! ```text
//! pending → confirmed → pickup_scheduled → picked_up → refilling
//!         → ready_for_delivery → delivery_scheduled → delivered
//! ```
//!
//! Any non-terminal order may also be cancelled or refunded. `delivered`, `cancelled` and
//! `refunded` are terminal. Every other request is rejected with a [`TransitionError`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

/// Errors raised by status changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The order is already in the requested status.
    #[error("order is already {0}")]
    Unchanged(OrderStatus),

    /// The order is terminal and cannot change.
    #[error("order is {0} and can no longer change status")]
    Terminal(OrderStatus),

    /// The requested status does not follow the current one.
    #[error("order cannot move from {from} to {to}")]
    NotAllowed {
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },
}

/// Unrecognised status name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

/// Status of a CO2 exchange order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation
    #[default]
    Pending,
    /// Confirmed by the store
    Confirmed,
    /// Pickup date agreed
    PickupScheduled,
    /// Empty cylinders collected
    PickedUp,
    /// Cylinders at the refill station
    Refilling,
    /// Refilled, waiting for a delivery slot
    ReadyForDelivery,
    /// Delivery date agreed
    DeliveryScheduled,
    /// Full cylinders handed back
    Delivered,
    /// Cancelled before completion
    Cancelled,
    /// Payment returned to the customer
    Refunded,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 10] = [
        Self::Pending,
        Self::Confirmed,
        Self::PickupScheduled,
        Self::PickedUp,
        Self::Refilling,
        Self::ReadyForDelivery,
        Self::DeliveryScheduled,
        Self::Delivered,
        Self::Cancelled,
        Self::Refunded,
    ];

    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::PickupScheduled => "pickup_scheduled",
            Self::PickedUp => "picked_up",
            Self::Refilling => "refilling",
            Self::ReadyForDelivery => "ready_for_delivery",
            Self::DeliveryScheduled => "delivery_scheduled",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Whether the order has reached the end of its lifecycle.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Refunded)
    }

    const fn next_stage(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::PickupScheduled),
            Self::PickupScheduled => Some(Self::PickedUp),
            Self::PickedUp => Some(Self::Refilling),
            Self::Refilling => Some(Self::ReadyForDelivery),
            Self::ReadyForDelivery => Some(Self::DeliveryScheduled),
            Self::DeliveryScheduled => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled | Self::Refunded => None,
        }
    }

    /// Statuses this one may move to.
    #[must_use]
    pub fn allowed_next_states(self) -> SmallVec<[Self; 3]> {
        match self.next_stage() {
            Some(next) => smallvec![next, Self::Cancelled, Self::Refunded],
            None => SmallVec::new(),
        }
    }

    /// Whether moving to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Validate a move to `next`, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Unchanged`] for a no-op request, [`TransitionError::Terminal`]
    /// when the order is finished, and [`TransitionError::NotAllowed`] for any other move outside
    /// the table.
    pub fn transition_to(self, next: Self) -> Result<Self, TransitionError> {
        if self == next {
            return Err(TransitionError::Unchanged(self));
        }

        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }

        if !self.can_transition_to(next) {
            return Err(TransitionError::NotAllowed {
                from: self,
                to: next,
            });
        }

        Ok(next)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Payment status, tracked independently of the order status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting payment
    #[default]
    Pending,
    /// Paid
    Completed,
    /// Payment failed
    Failed,
    /// Fully refunded
    Refunded,
    /// Partly refunded
    PartiallyRefunded,
}

impl PaymentStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
            Self::PartiallyRefunded => "partially_refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single cylinder within an exchange order.
///
/// Cylinder statuses are bookkeeping only; they never move the parent order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CylinderStatus {
    /// Not yet collected
    #[default]
    Pending,
    /// Collected from the customer
    PickedUp,
    /// Being refilled
    Refilling,
    /// Refilled
    Refilled,
    /// Returned to the customer
    Delivered,
}

impl CylinderStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PickedUp => "picked_up",
            Self::Refilling => "refilling",
            Self::Refilled => "refilled",
            Self::Delivered => "delivered",
        }
    }
}

impl fmt::Display for CylinderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
