//! Delivery options and fees

use std::{fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delivery option chosen for a checkout attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryOption {
    /// Free above the free-shipping threshold, otherwise a fixed fee.
    #[default]
    Standard,

    /// Fixed fee, fastest.
    Express,

    /// Fixed fee, slowest.
    Economy,
}

impl DeliveryOption {
    /// Lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Economy => "economy",
        }
    }
}

impl fmt::Display for DeliveryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown delivery option name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown delivery option: {0}")]
pub struct UnknownDeliveryOption(pub String);

impl FromStr for DeliveryOption {
    type Err = UnknownDeliveryOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "express" => Ok(Self::Express),
            "economy" => Ok(Self::Economy),
            _ => Err(UnknownDeliveryOption(s.to_string())),
        }
    }
}

/// Fixed fee for each delivery option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryFees<'a> {
    /// Fee for standard delivery below the free-shipping threshold
    pub standard: Money<'a, Currency>,

    /// Fee for express delivery
    pub express: Money<'a, Currency>,

    /// Fee for economy delivery
    pub economy: Money<'a, Currency>,
}

impl<'a> DeliveryFees<'a> {
    /// Storefront defaults: standard 50, express 75, economy 25.
    #[must_use]
    pub fn standard_rates(currency: &'a Currency) -> Self {
        Self {
            standard: Money::from_minor(50_00, currency),
            express: Money::from_minor(75_00, currency),
            economy: Money::from_minor(25_00, currency),
        }
    }

    /// Shipping cost for `option` given the cart subtotal.
    ///
    /// Standard delivery is free once `subtotal` reaches `free_shipping_threshold`; the boundary
    /// itself ships free.
    #[must_use]
    pub fn shipping_cost(
        &self,
        option: DeliveryOption,
        subtotal: &Money<'a, Currency>,
        free_shipping_threshold: &Money<'a, Currency>,
    ) -> Money<'a, Currency> {
        match option {
            DeliveryOption::Express => self.express,
            DeliveryOption::Economy => self.economy,
            DeliveryOption::Standard
                if subtotal.to_minor_units() >= free_shipping_threshold.to_minor_units() =>
            {
                Money::from_minor(0, subtotal.currency())
            }
            DeliveryOption::Standard => self.standard,
        }
    }
}
