//! Discounts
//!
//! Coupon discounts and the percentage helper shared with VAT calculation.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Coupon amount currency differs from the subtotal (coupon currency, subtotal currency).
    #[error("coupon is in {0}, but the subtotal is in {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Coupon value is below zero (coupon value in minor units).
    #[error("coupon value must not be negative ({0} minor units)")]
    NegativeCoupon(i64),
}

/// Coupon applied at checkout.
#[derive(Debug, Copy, Clone)]
pub enum Coupon<'a> {
    /// Take a percentage off the subtotal (e.g., "10% off")
    PercentageOff(Percentage),

    /// Take a fixed amount off the subtotal (e.g., "20 SAR off")
    AmountOff(Money<'a, Currency>),
}

impl<'a> Coupon<'a> {
    /// Discount this coupon grants on `subtotal`, never more than the subtotal itself.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::CurrencyMismatch`] if a fixed amount is in another currency,
    /// [`DiscountError::NegativeCoupon`] if the coupon value is below zero, or
    /// [`DiscountError::PercentConversion`] if the percentage cannot be applied.
    pub fn discount_on(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let subtotal_minor = subtotal.to_minor_units();

        let discount_minor = match self {
            Coupon::PercentageOff(percent) => percent_of_minor(percent, subtotal_minor)?,
            Coupon::AmountOff(amount) => {
                if amount.currency() != subtotal.currency() {
                    return Err(DiscountError::CurrencyMismatch(
                        amount.currency().iso_alpha_code,
                        subtotal.currency().iso_alpha_code,
                    ));
                }

                amount.to_minor_units()
            }
        };

        if discount_minor < 0 {
            return Err(DiscountError::NegativeCoupon(discount_minor));
        }

        let capped = discount_minor.min(subtotal_minor.max(0));

        Ok(Money::from_minor(capped, subtotal.currency()))
    }
}

/// Calculate `percent` of a minor unit amount, rounded half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage does not expose the inner Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}
