//! Pricing
//!
//! Turns a cart and a delivery option into a priced order. Pricing is a pure function of its
//! inputs and is meant to be re-run after every cart or delivery change; nothing is cached.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    delivery::DeliveryOption,
    discounts::{Coupon, DiscountError, percent_of_minor},
    settings::{CartSettings, TaxBase},
};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The cart subtotal could not be calculated.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The coupon could not be applied.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Cart currency differs from the settings currency (cart currency, settings currency).
    #[error("cart is priced in {0}, but settings use {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Total arithmetic overflowed.
    #[error("order total overflowed")]
    Overflow,
}

/// Priced order produced by the [`PricingEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedOrder<'a> {
    delivery: DeliveryOption,
    subtotal: Money<'a, Currency>,
    shipping_cost: Money<'a, Currency>,
    tax: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
}

impl<'a> PricedOrder<'a> {
    /// Delivery option the order was priced with
    #[must_use]
    pub fn delivery(&self) -> DeliveryOption {
        self.delivery
    }

    /// Sum of the paid lines
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Delivery fee
    #[must_use]
    pub fn shipping_cost(&self) -> Money<'a, Currency> {
        self.shipping_cost
    }

    /// VAT, always derived from the subtotal
    #[must_use]
    pub fn tax(&self) -> Money<'a, Currency> {
        self.tax
    }

    /// Coupon discount
    #[must_use]
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// `subtotal + shipping_cost + tax - discount`
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }
}

/// Pricing engine configured with cart settings.
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine<'a> {
    settings: CartSettings<'a>,
}

impl<'a> PricingEngine<'a> {
    /// Create an engine using the given settings.
    #[must_use]
    pub fn new(settings: CartSettings<'a>) -> Self {
        Self { settings }
    }

    /// Settings the engine prices with.
    #[must_use]
    pub fn settings(&self) -> &CartSettings<'a> {
        &self.settings
    }

    /// Price a cart without a coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the cart currency differs from the settings, or if any amount
    /// overflows.
    pub fn price(
        &self,
        cart: &Cart<'a>,
        delivery: DeliveryOption,
    ) -> Result<PricedOrder<'a>, PricingError> {
        self.compute(cart, delivery, None)
    }

    /// Price a cart with a coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the coupon cannot be applied (including a negative coupon),
    /// the cart currency differs from the settings, or any amount overflows. The discount is
    /// capped at the subtotal, so the total never drops below shipping plus tax.
    pub fn price_with_coupon(
        &self,
        cart: &Cart<'a>,
        delivery: DeliveryOption,
        coupon: &Coupon<'a>,
    ) -> Result<PricedOrder<'a>, PricingError> {
        self.compute(cart, delivery, Some(coupon))
    }

    fn compute(
        &self,
        cart: &Cart<'a>,
        delivery: DeliveryOption,
        coupon: Option<&Coupon<'a>>,
    ) -> Result<PricedOrder<'a>, PricingError> {
        let currency = self.settings.currency;

        if cart.currency() != currency {
            return Err(PricingError::CurrencyMismatch(
                cart.currency().iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        let subtotal = cart.subtotal()?;

        let shipping_cost = self.settings.delivery_fees.shipping_cost(
            delivery,
            &subtotal,
            &self.settings.free_shipping_threshold,
        );

        let discount = match coupon {
            Some(coupon) => coupon.discount_on(&subtotal)?,
            None => Money::from_minor(0, currency),
        };

        let subtotal_minor = subtotal.to_minor_units();
        let discount_minor = discount.to_minor_units();

        let tax_base_minor = match self.settings.tax_base {
            TaxBase::Subtotal => subtotal_minor,
            TaxBase::DiscountedSubtotal => subtotal_minor
                .checked_sub(discount_minor)
                .ok_or(PricingError::Overflow)?,
        };

        let tax_minor = percent_of_minor(&self.settings.tax_rate, tax_base_minor)?;

        let total_minor = subtotal_minor
            .checked_add(shipping_cost.to_minor_units())
            .and_then(|sum| sum.checked_add(tax_minor))
            .and_then(|sum| sum.checked_sub(discount_minor))
            .ok_or(PricingError::Overflow)?;

        Ok(PricedOrder {
            delivery,
            subtotal,
            shipping_cost,
            tax: Money::from_minor(tax_minor, currency),
            discount,
            total: Money::from_minor(total_minor, currency),
        })
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rust_decimal::Decimal;
    use rusty_money::iso::{SAR, USD};
    use testresult::TestResult;

    use crate::cart::{CartLine, ReferenceKind};

    use super::*;

    fn cart_of(lines: &[(i64, u32)]) -> Result<Cart<'static>, CartError> {
        Cart::with_lines(
            lines.iter().enumerate().map(|(i, (price, quantity))| {
                CartLine::new(
                    format!("line-{i}"),
                    ReferenceKind::Product,
                    format!("Product {i}"),
                    Money::from_minor(*price, SAR),
                )
                .with_reference(format!("p-{i}"))
                .with_quantity(*quantity)
            }),
            SAR,
        )
    }

    fn engine() -> PricingEngine<'static> {
        PricingEngine::new(CartSettings::default())
    }

    #[test]
    fn standard_delivery_above_threshold_ships_free() -> TestResult {
        let order = engine().price(&cart_of(&[(100_00, 2)])?, DeliveryOption::Standard)?;

        assert_eq!(order.subtotal(), Money::from_minor(200_00, SAR));
        assert_eq!(order.shipping_cost(), Money::from_minor(0, SAR));
        assert_eq!(order.tax(), Money::from_minor(30_00, SAR));
        assert_eq!(order.discount(), Money::from_minor(0, SAR));
        assert_eq!(order.total(), Money::from_minor(230_00, SAR));

        Ok(())
    }

    #[test]
    fn express_delivery_is_a_fixed_fee() -> TestResult {
        let order = engine().price(&cart_of(&[(50_00, 1)])?, DeliveryOption::Express)?;

        assert_eq!(order.subtotal(), Money::from_minor(50_00, SAR));
        assert_eq!(order.shipping_cost(), Money::from_minor(75_00, SAR));
        assert_eq!(order.tax(), Money::from_minor(7_50, SAR));
        assert_eq!(order.total(), Money::from_minor(132_50, SAR));
        assert_eq!(order.delivery(), DeliveryOption::Express);

        Ok(())
    }

    #[test]
    fn free_shipping_boundary() -> TestResult {
        let below = engine().price(&cart_of(&[(149_99, 1)])?, DeliveryOption::Standard)?;
        let at = engine().price(&cart_of(&[(150_00, 1)])?, DeliveryOption::Standard)?;

        assert_eq!(below.shipping_cost(), Money::from_minor(50_00, SAR));
        assert_eq!(at.shipping_cost(), Money::from_minor(0, SAR));

        Ok(())
    }

    #[test]
    fn threshold_comes_from_settings() -> TestResult {
        let mut settings = CartSettings::default();
        settings.free_shipping_threshold = Money::from_minor(300_00, SAR);

        let order =
            PricingEngine::new(settings).price(&cart_of(&[(200_00, 1)])?, DeliveryOption::Standard)?;

        assert_eq!(order.shipping_cost(), Money::from_minor(50_00, SAR));

        Ok(())
    }

    #[test]
    fn tax_is_independent_of_delivery_and_discount() -> TestResult {
        let cart = cart_of(&[(33_33, 3)])?;
        let coupon = Coupon::AmountOff(Money::from_minor(10_00, SAR));

        let taxes = [
            engine().price(&cart, DeliveryOption::Standard)?.tax(),
            engine().price(&cart, DeliveryOption::Express)?.tax(),
            engine().price(&cart, DeliveryOption::Economy)?.tax(),
            engine()
                .price_with_coupon(&cart, DeliveryOption::Economy, &coupon)?
                .tax(),
        ];

        // 99.99 * 0.15 = 14.9985
        assert!(taxes.iter().all(|tax| *tax == Money::from_minor(15_00, SAR)));

        Ok(())
    }

    #[test]
    fn discount_reduces_total_but_not_tax_by_default() -> TestResult {
        let coupon = Coupon::PercentageOff(Percentage::from(Decimal::new(10, 2)));

        let order =
            engine().price_with_coupon(&cart_of(&[(100_00, 2)])?, DeliveryOption::Standard, &coupon)?;

        assert_eq!(order.discount(), Money::from_minor(20_00, SAR));
        assert_eq!(order.tax(), Money::from_minor(30_00, SAR));
        assert_eq!(order.total(), Money::from_minor(210_00, SAR));

        Ok(())
    }

    #[test]
    fn discounted_tax_base_taxes_the_discounted_subtotal() -> TestResult {
        let mut settings = CartSettings::default();
        settings.tax_base = TaxBase::DiscountedSubtotal;
        let coupon = Coupon::AmountOff(Money::from_minor(100_00, SAR));

        let order = PricingEngine::new(settings).price_with_coupon(
            &cart_of(&[(100_00, 2)])?,
            DeliveryOption::Standard,
            &coupon,
        )?;

        assert_eq!(order.tax(), Money::from_minor(15_00, SAR));
        assert_eq!(order.total(), Money::from_minor(115_00, SAR));

        Ok(())
    }

    #[test]
    fn oversized_coupon_never_produces_negative_total() -> TestResult {
        let coupon = Coupon::AmountOff(Money::from_minor(10_000_00, SAR));

        let order =
            engine().price_with_coupon(&cart_of(&[(20_00, 1)])?, DeliveryOption::Economy, &coupon)?;

        assert_eq!(order.discount(), Money::from_minor(20_00, SAR));
        // 25 shipping + 3 VAT on the undiscounted subtotal
        assert_eq!(order.total(), Money::from_minor(28_00, SAR));

        Ok(())
    }

    #[test]
    fn negative_coupon_is_an_error_not_a_zero_discount() -> TestResult {
        let coupon = Coupon::AmountOff(Money::from_minor(-10_00, SAR));

        let result =
            engine().price_with_coupon(&cart_of(&[(20_00, 1)])?, DeliveryOption::Economy, &coupon);

        assert!(matches!(
            result,
            Err(PricingError::Discount(DiscountError::NegativeCoupon(-1000)))
        ));

        Ok(())
    }

    #[test]
    fn empty_cart_prices_to_shipping_only() -> TestResult {
        let order = engine().price(&Cart::new(SAR), DeliveryOption::Standard)?;

        assert_eq!(order.subtotal(), Money::from_minor(0, SAR));
        assert_eq!(order.total(), Money::from_minor(50_00, SAR));

        Ok(())
    }

    #[test]
    fn currency_mismatch_is_rejected() {
        let result = engine().price(&Cart::new(USD), DeliveryOption::Standard);

        assert!(matches!(
            result,
            Err(PricingError::CurrencyMismatch("USD", "SAR"))
        ));
    }
}
