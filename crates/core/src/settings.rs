//! Cart Settings
//!
//! Thresholds, fees and feature toggles injected into the pricing engine and the free-gift rule.
//! Settings are plain values: nothing in the crate reads them from ambient state.

use std::{fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    cart::Cart,
    delivery::DeliveryFees,
    fixtures::{FixtureError, parse_currency, parse_percentage, parse_price},
};

/// Amount VAT is levied on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    /// Tax the full subtotal, before any discount.
    #[default]
    Subtotal,

    /// Tax the subtotal after the discount has been taken off.
    DiscountedSubtotal,
}

/// Tax base used when settings do not name one.
pub const DEFAULT_TAX_BASE: TaxBase = TaxBase::Subtotal;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// Settings document is not valid YAML for this schema.
    #[error("failed to parse settings: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A price, percentage or currency could not be parsed.
    #[error(transparent)]
    Value(#[from] FixtureError),

    /// A configured amount uses a different currency than the settings.
    #[error("{field} is priced in {found}, expected {expected}")]
    CurrencyMismatch {
        /// Setting name
        field: &'static str,
        /// Currency of the configured amount
        found: &'static str,
        /// Settings currency
        expected: &'static str,
    },

    /// A configured amount is negative.
    #[error("{0} must not be negative")]
    Negative(&'static str),

    /// The gift threshold sits above the free-shipping threshold, leaving no gift band.
    #[error("gift threshold must not exceed the free-shipping threshold")]
    InvalidGiftBand,

    /// Tax rate outside `[0, 1]`.
    #[error("tax rate must be between 0% and 100%")]
    InvalidTaxRate,
}

/// Cart feature toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CartFeatures {
    /// Offer a complimentary gift inside the gift band
    pub free_gifts: bool,

    /// Show product recommendations in the cart
    pub recommendations: bool,

    /// Allow a free-text note on the cart
    pub order_notes: bool,
}

impl Default for CartFeatures {
    fn default() -> Self {
        Self {
            free_gifts: true,
            recommendations: true,
            order_notes: true,
        }
    }
}

/// Cart and checkout settings.
#[derive(Debug, Clone, Copy)]
pub struct CartSettings<'a> {
    /// Currency every configured amount is expressed in
    pub currency: &'static Currency,

    /// Standard delivery is free from this subtotal upwards
    pub free_shipping_threshold: Money<'a, Currency>,

    /// Lower bound of the free-gift band
    pub gift_threshold: Money<'a, Currency>,

    /// Gift lines allowed in a cart at once
    pub max_gifts: u32,

    /// Number of recommendations shown in the cart
    pub recommendation_count: u32,

    /// Fixed delivery fees
    pub delivery_fees: DeliveryFees<'a>,

    /// VAT rate
    pub tax_rate: Percentage,

    /// Amount VAT is levied on
    pub tax_base: TaxBase,

    /// Feature toggles
    pub features: CartFeatures,
}

impl CartSettings<'static> {
    /// Storefront defaults in the given currency: free shipping from 150, gift band from 100,
    /// one gift, four recommendations, 15% VAT on the undiscounted subtotal.
    #[must_use]
    pub fn defaults(currency: &'static Currency) -> Self {
        Self {
            currency,
            free_shipping_threshold: Money::from_minor(150_00, currency),
            gift_threshold: Money::from_minor(100_00, currency),
            max_gifts: 1,
            recommendation_count: 4,
            delivery_fees: DeliveryFees::standard_rates(currency),
            tax_rate: Percentage::from(Decimal::new(15, 2)),
            tax_base: DEFAULT_TAX_BASE,
            features: CartFeatures::default(),
        }
    }

    /// Parse settings from YAML. Omitted keys keep their default values.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] for malformed documents, unparseable amounts, amounts in a
    /// different currency, negative amounts, an inverted gift band or an out-of-range tax rate.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = serde_norway::from_str(yaml)?;

        file.into_settings()
    }

    /// Read and parse a settings file.
    ///
    /// # Errors
    ///
    /// Returns a [`SettingsError`] if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }
}

impl CartSettings<'_> {
    /// Recommendations to show in the cart; zero when the feature is off.
    #[must_use]
    pub fn recommendation_slots(&self) -> u32 {
        if self.features.recommendations {
            self.recommendation_count
        } else {
            0
        }
    }

    /// The cart note to pass on with an order, if notes are enabled.
    #[must_use]
    pub fn order_note<'c>(&self, cart: &'c Cart<'_>) -> Option<&'c str> {
        if self.features.order_notes {
            cart.note()
        } else {
            None
        }
    }
}

impl Default for CartSettings<'static> {
    fn default() -> Self {
        Self::defaults(rusty_money::iso::SAR)
    }
}

/// Settings in YAML
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    currency: Option<String>,
    free_shipping_threshold: Option<String>,
    gift_threshold: Option<String>,
    max_gifts: Option<u32>,
    recommendation_count: Option<u32>,
    tax_rate: Option<String>,
    tax_base: Option<TaxBase>,
    delivery_fees: DeliveryFeesFile,
    features: Option<CartFeatures>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DeliveryFeesFile {
    standard: Option<String>,
    express: Option<String>,
    economy: Option<String>,
}

impl SettingsFile {
    fn into_settings(self) -> Result<CartSettings<'static>, SettingsError> {
        let currency = match &self.currency {
            Some(code) => parse_currency(code)?,
            None => rusty_money::iso::SAR,
        };

        let defaults = CartSettings::defaults(currency);
        let amount = |field, value: Option<String>, default| match value {
            Some(value) => parse_amount(field, &value, currency),
            None => Ok(default),
        };

        let settings = CartSettings {
            currency,
            free_shipping_threshold: amount(
                "free_shipping_threshold",
                self.free_shipping_threshold,
                defaults.free_shipping_threshold,
            )?,
            gift_threshold: amount("gift_threshold", self.gift_threshold, defaults.gift_threshold)?,
            max_gifts: self.max_gifts.unwrap_or(defaults.max_gifts),
            recommendation_count: self
                .recommendation_count
                .unwrap_or(defaults.recommendation_count),
            delivery_fees: DeliveryFees {
                standard: amount(
                    "delivery_fees.standard",
                    self.delivery_fees.standard,
                    defaults.delivery_fees.standard,
                )?,
                express: amount(
                    "delivery_fees.express",
                    self.delivery_fees.express,
                    defaults.delivery_fees.express,
                )?,
                economy: amount(
                    "delivery_fees.economy",
                    self.delivery_fees.economy,
                    defaults.delivery_fees.economy,
                )?,
            },
            tax_rate: match &self.tax_rate {
                Some(rate) => parse_percentage(rate)?,
                None => defaults.tax_rate,
            },
            tax_base: self.tax_base.unwrap_or(DEFAULT_TAX_BASE),
            features: self.features.unwrap_or_default(),
        };

        if settings.gift_threshold.to_minor_units() > settings.free_shipping_threshold.to_minor_units()
        {
            return Err(SettingsError::InvalidGiftBand);
        }

        let rate = settings.tax_rate * Decimal::ONE;

        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(SettingsError::InvalidTaxRate);
        }

        Ok(settings)
    }
}

fn parse_amount(
    field: &'static str,
    value: &str,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, SettingsError> {
    let (minor, found) = parse_price(value)?;

    if found != currency {
        return Err(SettingsError::CurrencyMismatch {
            field,
            found: found.iso_alpha_code,
            expected: currency.iso_alpha_code,
        });
    }

    if minor < 0 {
        return Err(SettingsError::Negative(field));
    }

    Ok(Money::from_minor(minor, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{SAR, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_match_storefront_values() {
        let settings = CartSettings::default();

        assert_eq!(settings.currency, SAR);
        assert_eq!(settings.free_shipping_threshold, Money::from_minor(150_00, SAR));
        assert_eq!(settings.gift_threshold, Money::from_minor(100_00, SAR));
        assert_eq!(settings.max_gifts, 1);
        assert_eq!(settings.delivery_fees, DeliveryFees::standard_rates(SAR));
        assert_eq!(settings.tax_rate, Percentage::from(Decimal::new(15, 2)));
        assert_eq!(settings.tax_base, TaxBase::Subtotal);
        assert!(settings.features.free_gifts);
    }

    #[test]
    fn empty_document_yields_defaults() -> TestResult {
        let settings = CartSettings::from_yaml_str("{}")?;

        assert_eq!(settings.free_shipping_threshold, Money::from_minor(150_00, SAR));
        assert_eq!(settings.recommendation_count, 4);

        Ok(())
    }

    #[test]
    fn overrides_are_applied() -> TestResult {
        let settings = CartSettings::from_yaml_str(
            "
free_shipping_threshold: 200.00 SAR
gift_threshold: 120 SAR
max_gifts: 2
tax_rate: 5%
tax_base: discounted_subtotal
delivery_fees:
  express: 90.00 SAR
features:
  free_gifts: false
",
        )?;

        assert_eq!(settings.free_shipping_threshold, Money::from_minor(200_00, SAR));
        assert_eq!(settings.gift_threshold, Money::from_minor(120_00, SAR));
        assert_eq!(settings.max_gifts, 2);
        assert_eq!(settings.tax_rate, Percentage::from(Decimal::new(5, 2)));
        assert_eq!(settings.tax_base, TaxBase::DiscountedSubtotal);
        assert_eq!(settings.delivery_fees.express, Money::from_minor(90_00, SAR));
        assert_eq!(settings.delivery_fees.standard, Money::from_minor(50_00, SAR));
        assert!(!settings.features.free_gifts);
        assert!(settings.features.order_notes);

        Ok(())
    }

    #[test]
    fn currency_switch_rebases_defaults() -> TestResult {
        let settings = CartSettings::from_yaml_str("currency: USD")?;

        assert_eq!(settings.currency, USD);
        assert_eq!(settings.delivery_fees.economy, Money::from_minor(25_00, USD));

        Ok(())
    }

    #[test]
    fn mismatched_currency_is_rejected() {
        let result = CartSettings::from_yaml_str("gift_threshold: 100.00 USD");

        assert!(matches!(
            result,
            Err(SettingsError::CurrencyMismatch { field: "gift_threshold", .. })
        ));
    }

    #[test]
    fn inverted_gift_band_is_rejected() {
        let result = CartSettings::from_yaml_str(
            "free_shipping_threshold: 100 SAR\ngift_threshold: 150 SAR",
        );

        assert!(matches!(result, Err(SettingsError::InvalidGiftBand)));
    }

    #[test]
    fn negative_fee_is_rejected() {
        let result = CartSettings::from_yaml_str("delivery_fees:\n  economy: -1 SAR");

        assert!(matches!(
            result,
            Err(SettingsError::Negative("delivery_fees.economy"))
        ));
    }

    #[test]
    fn tax_rate_above_one_is_rejected() {
        let result = CartSettings::from_yaml_str("tax_rate: 150%");

        assert!(matches!(result, Err(SettingsError::InvalidTaxRate)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = CartSettings::from_yaml_str("free_shiping_threshold: 100 SAR");

        assert!(matches!(result, Err(SettingsError::Yaml(_))));
    }

    #[test]
    fn disabled_features_hide_notes_and_recommendations() -> TestResult {
        let mut cart = Cart::new(SAR);
        cart.set_note(Some("Ring twice".to_string()))?;

        let enabled = CartSettings::default();
        let disabled = CartSettings::from_yaml_str(
            "features:\n  recommendations: false\n  order_notes: false",
        )?;

        assert_eq!(enabled.order_note(&cart), Some("Ring twice"));
        assert_eq!(enabled.recommendation_slots(), 4);
        assert_eq!(disabled.order_note(&cart), None);
        assert_eq!(disabled.recommendation_slots(), 0);

        Ok(())
    }

    #[test]
    fn from_path_reads_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("settings.yml");
        fs::write(&path, "max_gifts: 3\n")?;

        let settings = CartSettings::from_path(&path)?;

        assert_eq!(settings.max_gifts, 3);

        Ok(())
    }
}
