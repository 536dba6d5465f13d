//! Cart Fixtures

use std::{fs, path::Path};

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    cart::{Cart, CartLine, ReferenceKind},
    fixtures::{FixtureError, parse_currency, parse_price},
};

/// Cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart currency code, `SAR` when omitted
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Optional free-text note
    #[serde(default)]
    pub note: Option<String>,

    /// Cart lines, in display order
    #[serde(default)]
    pub lines: Vec<CartLineFixture>,
}

/// Cart line in YAML
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Line id
    pub id: String,

    /// Catalog collection
    pub kind: ReferenceKind,

    /// Catalog id; omitted for unverifiable lines
    #[serde(default)]
    pub reference: Option<String>,

    /// Display name
    pub name: String,

    /// Unit price (e.g., "100.00 SAR"); ignored for gifts
    #[serde(default)]
    pub price: Option<String>,

    /// Quantity, one when omitted
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Complimentary gift line
    #[serde(default)]
    pub gift: bool,
}

fn default_currency() -> String {
    "SAR".to_string()
}

const fn default_quantity() -> u32 {
    1
}

impl CartFixture {
    /// Parse a cart fixture from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Yaml`] if the document is malformed.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Read and parse a cart fixture file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// Build the cart described by this fixture.
    ///
    /// # Errors
    ///
    /// Returns an error for unparseable prices, unknown currencies, paid lines without a price,
    /// gift lines without a reference, or lines the cart rejects.
    pub fn into_cart(self) -> Result<Cart<'static>, FixtureError> {
        let currency = parse_currency(&self.currency)?;
        let mut cart = Cart::new(currency);

        for fixture in self.lines {
            let line = if fixture.gift {
                let reference = fixture
                    .reference
                    .ok_or_else(|| FixtureError::MissingReference(fixture.id.clone()))?;

                CartLine::gift(fixture.id, fixture.kind, reference, fixture.name, currency)
            } else {
                let price = fixture
                    .price
                    .ok_or_else(|| FixtureError::MissingPrice(fixture.id.clone()))?;

                let (minor, price_currency) = parse_price(&price)?;

                let line = CartLine::new(
                    fixture.id,
                    fixture.kind,
                    fixture.name,
                    Money::from_minor(minor, price_currency),
                )
                .with_quantity(fixture.quantity);

                match fixture.reference {
                    Some(reference) => line.with_reference(reference),
                    None => line,
                }
            };

            cart.add_line(line)?;
        }

        cart.set_note(self.note)?;

        Ok(cart)
    }
}
