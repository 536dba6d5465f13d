//! Cart

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of the free-text cart note, in characters.
pub const MAX_NOTE_CHARS: usize = 500;

/// Errors related to cart construction or mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line's currency differs from the cart currency (line, line currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(CartLineId, &'static str, &'static str),

    /// A line was priced below zero.
    #[error("Line {0} has a negative unit price")]
    NegativePrice(CartLineId),

    /// A line was added with a zero quantity.
    #[error("Line {0} has a zero quantity")]
    ZeroQuantity(CartLineId),

    /// A line was not found in the cart.
    #[error("Line {0} not found")]
    LineNotFound(CartLineId),

    /// A different line with the same id is already in the cart.
    #[error("Line {0} already exists")]
    DuplicateLine(CartLineId),

    /// The note exceeds [`MAX_NOTE_CHARS`].
    #[error("Note is {0} characters long; the limit is {MAX_NOTE_CHARS}")]
    NoteTooLong(usize),

    /// Quantity or subtotal arithmetic overflowed.
    #[error("Cart arithmetic overflowed")]
    Overflow,
}

/// Opaque identifier of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLineId(String);

impl CartLineId {
    /// Create a new line id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CartLineId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CartLineId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Catalog collection a cart line resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// A single catalog product.
    Product,

    /// A bundle of products sold together.
    Bundle,

    /// A CO2 cylinder exchange.
    Cylinder,
}

impl ReferenceKind {
    /// Lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Bundle => "bundle",
            Self::Cylinder => "cylinder",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product, bundle or cylinder entry in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    id: CartLineId,
    reference_kind: ReferenceKind,
    reference_id: Option<String>,
    name: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    is_free_gift: bool,
}

impl<'a> CartLine<'a> {
    /// Creates a paid line with a quantity of one and no catalog reference.
    #[must_use]
    pub fn new(
        id: impl Into<CartLineId>,
        reference_kind: ReferenceKind,
        name: impl Into<String>,
        unit_price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            reference_kind,
            reference_id: None,
            name: name.into(),
            unit_price,
            quantity: 1,
            is_free_gift: false,
        }
    }

    /// Creates a complimentary line: zero price, quantity one, flagged as a gift.
    #[must_use]
    pub fn gift(
        id: impl Into<CartLineId>,
        reference_kind: ReferenceKind,
        reference_id: impl Into<String>,
        name: impl Into<String>,
        currency: &'a Currency,
    ) -> Self {
        Self {
            id: id.into(),
            reference_kind,
            reference_id: Some(reference_id.into()),
            name: name.into(),
            unit_price: Money::from_minor(0, currency),
            quantity: 1,
            is_free_gift: true,
        }
    }

    /// Sets the catalog id this line resolves against.
    #[must_use]
    pub fn with_reference(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Sets the quantity of this line.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Line id
    pub fn id(&self) -> &CartLineId {
        &self.id
    }

    /// Catalog collection of the referenced entity
    pub fn reference_kind(&self) -> ReferenceKind {
        self.reference_kind
    }

    /// Catalog id, if the line carries one
    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    /// Display name used in customer-facing messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price captured when the line was added
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Quantity, always at least one once the line is in a cart
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Whether this is a complimentary gift line
    pub fn is_free_gift(&self) -> bool {
        self.is_free_gift
    }

    /// Line total in minor units; gift lines always total zero.
    ///
    /// Returns `None` on overflow.
    pub fn total_minor(&self) -> Option<i64> {
        if self.is_free_gift {
            return Some(0);
        }

        self.unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
    }

    /// Whether `other` refers to the same catalog entity at the same price.
    fn merges_with(&self, other: &CartLine<'_>) -> bool {
        !self.is_free_gift
            && !other.is_free_gift
            && self.reference_id.is_some()
            && self.reference_kind == other.reference_kind
            && self.reference_id == other.reference_id
            && self.unit_price.to_minor_units() == other.unit_price.to_minor_units()
    }
}

/// Customer cart.
///
/// Lines keep insertion order for display. Totals are always derived from the lines and never
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    note: Option<String>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create a new, empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            note: None,
            currency,
        }
    }

    /// Create a new cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if any line fails the checks performed by [`Cart::add_line`].
    pub fn with_lines(
        lines: impl IntoIterator<Item = CartLine<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let mut cart = Cart::new(currency);

        lines.into_iter().try_for_each(|line| cart.add_line(line))?;

        Ok(cart)
    }

    /// Add a line to the cart.
    ///
    /// A paid line referencing the same catalog entity at the same price as an existing line is
    /// merged into it by summing quantities.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when the line has a zero quantity, a negative price, a different
    /// currency, or an id already used by another line.
    pub fn add_line(&mut self, line: CartLine<'a>) -> Result<(), CartError> {
        self.check_line(&line)?;

        if let Some(existing) = self.lines.iter_mut().find(|l| l.merges_with(&line)) {
            existing.quantity = existing
                .quantity
                .checked_add(line.quantity)
                .ok_or(CartError::Overflow)?;

            return Ok(());
        }

        if self.lines.iter().any(|l| l.id == line.id) {
            return Err(CartError::DuplicateLine(line.id));
        }

        self.lines.push(line);

        Ok(())
    }

    /// Change the quantity of a line. A quantity of zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line has the given id.
    pub fn set_quantity(&mut self, id: &CartLineId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_line(id).map(|_removed| ());
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| CartError::LineNotFound(id.clone()))?;

        line.quantity = quantity;

        Ok(())
    }

    /// Remove a line from the cart, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if no line has the given id.
    pub fn remove_line(&mut self, id: &CartLineId) -> Result<CartLine<'a>, CartError> {
        let position = self
            .lines
            .iter()
            .position(|l| &l.id == id)
            .ok_or_else(|| CartError::LineNotFound(id.clone()))?;

        Ok(self.lines.remove(position))
    }

    /// Keep only the lines matching the predicate.
    pub fn retain_lines(&mut self, keep: impl FnMut(&CartLine<'a>) -> bool) {
        self.lines.retain(keep);
    }

    /// Remove every line and the note.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.note = None;
    }

    /// Set or clear the free-text note. Blank notes are stored as no note.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoteTooLong`] if the note exceeds [`MAX_NOTE_CHARS`].
    pub fn set_note(&mut self, note: Option<String>) -> Result<(), CartError> {
        let note = note.filter(|n| !n.trim().is_empty());

        if let Some(n) = &note {
            let chars = n.chars().count();

            if chars > MAX_NOTE_CHARS {
                return Err(CartError::NoteTooLong(chars));
            }
        }

        self.note = note;

        Ok(())
    }

    /// The free-text note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Calculate the subtotal of the paid lines. Gift lines never contribute.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the sum cannot be represented.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        let minor = self.lines.iter().try_fold(0_i64, |acc, line| {
            line.total_minor()
                .and_then(|total| acc.checked_add(total))
                .ok_or(CartError::Overflow)
        })?;

        Ok(Money::from_minor(minor, self.currency))
    }

    /// Total number of units across all lines, gifts included.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Get a line by id.
    #[must_use]
    pub fn line(&self, id: &CartLineId) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|l| &l.id == id)
    }

    /// Iterate over the lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// Iterate over the gift lines.
    pub fn gift_lines(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter().filter(|l| l.is_free_gift)
    }

    /// Get the number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn check_line(&self, line: &CartLine<'_>) -> Result<(), CartError> {
        if line.quantity == 0 {
            return Err(CartError::ZeroQuantity(line.id.clone()));
        }

        let line_currency = line.unit_price.currency();

        if line_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                line.id.clone(),
                line_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if line.unit_price.is_negative() {
            return Err(CartError::NegativePrice(line.id.clone()));
        }

        Ok(())
    }
}
