//! Free Gifts
//!
//! Carts whose subtotal falls inside the gift band (from the gift threshold up to, but not
//! including, the free-shipping threshold) may carry a complimentary item. Gift lines are priced
//! at zero and never count towards the subtotal, so adding one cannot change the cart's own
//! eligibility.

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartLine, CartLineId, ReferenceKind},
    settings::CartSettings,
};

/// Errors raised when selecting a gift.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GiftError {
    /// The cart is outside the gift band, or gifts are switched off.
    #[error("cart is not eligible for a free gift")]
    NotEligible,

    /// The gift line could not be added to the cart.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A complimentary item shown on the gift shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftOffer {
    /// Line id the gift takes when selected
    pub id: CartLineId,

    /// Catalog collection of the gift
    pub reference_kind: ReferenceKind,

    /// Catalog id of the gift
    pub reference_id: String,

    /// Display name
    pub name: String,
}

impl GiftOffer {
    fn matches(&self, line: &CartLine<'_>) -> bool {
        line.is_free_gift()
            && line.reference_kind() == self.reference_kind
            && line.reference_id() == Some(self.reference_id.as_str())
    }
}

/// Gift band and selection rule.
#[derive(Debug, Clone, Copy)]
pub struct FreeGiftRule<'a> {
    settings: CartSettings<'a>,
}

impl<'a> FreeGiftRule<'a> {
    /// Create a rule using the given settings.
    #[must_use]
    pub fn new(settings: CartSettings<'a>) -> Self {
        Self { settings }
    }

    /// Whether a cart with this subtotal may carry a gift.
    #[must_use]
    pub fn is_eligible(&self, subtotal: &Money<'a, Currency>) -> bool {
        if !self.settings.features.free_gifts || self.settings.max_gifts == 0 {
            return false;
        }

        if subtotal.currency() != self.settings.currency {
            return false;
        }

        let subtotal = subtotal.to_minor_units();

        subtotal >= self.settings.gift_threshold.to_minor_units()
            && subtotal < self.settings.free_shipping_threshold.to_minor_units()
    }

    /// Toggle `offer` in the cart.
    ///
    /// If the offer is already in the cart it is removed, whether or not the cart is still
    /// eligible. Otherwise the oldest gift lines are dropped until there is room, and the offer is
    /// appended as a zero-priced gift line.
    ///
    /// # Errors
    ///
    /// Returns [`GiftError::NotEligible`] when adding a gift to a cart outside the band, or
    /// [`GiftError::Cart`] if the gift line cannot be added.
    pub fn select_gift(&self, cart: &Cart<'a>, offer: &GiftOffer) -> Result<Cart<'a>, GiftError> {
        let mut next = cart.clone();

        if cart.gift_lines().any(|line| offer.matches(line)) {
            next.retain_lines(|line| !offer.matches(line));

            return Ok(next);
        }

        if !self.is_eligible(&cart.subtotal()?) {
            return Err(GiftError::NotEligible);
        }

        let max_gifts = usize::try_from(self.settings.max_gifts).unwrap_or(usize::MAX);
        let mut excess = (next.gift_lines().count() + 1).saturating_sub(max_gifts);

        next.retain_lines(|line| {
            if line.is_free_gift() && excess > 0 {
                excess -= 1;
                return false;
            }

            true
        });

        next.add_line(CartLine::gift(
            offer.id.clone(),
            offer.reference_kind,
            offer.reference_id.clone(),
            offer.name.clone(),
            next.currency(),
        ))?;

        Ok(next)
    }

    /// Drop every gift line once the cart has left the gift band.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Overflow`] if the subtotal cannot be calculated.
    pub fn reconcile(&self, cart: &Cart<'a>) -> Result<Cart<'a>, CartError> {
        let mut next = cart.clone();

        if !self.is_eligible(&cart.subtotal()?) {
            next.retain_lines(|line| !line.is_free_gift());
        }

        Ok(next)
    }
}
