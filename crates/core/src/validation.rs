//! Cart Validation
//!
//! Cart lines are re-checked against the live catalog twice: a lenient pass when the cart is
//! loaded, which quietly prunes withdrawn lines, and a strict pass right before payment, which
//! blocks checkout on anything it cannot confirm. Both passes work from the same per-line
//! [`LineResolution`]s but treat them differently:
//!
//! | resolution     | lenient pass  | strict pass                                   |
//! |----------------|---------------|-----------------------------------------------|
//! | `Available`    | keep          | valid                                         |
//! | `Withdrawn`    | remove        | `"<name>" is no longer available`             |
//! | `Unreachable`  | keep          | `"<name>" could not be verified, please try again` |
//! | `Unreferenced` | keep          | `"<name>" cannot be verified`                 |

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::cart::{Cart, CartLine, CartLineId};

/// Outcome of looking a cart line up in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineResolution {
    /// The catalog has an active record for the line.
    Available,

    /// The catalog definitively reports the record as missing or inactive.
    Withdrawn {
        /// Catalog message, if any
        reason: Option<String>,
    },

    /// The lookup failed for a transient reason (transport error, server error, bad response).
    Unreachable {
        /// Description of the failure
        error: String,
    },

    /// The line carries no catalog reference, so nothing was looked up.
    Unreferenced,
}

/// A line removed by the lenient pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovedLine {
    /// Id of the removed line
    pub id: CartLineId,

    /// Display name of the removed line
    pub name: String,

    /// Catalog message, if any
    pub reason: Option<String>,
}

/// Result of the lenient pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanupReport<'a> {
    /// The pruned cart
    pub cart: Cart<'a>,

    /// Lines that were dropped, in cart order
    pub removed: Vec<RemovedLine>,
}

impl CleanupReport<'_> {
    /// Non-blocking message for the customer, if anything was removed.
    #[must_use]
    pub fn notice(&self) -> Option<String> {
        match self.removed.as_slice() {
            [] => None,
            [line] => Some(format!(
                "\"{}\" was removed from your cart because it is no longer available",
                line.name
            )),
            lines => Some(format!(
                "{} items were removed from your cart because they are no longer available: {}",
                lines.len(),
                lines
                    .iter()
                    .map(|line| format!("\"{}\"", line.name))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Result of the strict pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport<'a> {
    /// Lines the catalog confirmed
    pub valid_lines: Vec<CartLine<'a>>,

    /// One message per line that could not be confirmed, in cart order
    pub errors: Vec<String>,
}

impl ValidationReport<'_> {
    /// Whether checkout may proceed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn resolution_for<'r>(
    line: &CartLine<'_>,
    resolutions: &'r FxHashMap<CartLineId, LineResolution>,
) -> &'r LineResolution {
    const UNREFERENCED: &LineResolution = &LineResolution::Unreferenced;
    const MISSING: &LineResolution = &LineResolution::Unreachable {
        error: String::new(),
    };

    match resolutions.get(line.id()) {
        Some(resolution) => resolution,
        None if line.reference_id().is_none() => UNREFERENCED,
        None => MISSING,
    }
}

/// Prune a cart on load.
///
/// Withdrawn lines are removed; everything else is kept. A referenced line without a resolution
/// is treated as unreachable.
#[must_use]
pub fn lenient_pass<'a>(
    cart: &Cart<'a>,
    resolutions: &FxHashMap<CartLineId, LineResolution>,
) -> CleanupReport<'a> {
    let removed: Vec<RemovedLine> = cart
        .iter()
        .filter_map(|line| match resolution_for(line, resolutions) {
            LineResolution::Withdrawn { reason } => Some(RemovedLine {
                id: line.id().clone(),
                name: line.name().to_string(),
                reason: reason.clone(),
            }),
            _ => None,
        })
        .collect();

    let mut pruned = cart.clone();
    pruned.retain_lines(|line| !removed.iter().any(|r| &r.id == line.id()));

    CleanupReport {
        cart: pruned,
        removed,
    }
}

/// Confirm every line before payment.
///
/// Only lines the catalog reports as available are valid. A referenced line without a resolution
/// is treated as unreachable. The cart itself is never modified.
#[must_use]
pub fn strict_pass<'a>(
    cart: &Cart<'a>,
    resolutions: &FxHashMap<CartLineId, LineResolution>,
) -> ValidationReport<'a> {
    let mut valid_lines = Vec::with_capacity(cart.len());
    let mut errors = Vec::new();

    for line in cart.iter() {
        let name = line.name();

        match resolution_for(line, resolutions) {
            LineResolution::Available => valid_lines.push(line.clone()),
            LineResolution::Withdrawn { .. } => {
                errors.push(format!("\"{name}\" is no longer available"));
            }
            LineResolution::Unreachable { .. } => {
                errors.push(format!("\"{name}\" could not be verified, please try again"));
            }
            LineResolution::Unreferenced => {
                errors.push(format!("\"{name}\" cannot be verified"));
            }
        }
    }

    ValidationReport {
        valid_lines,
        errors,
    }
}
