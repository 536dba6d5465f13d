//! Carbo prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, CartLineId, ReferenceKind},
    checkout::{CheckoutField, CheckoutForm, FieldError, FormErrors, PaymentMethod, ShippingAddress},
    delivery::{DeliveryFees, DeliveryOption},
    discounts::{Coupon, DiscountError},
    gifts::{FreeGiftRule, GiftError, GiftOffer},
    lifecycle::{CylinderStatus, OrderStatus, PaymentStatus, TransitionError},
    pricing::{PricedOrder, PricingEngine, PricingError},
    settings::{CartFeatures, CartSettings, SettingsError, TaxBase},
    validation::{
        CleanupReport, LineResolution, RemovedLine, ValidationReport, lenient_pass, strict_pass,
    },
};
