//! Checkout Form
//!
//! Shipping details, delivery and payment choices collected before an order is created, and the
//! field-level checks that gate submission.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::delivery::DeliveryOption;

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card payment
    #[default]
    Card,

    /// Tabby instalments
    Tabby,

    /// Tap payments
    Tap,
}

impl PaymentMethod {
    /// Payment endpoint segment for this method.
    #[must_use]
    pub const fn gateway_slug(self) -> &'static str {
        match self {
            Self::Card => "urways",
            Self::Tabby => "tabby",
            Self::Tap => "tap",
        }
    }

    /// Lowercase method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Tabby => "tabby",
            Self::Tap => "tap",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown payment method name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment method: {0}")]
pub struct UnknownPaymentMethod(pub String);

impl FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "tabby" => Ok(Self::Tabby),
            "tap" => Ok(Self::Tap),
            _ => Err(UnknownPaymentMethod(s.to_string())),
        }
    }
}

/// Where the order is delivered and who receives it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Recipient name
    pub full_name: String,

    /// Contact phone number
    pub phone: String,

    /// Contact email, used for the payment receipt
    pub email: String,

    /// City
    pub city: String,

    /// District
    pub district: String,

    /// Street and building
    pub street: String,

    /// Postal code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Everything the customer fills in at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    /// Shipping details
    pub address: ShippingAddress,

    /// Chosen delivery option
    pub delivery: DeliveryOption,

    /// Chosen payment method
    pub payment_method: PaymentMethod,

    /// Terms and conditions accepted
    pub accept_terms: bool,
}

/// A checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckoutField {
    /// Recipient name
    FullName,
    /// Contact phone number
    Phone,
    /// Contact email
    Email,
    /// City
    City,
    /// District
    District,
    /// Street and building
    Street,
    /// Terms checkbox
    AcceptTerms,
}

impl CheckoutField {
    /// Human readable field label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FullName => "Full name",
            Self::Phone => "Phone",
            Self::Email => "Email",
            Self::City => "City",
            Self::District => "District",
            Self::Street => "Street",
            Self::AcceptTerms => "Terms and conditions",
        }
    }
}

/// A problem with one field.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FieldError {
    /// A required field is blank
    #[error("{} is required", .0.label())]
    Required(CheckoutField),

    /// Email has no usable `local@domain.tld` shape
    #[error("Email address is not valid")]
    InvalidEmail,

    /// Phone is not 9 to 15 digits
    #[error("Phone number is not valid")]
    InvalidPhone,

    /// Terms checkbox left unticked
    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,
}

impl FieldError {
    /// Field the error belongs to.
    #[must_use]
    pub const fn field(&self) -> CheckoutField {
        match self {
            Self::Required(field) => *field,
            Self::InvalidEmail => CheckoutField::Email,
            Self::InvalidPhone => CheckoutField::Phone,
            Self::TermsNotAccepted => CheckoutField::AcceptTerms,
        }
    }
}

/// All field errors found on a form, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.messages().join("; "))]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    /// The individual errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Error for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: CheckoutField) -> Option<&FieldError> {
        self.0.iter().find(|error| error.field() == field)
    }

    /// User-facing messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let digits: String = digits.chars().filter(|c| *c != ' ' && *c != '-').collect();

    (9..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Check the form before anything is sent to the order backend.
///
/// # Errors
///
/// Returns every field error found, not just the first.
pub fn validate_form(form: &CheckoutForm) -> Result<(), FormErrors> {
    let address = &form.address;
    let mut errors = Vec::new();

    let required = [
        (CheckoutField::FullName, &address.full_name),
        (CheckoutField::Phone, &address.phone),
        (CheckoutField::Email, &address.email),
        (CheckoutField::City, &address.city),
        (CheckoutField::District, &address.district),
        (CheckoutField::Street, &address.street),
    ];

    for (field, value) in required {
        let value = value.trim();

        if value.is_empty() {
            errors.push(FieldError::Required(field));
            continue;
        }

        match field {
            CheckoutField::Email if !is_valid_email(value) => errors.push(FieldError::InvalidEmail),
            CheckoutField::Phone if !is_valid_phone(value) => errors.push(FieldError::InvalidPhone),
            _ => {}
        }
    }

    if !form.accept_terms {
        errors.push(FieldError::TermsNotAccepted);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FormErrors(errors))
    }
}
