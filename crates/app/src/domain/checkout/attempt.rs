//! Checkout attempts.

use uuid::Uuid;

use crate::uuids::TypedUuid;

pub type AttemptUuid = TypedUuid<CheckoutAttempt>;

/// One press of the "place order" button.
///
/// The attempt's UUID is sent to the order backend as the idempotency key. Resubmitting the same
/// attempt lets the backend recognise a duplicate; a fresh attempt always creates a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutAttempt {
    uuid: AttemptUuid,
}

impl CheckoutAttempt {
    #[must_use]
    pub fn new() -> Self {
        Self::from_uuid(AttemptUuid::now_v7())
    }

    #[must_use]
    pub const fn from_uuid(uuid: AttemptUuid) -> Self {
        Self { uuid }
    }

    #[must_use]
    pub fn uuid(&self) -> AttemptUuid {
        self.uuid
    }

    #[must_use]
    pub fn idempotency_key(&self) -> Uuid {
        self.uuid.into_uuid()
    }
}

impl Default for CheckoutAttempt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_attempt_has_its_own_key() {
        let first = CheckoutAttempt::new();
        let retry = first;

        assert_eq!(first.idempotency_key(), retry.idempotency_key());
        assert_ne!(first.idempotency_key(), CheckoutAttempt::new().idempotency_key());
    }
}
