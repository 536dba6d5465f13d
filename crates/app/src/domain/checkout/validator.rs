//! Catalog-backed cart validation.

use std::sync::Arc;

use carbo::{
    cart::{Cart, CartLine, CartLineId},
    validation::{CleanupReport, LineResolution, ValidationReport, lenient_pass, strict_pass},
};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::domain::catalog::{CatalogService, models::CatalogEntry};

/// Resolves cart lines against the live catalog and runs the cleanup and pre-payment passes.
#[derive(Clone)]
pub struct CheckoutValidator {
    catalog: Arc<dyn CatalogService>,
}

impl std::fmt::Debug for CheckoutValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutValidator").finish_non_exhaustive()
    }
}

impl CheckoutValidator {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }

    /// Look a single line up. Lines without a reference are never sent to the catalog.
    pub async fn resolve_line(&self, line: &CartLine<'_>) -> LineResolution {
        let Some(reference_id) = line.reference_id() else {
            return LineResolution::Unreferenced;
        };

        match self.catalog.lookup(line.reference_kind(), reference_id).await {
            Ok(CatalogEntry::Found(record)) if record.is_active => LineResolution::Available,
            Ok(CatalogEntry::Found(_)) => LineResolution::Withdrawn {
                reason: Some("no longer active".to_string()),
            },
            Ok(CatalogEntry::Missing { message }) => LineResolution::Withdrawn { reason: message },
            Err(error) => {
                warn!(
                    line = %line.id(),
                    kind = %line.reference_kind(),
                    reference = reference_id,
                    %error,
                    "catalog lookup failed"
                );

                LineResolution::Unreachable {
                    error: error.to_string(),
                }
            }
        }
    }

    /// Resolve every line of a cart.
    pub async fn resolve_cart(&self, cart: &Cart<'_>) -> FxHashMap<CartLineId, LineResolution> {
        let mut resolutions = FxHashMap::default();

        for line in cart.iter() {
            let resolution = self.resolve_line(line).await;

            resolutions.insert(line.id().clone(), resolution);
        }

        resolutions
    }

    /// Lenient pass run when a cart is loaded.
    pub async fn cleanup_cart<'a>(&self, cart: &Cart<'a>) -> CleanupReport<'a> {
        let resolutions = self.resolve_cart(cart).await;
        let report = lenient_pass(cart, &resolutions);

        if !report.removed.is_empty() {
            debug!(removed = report.removed.len(), "pruned withdrawn cart lines");
        }

        report
    }

    /// Strict pass run immediately before payment.
    pub async fn validate_for_payment<'a>(&self, cart: &Cart<'a>) -> ValidationReport<'a> {
        let resolutions = self.resolve_cart(cart).await;

        strict_pass(cart, &resolutions)
    }
}

#[cfg(test)]
mod tests {
    use carbo::cart::ReferenceKind;
    use rusty_money::{Money, iso::SAR};
    use testresult::TestResult;

    use crate::{
        domain::catalog::{
            CatalogError, HttpCatalogService, MockCatalogService, models::CatalogRecord,
        },
        http::{ApiClient, ApiError},
        test::server::serve_once,
    };

    use super::*;

    fn record(id: &str, is_active: bool) -> CatalogEntry {
        CatalogEntry::Found(CatalogRecord {
            id: id.to_string(),
            name: None,
            is_active,
        })
    }

    fn unreachable() -> CatalogError {
        CatalogError::Unavailable(ApiError::Server {
            status: 503,
            body: "maintenance".to_string(),
        })
    }

    fn cart() -> TestResult<Cart<'static>> {
        Ok(Cart::with_lines(
            [
                CartLine::new(
                    "l1",
                    ReferenceKind::Product,
                    "Soda maker",
                    Money::from_minor(100_00, SAR),
                )
                .with_reference("p-1"),
                CartLine::new(
                    "l2",
                    ReferenceKind::Bundle,
                    "Winter bundle",
                    Money::from_minor(89_00, SAR),
                )
                .with_reference("b-1"),
                CartLine::new(
                    "l3",
                    ReferenceKind::Cylinder,
                    "CO2 cylinder",
                    Money::from_minor(35_00, SAR),
                ),
            ],
            SAR,
        )?)
    }

    #[tokio::test]
    async fn unreferenced_lines_skip_the_catalog() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog.expect_lookup().never();

        let validator = CheckoutValidator::new(Arc::new(catalog));
        let line = CartLine::new(
            "l3",
            ReferenceKind::Cylinder,
            "CO2 cylinder",
            Money::from_minor(35_00, SAR),
        );

        assert_eq!(
            validator.resolve_line(&line).await,
            LineResolution::Unreferenced
        );

        Ok(())
    }

    #[tokio::test]
    async fn inactive_record_is_withdrawn() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_lookup()
            .once()
            .withf(|kind, id| *kind == ReferenceKind::Product && id == "p-1")
            .return_once(|_, _| Ok(record("p-1", false)));

        let validator = CheckoutValidator::new(Arc::new(catalog));
        let line = CartLine::new(
            "l1",
            ReferenceKind::Product,
            "Soda maker",
            Money::from_minor(100_00, SAR),
        )
        .with_reference("p-1");

        assert!(matches!(
            validator.resolve_line(&line).await,
            LineResolution::Withdrawn { .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn cleanup_keeps_lines_it_could_not_check() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_lookup()
            .once()
            .withf(|kind, id| *kind == ReferenceKind::Product && id == "p-1")
            .return_once(|_, _| Err(unreachable()));

        catalog
            .expect_lookup()
            .once()
            .withf(|kind, id| *kind == ReferenceKind::Bundle && id == "b-1")
            .return_once(|_, _| {
                Ok(CatalogEntry::Missing {
                    message: Some("Bundle not found".to_string()),
                })
            });

        let validator = CheckoutValidator::new(Arc::new(catalog));

        let report = validator.cleanup_cart(&cart()?).await;

        assert_eq!(report.cart.len(), 2);
        assert!(report.cart.line(&CartLineId::new("l1")).is_some());
        assert!(report.cart.line(&CartLineId::new("l3")).is_some());
        assert_eq!(report.removed.len(), 1);
        assert_eq!(report.removed[0].reason.as_deref(), Some("Bundle not found"));
        assert_eq!(
            report.notice().as_deref(),
            Some("\"Winter bundle\" was removed from your cart because it is no longer available")
        );

        Ok(())
    }

    #[tokio::test]
    async fn payment_check_blocks_on_anything_unconfirmed() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_lookup()
            .once()
            .withf(|kind, id| *kind == ReferenceKind::Product && id == "p-1")
            .return_once(|_, _| Err(unreachable()));

        catalog
            .expect_lookup()
            .once()
            .withf(|kind, id| *kind == ReferenceKind::Bundle && id == "b-1")
            .return_once(|_, _| Ok(record("b-1", true)));

        let validator = CheckoutValidator::new(Arc::new(catalog));
        let cart = cart()?;

        let report = validator.validate_for_payment(&cart).await;

        assert!(!report.is_valid());
        assert_eq!(report.valid_lines.len(), 1);
        assert_eq!(
            report.errors,
            [
                "\"Soda maker\" could not be verified, please try again",
                "\"CO2 cylinder\" cannot be verified",
            ]
        );
        assert_eq!(cart.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn cleanup_keeps_lines_when_the_catalog_refuses_to_answer() -> TestResult {
        let line = CartLine::new(
            "l1",
            ReferenceKind::Product,
            "Soda maker",
            Money::from_minor(100_00, SAR),
        )
        .with_reference("p-1");

        for status in [401, 403, 429, 503] {
            let (base_url, _request) = serve_once(
                status,
                r#"{"success": false, "message": "Too many requests, please try again later."}"#,
            )
            .await?;

            let validator = CheckoutValidator::new(Arc::new(HttpCatalogService::new(
                ApiClient::new(base_url, None),
            )));

            let report = validator
                .cleanup_cart(&Cart::with_lines([line.clone()], SAR)?)
                .await;

            assert_eq!(report.cart.len(), 1, "{status} removed the line");
            assert!(report.removed.is_empty(), "{status} removed the line");
        }

        Ok(())
    }
}
