//! App Context

use std::sync::Arc;

use carbo::settings::{CartSettings, SettingsError};
use thiserror::Error;

use crate::{
    config::AppConfig,
    domain::{
        catalog::{CatalogService, HttpCatalogService},
        checkout::{CheckoutService, CheckoutUrls, CheckoutValidator},
        exchange_orders::{ExchangeOrderAdmin, ExchangeOrdersService, HttpExchangeOrdersService},
        orders::{HttpOrderBackend, OrderBackend},
        payments::{HttpPaymentGateway, PaymentGateway},
    },
    http::ApiClient,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to load cart settings")]
    Settings(#[source] SettingsError),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub orders: Arc<dyn OrderBackend>,
    pub payments: Arc<dyn PaymentGateway>,
    pub exchange_orders: Arc<dyn ExchangeOrdersService>,
    pub settings: CartSettings<'static>,
    pub urls: CheckoutUrls,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the cart settings file cannot be read or is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let settings = match &config.checkout.cart_settings {
            Some(path) => CartSettings::from_path(path).map_err(AppInitError::Settings)?,
            None => CartSettings::default(),
        };

        let client = ApiClient::new(config.api.api_url.clone(), config.api.api_token.clone());

        Ok(Self {
            catalog: Arc::new(HttpCatalogService::new(client.clone())),
            orders: Arc::new(HttpOrderBackend::new(client.clone())),
            payments: Arc::new(HttpPaymentGateway::new(client.clone())),
            exchange_orders: Arc::new(HttpExchangeOrdersService::new(client)),
            settings,
            urls: CheckoutUrls {
                return_url: config.checkout.return_url.clone(),
                cancel_url: config.checkout.cancel_url.clone(),
            },
        })
    }

    #[must_use]
    pub fn validator(&self) -> CheckoutValidator {
        CheckoutValidator::new(Arc::clone(&self.catalog))
    }

    #[must_use]
    pub fn checkout(&self) -> CheckoutService {
        CheckoutService::new(
            self.validator(),
            Arc::clone(&self.orders),
            Arc::clone(&self.payments),
            self.settings,
            self.urls.clone(),
        )
    }

    #[must_use]
    pub fn exchange_order_admin(&self) -> ExchangeOrderAdmin {
        ExchangeOrderAdmin::new(Arc::clone(&self.exchange_orders))
    }
}
