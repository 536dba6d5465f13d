//! Catalog service.

use async_trait::async_trait;
use carbo::cart::ReferenceKind;
use mockall::automock;

use crate::{
    domain::catalog::{
        errors::CatalogError,
        models::{CatalogEntry, CatalogResponse},
    },
    http::ApiClient,
};

/// API collection a reference kind resolves against.
#[must_use]
pub const fn catalog_path(kind: ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::Product => "products",
        ReferenceKind::Bundle => "bundles",
        ReferenceKind::Cylinder => "co2-cylinders",
    }
}

#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    client: ApiClient,
}

impl HttpCatalogService {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn lookup(&self, kind: ReferenceKind, id: &str) -> Result<CatalogEntry, CatalogError> {
        let path = format!("{}/{id}", catalog_path(kind));
        let response: CatalogResponse = self.client.get_resource(&path).await?;

        Ok(response.into_entry())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Resolve a catalog reference to its current record.
    async fn lookup(&self, kind: ReferenceKind, id: &str) -> Result<CatalogEntry, CatalogError>;
}
