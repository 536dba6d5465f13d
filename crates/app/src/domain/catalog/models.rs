//! Catalog Models

use serde::Deserialize;

/// Current catalog record for a product, bundle or cylinder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRecord {
    #[serde(alias = "_id")]
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default = "active_by_default", alias = "active")]
    pub is_active: bool,
}

const fn active_by_default() -> bool {
    true
}

/// Definitive answer from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Found(CatalogRecord),
    Missing { message: Option<String> },
}

/// `{success, product|bundle|cylinder?, message?}`
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogResponse {
    pub success: bool,

    #[serde(default, alias = "product", alias = "bundle", alias = "cylinder")]
    pub record: Option<CatalogRecord>,

    #[serde(default)]
    pub message: Option<String>,
}

impl CatalogResponse {
    pub(crate) fn into_entry(self) -> CatalogEntry {
        match (self.success, self.record) {
            (true, Some(record)) => CatalogEntry::Found(record),
            _ => CatalogEntry::Missing {
                message: self.message,
            },
        }
    }
}
