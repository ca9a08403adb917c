// file: src/lookup/mod.rs
// description: keyword lookup capability and its store adapters
// reference: internal module structure

pub mod catalog;
pub mod firestore;

pub use catalog::{CatalogLookup, CatalogStats};
pub use firestore::FirestoreLookup;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::Result;
use crate::models::{Keyword, VideoRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// Resolves one keyword to the records indexed under it.
///
/// Implementations must tolerate concurrent calls. An `Err` is a transient
/// store failure and is distinct from an empty result.
#[async_trait]
pub trait LookupClient: Send + Sync {
    async fn lookup(&self, keyword: &Keyword) -> Result<Vec<VideoRecord>>;

    fn name(&self) -> &str {
        "lookup"
    }
}

/// Builds the configured store adapter.
pub fn from_config(config: &StoreConfig) -> Result<Arc<dyn LookupClient>> {
    match config.backend {
        StoreBackend::Catalog => {
            let catalog = CatalogLookup::load(&config.catalog_path)?.with_limit(config.limit);
            Ok(Arc::new(catalog))
        }
        StoreBackend::Firestore => {
            let client = FirestoreLookup::new(config.firestore.clone(), config.limit)?;
            Ok(Arc::new(client))
        }
    }
}
