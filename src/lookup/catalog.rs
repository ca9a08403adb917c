// file: src/lookup/catalog.rs
// description: in-memory keyword index loaded from a json catalog file
// reference: serde_json file loading with a hashmap inverted index

use crate::error::{ResolverError, Result};
use crate::lookup::LookupClient;
use crate::models::{Keyword, VideoRecord};
use crate::utils::Validator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub videos: Vec<VideoRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub records: usize,
    pub distinct_keywords: usize,
    pub malformed_urls: Vec<String>,
}

/// Keyword index over a fixed set of records.
///
/// Matching mirrors an array-contains query: exact and case-sensitive.
/// Results keep catalog order and are truncated to `limit`.
#[derive(Debug, Clone)]
pub struct CatalogLookup {
    records: Vec<VideoRecord>,
    index: HashMap<String, Vec<usize>>,
    limit: usize,
}

impl CatalogLookup {
    pub fn from_records(records: Vec<VideoRecord>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();

        for (position, record) in records.iter().enumerate() {
            for keyword in &record.keywords {
                let entries = index.entry(keyword.clone()).or_default();
                // a record listing the same keyword twice is returned once
                if entries.last() != Some(&position) {
                    entries.push(position);
                }
            }
        }

        Self {
            records,
            index,
            limit: usize::MAX,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ResolverError::Catalog {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let catalog: CatalogFile =
            serde_json::from_str(&content).map_err(|e| ResolverError::Catalog {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        info!(
            "Loaded {} video records from {}",
            catalog.videos.len(),
            path.display()
        );

        Ok(Self::from_records(catalog.videos))
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, keyword: &str) -> Vec<VideoRecord> {
        self.index
            .get(keyword)
            .map(|positions| {
                positions
                    .iter()
                    .take(self.limit)
                    .map(|&position| self.records[position].clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn stats(&self) -> CatalogStats {
        let malformed_urls = self
            .records
            .iter()
            .filter(|record| Validator::validate_video_url(&record.video_url).is_err())
            .map(|record| record.video_url.clone())
            .collect();

        CatalogStats {
            records: self.records.len(),
            distinct_keywords: self.index.len(),
            malformed_urls,
        }
    }
}

#[async_trait]
impl LookupClient for CatalogLookup {
    async fn lookup(&self, keyword: &Keyword) -> Result<Vec<VideoRecord>> {
        let records = self.find(keyword.as_str());
        debug!("Catalog lookup '{}' -> {} record(s)", keyword, records.len());
        Ok(records)
    }

    fn name(&self) -> &str {
        "catalog"
    }
}
