// file: src/lookup/firestore.rs
// description: Firestore REST adapter querying a video collection by keyword
// reference: https://firebase.google.com/docs/firestore/reference/rest/v1/projects.databases.documents/runQuery

use crate::config::FirestoreConfig;
use crate::error::{ResolverError, Result};
use crate::lookup::LookupClient;
use crate::models::{Keyword, VideoRecord};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<FirestoreDocument>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: HashMap<String, FirestoreValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreValue {
    string_value: Option<String>,
    array_value: Option<ArrayValue>,
}

#[derive(Debug, Default, Deserialize)]
struct ArrayValue {
    #[serde(default)]
    values: Vec<FirestoreValue>,
}

pub struct FirestoreLookup {
    client: Client,
    config: FirestoreConfig,
    project_id: String,
    limit: usize,
}

impl FirestoreLookup {
    pub fn new(config: FirestoreConfig, limit: usize) -> Result<Self> {
        let project_id = config
            .project_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                ResolverError::Config("firestore project_id is not set".to_string())
            })?;

        let client = Client::builder()
            .user_agent(concat!("pagecast/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            config,
            project_id,
            limit: limit.max(1),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents:runQuery",
            self.config.base_url.trim_end_matches('/'),
            self.project_id
        )
    }

    fn query_body(&self, keyword: &str) -> Value {
        json!({
            "structuredQuery": {
                "from": [{ "collectionId": self.config.collection }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": self.config.keyword_field },
                        "op": "ARRAY_CONTAINS",
                        "value": { "stringValue": keyword }
                    }
                },
                "limit": self.limit
            }
        })
    }

    /// Decodes a runQuery response, skipping documents without a string URL.
    fn decode_documents(&self, body: Value) -> Result<Vec<VideoRecord>> {
        let items: Vec<RunQueryItem> = serde_json::from_value(body)?;

        let records = items
            .into_iter()
            .filter_map(|item| item.document)
            .filter_map(|document| {
                let url = document
                    .fields
                    .get(&self.config.url_field)
                    .and_then(|value| value.string_value.clone());

                let Some(url) = url else {
                    debug!(
                        "Skipping document {} without a '{}' string field",
                        document.name, self.config.url_field
                    );
                    return None;
                };

                let keywords = document
                    .fields
                    .get(&self.config.keyword_field)
                    .and_then(|value| value.array_value.as_ref())
                    .map(|array| {
                        array
                            .values
                            .iter()
                            .filter_map(|v| v.string_value.clone())
                            .collect()
                    })
                    .unwrap_or_default();

                let title = document
                    .fields
                    .get("title")
                    .and_then(|value| value.string_value.clone());

                let id = document
                    .name
                    .rsplit('/')
                    .next()
                    .unwrap_or(&document.name)
                    .to_string();

                let mut record = VideoRecord::new(keywords, url).with_id(id);
                record.title = title;
                Some(record)
            })
            .take(self.limit)
            .collect();

        Ok(records)
    }
}

#[async_trait]
impl LookupClient for FirestoreLookup {
    async fn lookup(&self, keyword: &Keyword) -> Result<Vec<VideoRecord>> {
        debug!("Firestore query {} for '{}'", self.config.collection, keyword);

        let mut request = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&self.query_body(keyword.as_str()));

        if let Some(api_key) = &self.config.api_key {
            request = request.query(&[("key", api_key)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ResolverError::lookup(keyword.as_str(), e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ResolverError::lookup(
                keyword.as_str(),
                format!("Firestore returned {}: {}", status, error_text),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ResolverError::lookup(keyword.as_str(), e.to_string()))?;

        self.decode_documents(body)
    }

    fn name(&self) -> &str {
        "firestore"
    }
}
