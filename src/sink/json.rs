// file: src/sink/json.rs
// description: machine readable json record of a search result

use crate::error::Result;
use crate::models::{Keyword, ResolvedResult};
use crate::pipeline::{KeywordReport, Resolution, ResolutionStats};
use crate::sink::ResultSink;
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ResolutionRecord<'a> {
    pub search_id: Uuid,
    #[serde(flatten)]
    pub result: &'a ResolvedResult,
    pub keyword: Option<&'a Keyword>,
    pub resolved_at: String,
    pub stats: &'a ResolutionStats,
    /// Percentage of dispatched keywords that matched
    pub match_rate: f64,
    pub keywords: &'a [KeywordReport],
}

impl<'a> ResolutionRecord<'a> {
    pub fn new(resolution: &'a Resolution) -> Self {
        Self {
            search_id: resolution.search_id,
            result: &resolution.result,
            keyword: resolution.winner.as_ref(),
            resolved_at: Utc::now().to_rfc3339(),
            stats: &resolution.stats,
            match_rate: resolution.stats.match_rate(),
            keywords: &resolution.keywords,
        }
    }
}

/// Writes the record to stdout, or to `output` when set.
#[derive(Debug, Clone, Default)]
pub struct JsonSink {
    output: Option<PathBuf>,
    pretty: bool,
}

impl JsonSink {
    pub fn new(output: Option<PathBuf>, pretty: bool) -> Self {
        Self { output, pretty }
    }

    pub fn render(&self, resolution: &Resolution) -> Result<String> {
        let record = ResolutionRecord::new(resolution);
        let json = if self.pretty {
            serde_json::to_string_pretty(&record)?
        } else {
            serde_json::to_string(&record)?
        };
        Ok(json)
    }
}

#[async_trait]
impl ResultSink for JsonSink {
    async fn deliver(&self, resolution: &Resolution) -> Result<()> {
        let json = self.render(resolution)?;

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(path, format!("{}\n", json)).await?;
                info!("Wrote search result to {}", path.display());
            }
            None => println!("{}", json),
        }

        Ok(())
    }
}
