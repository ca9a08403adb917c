// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{ResolverError, Result};
use crate::pipeline::TieBreak;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub recognition: RecognitionConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Per-lookup deadline in milliseconds; 0 waits forever.
    pub lookup_timeout_ms: u64,
    pub tie_break: TieBreak,
    /// Upper bound on lookups in flight; unset means one per keyword.
    pub max_in_flight: Option<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Catalog,
    Firestore,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub catalog_path: PathBuf,
    /// Records returned per keyword.
    pub limit: usize,
    pub firestore: FirestoreConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FirestoreConfig {
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub base_url: String,
    pub collection: String,
    pub keyword_field: String,
    pub url_field: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub command: String,
    /// `{image}` is replaced by the image path.
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub command: String,
    /// `{url}` is replaced by the resolved video URL.
    pub args: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lookup_timeout_ms: 10_000,
            tie_break: TieBreak::FirstKeyword,
            max_in_flight: None,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Catalog,
            catalog_path: PathBuf::from("data/videos.json"),
            limit: 1,
            firestore: FirestoreConfig::default(),
        }
    }
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            api_key: None,
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            collection: "videos".to_string(),
            keyword_field: "keywords".to_string(),
            url_field: "videoURL".to_string(),
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            args: vec!["{image}".to_string(), "stdout".to_string()],
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            command: "mpv".to_string(),
            args: vec!["{url}".to_string()],
        }
    }
}

impl SearchConfig {
    pub fn lookup_timeout(&self) -> Option<Duration> {
        if self.lookup_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.lookup_timeout_ms))
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PAGECAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| ResolverError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ResolverError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            search: SearchConfig::default(),
            store: StoreConfig::default(),
            recognition: RecognitionConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.max_in_flight == Some(0) {
            return Err(ResolverError::Config(
                "max_in_flight must be greater than 0".to_string(),
            ));
        }

        if self.store.limit == 0 {
            return Err(ResolverError::Config(
                "store limit must be greater than 0".to_string(),
            ));
        }

        if self.store.backend == StoreBackend::Firestore {
            let missing_project = self
                .store
                .firestore
                .project_id
                .as_deref()
                .is_none_or(|id| id.trim().is_empty());
            if missing_project {
                return Err(ResolverError::Config(
                    "firestore backend requires store.firestore.project_id".to_string(),
                ));
            }
        }

        if self.recognition.command.trim().is_empty() {
            return Err(ResolverError::Config(
                "recognition command must not be empty".to_string(),
            ));
        }

        if self.playback.command.trim().is_empty() {
            return Err(ResolverError::Config(
                "playback command must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
