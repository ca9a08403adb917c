// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod recognition;
pub mod sink;
pub mod utils;

pub use config::{
    Config, FirestoreConfig, PlaybackConfig, RecognitionConfig, SearchConfig, StoreBackend,
    StoreConfig,
};
pub use error::{ResolverError, Result};
pub use lookup::{CatalogLookup, CatalogStats, FirestoreLookup, LookupClient};
pub use models::{Keyword, RecognizedText, ResolvedResult, SearchOutcome, VideoRecord};
pub use parser::{Tokenizer, tokenize};
pub use pipeline::{
    KeywordReport, Resolution, ResolutionStats, SearchOrchestrator, StatsTracker, TieBreak,
};
pub use recognition::{CommandRecognizer, TextRecognizer};
pub use sink::{ConsoleSink, JsonSink, PlayerSink, ResultSink};
pub use utils::{OperationTimer, Validator};
