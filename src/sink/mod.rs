// file: src/sink/mod.rs
// description: result sinks receiving the single outcome of each search
// reference: internal module structure

pub mod console;
pub mod json;
pub mod player;

pub use console::ConsoleSink;
pub use json::{JsonSink, ResolutionRecord};
pub use player::PlayerSink;

use crate::error::Result;
use crate::pipeline::Resolution;
use async_trait::async_trait;

/// Consumer of a search's final Found/NotFound answer. Called once per search.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn deliver(&self, resolution: &Resolution) -> Result<()>;
}
