// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod orchestrator;
mod policy;
mod stats;

pub use orchestrator::{KeywordReport, Resolution, SearchOrchestrator};
pub use policy::{Candidate, CandidateSlot, TieBreak};
pub use stats::{ResolutionStats, StatsTracker};
