// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod keyword;
pub mod outcome;
pub mod video_record;

pub use keyword::{Keyword, RecognizedText};
pub use outcome::{ResolvedResult, SearchOutcome};
pub use video_record::VideoRecord;
