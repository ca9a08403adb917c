// file: src/models/outcome.rs
// description: per-keyword lookup outcomes and the final resolved result
// reference: internal data structures

use crate::error::Result;
use crate::models::VideoRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of one keyword's lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Non-empty, in store order.
    Matches(Vec<VideoRecord>),
    Empty,
    Failed(String),
    TimedOut,
}

impl SearchOutcome {
    pub fn from_lookup(result: Result<Vec<VideoRecord>>) -> Self {
        match result {
            Ok(records) if records.is_empty() => Self::Empty,
            Ok(records) => Self::Matches(records),
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    /// First record of a non-empty outcome.
    pub fn first_record(&self) -> Option<&VideoRecord> {
        match self {
            Self::Matches(records) => records.first(),
            _ => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matches(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Matches(_) => "matched",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
            Self::TimedOut => "timed_out",
        }
    }
}

/// The single answer produced per search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "url", rename_all = "snake_case")]
pub enum ResolvedResult {
    Found(String),
    NotFound,
}

impl ResolvedResult {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Found(url) => Some(url),
            Self::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl fmt::Display for ResolvedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(url) => write!(f, "found {}", url),
            Self::NotFound => f.write_str("not found"),
        }
    }
}
