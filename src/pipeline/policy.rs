// file: src/pipeline/policy.rs
// description: tie-break policies and the shared candidate slot written by concurrent lookups
// reference: tokio::sync::Mutex guarded single-slot aggregation

use crate::models::{Keyword, VideoRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Rule for choosing one winner among keywords that matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Earliest matching keyword in text order.
    #[default]
    FirstKeyword,
    /// Latest matching keyword in text order.
    LastKeyword,
    /// Whichever matching lookup finished last. Not reproducible across runs.
    LastCompleted,
}

impl TieBreak {
    pub fn replaces(&self, current: Option<&Candidate>, incoming: &Candidate) -> bool {
        let Some(current) = current else {
            return true;
        };

        match self {
            Self::FirstKeyword => incoming.index < current.index,
            Self::LastKeyword => incoming.index > current.index,
            Self::LastCompleted => true,
        }
    }
}

/// A matching keyword together with the first record its lookup returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Position of the keyword in the dispatched sequence.
    pub index: usize,
    pub keyword: Keyword,
    pub record: VideoRecord,
}

/// Holds the current best candidate. Written by every matching lookup,
/// read once after all lookups have finished.
pub struct CandidateSlot {
    policy: TieBreak,
    current: Mutex<Option<Candidate>>,
}

impl CandidateSlot {
    pub fn new(policy: TieBreak) -> Self {
        Self {
            policy,
            current: Mutex::new(None),
        }
    }

    /// Returns true when the offered candidate took the slot.
    pub async fn offer(&self, candidate: Candidate) -> bool {
        let mut current = self.current.lock().await;
        if self.policy.replaces(current.as_ref(), &candidate) {
            *current = Some(candidate);
            true
        } else {
            false
        }
    }

    pub fn into_inner(self) -> Option<Candidate> {
        self.current.into_inner()
    }
}
