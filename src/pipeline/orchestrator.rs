// file: src/pipeline/orchestrator.rs
// description: fans keyword lookups out concurrently and resolves a single video
// reference: orchestrates asynchronous lookup workflow

use crate::config::SearchConfig;
use crate::error::Result;
use crate::lookup::LookupClient;
use crate::models::{Keyword, RecognizedText, ResolvedResult, SearchOutcome};
use crate::parser::Tokenizer;
use crate::pipeline::policy::{Candidate, CandidateSlot, TieBreak};
use crate::pipeline::stats::{ResolutionStats, StatsTracker};
use crate::sink::ResultSink;
use crate::utils::{OperationTimer, Validator};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What one keyword's lookup produced, as reported after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordReport {
    pub index: usize,
    pub keyword: Keyword,
    pub outcome: &'static str,
    pub records: usize,
}

/// Outcome of one search invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub search_id: Uuid,
    pub result: ResolvedResult,
    /// Keyword whose record won, if any record was accepted.
    pub winner: Option<Keyword>,
    pub keywords: Vec<KeywordReport>,
    pub stats: ResolutionStats,
}

pub struct SearchOrchestrator {
    lookup: Arc<dyn LookupClient>,
    tokenizer: Tokenizer,
    tie_break: TieBreak,
    lookup_timeout: Option<Duration>,
    max_in_flight: Option<usize>,
}

impl SearchOrchestrator {
    pub fn new(lookup: Arc<dyn LookupClient>, config: &SearchConfig) -> Self {
        Self {
            lookup,
            tokenizer: Tokenizer::new(),
            tie_break: config.tie_break,
            lookup_timeout: config.lookup_timeout(),
            max_in_flight: config.max_in_flight,
        }
    }

    pub fn tokenize(&self, text: &RecognizedText) -> Vec<Keyword> {
        self.tokenizer.tokenize(text)
    }

    pub async fn resolve(&self, keywords: &[Keyword]) -> ResolvedResult {
        self.resolve_detailed(keywords).await.result
    }

    /// Dispatches one lookup per keyword, waits for every one of them, then
    /// applies the tie-break policy. Lookup failures and expired deadlines
    /// count as empty outcomes.
    pub async fn resolve_detailed(&self, keywords: &[Keyword]) -> Resolution {
        let search_id = Uuid::new_v4();

        if keywords.is_empty() {
            info!("Search {}: no keywords, nothing to look up", search_id);
            return Resolution {
                search_id,
                result: ResolvedResult::NotFound,
                winner: None,
                keywords: Vec::new(),
                stats: ResolutionStats::new(),
            };
        }

        info!(
            "Search {}: dispatching {} lookup(s) via {} ({:?})",
            search_id,
            keywords.len(),
            self.lookup.name(),
            self.tie_break
        );

        let timer = OperationTimer::new("keyword resolution");
        let tracker = StatsTracker::new();
        let slot = CandidateSlot::new(self.tie_break);
        let in_flight = self.max_in_flight.unwrap_or(keywords.len()).max(1);

        let tasks = keywords.iter().enumerate().map(|(index, keyword)| {
            let tracker = &tracker;
            let slot = &slot;

            async move {
                tracker.inc_dispatched();
                let outcome = self.lookup_one(keyword).await;
                tracker.record(&outcome);

                if let Some(record) = outcome.first_record() {
                    slot.offer(Candidate {
                        index,
                        keyword: keyword.clone(),
                        record: record.clone(),
                    })
                    .await;
                }

                KeywordReport {
                    index,
                    keyword: keyword.clone(),
                    outcome: outcome.label(),
                    records: match &outcome {
                        SearchOutcome::Matches(records) => records.len(),
                        _ => 0,
                    },
                }
            }
        });

        let mut reports: Vec<KeywordReport> = stream::iter(tasks)
            .buffer_unordered(in_flight)
            .collect()
            .await;
        reports.sort_by_key(|report| report.index);

        let winner = slot.into_inner();
        let stats = tracker.get_stats();
        timer.finish_search(&stats);

        let (result, winner) = match winner {
            Some(candidate) => accept_candidate(search_id, candidate),
            None => (ResolvedResult::NotFound, None),
        };

        info!("Search {}: {}", search_id, result);

        Resolution {
            search_id,
            result,
            winner,
            keywords: reports,
            stats,
        }
    }

    pub async fn resolve_text(&self, text: &RecognizedText) -> Resolution {
        let keywords = self.tokenize(text);
        debug!("Tokenized recognized text into {} keyword(s)", keywords.len());
        self.resolve_detailed(&keywords).await
    }

    /// Tokenizes, resolves and hands the single result to `sink`.
    pub async fn run(&self, text: &RecognizedText, sink: &dyn ResultSink) -> Result<Resolution> {
        let resolution = self.resolve_text(text).await;
        sink.deliver(&resolution).await?;
        Ok(resolution)
    }

    async fn lookup_one(&self, keyword: &Keyword) -> SearchOutcome {
        let lookup = self.lookup.lookup(keyword);

        let outcome = match self.lookup_timeout {
            Some(deadline) => match tokio::time::timeout(deadline, lookup).await {
                Ok(result) => SearchOutcome::from_lookup(result),
                Err(_) => SearchOutcome::TimedOut,
            },
            None => SearchOutcome::from_lookup(lookup.await),
        };

        match &outcome {
            SearchOutcome::Failed(reason) => {
                warn!("Lookup for '{}' failed: {}", keyword, reason);
            }
            SearchOutcome::TimedOut => {
                warn!("Lookup for '{}' exceeded its deadline", keyword);
            }
            other => {
                debug!("Lookup for '{}': {}", keyword, other.label());
            }
        }

        outcome
    }
}

fn accept_candidate(search_id: Uuid, candidate: Candidate) -> (ResolvedResult, Option<Keyword>) {
    let url = candidate.record.video_url;

    match Validator::validate_video_url(&url) {
        Ok(()) => (ResolvedResult::Found(url), Some(candidate.keyword)),
        Err(e) => {
            warn!(
                "Search {}: winning record for '{}' rejected: {}",
                search_id, candidate.keyword, e
            );
            (ResolvedResult::NotFound, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolverError;
    use crate::models::VideoRecord;
    use crate::parser::tokenize;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rand::Rng;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::{Barrier, Mutex};

    enum Reply {
        Records(Vec<&'static str>),
        Fail,
        Hang,
    }

    /// Scripted store: fixed replies per keyword, optional per-keyword delay.
    struct StubLookup {
        replies: HashMap<&'static str, Reply>,
        delays: HashMap<&'static str, u64>,
        calls: AtomicUsize,
    }

    impl StubLookup {
        fn new(replies: Vec<(&'static str, Reply)>) -> Self {
            Self {
                replies: replies.into_iter().collect(),
                delays: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, keyword: &'static str, millis: u64) -> Self {
            self.delays.insert(keyword, millis);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LookupClient for StubLookup {
        async fn lookup(&self, keyword: &Keyword) -> Result<Vec<VideoRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(&millis) = self.delays.get(keyword.as_str()) {
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }

            match self.replies.get(keyword.as_str()) {
                Some(Reply::Records(urls)) => Ok(urls
                    .iter()
                    .map(|url| VideoRecord::new(vec![keyword.to_string()], *url))
                    .collect()),
                Some(Reply::Fail) => Err(ResolverError::lookup(keyword.as_str(), "unavailable")),
                Some(Reply::Hang) => futures::future::pending().await,
                None => Ok(vec![]),
            }
        }
    }

    fn orchestrator(lookup: Arc<dyn LookupClient>) -> SearchOrchestrator {
        SearchOrchestrator::new(lookup, &SearchConfig::default())
    }

    fn orchestrator_with(lookup: Arc<dyn LookupClient>, tie_break: TieBreak) -> SearchOrchestrator {
        let config = SearchConfig {
            tie_break,
            ..SearchConfig::default()
        };
        SearchOrchestrator::new(lookup, &config)
    }

    #[tokio::test]
    async fn test_empty_keywords_dispatch_nothing() {
        let stub = Arc::new(StubLookup::new(vec![("cell", Reply::Records(vec!["https://v/1"]))]));
        let orchestrator = orchestrator(stub.clone());

        let resolution = orchestrator.resolve_text(&RecognizedText::default()).await;

        assert_eq!(resolution.result, ResolvedResult::NotFound);
        assert!(resolution.keywords.is_empty());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_empty_outcomes_resolve_not_found() {
        let stub = Arc::new(StubLookup::new(vec![]));
        let orchestrator = orchestrator(stub.clone());

        let result = orchestrator.resolve(&tokenize("atom nucleus electron")).await;

        assert_eq!(result, ResolvedResult::NotFound);
        assert_eq!(stub.calls(), 3);
    }

    #[tokio::test]
    async fn test_single_match_resolves_found() {
        let stub = Arc::new(StubLookup::new(vec![(
            "cell",
            Reply::Records(vec!["https://v/1", "https://v/2"]),
        )]));
        let orchestrator = orchestrator(stub.clone());

        let resolution = orchestrator
            .resolve_detailed(&tokenize("mitosis cell division"))
            .await;

        assert_eq!(
            resolution.result,
            ResolvedResult::Found("https://v/1".to_string())
        );
        assert_eq!(resolution.winner.as_ref().map(Keyword::as_str), Some("cell"));
        assert_eq!(stub.calls(), 3);

        let outcomes: Vec<&str> = resolution.keywords.iter().map(|r| r.outcome).collect();
        assert_eq!(outcomes, vec!["empty", "matched", "empty"]);
        assert_eq!(resolution.keywords[1].records, 2);
        assert_eq!(resolution.stats.matched, 1);
        assert_eq!(resolution.stats.empty, 2);
    }

    #[tokio::test]
    async fn test_duplicate_keywords_each_dispatched() {
        let stub = Arc::new(StubLookup::new(vec![]));
        let orchestrator = orchestrator(stub.clone());

        orchestrator.resolve(&tokenize("cell cell cell")).await;

        assert_eq!(stub.calls(), 3);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let stub = Arc::new(StubLookup::new(vec![
            ("gravity", Reply::Records(vec!["https://v/g"])),
            ("orbit", Reply::Records(vec!["https://v/o"])),
        ]));
        let orchestrator = orchestrator(stub);
        let keywords = tokenize("gravity and orbit");

        let first = orchestrator.resolve(&keywords).await;
        let second = orchestrator.resolve(&keywords).await;

        assert_eq!(first, second);
        assert_eq!(first, ResolvedResult::Found("https://v/g".to_string()));
    }

    #[tokio::test]
    async fn test_lookup_failure_is_absorbed() {
        let stub = Arc::new(StubLookup::new(vec![
            ("enzyme", Reply::Fail),
            ("protein", Reply::Records(vec!["https://v/p"])),
        ]));
        let orchestrator = orchestrator(stub);

        let resolution = orchestrator.resolve_detailed(&tokenize("enzyme protein")).await;

        assert_eq!(
            resolution.result,
            ResolvedResult::Found("https://v/p".to_string())
        );
        assert_eq!(resolution.stats.failed, 1);
        assert_eq!(resolution.keywords[0].outcome, "failed");
    }

    #[tokio::test]
    async fn test_only_failures_resolve_not_found() {
        let stub = Arc::new(StubLookup::new(vec![
            ("enzyme", Reply::Fail),
            ("protein", Reply::Fail),
        ]));
        let orchestrator = orchestrator(stub);

        let result = orchestrator.resolve(&tokenize("enzyme protein")).await;

        assert_eq!(result, ResolvedResult::NotFound);
    }

    #[tokio::test]
    async fn test_first_keyword_wins_regardless_of_completion_order() {
        let stub = Arc::new(
            StubLookup::new(vec![
                ("acid", Reply::Records(vec!["https://v/acid"])),
                ("base", Reply::Records(vec!["https://v/base"])),
            ])
            .with_delay("acid", 40),
        );
        let orchestrator = orchestrator_with(stub, TieBreak::FirstKeyword);

        let result = orchestrator.resolve(&tokenize("acid base")).await;

        assert_eq!(result, ResolvedResult::Found("https://v/acid".to_string()));
    }

    #[tokio::test]
    async fn test_last_keyword_wins_regardless_of_completion_order() {
        let stub = Arc::new(
            StubLookup::new(vec![
                ("acid", Reply::Records(vec!["https://v/acid"])),
                ("base", Reply::Records(vec!["https://v/base"])),
            ])
            .with_delay("base", 40),
        );
        let orchestrator = orchestrator_with(stub, TieBreak::LastKeyword);

        let result = orchestrator.resolve(&tokenize("acid base")).await;

        assert_eq!(result, ResolvedResult::Found("https://v/base".to_string()));
    }

    #[tokio::test]
    async fn test_last_completed_follows_completion_order() {
        let stub = Arc::new(
            StubLookup::new(vec![
                ("acid", Reply::Records(vec!["https://v/acid"])),
                ("base", Reply::Records(vec!["https://v/base"])),
            ])
            .with_delay("acid", 60),
        );
        let orchestrator = orchestrator_with(stub, TieBreak::LastCompleted);

        let result = orchestrator.resolve(&tokenize("acid base")).await;

        assert_eq!(result, ResolvedResult::Found("https://v/acid".to_string()));
    }

    #[tokio::test]
    async fn test_waits_for_slow_lookups_before_resolving() {
        let stub = Arc::new(
            StubLookup::new(vec![
                ("fast", Reply::Records(vec!["https://v/fast"])),
                ("slow", Reply::Records(vec!["https://v/slow"])),
            ])
            .with_delay("slow", 50),
        );
        let orchestrator = orchestrator_with(stub.clone(), TieBreak::LastKeyword);

        let resolution = orchestrator.resolve_detailed(&tokenize("fast slow")).await;

        assert_eq!(
            resolution.result,
            ResolvedResult::Found("https://v/slow".to_string())
        );
        assert_eq!(resolution.stats.completed(), 2);
    }

    #[tokio::test]
    async fn test_deadline_turns_stuck_lookup_into_empty_outcome() {
        let stub = Arc::new(StubLookup::new(vec![
            ("stuck", Reply::Hang),
            ("cell", Reply::Records(vec!["https://v/1"])),
        ]));
        let config = SearchConfig {
            lookup_timeout_ms: 50,
            ..SearchConfig::default()
        };
        let orchestrator = SearchOrchestrator::new(stub, &config);

        let resolution = tokio::time::timeout(
            Duration::from_secs(5),
            orchestrator.resolve_detailed(&tokenize("stuck cell")),
        )
        .await
        .expect("resolution must not stall on a stuck lookup");

        assert_eq!(
            resolution.result,
            ResolvedResult::Found("https://v/1".to_string())
        );
        assert_eq!(resolution.stats.timed_out, 1);
        assert_eq!(resolution.keywords[0].outcome, "timed_out");
    }

    #[tokio::test]
    async fn test_malformed_winning_url_resolves_not_found() {
        let stub = Arc::new(StubLookup::new(vec![(
            "cell",
            Reply::Records(vec!["videos/cell.mp4"]),
        )]));
        let orchestrator = orchestrator(stub);

        let resolution = orchestrator.resolve_detailed(&tokenize("cell")).await;

        assert_eq!(resolution.result, ResolvedResult::NotFound);
        assert!(resolution.winner.is_none());
        assert_eq!(resolution.stats.matched, 1);
    }

    #[tokio::test]
    async fn test_absolute_urls_of_any_scheme_resolve_found() {
        for url in ["ftp://v/1", "s3://bucket/cell.mp4", "myapp://video/1"] {
            let stub = Arc::new(StubLookup::new(vec![("cell", Reply::Records(vec![url]))]));
            let orchestrator = orchestrator(stub);

            let result = orchestrator.resolve(&tokenize("mitosis cell division")).await;

            assert_eq!(result, ResolvedResult::Found(url.to_string()));
        }
    }

    /// Every lookup waits on a shared barrier, so this only completes when
    /// all of them are in flight at the same time.
    struct BarrierLookup {
        barrier: Barrier,
    }

    #[async_trait]
    impl LookupClient for BarrierLookup {
        async fn lookup(&self, keyword: &Keyword) -> Result<Vec<VideoRecord>> {
            self.barrier.wait().await;
            if keyword.as_str() == "k3" {
                Ok(vec![VideoRecord::new(vec![], "https://v/k3")])
            } else {
                Ok(vec![])
            }
        }
    }

    #[tokio::test]
    async fn test_lookups_are_dispatched_concurrently() {
        let keywords: Vec<Keyword> = (0..8)
            .map(|i| Keyword::new(format!("k{}", i)).unwrap())
            .collect();
        let stub = Arc::new(BarrierLookup {
            barrier: Barrier::new(keywords.len()),
        });
        let config = SearchConfig {
            lookup_timeout_ms: 0,
            ..SearchConfig::default()
        };
        let orchestrator = SearchOrchestrator::new(stub, &config);

        let result = tokio::time::timeout(Duration::from_secs(5), orchestrator.resolve(&keywords))
            .await
            .expect("lookups were not all in flight together");

        assert_eq!(result, ResolvedResult::Found("https://v/k3".to_string()));
    }

    /// Random latencies; records every url it handed out.
    struct JitterLookup {
        handed_out: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LookupClient for JitterLookup {
        async fn lookup(&self, keyword: &Keyword) -> Result<Vec<VideoRecord>> {
            let (delay, hit) = {
                let mut rng = rand::thread_rng();
                (rng.gen_range(0..25u64), rng.gen_bool(0.3))
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if hit {
                let url = format!("https://v/{}", keyword);
                self.handed_out.lock().await.push(url.clone());
                Ok(vec![VideoRecord::new(vec![keyword.to_string()], url)])
            } else {
                Ok(vec![])
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_fifty_keywords_with_random_latency() {
        let keywords: Vec<Keyword> = (0..50)
            .map(|i| Keyword::new(format!("term{}", i)).unwrap())
            .collect();

        for tie_break in [
            TieBreak::FirstKeyword,
            TieBreak::LastKeyword,
            TieBreak::LastCompleted,
        ] {
            let stub = Arc::new(JitterLookup {
                handed_out: Mutex::new(Vec::new()),
            });
            let orchestrator = orchestrator_with(stub.clone(), tie_break);

            let resolution = orchestrator.resolve_detailed(&keywords).await;
            let handed_out = stub.handed_out.lock().await.clone();

            assert_eq!(resolution.stats.keywords_dispatched, 50);
            assert_eq!(resolution.stats.completed(), 50);
            assert_eq!(resolution.keywords.len(), 50);
            assert_eq!(resolution.stats.matched, handed_out.len());

            match &resolution.result {
                ResolvedResult::Found(url) => assert!(handed_out.contains(url)),
                ResolvedResult::NotFound => assert!(handed_out.is_empty()),
            }

            if tie_break == TieBreak::FirstKeyword {
                let first_match = resolution
                    .keywords
                    .iter()
                    .find(|report| report.outcome == "matched")
                    .map(|report| format!("https://v/{}", report.keyword));
                assert_eq!(resolution.result.url().map(str::to_string), first_match);
            }
        }
    }

    #[tokio::test]
    async fn test_max_in_flight_still_resolves_every_keyword() {
        let stub = Arc::new(StubLookup::new(vec![(
            "division",
            Reply::Records(vec!["https://v/d"]),
        )]));
        let config = SearchConfig {
            max_in_flight: Some(1),
            ..SearchConfig::default()
        };
        let orchestrator = SearchOrchestrator::new(stub.clone(), &config);

        let result = orchestrator.resolve(&tokenize("mitosis cell division")).await;

        assert_eq!(result, ResolvedResult::Found("https://v/d".to_string()));
        assert_eq!(stub.calls(), 3);
    }

    /// Counts deliveries.
    struct CountingSink {
        delivered: Mutex<Vec<ResolvedResult>>,
    }

    #[async_trait]
    impl ResultSink for CountingSink {
        async fn deliver(&self, resolution: &Resolution) -> Result<()> {
            self.delivered.lock().await.push(resolution.result.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_delivers_exactly_once() {
        let stub = Arc::new(StubLookup::new(vec![("cell", Reply::Records(vec!["https://v/1"]))]));
        let orchestrator = orchestrator(stub);
        let sink = CountingSink {
            delivered: Mutex::new(Vec::new()),
        };

        orchestrator
            .run(&RecognizedText::new("mitosis cell division"), &sink)
            .await
            .unwrap();
        orchestrator.run(&RecognizedText::default(), &sink).await.unwrap();

        assert_eq!(
            *sink.delivered.lock().await,
            vec![
                ResolvedResult::Found("https://v/1".to_string()),
                ResolvedResult::NotFound,
            ]
        );
    }
}
