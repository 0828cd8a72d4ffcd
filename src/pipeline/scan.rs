//! Concurrent invocation of all adapters.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{AdapterResult, Config, Posting, SourceReport, SourceStatus};
use crate::services::{JobSource, SourceContext, build_sources};

/// Merged result of one scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Postings from all adapters, deduplicated, in registry order
    pub postings: Vec<Posting>,
    /// One report per adapter, in registry order
    pub reports: Vec<SourceReport>,
}

impl ScanOutcome {
    pub fn failed_sources(&self) -> usize {
        self.reports.iter().filter(|r| !r.status.is_ok()).count()
    }
}

/// Drives every configured adapter with bounded concurrency.
pub struct Scanner {
    sources: Vec<Arc<dyn JobSource>>,
    ctx: Arc<SourceContext>,
    concurrency: usize,
}

impl Scanner {
    pub fn new(sources: Vec<Arc<dyn JobSource>>, ctx: SourceContext, concurrency: usize) -> Self {
        Self {
            sources,
            ctx: Arc::new(ctx),
            concurrency: concurrency.max(1),
        }
    }

    /// Build the adapter registry and shared context from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            build_sources(config)?,
            SourceContext::from_config(config)?,
            config.crawler.max_concurrent,
        ))
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Run every adapter and merge the results.
    ///
    /// Each adapter runs in its own task; results are consumed in registry
    /// order so the merged list does not depend on completion order.
    pub async fn run_scan(&self) -> ScanOutcome {
        log::info!(
            "Scanning {} sources ({} at a time)",
            self.sources.len(),
            self.concurrency
        );

        let results: Vec<AdapterResult> = stream::iter(self.sources.iter().cloned())
            .map(|source| run_isolated(source, Arc::clone(&self.ctx)))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut outcome = ScanOutcome::default();
        let mut merged = Vec::new();
        for result in results {
            let (report, postings) = result.into_parts();
            log::info!("{report}");
            outcome.reports.push(report);
            merged.extend(postings);
        }

        let total = merged.len();
        outcome.postings = dedupe_postings(merged);
        log::info!(
            "Scan complete: {} postings ({} duplicates dropped), {} sources degraded",
            outcome.postings.len(),
            total - outcome.postings.len(),
            outcome.failed_sources()
        );
        outcome
    }
}

/// Run one adapter in its own task so a panic is contained.
async fn run_isolated(source: Arc<dyn JobSource>, ctx: Arc<SourceContext>) -> AdapterResult {
    let name = source.name();
    match tokio::spawn(async move { source.collect(&ctx).await }).await {
        Ok(result) => result,
        Err(error) => {
            let class = if error.is_panic() { "panic" } else { "cancelled" };
            log::error!("{name}: adapter task failed: {error}");
            AdapterResult::failed(name, SourceStatus::Failed(class.to_string()))
        }
    }
}

/// Drop repeated `(company, title, link)` triples, keeping the first.
pub fn dedupe_postings(postings: Vec<Posting>) -> Vec<Posting> {
    let mut seen: HashSet<(String, String, String)> = HashSet::new();
    postings
        .into_iter()
        .filter(|p| {
            let (company, title, link) = p.dedup_key();
            seen.insert((company.to_string(), title.to_string(), link.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{FakeSource, scanner};

    fn acme(title: &str, link: &str) -> Posting {
        Posting::new("Acme", title, "USA", link)
    }

    #[test]
    fn test_dedupe_postings_keeps_first() {
        let postings = vec![
            Posting::new("Acme", "Engineer", "Remote", "http://x/1"),
            Posting::new("Acme", "Engineer", "USA", "http://x/1"),
            Posting::new("Acme", "Engineer", "USA", "http://x/2"),
            Posting::new("Other", "Engineer", "USA", "http://x/1"),
        ];
        let deduped = dedupe_postings(postings);
        assert_eq!(deduped.len(), 3);
        assert_eq!(deduped[0].location, "Remote");
    }

    #[tokio::test]
    async fn test_duplicates_across_adapters_collapse() {
        let shared = acme("Software Engineer", "http://acme/1");
        let scanner = scanner(vec![
            FakeSource::returning("a", vec![shared.clone()]),
            FakeSource::returning("b", vec![shared.clone(), acme("ML Engineer", "http://acme/2")]),
        ]);

        let outcome = scanner.run_scan().await;
        assert_eq!(outcome.postings.len(), 2);
        assert_eq!(
            outcome
                .postings
                .iter()
                .filter(|p| p.dedup_key() == shared.dedup_key())
                .count(),
            1
        );
        assert_eq!(outcome.reports[1].found, 2);
    }

    #[tokio::test]
    async fn test_failing_adapters_are_isolated() {
        let scanner = scanner(vec![
            FakeSource::returning("first", vec![acme("Backend Engineer", "http://acme/1")]),
            FakeSource::failing("broken"),
            FakeSource::panicking("crashy"),
            FakeSource::returning("last", vec![acme("AI Engineer", "http://acme/2")]),
        ]);

        let outcome = scanner.run_scan().await;
        let links: Vec<_> = outcome.postings.iter().map(|p| p.link.as_str()).collect();
        assert_eq!(links, vec!["http://acme/1", "http://acme/2"]);

        let notes: Vec<String> = outcome.reports.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            notes,
            vec![
                "first: ok: 1",
                "broken: error source: 0",
                "crashy: error panic: 0",
                "last: ok: 1",
            ]
        );
        assert_eq!(outcome.failed_sources(), 2);
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let outcome = scanner(vec![]).run_scan().await;
        assert!(outcome.postings.is_empty());
        assert!(outcome.reports.is_empty());
    }
}
