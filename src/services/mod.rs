//! Source adapters.
//!
//! One adapter per vendor protocol:
//! - Structured JSON search endpoints (`StructuredQuerySource`)
//! - JSON embedded in an HTML page (`EmbeddedScriptSource`)
//! - Greenhouse, Workday and Lever job boards
//! - Raw HTML link harvesting (`HtmlLinksSource`)
//!
//! Every adapter absorbs its own failures into an `AdapterResult` status;
//! nothing an adapter does can abort a run.

mod embedded;
mod greenhouse;
mod links;
mod lever;
mod structured;
mod workday;

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::Selector;

use crate::error::{AppError, Result};
use crate::matching::Matcher;
use crate::models::{AdapterResult, Config, HarvestConfig, Posting, SourceConfig, SourceStatus};
use crate::utils::http::{create_async_client, pace};

pub use embedded::EmbeddedScriptSource;
pub use greenhouse::GreenhouseSource;
pub use lever::LeverSource;
pub use links::{HtmlLinksSource, extract_candidates};
pub use structured::StructuredQuerySource;
pub use workday::WorkdaySource;

/// Shared, read-only state handed to every adapter.
pub struct SourceContext {
    pub client: reqwest::Client,
    pub matcher: Matcher,
    /// Pause between successive requests of one adapter
    pub delay: Duration,
    pub harvest: HarvestConfig,
}

impl SourceContext {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            client: create_async_client(&config.crawler)?,
            matcher: Matcher::new(&config.filters),
            delay: Duration::from_millis(config.crawler.request_delay_ms),
            harvest: config.harvest.clone(),
        })
    }
}

/// Capability shared by all adapters: fetch normalized postings for a
/// fixed target.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Name used in status notes, e.g. `greenhouse:cognizant`.
    fn name(&self) -> String;

    /// Fetch, filter and normalize postings. Never fails; failures are
    /// reported through the result status.
    async fn collect(&self, ctx: &SourceContext) -> AdapterResult;
}

/// Build one adapter per configured source, in registry order.
pub fn build_sources(config: &Config) -> Result<Vec<Arc<dyn JobSource>>> {
    config
        .sources
        .iter()
        .map(|source| build_source(source, &config.harvest))
        .collect()
}

/// Build the adapter for a single registry entry.
pub fn build_source(source: &SourceConfig, harvest: &HarvestConfig) -> Result<Arc<dyn JobSource>> {
    let adapter: Arc<dyn JobSource> = match source {
        SourceConfig::StructuredQuery(c) => Arc::new(StructuredQuerySource::new(c.clone())),
        SourceConfig::EmbeddedScript(c) => Arc::new(EmbeddedScriptSource::new(c.clone())?),
        SourceConfig::Greenhouse(c) => Arc::new(GreenhouseSource::new(c.clone())),
        SourceConfig::Workday(c) => Arc::new(WorkdaySource::new(c.clone())),
        SourceConfig::Lever(c) => Arc::new(LeverSource::new(c.clone())),
        SourceConfig::HtmlLinks(c) => {
            Arc::new(HtmlLinksSource::new(c.clone(), &harvest.job_link_pattern)?)
        }
    };
    Ok(adapter)
}

/// Run one request per query term, pausing between requests.
///
/// `fetch` yields `Ok(None)` when the expected payload was absent. A failed
/// term degrades the status and the remaining terms are still attempted.
pub(crate) async fn run_queries<'a, F, Fut>(
    name: &str,
    queries: &'a [String],
    delay: Duration,
    mut fetch: F,
) -> (SourceStatus, Vec<Posting>)
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<Option<Vec<Posting>>>>,
{
    let mut status = SourceStatus::Ok;
    let mut postings = Vec::new();

    for (i, query) in queries.iter().enumerate() {
        if i > 0 {
            pace(delay).await;
        }
        match fetch(query.as_str()).await {
            Ok(Some(found)) => {
                log::debug!("{name}: '{query}' yielded {} postings", found.len());
                postings.extend(found);
            }
            Ok(None) => {
                log::warn!("{name}: no payload found for '{query}'");
                status.degrade(SourceStatus::NoPayload);
            }
            Err(error) => {
                log::warn!("{name}: query '{query}' failed: {error}");
                status.record_error(&error);
            }
        }
    }

    (status, dedupe_by_link(postings))
}

/// Keep the first posting seen for each link.
pub(crate) fn dedupe_by_link(postings: Vec<Posting>) -> Vec<Posting> {
    let mut seen = HashSet::new();
    postings
        .into_iter()
        .filter(|p| seen.insert(p.link.clone()))
        .collect()
}

/// Turn a failed single-request fetch into a degraded result.
pub(crate) fn failed_result(name: String, error: &AppError) -> AdapterResult {
    log::warn!("{name}: fetch failed: {error}");
    AdapterResult::failed(name, SourceStatus::Failed(error.class()))
}

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// Location shown for a posting: the published text, else the fallback.
pub(crate) fn location_or(published: Option<&str>, fallback: Option<&str>) -> String {
    published
        .filter(|s| !s.trim().is_empty())
        .or(fallback.filter(|s| !s.trim().is_empty()))
        .unwrap_or_default()
        .trim()
        .to_string()
}
