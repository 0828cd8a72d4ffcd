//! One complete poll: load state, scan, select, notify, save.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::models::{NotifyConfig, SourceReport};
use crate::notify::{Digest, Notifier, should_send};
use crate::pipeline::{Scanner, select_new};
use crate::storage::SeenStore;

/// What a run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Postings left after cross-adapter deduplication
    pub scanned: usize,
    pub new_count: usize,
    pub notified: bool,
    pub saved: bool,
    pub reports: Vec<SourceReport>,
}

/// Execute one run.
///
/// The seen-set is saved only after the digest was delivered (or skipped by
/// policy), so a failed delivery reports the same postings again next run.
/// With `dry_run` nothing is saved.
pub async fn run_once(
    scanner: &Scanner,
    store: &dyn SeenStore,
    notifier: &dyn Notifier,
    config: &NotifyConfig,
    dry_run: bool,
) -> Result<RunSummary> {
    let started_at = Utc::now();

    let mut seen = store.load().await;
    log::info!("Loaded {} seen identities", seen.len());

    let outcome = scanner.run_scan().await;
    let scanned = outcome.postings.len();
    let new = select_new(outcome.postings, &mut seen);
    log::info!("{} of {scanned} postings are new", new.len());

    let digest = Digest::compose(&new, &outcome.reports, config);
    let notified = if should_send(new.len(), config) {
        notifier.send(&digest).await?;
        true
    } else {
        log::info!("Nothing new, digest suppressed");
        false
    };

    let saved = if dry_run {
        log::info!("Dry run, seen-store left untouched");
        false
    } else {
        store.save(&seen).await?;
        true
    };

    Ok(RunSummary {
        started_at,
        finished_at: Utc::now(),
        scanned,
        new_count: new.len(),
        notified,
        saved,
        reports: outcome.reports,
    })
}
