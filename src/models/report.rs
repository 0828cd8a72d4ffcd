//! Per-adapter results and diagnostic status.

use std::fmt;

use serde::Serialize;

use crate::error::AppError;
use crate::models::Posting;

/// Outcome class of one adapter invocation.
///
/// Used only for operator-facing reporting, never for control flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SourceStatus {
    Ok,
    /// The expected embedded payload was not on the page.
    NoPayload,
    /// At least one request failed; carries the failure class.
    Failed(String),
}

impl SourceStatus {
    fn severity(&self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::NoPayload => 1,
            Self::Failed(_) => 2,
        }
    }

    /// Keep the more severe of the two; on a tie the current status wins.
    pub fn degrade(&mut self, other: SourceStatus) {
        if other.severity() > self.severity() {
            *self = other;
        }
    }

    /// Record a failed request.
    pub fn record_error(&mut self, error: &AppError) {
        self.degrade(Self::Failed(error.class()));
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::NoPayload => write!(f, "no payload found"),
            Self::Failed(class) => write!(f, "error {class}"),
        }
    }
}

/// Result of invoking one adapter.
#[derive(Debug, Clone)]
pub struct AdapterResult {
    /// Adapter name, e.g. `greenhouse:cognizant`
    pub source: String,
    pub status: SourceStatus,
    pub postings: Vec<Posting>,
}

impl AdapterResult {
    pub fn new(source: impl Into<String>, status: SourceStatus, postings: Vec<Posting>) -> Self {
        Self {
            source: source.into(),
            status,
            postings,
        }
    }

    /// A result carrying no postings.
    pub fn failed(source: impl Into<String>, status: SourceStatus) -> Self {
        Self::new(source, status, Vec::new())
    }

    /// Split into the diagnostic report and the postings.
    pub fn into_parts(self) -> (SourceReport, Vec<Posting>) {
        let report = SourceReport {
            source: self.source,
            status: self.status,
            found: self.postings.len(),
        };
        (report, self.postings)
    }
}

/// Diagnostic line recorded for each adapter in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub status: SourceStatus,
    pub found: usize,
}

impl fmt::Display for SourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.source, self.status, self.found)
    }
}
