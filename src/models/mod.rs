// src/models/mod.rs

//! Domain models for the job watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod posting;
mod report;
mod sources;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, FilterConfig, HarvestConfig, NotifyConfig, StorageConfig,
};
pub use posting::{Posting, SeenSet, compute_identity};
pub use report::{AdapterResult, SourceReport, SourceStatus};
pub use sources::{
    EmbeddedScriptConfig, ExtractMode, GreenhouseConfig, HtmlLinksConfig, LeverConfig,
    SourceConfig, StructuredQueryConfig, WorkdayConfig,
};
