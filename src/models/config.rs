//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::SourceConfig;

/// Root application configuration.
///
/// Built once at startup and shared read-only by every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and pacing settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Keyword and location filters
    #[serde(default)]
    pub filters: FilterConfig,

    /// Settings for the HTML link harvester
    #[serde(default)]
    pub harvest: HarvestConfig,

    /// Digest and delivery settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Seen-store settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Company-to-adapter registry
    #[serde(default = "defaults::sources")]
    pub sources: Vec<SourceConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::validation("crawler.max_concurrent must be > 0"));
        }
        if self.filters.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(AppError::validation("No keywords defined"));
        }
        if self.filters.us_variants.iter().all(|v| v.trim().is_empty()) {
            return Err(AppError::validation("No US location variants defined"));
        }
        if self.harvest.max_links_per_page == 0 {
            return Err(AppError::validation(
                "harvest.max_links_per_page must be > 0",
            ));
        }
        regex::Regex::new(&self.harvest.job_link_pattern)?;
        if self.storage.seen_file.trim().is_empty() {
            return Err(AppError::validation("storage.seen_file is empty"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }
        for source in &self.sources {
            self.validate_source(source)?;
        }
        Ok(())
    }

    fn validate_source(&self, source: &SourceConfig) -> Result<()> {
        let name = format!("{}:{}", source.kind(), source.label());
        if source.label().trim().is_empty() {
            return Err(AppError::validation(format!(
                "{} source has an empty label",
                source.kind()
            )));
        }
        let needs_queries = matches!(
            source,
            SourceConfig::StructuredQuery(_)
                | SourceConfig::EmbeddedScript(_)
                | SourceConfig::Workday(_)
        );
        if needs_queries && source.queries().is_empty() {
            return Err(AppError::validation(format!("{name} has no queries")));
        }
        match source {
            SourceConfig::Workday(c) if c.page_size == 0 || c.max_pages == 0 => Err(
                AppError::validation(format!("{name}: page_size and max_pages must be > 0")),
            ),
            SourceConfig::EmbeddedScript(c) if !c.page_url.contains("{query}") => Err(
                AppError::validation(format!("{name}: page_url has no {{query}} placeholder")),
            ),
            SourceConfig::EmbeddedScript(c) if c.max_depth == 0 => Err(AppError::validation(
                format!("{name}: max_depth must be > 0"),
            )),
            SourceConfig::HtmlLinks(c) if c.urls.is_empty() => {
                Err(AppError::validation(format!("{name} has no urls")))
            }
            _ => Ok(()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            filters: FilterConfig::default(),
            harvest: HarvestConfig::default(),
            notify: NotifyConfig::default(),
            storage: StorageConfig::default(),
            sources: defaults::sources(),
        }
    }
}

/// HTTP client and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Pause between successive requests of one adapter, in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum adapters running at once
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Keyword relevance and location eligibility lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// A title must contain at least one of these
    #[serde(default = "defaults::keywords")]
    pub keywords: Vec<String>,

    /// A title must contain none of these
    #[serde(default = "defaults::exclude")]
    pub exclude: Vec<String>,

    /// Spellings of the United States accepted in location text
    #[serde(default = "defaults::us_variants")]
    pub us_variants: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keywords: defaults::keywords(),
            exclude: defaults::exclude(),
            us_variants: defaults::us_variants(),
        }
    }
}

/// HTML link harvesting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Candidate links kept per listing page
    #[serde(default = "defaults::max_links_per_page")]
    pub max_links_per_page: usize,

    /// URL pattern marking a link as job-related
    #[serde(default = "defaults::job_link_pattern")]
    pub job_link_pattern: String,

    /// Phrases one of which must appear in a verified page body
    #[serde(default = "defaults::us_phrases")]
    pub us_phrases: Vec<String>,

    /// Domains never treated as postings
    #[serde(default = "defaults::blocked_domains")]
    pub blocked_domains: Vec<String>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            max_links_per_page: defaults::max_links_per_page(),
            job_link_pattern: defaults::job_link_pattern(),
            us_phrases: defaults::us_phrases(),
            blocked_domains: defaults::blocked_domains(),
        }
    }
}

/// Digest composition and delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Send a "nothing new" digest when a run finds no new postings
    #[serde(default = "defaults::send_when_empty")]
    pub send_when_empty: bool,

    /// Prefix for every subject line
    #[serde(default = "defaults::subject_prefix")]
    pub subject_prefix: String,

    /// Heading above the posting list
    #[serde(default = "defaults::heading")]
    pub heading: String,

    /// SMTP relay host (implicit TLS)
    #[serde(default = "defaults::smtp_host")]
    pub smtp_host: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            send_when_empty: defaults::send_when_empty(),
            subject_prefix: defaults::subject_prefix(),
            heading: defaults::heading(),
            smtp_host: defaults::smtp_host(),
        }
    }
}

/// Seen-store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// State file name, relative to the storage directory
    #[serde(default = "defaults::seen_file")]
    pub seen_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            seen_file: defaults::seen_file(),
        }
    }
}

mod defaults {
    use crate::models::sources::{
        EmbeddedScriptConfig, ExtractMode, GreenhouseConfig, LeverConfig,
        StructuredQueryConfig, WorkdayConfig, defaults as source_defaults,
    };
    use crate::models::SourceConfig;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // Crawler defaults
    pub fn user_agent() -> String {
        "jobwatch/0.1 (+https://github.com/)".into()
    }
    pub fn timeout() -> u64 {
        25
    }
    pub fn request_delay() -> u64 {
        400
    }
    pub fn max_concurrent() -> usize {
        4
    }

    // Filter defaults
    pub fn keywords() -> Vec<String> {
        strings(&[
            "software",
            "software engineer",
            "backend",
            "full stack",
            "machine learning",
            "ml",
            "ai",
            "llm",
            "generative ai",
            "data scientist",
            "mle",
            "research engineer",
        ])
    }
    pub fn exclude() -> Vec<String> {
        strings(&["intern", "internship", "unpaid"])
    }
    pub fn us_variants() -> Vec<String> {
        strings(&[
            "usa",
            "u.s.a.",
            "u-s-a",
            "us",
            "u.s.",
            "u-s",
            "united states",
            "united-states",
            "united states of america",
            "united-states-of-america",
        ])
    }

    // Harvest defaults
    pub fn max_links_per_page() -> usize {
        30
    }
    pub fn job_link_pattern() -> String {
        "(?i)(job|jobs|careers|requisition|opportunit|opening|position)".into()
    }
    pub fn us_phrases() -> Vec<String> {
        strings(&["united states", "united states of america", "usa"])
    }
    pub fn blocked_domains() -> Vec<String> {
        strings(&[
            "facebook.com",
            "twitter.com",
            "linkedin.com",
            "youtube.com",
            "instagram.com",
        ])
    }

    // Notify defaults
    pub fn send_when_empty() -> bool {
        true
    }
    pub fn subject_prefix() -> String {
        "[Job Alerts]".into()
    }
    pub fn heading() -> String {
        "New Software/AI roles".into()
    }
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }

    // Storage defaults
    pub fn seen_file() -> String {
        "seen.json".into()
    }

    // Source registry defaults
    pub fn sources() -> Vec<SourceConfig> {
        let mut sources = vec![
            SourceConfig::StructuredQuery(StructuredQueryConfig {
                label: "Amazon / AWS".into(),
                endpoint: "https://www.amazon.jobs/en/search.json".into(),
                query_param: source_defaults::query_param(),
                extra_params: vec![("country".into(), "USA".into())],
                queries: strings(&["software", "machine learning"]),
                results_field: source_defaults::results_field(),
                title_fields: source_defaults::title_fields(),
                location_fields: source_defaults::structured_location_fields(),
                link_fields: source_defaults::structured_link_fields(),
                link_base: "https://www.amazon.jobs".into(),
                fallback_location: source_defaults::fallback_location(),
            }),
            SourceConfig::EmbeddedScript(EmbeddedScriptConfig {
                label: "Google".into(),
                page_url: "https://careers.google.com/jobs/results/?q={query}&hl=en_US".into(),
                queries: strings(&["software", "machine learning", "generative ai", "ai", "llm"]),
                script_selector: source_defaults::script_selector(),
                mode: ExtractMode::JobList,
                list_fields: source_defaults::list_fields(),
                link_base: "https://careers.google.com".into(),
                id_link_template: Some("https://careers.google.com/jobs/results/{id}/".into()),
                fallback_location: source_defaults::fallback_location(),
                max_depth: source_defaults::max_depth(),
            }),
            SourceConfig::EmbeddedScript(EmbeddedScriptConfig {
                label: "Microsoft".into(),
                page_url: "https://jobs.careers.microsoft.com/global/en/search?q={query}".into(),
                queries: strings(&["software", "machine learning", "ai", "llm"]),
                script_selector: source_defaults::script_selector(),
                mode: ExtractMode::Sweep,
                list_fields: source_defaults::list_fields(),
                link_base: "https://jobs.careers.microsoft.com".into(),
                id_link_template: None,
                fallback_location: source_defaults::fallback_location(),
                max_depth: source_defaults::max_depth(),
            }),
        ];

        let workday = [
            ("Salesforce", "salesforce.wd1.myworkdayjobs.com", "salesforce", "External_Career_Site"),
            ("Deloitte Consulting", "apply.deloitte.com", "deloitte", "Careers"),
            ("Ernst & Young (EY)", "careers.ey.com", "ey", "search"),
            ("Wipro", "wipro.wd3.myworkdayjobs.com", "Wipro", "Careers"),
            ("IBM", "ibm.wd5.myworkdayjobs.com", "IBM", "Careers"),
            ("Oracle America", "careers.oracle.com", "jobs", "search"),
        ];
        sources.extend(workday.into_iter().map(|(label, host, tenant, site)| {
            SourceConfig::Workday(WorkdayConfig {
                label: label.into(),
                host: host.into(),
                tenant: tenant.into(),
                site: site.into(),
                queries: source_defaults::workday_queries(),
                location_facets: source_defaults::workday_location_facets(),
                page_size: source_defaults::workday_page_size(),
                max_pages: source_defaults::workday_max_pages(),
            })
        }));

        sources.extend(
            [
                ("Cognizant Technology Solutions", "cognizant"),
                ("Capgemini America", "capgemini"),
            ]
            .into_iter()
            .map(|(label, board)| {
                SourceConfig::Greenhouse(GreenhouseConfig {
                    label: label.into(),
                    board: board.into(),
                })
            }),
        );

        sources.extend(
            [("LTIMindtree", "ltimindtree"), ("HCL America", "hcl")]
                .into_iter()
                .map(|(label, org)| {
                    SourceConfig::Lever(LeverConfig {
                        label: label.into(),
                        org: org.into(),
                    })
                }),
        );

        sources
    }
}
