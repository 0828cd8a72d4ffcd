//! Source registry entries.
//!
//! Each `[[sources]]` table in `config.toml` is tagged by `kind` and maps to
//! exactly one adapter in `crate::services`.

use serde::{Deserialize, Serialize};

/// One configured source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    StructuredQuery(StructuredQueryConfig),
    EmbeddedScript(EmbeddedScriptConfig),
    Greenhouse(GreenhouseConfig),
    Workday(WorkdayConfig),
    Lever(LeverConfig),
    HtmlLinks(HtmlLinksConfig),
}

impl SourceConfig {
    /// Company label the source reports postings under.
    pub fn label(&self) -> &str {
        match self {
            Self::StructuredQuery(c) => &c.label,
            Self::EmbeddedScript(c) => &c.label,
            Self::Greenhouse(c) => &c.label,
            Self::Workday(c) => &c.label,
            Self::Lever(c) => &c.label,
            Self::HtmlLinks(c) => &c.label,
        }
    }

    /// Short adapter kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StructuredQuery(_) => "structured_query",
            Self::EmbeddedScript(_) => "embedded_script",
            Self::Greenhouse(_) => "greenhouse",
            Self::Workday(_) => "workday",
            Self::Lever(_) => "lever",
            Self::HtmlLinks(_) => "html_links",
        }
    }

    /// Search terms the source issues, empty for single-endpoint sources.
    pub fn queries(&self) -> &[String] {
        match self {
            Self::StructuredQuery(c) => &c.queries,
            Self::EmbeddedScript(c) => &c.queries,
            Self::Workday(c) => &c.queries,
            Self::Greenhouse(_) | Self::Lever(_) | Self::HtmlLinks(_) => &[],
        }
    }
}

/// JSON search endpoint queried once per term.
///
/// Defaults describe the Amazon Jobs search API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredQueryConfig {
    pub label: String,

    /// Search endpoint URL
    pub endpoint: String,

    /// Query-string parameter carrying the search term
    #[serde(default = "defaults::query_param")]
    pub query_param: String,

    /// Fixed extra query-string parameters
    #[serde(default)]
    pub extra_params: Vec<(String, String)>,

    pub queries: Vec<String>,

    /// Field holding the result array
    #[serde(default = "defaults::results_field")]
    pub results_field: String,

    #[serde(default = "defaults::title_fields")]
    pub title_fields: Vec<String>,

    #[serde(default = "defaults::structured_location_fields")]
    pub location_fields: Vec<String>,

    #[serde(default = "defaults::structured_link_fields")]
    pub link_fields: Vec<String>,

    /// Prefix for relative links
    #[serde(default)]
    pub link_base: String,

    /// Location assumed when the record carries none; empty for no fallback
    #[serde(default = "defaults::fallback_location")]
    pub fallback_location: String,
}

/// How the embedded JSON payload is searched for postings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtractMode {
    /// Map the entries of the first job-list field found.
    #[default]
    JobList,
    /// Visit every object and keep those that look like postings.
    Sweep,
}

/// HTML page carrying a JSON payload in a script element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedScriptConfig {
    pub label: String,

    /// Page URL; `{query}` is replaced by the URL-encoded search term
    pub page_url: String,

    pub queries: Vec<String>,

    #[serde(default = "defaults::script_selector")]
    pub script_selector: String,

    #[serde(default)]
    pub mode: ExtractMode,

    /// Field names that identify the job list (`job_list` mode)
    #[serde(default = "defaults::list_fields")]
    pub list_fields: Vec<String>,

    /// Prefix for relative links
    #[serde(default)]
    pub link_base: String,

    /// Link built from the record `id` when no URL field is present
    #[serde(default)]
    pub id_link_template: Option<String>,

    #[serde(default = "defaults::fallback_location")]
    pub fallback_location: String,

    #[serde(default = "defaults::max_depth")]
    pub max_depth: usize,
}

/// Greenhouse public job board.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GreenhouseConfig {
    pub label: String,
    pub board: String,
}

/// Workday candidate-experience search (POST, paginated, location facets).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkdayConfig {
    pub label: String,
    pub host: String,
    pub tenant: String,
    pub site: String,

    #[serde(default = "defaults::workday_queries")]
    pub queries: Vec<String>,

    #[serde(default = "defaults::workday_location_facets")]
    pub location_facets: Vec<String>,

    #[serde(default = "defaults::workday_page_size")]
    pub page_size: usize,

    #[serde(default = "defaults::workday_max_pages")]
    pub max_pages: usize,
}

/// Lever public postings keyed by organization slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeverConfig {
    pub label: String,
    pub org: String,
}

/// Raw listing pages whose anchors are harvested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HtmlLinksConfig {
    pub label: String,
    pub urls: Vec<String>,

    /// Fetch each candidate and require a US phrase in its body
    #[serde(default = "defaults::deep_verify")]
    pub deep_verify: bool,
}

pub(crate) mod defaults {
    pub fn query_param() -> String {
        "base_query".into()
    }
    pub fn results_field() -> String {
        "jobs".into()
    }
    pub fn title_fields() -> Vec<String> {
        vec!["title".into()]
    }
    pub fn structured_location_fields() -> Vec<String> {
        vec!["normalized_location".into(), "city_state".into()]
    }
    pub fn structured_link_fields() -> Vec<String> {
        vec!["job_path".into()]
    }
    pub fn fallback_location() -> String {
        "USA".into()
    }
    pub fn script_selector() -> String {
        "script#__NEXT_DATA__".into()
    }
    pub fn list_fields() -> Vec<String> {
        vec!["jobs".into()]
    }
    pub fn max_depth() -> usize {
        32
    }
    pub fn workday_queries() -> Vec<String> {
        [
            "software",
            "machine learning",
            "ai",
            "llm",
            "generative ai",
            "data scientist",
            "backend",
            "full stack",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn workday_location_facets() -> Vec<String> {
        vec!["United States of America".into()]
    }
    pub fn workday_page_size() -> usize {
        50
    }
    pub fn workday_max_pages() -> usize {
        1
    }
    pub fn deep_verify() -> bool {
        true
    }
}
