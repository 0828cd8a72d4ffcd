//! Adapter for career pages that ship their data as JSON inside a script tag.
//!
//! The payload is located with a CSS selector (a `__NEXT_DATA__` script by
//! default). A page without the payload is reported as `no payload found`,
//! which is expected when a vendor changes its page layout.

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::matching::Matcher;
use crate::models::{AdapterResult, EmbeddedScriptConfig, ExtractMode, Posting};
use crate::services::{JobSource, SourceContext, location_or, parse_selector, run_queries};
use crate::utils::http::fetch_text;
use crate::utils::json::{find_list_field, first_str, first_str_in, scalar_string, visit_objects};
use crate::utils::{encode_query, resolve};

const TITLE_FIELDS: [&str; 2] = ["title", "name"];
const LINK_FIELDS: [&str; 3] = ["apply_url", "url", "canonical_url"];
const LOCATION_LABEL_FIELDS: [&str; 2] = ["display", "text"];

const SWEEP_TITLE_FIELDS: [&str; 2] = ["title", "jobTitle"];
const SWEEP_LOCATION_FIELDS: [&str; 2] = ["location", "jobLocation"];
const SWEEP_LINK_FIELDS: [&str; 3] = ["url", "navigationUrl", "jobUrl"];

pub struct EmbeddedScriptSource {
    config: EmbeddedScriptConfig,
    script: Selector,
}

impl EmbeddedScriptSource {
    pub fn new(config: EmbeddedScriptConfig) -> Result<Self> {
        let script = parse_selector(&config.script_selector)?;
        Ok(Self { config, script })
    }

    fn page_url(&self, query: &str) -> String {
        self.config.page_url.replace("{query}", &encode_query(query))
    }

    async fn fetch_query(&self, ctx: &SourceContext, query: &str) -> Result<Option<Vec<Posting>>> {
        let html = fetch_text(&ctx.client, &self.page_url(query)).await?;
        let Some(payload) = self.extract_payload(&html)? else {
            return Ok(None);
        };
        Ok(self.map_payload(&payload, &ctx.matcher))
    }

    /// Parse the embedded JSON; `None` when the marker element is absent.
    fn extract_payload(&self, html: &str) -> Result<Option<Value>> {
        let document = Html::parse_document(html);
        let Some(script) = document.select(&self.script).next() else {
            return Ok(None);
        };
        let text: String = script.text().collect();
        Ok(Some(serde_json::from_str(text.trim())?))
    }

    fn map_payload(&self, payload: &Value, matcher: &Matcher) -> Option<Vec<Posting>> {
        match self.config.mode {
            ExtractMode::JobList => {
                let jobs =
                    find_list_field(payload, &self.config.list_fields, self.config.max_depth)?;
                Some(
                    jobs.iter()
                        .filter_map(|job| self.map_job(job, matcher))
                        .collect(),
                )
            }
            ExtractMode::Sweep => Some(self.sweep(payload, matcher)),
        }
    }

    fn map_job(&self, job: &Value, matcher: &Matcher) -> Option<Posting> {
        let title = first_str(job, &TITLE_FIELDS)?;
        if !matcher.keyword_match(title) {
            return None;
        }

        let listed = Self::joined_locations(job);
        let published = if listed.is_empty() {
            first_str(job, &["location"])
        } else {
            Some(listed.as_str())
        };
        let location = location_or(published, Some(self.config.fallback_location.as_str()));
        if !matcher.is_eligible_location(&location) {
            return None;
        }

        let link = match first_str(job, &LINK_FIELDS) {
            Some(url) => resolve(&self.config.link_base, url),
            None => {
                let template = self.config.id_link_template.as_deref()?;
                template.replace("{id}", &scalar_string(job, "id")?)
            }
        };

        Some(Posting::new(&self.config.label, title, location, link))
    }

    /// `locations[]` entries (objects with a display label, or plain strings)
    /// joined by `", "`.
    fn joined_locations(job: &Value) -> String {
        let Some(entries) = job.get("locations").and_then(Value::as_array) else {
            return String::new();
        };
        entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()),
                other => first_str(other, &LOCATION_LABEL_FIELDS),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn sweep(&self, payload: &Value, matcher: &Matcher) -> Vec<Posting> {
        let mut postings = Vec::new();
        visit_objects(payload, self.config.max_depth, &mut |obj: &Map<String, Value>| {
            if let Some(posting) = self.map_swept(obj, matcher) {
                postings.push(posting);
            }
        });
        postings
    }

    fn map_swept(&self, obj: &Map<String, Value>, matcher: &Matcher) -> Option<Posting> {
        let title = first_str_in(obj, &SWEEP_TITLE_FIELDS)?;
        if !matcher.keyword_match(title) {
            return None;
        }
        let published = first_str_in(obj, &SWEEP_LOCATION_FIELDS).unwrap_or("");
        if !matcher.is_eligible_location(published) {
            return None;
        }
        let path = first_str_in(obj, &SWEEP_LINK_FIELDS)?;
        let link = resolve(&self.config.link_base, path);
        let location = location_or(
            Some(published),
            Some(self.config.fallback_location.as_str()),
        );
        Some(Posting::new(&self.config.label, title, location, link))
    }
}

#[async_trait]
impl JobSource for EmbeddedScriptSource {
    fn name(&self) -> String {
        format!("embedded:{}", self.config.label)
    }

    async fn collect(&self, ctx: &SourceContext) -> AdapterResult {
        let name = self.name();
        let (status, postings) = run_queries(&name, &self.config.queries, ctx.delay, |q| {
            self.fetch_query(ctx, q)
        })
        .await;
        AdapterResult::new(name, status, postings)
    }
}
