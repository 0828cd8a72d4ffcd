//! Structured JSON search endpoint adapter.
//!
//! Issues one GET per search term and maps the records of the result array.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::matching::Matcher;
use crate::models::{AdapterResult, Posting, StructuredQueryConfig};
use crate::services::{JobSource, SourceContext, location_or, run_queries};
use crate::utils::http::get_json;
use crate::utils::json::first_str;
use crate::utils::resolve;

pub struct StructuredQuerySource {
    config: StructuredQueryConfig,
}

impl StructuredQuerySource {
    pub fn new(config: StructuredQueryConfig) -> Self {
        Self { config }
    }

    fn query_params(&self, query: &str) -> Vec<(String, String)> {
        let mut params = vec![(self.config.query_param.clone(), query.to_string())];
        params.extend(self.config.extra_params.iter().cloned());
        params
    }

    async fn fetch_query(&self, ctx: &SourceContext, query: &str) -> Result<Option<Vec<Posting>>> {
        let body: Value =
            get_json(&ctx.client, &self.config.endpoint, &self.query_params(query)).await?;
        Ok(self.map_response(&body, &ctx.matcher))
    }

    /// Map the result array; `None` when the array is missing.
    fn map_response(&self, body: &Value, matcher: &Matcher) -> Option<Vec<Posting>> {
        let records = body.get(&self.config.results_field)?.as_array()?;
        Some(
            records
                .iter()
                .filter_map(|record| self.map_record(record, matcher))
                .collect(),
        )
    }

    fn map_record(&self, record: &Value, matcher: &Matcher) -> Option<Posting> {
        let title = first_str(record, &self.config.title_fields)?;
        if !matcher.keyword_match(title) {
            return None;
        }

        let location = location_or(
            first_str(record, &self.config.location_fields),
            Some(self.config.fallback_location.as_str()),
        );
        if !matcher.is_eligible_location(&location) {
            return None;
        }

        let path = first_str(record, &self.config.link_fields)?;
        let link = resolve(&self.config.link_base, path);

        Some(Posting::new(&self.config.label, title, location, link))
    }
}

#[async_trait]
impl JobSource for StructuredQuerySource {
    fn name(&self) -> String {
        format!("search:{}", self.config.label)
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
