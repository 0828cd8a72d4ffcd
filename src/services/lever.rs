//! Lever public postings adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::matching::Matcher;
use crate::models::{AdapterResult, LeverConfig, Posting, SourceStatus};
use crate::services::{JobSource, SourceContext, failed_result};
use crate::utils::http::get_json;

const API_BASE: &str = "https://api.lever.co/v0/postings";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LeverPosting {
    text: Option<String>,
    hosted_url: Option<String>,
    categories: Option<LeverCategories>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LeverCategories {
    location: Option<String>,
    /// Employment type, e.g. "Full-time" or "Intern"
    commitment: Option<String>,
}

pub struct LeverSource {
    config: LeverConfig,
}

impl LeverSource {
    pub fn new(config: LeverConfig) -> Self {
        Self { config }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}", self.config.org)
    }

    fn map_postings(&self, postings: Vec<LeverPosting>, matcher: &Matcher) -> Vec<Posting> {
        postings
            .into_iter()
            .filter_map(|p| self.map_posting(p, matcher))
            .collect()
    }

    fn map_posting(&self, posting: LeverPosting, matcher: &Matcher) -> Option<Posting> {
        let title = posting.text.unwrap_or_default();
        if !matcher.keyword_match(&title) {
            return None;
        }

        let categories = posting.categories.unwrap_or_default();
        let location = categories.location.unwrap_or_default();
        if !matcher.is_eligible_location(&location) {
            return None;
        }
        if categories
            .commitment
            .is_some_and(|c| matcher.mentions_excluded(&c))
        {
            return None;
        }

        let link = posting.hosted_url.filter(|u| !u.trim().is_empty())?;
        Some(Posting::new(&self.config.label, title, location, link))
    }
}

#[async_trait]
impl JobSource for LeverSource {
    fn name(&self) -> String {
        format!("lever:{}", self.config.org)
    }

    async fn collect(&self, ctx: &SourceContext) -> AdapterResult {
        let query = [("mode".to_string(), "json".to_string())];
        match get_json::<Vec<LeverPosting>>(&ctx.client, &self.endpoint(), &query).await {
            Ok(postings) => AdapterResult::new(
                self.name(),
                SourceStatus::Ok,
                self.map_postings(postings, &ctx.matcher),
            ),
            Err(error) => failed_result(self.name(), &error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> LeverSource {
        LeverSource::new(LeverConfig {
            label: "LTIMindtree".into(),
            org: "ltimindtree".into(),
        })
    }

    #[test]
    fn test_map_postings() {
        let postings: Vec<LeverPosting> = serde_json::from_str(
            r#"[
                {"text": "Full Stack Developer", "hostedUrl": "https://jobs.lever.co/ltimindtree/a",
                 "categories": {"location": "Edison, NJ, USA", "commitment": "Full-time", "team": "Digital"}},
                {"text": "Machine Learning Engineer", "hostedUrl": "https://jobs.lever.co/ltimindtree/b",
                 "categories": {"location": "Remote", "commitment": "Summer Internship"}},
                {"text": "Software Engineer", "hostedUrl": "https://jobs.lever.co/ltimindtree/c",
                 "categories": {"location": "Pune, India"}},
                {"text": "LLM Engineer", "hostedUrl": "https://jobs.lever.co/ltimindtree/d",
                 "categories": null},
                {"text": "Backend Engineer", "hostedUrl": "https://jobs.lever.co/ltimindtree/e",
                 "categories": {"location": "Plano, TX, United States"}}
            ]"#,
        )
        .unwrap();

        let mapped = source().map_postings(postings, &Matcher::default());
        let links: Vec<_> = mapped.iter().map(|p| p.link.as_str()).collect();
        assert_eq!(
            links,
            vec![
                "https://jobs.lever.co/ltimindtree/a",
                "https://jobs.lever.co/ltimindtree/e"
            ]
        );
        assert_eq!(mapped[0].company, "LTIMindtree");
    }

    #[test]
    fn test_name() {
        assert_eq!(source().name(), "lever:ltimindtree");
        assert_eq!(source().endpoint(), "https://api.lever.co/v0/postings/ltimindtree");
    }
}
