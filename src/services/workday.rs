//! Workday candidate-experience search adapter.
//!
//! Each search term is POSTed to the tenant's `cxs` endpoint with a location
//! facet; results are paged with `limit`/`offset`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matching::Matcher;
use crate::models::{AdapterResult, Posting, WorkdayConfig};
use crate::services::{JobSource, SourceContext, location_or, run_queries};
use crate::utils::http::{pace, post_json};

const FALLBACK_LOCATION: &str = "USA";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    applied_facets: AppliedFacets<'a>,
    limit: usize,
    offset: usize,
    search_text: &'a str,
}

#[derive(Debug, Serialize)]
struct AppliedFacets<'a> {
    locations: &'a [String],
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SearchResponse {
    total: Option<u64>,
    job_postings: Option<Vec<JobPosting>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct JobPosting {
    title: Option<String>,
    external_path: Option<String>,
    locations_text: Option<String>,
    subtitle: Option<String>,
}

pub struct WorkdaySource {
    config: WorkdayConfig,
}

impl WorkdaySource {
    pub fn new(config: WorkdayConfig) -> Self {
        Self { config }
    }

    fn endpoint(&self) -> String {
        let c = &self.config;
        format!("https://{}/wday/cxs/{}/{}/jobs", c.host, c.tenant, c.site)
    }

    fn request<'a>(&'a self, query: &'a str, page: usize) -> SearchRequest<'a> {
        SearchRequest {
            applied_facets: AppliedFacets {
                locations: &self.config.location_facets,
            },
            limit: self.config.page_size,
            offset: page * self.config.page_size,
            search_text: query,
        }
    }

    async fn fetch_query(&self, ctx: &SourceContext, query: &str) -> Result<Option<Vec<Posting>>> {
        let endpoint = self.endpoint();
        let mut postings = Vec::new();

        for page in 0..self.config.max_pages {
            if page > 0 {
                pace(ctx.delay).await;
            }
            let request = self.request(query, page);
            let response: SearchResponse = post_json(&ctx.client, &endpoint, &request).await?;
            let (mapped, more) = self.map_page(response, request.offset, &ctx.matcher);
            postings.extend(mapped);
            if !more {
                break;
            }
        }

        Ok(Some(postings))
    }

    /// Map one page; the flag tells whether another page may follow.
    fn map_page(
        &self,
        response: SearchResponse,
        offset: usize,
        matcher: &Matcher,
    ) -> (Vec<Posting>, bool) {
        let jobs = response.job_postings.unwrap_or_default();
        let fetched = offset + jobs.len();
        let more = jobs.len() >= self.config.page_size
            && response.total.is_none_or(|total| (fetched as u64) < total);

        let postings = jobs
            .into_iter()
            .filter_map(|job| self.map_job(job, matcher))
            .collect();
        (postings, more)
    }

    fn map_job(&self, job: JobPosting, matcher: &Matcher) -> Option<Posting> {
        let title = job.title.unwrap_or_default();
        if !matcher.keyword_match(&title) {
            return None;
        }
        if job.subtitle.is_some_and(|s| matcher.mentions_excluded(&s)) {
            return None;
        }

        let location = location_or(job.locations_text.as_deref(), Some(FALLBACK_LOCATION));
        if !matcher.is_eligible_location(&location) {
            return None;
        }

        let path = job.external_path.filter(|p| !p.trim().is_empty())?;
        Some(Posting::new(
            &self.config.label,
            title,
            location,
            self.link(path.trim()),
        ))
    }

    /// Public posting URL; `externalPath` is relative to the site.
    fn link(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let path = path.trim_start_matches('/');
        format!("https://{}/{}/{path}", self.config.host, self.config.site)
    }
}

#[async_trait]
impl JobSource for WorkdaySource {
    fn name(&self) -> String {
        format!("workday:{}", self.config.label)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceConfig;
    use crate::models::Config;

    fn salesforce() -> WorkdaySource {
        let config = Config::default()
            .sources
            .into_iter()
            .find_map(|s| match s {
                SourceConfig::Workday(c) if c.label == "Salesforce" => Some(c),
                _ => None,
            })
            .unwrap();
        WorkdaySource::new(config)
    }

    fn response(total: Option<u64>, count: usize) -> SearchResponse {
        SearchResponse {
            total,
            job_postings: Some(
                (0..count)
                    .map(|i| JobPosting {
                        title: Some(format!("Software Engineer {i}")),
                        external_path: Some(format!("/job/San-Francisco/SWE_{i}")),
                        locations_text: Some("San Francisco, CA, United States".into()),
                        subtitle: None,
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_endpoint_and_link() {
        let source = salesforce();
        assert_eq!(
            source.endpoint(),
            "https://salesforce.wd1.myworkdayjobs.com/wday/cxs/salesforce/External_Career_Site/jobs"
        );
        assert_eq!(
            source.link("/job/San-Francisco/SWE_1"),
            "https://salesforce.wd1.myworkdayjobs.com/External_Career_Site/job/San-Francisco/SWE_1"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let source = salesforce();
        let body = serde_json::to_value(source.request("machine learning", 2)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "appliedFacets": {"locations": ["United States of America"]},
                "limit": 50,
                "offset": 100,
                "searchText": "machine learning",
            })
        );
    }

    #[test]
    fn test_map_job_filters() {
        let source = salesforce();
        let response: SearchResponse = serde_json::from_str(
            r#"{"total": 4, "jobPostings": [
                {"title": "Senior Software Engineer", "externalPath": "/job/a",
                 "locationsText": "Seattle, WA, USA", "postedOn": "Posted Today"},
                {"title": "AI Engineer", "externalPath": "/job/b", "locationsText": null},
                {"title": "Software Engineer", "externalPath": "/job/c",
                 "locationsText": "Remote", "subtitle": "Summer Internship Program"},
                {"title": "Backend Engineer", "externalPath": "/job/d",
                 "locationsText": "Toronto, Canada"}
            ]}"#,
        )
        .unwrap();

        let (postings, more) = source.map_page(response, 0, &Matcher::default());
        assert!(!more);
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].company, "Salesforce");
        assert_eq!(postings[1].location, "USA");
        assert!(postings[1].link.ends_with("/External_Career_Site/job/b"));
    }

    #[test]
    fn test_pagination_stops_on_short_page() {
        let source = salesforce();
        let (_, more) = source.map_page(response(None, 50), 0, &Matcher::default());
        assert!(more);
        let (_, more) = source.map_page(response(None, 12), 50, &Matcher::default());
        assert!(!more);
    }

    #[test]
    fn test_pagination_stops_at_total() {
        let source = salesforce();
        let (_, more) = source.map_page(response(Some(100), 50), 50, &Matcher::default());
        assert!(!more);
        let (_, more) = source.map_page(response(Some(101), 50), 50, &Matcher::default());
        assert!(more);
    }

    #[test]
    fn test_missing_postings_is_an_empty_page() {
        let source = salesforce();
        let response: SearchResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        let (postings, more) = source.map_page(response, 0, &Matcher::default());
        assert!(postings.is_empty());
        assert!(!more);
    }
}
