//! Greenhouse public job board adapter.

use async_trait::async_trait;
use serde::Deserialize;

use crate::matching::Matcher;
use crate::models::{AdapterResult, GreenhouseConfig, Posting, SourceStatus};
use crate::services::{JobSource, SourceContext, failed_result};
use crate::utils::http::get_json;

const API_BASE: &str = "https://boards-api.greenhouse.io/v1/boards";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GreenhouseBoard {
    jobs: Option<Vec<GreenhouseJob>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GreenhouseJob {
    title: Option<String>,
    location: Option<Named>,
    offices: Option<Vec<Named>>,
    absolute_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Named {
    name: Option<String>,
}

pub struct GreenhouseSource {
    config: GreenhouseConfig,
}

impl GreenhouseSource {
    pub fn new(config: GreenhouseConfig) -> Self {
        Self { config }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}/jobs", self.config.board)
    }

    fn map_board(&self, board: GreenhouseBoard, matcher: &Matcher) -> Vec<Posting> {
        board
            .jobs
            .unwrap_or_default()
            .into_iter()
            .filter_map(|job| self.map_job(job, matcher))
            .collect()
    }

    fn map_job(&self, job: GreenhouseJob, matcher: &Matcher) -> Option<Posting> {
        let title = job.title.unwrap_or_default();
        if !matcher.keyword_match(&title) {
            return None;
        }

        let mut location = job.location.and_then(|l| l.name).unwrap_or_default();
        if location.trim().is_empty() {
            location = job
                .offices
                .unwrap_or_default()
                .into_iter()
                .filter_map(|o| o.name)
                .filter(|n| !n.trim().is_empty())
                .collect::<Vec<_>>()
                .join(", ");
        }
        if !matcher.is_eligible_location(&location) {
            return None;
        }

        let link = job.absolute_url.filter(|u| !u.trim().is_empty())?;
        Some(Posting::new(&self.config.label, title, location, link))
    }
}

#[async_trait]
impl JobSource for GreenhouseSource {
    fn name(&self) -> String {
        format!("greenhouse:{}", self.config.board)
    }

    async fn collect(&self, ctx: &SourceContext) -> AdapterResult {
        let query = [("content".to_string(), "true".to_string())];
        match get_json::<GreenhouseBoard>(&ctx.client, &self.endpoint(), &query).await {
            Ok(board) => AdapterResult::new(
                self.name(),
                SourceStatus::Ok,
                self.map_board(board, &ctx.matcher),
            ),
            Err(error) => failed_result(self.name(), &error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GreenhouseSource {
        GreenhouseSource::new(GreenhouseConfig {
            label: "Capgemini America".into(),
            board: "capgemini".into(),
        })
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            source().endpoint(),
            "https://boards-api.greenhouse.io/v1/boards/capgemini/jobs"
        );
    }

    #[test]
    fn test_map_board() {
        let board: GreenhouseBoard = serde_json::from_str(
            r#"{"jobs": [
                {"title": "Backend Engineer", "location": {"name": "Chicago, IL, United States"},
                 "absolute_url": "https://boards.greenhouse.io/capgemini/jobs/1", "id": 1},
                {"title": "ML Engineer", "location": {"name": ""},
                 "offices": [{"name": "Remote - US"}, {"name": null}],
                 "absolute_url": "https://boards.greenhouse.io/capgemini/jobs/2"},
                {"title": "Software Engineer", "location": {"name": "Paris, France"},
                 "absolute_url": "https://boards.greenhouse.io/capgemini/jobs/3"},
                {"title": null, "location": null, "absolute_url": null},
                {"title": "Data Scientist Intern", "location": {"name": "Remote"},
                 "absolute_url": "https://boards.greenhouse.io/capgemini/jobs/5"}
            ], "meta": {"total": 5}}"#,
        )
        .unwrap();

        let postings = source().map_board(board, &Matcher::default());
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].company, "Capgemini America");
        assert_eq!(postings[0].location, "Chicago, IL, United States");
        assert_eq!(postings[1].location, "Remote - US");
    }

    #[test]
    fn test_empty_board() {
        let board: GreenhouseBoard = serde_json::from_str("{}").unwrap();
        assert!(source().map_board(board, &Matcher::default()).is_empty());
    }
}
