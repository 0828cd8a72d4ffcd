//! Link harvesting from plain HTML listing pages.
//!
//! Used for career sites that expose neither an API nor an embedded payload.
//! Listing anchors are filtered by URL shape and title keywords; with
//! `deep_verify` each candidate page must mention a US phrase.

use std::collections::HashMap;

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};

use crate::error::Result;
use crate::matching::{Matcher, mentions_any};
use crate::models::{AdapterResult, HarvestConfig, HtmlLinksConfig, Posting, SourceStatus};
use crate::services::{JobSource, SourceContext, parse_selector};
use crate::utils::http::{fetch_text, pace};
use crate::utils::{is_blocked_domain, resolve};

/// Location recorded for postings confirmed by a page-body phrase.
const VERIFIED_LOCATION: &str = "USA";

const SKIPPED_SCHEMES: [&str; 3] = ["javascript:", "mailto:", "tel:"];

pub struct HtmlLinksSource {
    config: HtmlLinksConfig,
    job_link: Regex,
    anchors: Selector,
}

impl HtmlLinksSource {
    pub fn new(config: HtmlLinksConfig, job_link_pattern: &str) -> Result<Self> {
        Ok(Self {
            config,
            job_link: Regex::new(job_link_pattern)?,
            anchors: parse_selector("a[href]")?,
        })
    }

    async fn harvest_page(&self, ctx: &SourceContext, url: &str) -> Result<Vec<Posting>> {
        let html = fetch_text(&ctx.client, url).await?;
        let candidates = extract_candidates(
            url,
            &html,
            &self.job_link,
            &self.anchors,
            &ctx.matcher,
            ctx.harvest.max_links_per_page,
        );
        log::debug!("{}: {} candidate links on {url}", self.name(), candidates.len());

        let mut postings = Vec::new();
        for (title, link) in candidates {
            if !admits_candidate(&title, &link, &ctx.matcher, &ctx.harvest) {
                continue;
            }

            let page = if self.config.deep_verify {
                pace(ctx.delay).await;
                Some(fetch_text(&ctx.client, &link).await)
            } else {
                None
            };
            if let Some(Err(error)) = &page {
                log::debug!("{}: skipping {link}: {error}", self.name());
            }
            let Some(location) = verified_location(page.as_ref(), &ctx.harvest.us_phrases) else {
                continue;
            };

            postings.push(Posting::new(&self.config.label, title, location, link));
        }
        Ok(postings)
    }
}

/// True if a candidate's title matches and its link is not on a blocked domain.
fn admits_candidate(
    title: &str,
    link: &str,
    matcher: &Matcher,
    harvest: &HarvestConfig,
) -> bool {
    matcher.keyword_match(title) && !is_blocked_domain(link, &harvest.blocked_domains)
}

/// Location to record for a candidate, or `None` to drop it.
///
/// `page` is the fetched candidate page, absent when deep verification is
/// off. A failed fetch drops only this candidate.
fn verified_location(
    page: Option<&Result<String>>,
    us_phrases: &[String],
) -> Option<&'static str> {
    match page {
        None => Some(""),
        Some(Ok(body)) if mentions_any(body, us_phrases) => Some(VERIFIED_LOCATION),
        Some(_) => None,
    }
}

#[async_trait]
impl JobSource for HtmlLinksSource {
    fn name(&self) -> String {
        format!("html:{}", self.config.label)
    }

    async fn collect(&self, ctx: &SourceContext) -> AdapterResult {
        let name = self.name();
        let mut status = SourceStatus::Ok;
        let mut postings = Vec::new();

        for (i, url) in self.config.urls.iter().enumerate() {
            if i > 0 {
                pace(ctx.delay).await;
            }
            match self.harvest_page(ctx, url).await {
                Ok(found) => postings.extend(found),
                Err(error) => {
                    log::warn!("{name}: listing {url} failed: {error}");
                    status.record_error(&error);
                }
            }
        }

        AdapterResult::new(name, status, super::dedupe_by_link(postings))
    }
}

/// Collect `(text, absolute link)` candidates from a listing page.
///
/// Anchor text is whitespace-collapsed. Anchors with no text are kept only
/// when their URL looks like a job link. Duplicate URLs keep the longest
/// text at the position of their first appearance. The survivors must look
/// like a job link or carry a matching title; at most `max` are returned.
pub fn extract_candidates(
    base_url: &str,
    html: &str,
    job_link: &Regex,
    anchors: &Selector,
    matcher: &Matcher,
    max: usize,
) -> Vec<(String, String)> {
    let document = Html::parse_document(html);
    let mut order: Vec<(String, String)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for anchor in document.select(anchors) {
        let Some(href) = anchor.value().attr("href").map(str::trim) else {
            continue;
        };
        let lowered = href.to_ascii_lowercase();
        if href.is_empty() || SKIPPED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
            continue;
        }

        let text = anchor.text().collect::<Vec<_>>().join(" ");
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let link = resolve(base_url, href);
        if text.is_empty() && !job_link.is_match(&link) {
            continue;
        }

        match index.get(&link).copied() {
            Some(i) => {
                if text.len() > order[i].0.len() {
                    order[i].0 = text;
                }
            }
            None => {
                index.insert(link.clone(), order.len());
                order.push((text, link));
            }
        }
    }

    order
        .into_iter()
        .filter(|(text, link)| job_link.is_match(link) || matcher.keyword_match(text))
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const LISTING: &str = r#"
        <html><body>
          <nav>
            <a href="/about">About us</a>
            <a href="mailto:jobs@example.com">Email careers</a>
            <a href="javascript:void(0)">Open menu</a>
          </nav>
          <ul>
            <li><a href="/careers/123">ML</a></li>
            <li><a href="/careers/123">
                  Machine   Learning
                  Engineer</a></li>
            <li><a href="https://example.com/jobs/456"><img src="x.png"></a></li>
            <li><a href="/team/ai-platform">AI Platform Engineer</a></li>
            <li><a href="/blog/post">Our culture</a></li>
            <li><a href="https://www.linkedin.com/company/example/jobs">Software Engineer</a></li>
          </ul>
        </body></html>
    "#;

    fn extract(max: usize) -> Vec<(String, String)> {
        let harvest = HarvestConfig::default();
        extract_candidates(
            "https://example.com/search",
            LISTING,
            &Regex::new(&harvest.job_link_pattern).unwrap(),
            &parse_selector("a[href]").unwrap(),
            &Matcher::default(),
            max,
        )
    }

    #[test]
    fn test_extract_candidates() {
        let candidates = extract(30);
        assert_eq!(
            candidates,
            vec![
                (
                    "Machine Learning Engineer".to_string(),
                    "https://example.com/careers/123".to_string()
                ),
                (String::new(), "https://example.com/jobs/456".to_string()),
                (
                    "AI Platform Engineer".to_string(),
                    "https://example.com/team/ai-platform".to_string()
                ),
                (
                    "Software Engineer".to_string(),
                    "https://www.linkedin.com/company/example/jobs".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_extract_candidates_respects_cap() {
        let candidates = extract(2);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].1, "https://example.com/jobs/456");
    }

    #[test]
    fn test_admits_candidate_rechecks_title() {
        let harvest = HarvestConfig::default();
        let matcher = Matcher::default();
        let link = "https://example.com/careers/123";
        assert!(admits_candidate("Machine Learning Engineer", link, &matcher, &harvest));
        assert!(!admits_candidate("", "https://example.com/jobs/456", &matcher, &harvest));
        assert!(!admits_candidate("Software Engineering Intern", link, &matcher, &harvest));
    }

    #[test]
    fn test_admits_candidate_drops_blocked_domains() {
        let harvest = HarvestConfig::default();
        let admitted: Vec<_> = extract(30)
            .into_iter()
            .filter(|(title, link)| admits_candidate(title, link, &Matcher::default(), &harvest))
            .map(|(_, link)| link)
            .collect();
        assert_eq!(
            admitted,
            vec![
                "https://example.com/careers/123".to_string(),
                "https://example.com/team/ai-platform".to_string(),
            ]
        );
    }

    #[test]
    fn test_verified_location_without_deep_verify_is_empty() {
        let phrases = HarvestConfig::default().us_phrases;
        assert_eq!(verified_location(None, &phrases), Some(""));
    }

    #[test]
    fn test_verified_location_checks_page_body() {
        let phrases = HarvestConfig::default().us_phrases;
        let us_page: Result<String> = Ok("<p>Location: Denver, United States</p>".into());
        let other_page: Result<String> = Ok("<p>Location: Berlin, Germany</p>".into());
        assert_eq!(verified_location(Some(&us_page), &phrases), Some("USA"));
        assert_eq!(verified_location(Some(&other_page), &phrases), None);
    }

    #[test]
    fn test_verified_location_skips_failed_fetch() {
        let phrases = HarvestConfig::default().us_phrases;
        let failed: Result<String> = Err(AppError::source("html:Infosys", "connection reset"));
        let ok: Result<String> = Ok("Remote within the USA".into());
        let pages = [failed, ok];
        let kept: Vec<_> = pages
            .iter()
            .filter_map(|page| verified_location(Some(page), &phrases))
            .collect();
        assert_eq!(kept, vec!["USA"]);
    }

    #[test]
    fn test_source_name() {
        let source = HtmlLinksSource::new(
            HtmlLinksConfig {
                label: "Infosys".into(),
                urls: vec!["https://example.com/search".into()],
                deep_verify: true,
            },
            &HarvestConfig::default().job_link_pattern,
        )
        .unwrap();
        assert_eq!(source.name(), "html:Infosys");
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let config = HtmlLinksConfig {
            label: "Bad".into(),
            urls: vec![],
            deep_verify: false,
        };
        assert!(HtmlLinksSource::new(config, "(unclosed").is_err());
    }
}
