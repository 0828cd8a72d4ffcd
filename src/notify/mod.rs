//! Digest composition and delivery.
//!
//! A run produces exactly one [`Digest`]: the new postings followed by a
//! per-adapter summary. Delivery is behind the [`Notifier`] trait so that dry
//! runs and tests can swap out SMTP.

mod logging;
mod smtp;

use async_trait::async_trait;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::error::Result;
use crate::models::{NotifyConfig, Posting, SourceReport};

pub use logging::LogNotifier;
pub use smtp::{EmailCredentials, SmtpNotifier};

/// Rendered notification for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub text: String,
    pub html: String,
    /// Number of postings listed
    pub count: usize,
}

impl Digest {
    /// Render the digest for the new postings and the adapter reports.
    pub fn compose(new: &[Posting], reports: &[SourceReport], config: &NotifyConfig) -> Self {
        let prefix = config.subject_prefix.trim();
        let subject = if new.is_empty() {
            format!("{prefix} No new US jobs detected this run")
        } else {
            format!("{prefix} {} new US postings detected", new.len())
        };

        Self {
            subject: subject.trim_start().to_string(),
            text: Self::render_text(new, reports, config),
            html: Self::render_html(new, reports, config),
            count: new.len(),
        }
    }

    fn render_text(new: &[Posting], reports: &[SourceReport], config: &NotifyConfig) -> String {
        let mut out = String::new();
        if new.is_empty() {
            out.push_str("No new US jobs detected this run.\n");
        } else {
            out.push_str(&config.heading);
            out.push_str("\n\n");
            for p in new {
                out.push_str(&format!(
                    "{} - {} - {}\n{}\n\n",
                    p.title, p.company, p.location, p.link
                ));
            }
        }

        out.push_str("\nAdapter summary:\n");
        for report in reports {
            out.push_str(&report.to_string());
            out.push('\n');
        }
        out
    }

    fn render_html(new: &[Posting], reports: &[SourceReport], config: &NotifyConfig) -> String {
        let mut out = String::from("<html><body>");
        if new.is_empty() {
            out.push_str("<p>No new US jobs detected this run.</p>");
        } else {
            out.push_str(&format!("<h3>{}</h3><ul>", encode_text(&config.heading)));
            for p in new {
                out.push_str(&format!(
                    "<li><b>{}</b> - {} - {}<br><a href=\"{}\">{}</a></li>",
                    encode_text(&p.title),
                    encode_text(&p.company),
                    encode_text(&p.location),
                    encode_double_quoted_attribute(&p.link),
                    encode_text(&p.link),
                ));
            }
            out.push_str("</ul>");
        }

        out.push_str("<hr><p><b>Adapter summary</b>");
        for report in reports {
            out.push_str("<br>");
            out.push_str(&encode_text(&report.to_string()));
        }
        out.push_str("</p></body></html>");
        out
    }
}

/// Whether a digest with `new_count` postings should be delivered.
pub fn should_send(new_count: usize, config: &NotifyConfig) -> bool {
    new_count > 0 || config.send_when_empty
}

/// Delivery channel for digests.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the digest. An error means nothing was delivered.
    async fn send(&self, digest: &Digest) -> Result<()>;
}
