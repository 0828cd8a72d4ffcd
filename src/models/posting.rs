//! Posting data structure and its persistent identity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One job advertisement as observed in a single run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Posting {
    /// Company label from the source registry
    pub company: String,

    /// Job title as published
    pub title: String,

    /// Location text as published (may be empty for harvested links)
    pub location: String,

    /// Absolute URL to the posting
    pub link: String,
}

impl Posting {
    /// Create a posting, trimming every display field.
    pub fn new(
        company: impl AsRef<str>,
        title: impl AsRef<str>,
        location: impl AsRef<str>,
        link: impl AsRef<str>,
    ) -> Self {
        Self {
            company: company.as_ref().trim().to_string(),
            title: title.as_ref().trim().to_string(),
            location: location.as_ref().trim().to_string(),
            link: link.as_ref().trim().to_string(),
        }
    }

    /// Stable identity of this posting across runs.
    pub fn identity(&self) -> String {
        compute_identity(&self.company, &self.title, &self.link)
    }

    /// Key used for within-run deduplication.
    pub fn dedup_key(&self) -> (&str, &str, &str) {
        (&self.company, &self.title, &self.link)
    }
}

/// Hash the pipe-joined `company|title|link` triple into a hex fingerprint.
pub fn compute_identity(company: &str, title: &str, link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{company}|{title}|{link}").as_bytes());
    hex::encode(hasher.finalize())
}

/// Identities of every posting reported by a past run.
///
/// Serialized as a sorted JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenSet(BTreeSet<String>);

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.0.contains(identity)
    }

    /// Insert an identity, returning `true` if it was not present.
    pub fn insert(&mut self, identity: String) -> bool {
        self.0.insert(identity)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl FromIterator<String> for SeenSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
