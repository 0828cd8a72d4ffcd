//! Selection of postings not reported by any earlier run.

use crate::models::{Posting, SeenSet};

/// Keep postings whose identity is not yet in `seen`, adding each kept
/// identity to `seen` as it goes.
///
/// A posting repeated within `postings` is therefore returned once.
pub fn select_new(postings: Vec<Posting>, seen: &mut SeenSet) -> Vec<Posting> {
    postings
        .into_iter()
        .filter(|p| seen.insert(p.identity()))
        .collect()
}
