//! Notifier that only writes the digest to the log.

use async_trait::async_trait;

use crate::error::Result;
use crate::notify::{Digest, Notifier};

/// Logs the digest instead of delivering it. Used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, digest: &Digest) -> Result<()> {
        log::info!("Digest: {}", digest.subject);
        for line in digest.text.lines().filter(|l| !l.is_empty()) {
            log::info!("  {line}");
        }
        Ok(())
    }
}
