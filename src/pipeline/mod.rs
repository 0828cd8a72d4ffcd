//! Run pipeline: scan every source, select unseen postings, notify, persist.
//!
//! - `Scanner::run_scan`: Invoke all adapters and merge their postings
//! - `select_new`: Filter postings against the seen-set
//! - `run_once`: One complete poll, from loading state to saving it

pub mod run;
pub mod scan;
pub mod select;

pub use run::{RunSummary, run_once};
pub use scan::{ScanOutcome, Scanner, dedupe_postings};
pub use select::select_new;

#[cfg(test)]
pub(crate) mod testing {
    //! Offline sources and notifiers for pipeline tests.

    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::error::{AppError, Result};
    use crate::models::{AdapterResult, Config, Posting, SourceStatus};
    use crate::notify::{Digest, Notifier};
    use crate::pipeline::Scanner;
    use crate::services::{JobSource, SourceContext};

    pub enum Behavior {
        Returns(Vec<Posting>),
        Fails,
        Panics,
    }

    pub struct FakeSource {
        pub name: String,
        pub behavior: Behavior,
    }

    impl FakeSource {
        pub fn returning(name: &str, postings: Vec<Posting>) -> Arc<dyn JobSource> {
            Arc::new(Self {
                name: name.to_string(),
                behavior: Behavior::Returns(postings),
            })
        }

        pub fn failing(name: &str) -> Arc<dyn JobSource> {
            Arc::new(Self {
                name: name.to_string(),
                behavior: Behavior::Fails,
            })
        }

        pub fn panicking(name: &str) -> Arc<dyn JobSource> {
            Arc::new(Self {
                name: name.to_string(),
                behavior: Behavior::Panics,
            })
        }
    }

    #[async_trait]
    impl JobSource for FakeSource {
        fn name(&self) -> String {
            self.name.clone()
        }

        async fn collect(&self, _ctx: &SourceContext) -> AdapterResult {
            match &self.behavior {
                Behavior::Returns(postings) => {
                    AdapterResult::new(self.name(), SourceStatus::Ok, postings.clone())
                }
                Behavior::Fails => {
                    let error = AppError::source(self.name(), "connection reset");
                    let mut status = SourceStatus::Ok;
                    status.record_error(&error);
                    AdapterResult::failed(self.name(), status)
                }
                Behavior::Panics => panic!("adapter {} blew up", self.name),
            }
        }
    }

    pub fn scanner(sources: Vec<Arc<dyn JobSource>>) -> Scanner {
        let ctx = SourceContext::from_config(&Config::default()).unwrap();
        Scanner::new(sources, ctx, 2)
    }

    /// Records every digest; optionally fails every delivery.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<Digest>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn digests(&self) -> Vec<Digest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, digest: &Digest) -> Result<()> {
            if self.fail {
                return Err(AppError::email("relay refused connection"));
            }
            self.sent.lock().unwrap().push(digest.clone());
            Ok(())
        }
    }
}
