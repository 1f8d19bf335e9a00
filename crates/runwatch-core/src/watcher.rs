//! Run Watcher: poll one run until it completes.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::warn;

use crate::ci_api::CiApi;
use crate::domain::error::WatchError;
use crate::domain::run::{Conclusion, RunId};
use crate::obs::emit_run_status;

/// Polls a single run at a fixed interval.
pub struct RunWatcher {
    api: Arc<dyn CiApi>,
    poll_interval: Duration,
}

impl RunWatcher {
    pub fn new(api: Arc<dyn CiApi>, poll_interval: Duration) -> Self {
        Self { api, poll_interval }
    }

    /// Wait for `run_id` to complete and return its conclusion.
    ///
    /// Returns only once the fetched status is `completed`; a completed run
    /// without a conclusion reports [`Conclusion::Unknown`]. With no
    /// `deadline` this waits for as long as the run takes. Transient API
    /// errors are logged and retried on the next poll, anything else aborts.
    pub async fn watch(
        &self,
        run_id: RunId,
        deadline: Option<Instant>,
    ) -> Result<Conclusion, WatchError> {
        let started = Instant::now();

        loop {
            match self.api.get_run(run_id).await {
                Ok(run) => {
                    emit_run_status(run_id, run.status);
                    if let Some(conclusion) = run.final_conclusion() {
                        return Ok(conclusion);
                    }
                }
                Err(e) if e.is_transient() => {
                    warn!("Failed to fetch run #{run_id}, retrying: {e}");
                }
                Err(source) => return Err(WatchError::Api { run_id, source }),
            }

            let mut nap = self.poll_interval;
            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    return Err(WatchError::DeadlineExceeded {
                        run_id,
                        waited: now - started,
                    });
                }
                nap = nap.min(deadline - now);
            }
            sleep(nap).await;
        }
    }
}
