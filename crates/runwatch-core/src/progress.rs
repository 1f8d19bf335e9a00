//! User-facing progress while searching for a run.
//!
//! The orchestrator reports each unsuccessful search attempt to a
//! [`Progress`] sink it was given. Which sink is used decides how chatty the
//! console is; it never changes what the orchestrator does.

use std::io::Write;
use std::time::Duration;

use tracing::debug;

/// Receives search progress from the orchestrator.
pub trait Progress: Send {
    /// A search attempt found nothing. `attempt` starts at 1.
    fn no_match_yet(&mut self, attempt: u32, elapsed: Duration);

    /// The search phase ended, with or without a match.
    fn search_finished(&mut self);
}

/// Prints one dot per empty attempt, terminating the line when the search ends.
pub struct DotProgress<W: Write + Send> {
    out: W,
    dots: u32,
}

impl DotProgress<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> DotProgress<W> {
    pub fn new(out: W) -> Self {
        Self { out, dots: 0 }
    }

    /// Give back the writer, e.g. to inspect what was printed.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Progress for DotProgress<W> {
    fn no_match_yet(&mut self, _attempt: u32, _elapsed: Duration) {
        // Console output is best effort.
        let _ = write!(self.out, ".");
        let _ = self.out.flush();
        self.dots += 1;
    }

    fn search_finished(&mut self) {
        if self.dots > 0 {
            let _ = writeln!(self.out);
            let _ = self.out.flush();
            self.dots = 0;
        }
    }
}

/// Emits a debug line per empty attempt; the verbose counterpart of [`DotProgress`].
#[derive(Debug, Default)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn no_match_yet(&mut self, attempt: u32, elapsed: Duration) {
        debug!(
            attempt,
            elapsed_secs = elapsed.as_secs(),
            "Checking for workflow runs... (attempt {attempt})"
        );
    }

    fn search_finished(&mut self) {}
}

/// Discards progress.
#[derive(Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn no_match_yet(&mut self, _attempt: u32, _elapsed: Duration) {}

    fn search_finished(&mut self) {}
}
