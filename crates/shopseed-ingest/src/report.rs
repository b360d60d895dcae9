use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use crate::pipeline::ItemOutcome;

/// Totals for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Item rows seen.
    pub total: usize,
    /// Rows dropped before any submission (validation or image failures).
    pub skipped: usize,
    /// Rows that reached submission, or would have in dry-run mode.
    pub attempted: usize,
    /// Submissions answered with a 2xx status.
    pub succeeded: usize,
    /// Submissions answered with a non-2xx status or that failed in transit.
    pub errored: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "items seen:        {}", self.total)?;
        writeln!(f, "skipped:           {}", self.skipped)?;
        writeln!(f, "submit attempted:  {}", self.attempted)?;
        writeln!(f, "  succeeded:       {}", self.succeeded)?;
        write!(f, "  errored:         {}", self.errored)
    }
}

/// Concurrent counters behind a [`RunReport`].
#[derive(Debug, Default)]
pub struct RunCounters {
    total: AtomicUsize,
    skipped: AtomicUsize,
    attempted: AtomicUsize,
    succeeded: AtomicUsize,
    errored: AtomicUsize,
}

impl RunCounters {
    pub fn record(&self, outcome: &ItemOutcome) {
        self.total.fetch_add(1, Ordering::Relaxed);
        match outcome {
            ItemOutcome::Skipped(_) => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
            }
            ItemOutcome::Succeeded { .. } => {
                self.attempted.fetch_add(1, Ordering::Relaxed);
                self.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            ItemOutcome::Rejected { .. } | ItemOutcome::Failed { .. } => {
                self.attempted.fetch_add(1, Ordering::Relaxed);
                self.errored.fetch_add(1, Ordering::Relaxed);
            }
            ItemOutcome::DryRun { .. } => {
                self.attempted.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> RunReport {
        RunReport {
            total: self.total.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            attempted: self.attempted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            errored: self.errored.load(Ordering::Relaxed),
        }
    }
}
