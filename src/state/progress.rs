//! Progress tracker — applies authoritative `GameStatus` snapshots.
//!
//! DESIGN
//! ======
//! Every snapshot fully replaces the previous one. Snapshots that break
//! the partition invariants are rejected and the last good one is kept.
//! The tracker only reports that the game is won; scheduling the delayed
//! victory notice is the session's job.

#[cfg(test)]
#[path = "progress_test.rs"]
mod progress_test;

use std::fmt;

use crate::net::types::{GameStatus, SnapshotError};

/// Safe NPCs out of the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub safe: usize,
    pub total: usize,
}

impl Progress {
    #[must_use]
    pub fn from_status(status: &GameStatus) -> Self {
        Self { safe: status.safe_count, total: status.total_npcs }
    }

    /// Fraction in `[0, 1]`; an empty roster counts as no progress.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.safe as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn percent(self) -> f64 {
        self.fraction() * 100.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} NPCs safe", self.safe, self.total)
    }
}

/// Result of applying one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub progress: Progress,
    pub game_won: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    last: Option<GameStatus>,
}

impl ProgressTracker {
    /// Replace the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns the violated invariant and keeps the previous snapshot.
    pub fn apply(&mut self, status: GameStatus) -> Result<ProgressUpdate, SnapshotError> {
        status.check_invariants()?;
        let update = ProgressUpdate { progress: Progress::from_status(&status), game_won: status.game_won };
        self.last = Some(status);
        Ok(update)
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&GameStatus> {
        self.last.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.last.as_ref().map(Progress::from_status).unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
