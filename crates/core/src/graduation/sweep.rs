use std::fmt;

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

use crate::storage::{MembershipRepository, Result};

use super::clock::Clock;

/// Returns the latest graduation year that gets swept at `now`.
///
/// The year is read in `time_zone`, so a run just after midnight on
/// January 1st local time already uses the new year.
pub fn cutoff_year(now: DateTime<Utc>, time_zone: Tz) -> i32 {
    now.with_timezone(&time_zone).year() - 1
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraduationReport {
    pub cutoff_year: i32,
    /// Memberships that went from active to inactive.
    pub deactivated: u64,
}

impl fmt::Display for GraduationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Updated the membership status of {} student club relationships!",
            self.deactivated
        )
    }
}

/// Deactivates memberships of graduated students.
#[derive(Debug, Clone, Copy)]
pub struct GraduationSweep {
    time_zone: Tz,
}

impl GraduationSweep {
    pub fn new(time_zone: Tz) -> Self {
        Self { time_zone }
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Runs the sweep once against `repo`.
    ///
    /// Store errors are returned as-is; nothing is retried.
    pub async fn run<R, C>(&self, repo: &R, clock: &C) -> Result<GraduationReport>
    where
        R: MembershipRepository + ?Sized,
        C: Clock + ?Sized,
    {
        let now = clock.now();
        let cutoff_year = cutoff_year(now, self.time_zone);

        let deactivated = repo.deactivate_graduated(cutoff_year).await?;

        Ok(GraduationReport {
            cutoff_year,
            deactivated,
        })
    }
}
