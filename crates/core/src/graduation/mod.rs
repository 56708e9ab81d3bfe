//! Annual graduation sweep.
//!
//! Memberships of people who graduated before the current year are marked
//! inactive. People graduating this year keep their memberships until the
//! next year's run.

mod clock;
mod sweep;

pub use clock::{Clock, FixedClock, SystemClock};
pub use sweep::{cutoff_year, GraduationReport, GraduationSweep};
