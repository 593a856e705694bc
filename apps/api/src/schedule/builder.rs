//! Training schedule builder.
//!
//! A staff member gets one orientation event on the hire date, then one annual
//! training event per year of tenure, held a week before each work anniversary.
//! Every event's certificate is issued two days after the training.

use chrono::NaiveDate;
use tracing::warn;

use crate::schedule::dates::{add_days, add_years};

/// Anniversaries are shifted this many days before the exact anniversary date.
pub const ANNIVERSARY_LEAD_DAYS: i64 = 7;
/// Certificates are dated this many days after the training.
pub const CERTIFICATE_DELAY_DAYS: i64 = 2;
/// Upper bound on generated anniversaries. Longer tenures are truncated.
pub const MAX_ANNIVERSARIES: i32 = 99;

pub const ORIENTATION_GOALS: &str = "Basic and Service Specific Orientation";
pub const ORIENTATION_EVALUATION: &str = "Pre & Post written evaluation";
pub const ANNUAL_GOALS: &str = "Annual Training";
pub const ANNUAL_EVALUATION: &str = "Basic and Service Specific Orientation Review";

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// One row of the training log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingEvent {
    pub training_date: NaiveDate,
    pub goals: &'static str,
    pub evaluation: &'static str,
    pub certificate_date: NaiveDate,
    /// True only for the hire-date orientation, which is always the first event.
    pub is_first: bool,
}

impl TrainingEvent {
    fn orientation(hire: NaiveDate) -> Self {
        Self {
            training_date: hire,
            goals: ORIENTATION_GOALS,
            evaluation: ORIENTATION_EVALUATION,
            certificate_date: add_days(hire, CERTIFICATE_DELAY_DAYS),
            is_first: true,
        }
    }

    fn annual(training_date: NaiveDate) -> Self {
        Self {
            training_date,
            goals: ANNUAL_GOALS,
            evaluation: ANNUAL_EVALUATION,
            certificate_date: add_days(training_date, CERTIFICATE_DELAY_DAYS),
            is_first: false,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Builds the ordered training schedule for one staff member.
///
/// The bound is `separation` when given, otherwise `today`. An anniversary
/// exactly on the bound is included. The orientation event is emitted even when
/// the hire date is after the bound.
pub fn build_schedule(
    hire: NaiveDate,
    separation: Option<NaiveDate>,
    today: NaiveDate,
) -> Vec<TrainingEvent> {
    let bound = separation.unwrap_or(today);
    if hire > bound {
        warn!(
            "Hire date {hire} is after the schedule bound {bound}; emitting orientation only"
        );
    }

    let mut events = vec![TrainingEvent::orientation(hire)];

    for year in 1..=MAX_ANNIVERSARIES {
        let Some(anniversary) = add_years(hire, year) else {
            break;
        };
        let candidate = add_days(anniversary, -ANNIVERSARY_LEAD_DAYS);
        if candidate > bound {
            break;
        }
        events.push(TrainingEvent::annual(candidate));
    }

    events
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
