//! Cell content for the training log table.
//!
//! Each cell is a stack of short lines rendered as separate centred paragraphs.
//! Long phrases are pre-split so they stack neatly inside the narrow columns
//! instead of relying on the word processor's wrapping.

use crate::models::AgencyProfile;
use crate::schedule::dates::format_us;
use crate::schedule::TrainingEvent;

/// Stacked lines of one table cell.
pub type CellLines = Vec<String>;

const HEADERS: [&[&str]; 6] = [
    &["Training", "Date"],
    &["Trainer", "Name/", "Credentials"],
    &["Trainer", "Affiliation/", "Qualifications"],
    &["Training", "Goals/", "Objectives"],
    &["Evaluation", "Instrument/", "Method"],
    &["Date", "Certificate", "Issued"],
];

const ORIENTATION_GOALS_LINES: &[&str] = &["Basic", "and Service", "Specific", "Orientation"];
const FIRST_EVALUATION_LINES: &[&str] = &["Pre & Post", "written", "evaluation"];
const REVIEW_EVALUATION_LINES: &[&str] =
    &["Basic and", "Service Specific", "Orientation", "Review"];

fn lines(parts: &[&str]) -> CellLines {
    parts.iter().map(|s| s.to_string()).collect()
}

pub fn header_cells() -> Vec<CellLines> {
    HEADERS.iter().map(|h| lines(h)).collect()
}

/// The six cells for one event, left to right.
pub fn event_cells(event: &TrainingEvent, profile: &AgencyProfile) -> Vec<CellLines> {
    vec![
        vec![format_us(event.training_date)],
        vec![
            profile.trainer_name.to_string(),
            profile.trainer_credentials.to_string(),
        ],
        affiliation_lines(profile),
        goals_lines(event.goals),
        evaluation_lines(event),
        vec![format_us(event.certificate_date)],
    ]
}

/// "BS/SC Supervisor" is broken after the slash group for the affiliation column.
fn affiliation_lines(profile: &AgencyProfile) -> CellLines {
    let mut out = vec![profile.trainer_name.to_string()];
    match profile.trainer_credentials.split_once(' ') {
        Some((head, tail)) => {
            out.push(head.to_string());
            out.push(tail.to_string());
        }
        None => out.push(profile.trainer_credentials.to_string()),
    }
    out
}

/// Compound goals ("X and Y") are stacked over four lines; single phrases stay whole.
fn goals_lines(goals: &str) -> CellLines {
    if goals.contains(" and ") {
        lines(ORIENTATION_GOALS_LINES)
    } else {
        vec![goals.to_string()]
    }
}

fn evaluation_lines(event: &TrainingEvent) -> CellLines {
    if event.is_first {
        lines(FIRST_EVALUATION_LINES)
    } else {
        lines(REVIEW_EVALUATION_LINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::config::COLUMN_COUNT;
    use crate::models::Agency;
    use crate::schedule::build_schedule;
    use chrono::NaiveDate;

    fn sample_events() -> Vec<TrainingEvent> {
        build_schedule(
            NaiveDate::from_ymd_opt(2020, 3, 15).unwrap(),
            None,
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        )
    }

    #[test]
    fn test_header_has_one_cell_per_column() {
        let headers = header_cells();
        assert_eq!(headers.len(), COLUMN_COUNT);
        assert_eq!(headers[0], vec!["Training", "Date"]);
        assert_eq!(headers[5], vec!["Date", "Certificate", "Issued"]);
    }

    #[test]
    fn test_first_event_cells() {
        let events = sample_events();
        let cells = event_cells(&events[0], Agency::Attentive.profile());
        assert_eq!(cells.len(), COLUMN_COUNT);
        assert_eq!(cells[0], vec!["03/15/2020"]);
        assert_eq!(cells[1], vec!["Joel Posen", "BS/SC Supervisor"]);
        assert_eq!(cells[2], vec!["Joel Posen", "BS/SC", "Supervisor"]);
        assert_eq!(
            cells[3],
            vec!["Basic", "and Service", "Specific", "Orientation"]
        );
        assert_eq!(cells[4], vec!["Pre & Post", "written", "evaluation"]);
        assert_eq!(cells[5], vec!["03/17/2020"]);
    }

    #[test]
    fn test_anniversary_event_cells() {
        let events = sample_events();
        let cells = event_cells(&events[1], Agency::Abode.profile());
        assert_eq!(cells[0], vec!["03/08/2021"]);
        assert_eq!(cells[1][0], "Lipa Lefkowitz");
        assert_eq!(cells[3], vec!["Annual Training"]);
        assert_eq!(
            cells[4],
            vec!["Basic and", "Service Specific", "Orientation", "Review"]
        );
        assert_eq!(cells[5], vec!["03/10/2021"]);
    }
}
