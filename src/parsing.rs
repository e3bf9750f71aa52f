//! Study CSV ingestion and per-trial derivation
//!
//! This module reads the trial app's CSV export into typed rows and derives
//! the fields the aggregation stage needs: the decoded tab-visit list, the
//! coach-tab flag, and the wall-clock trial duration.

use crate::common::data_structures::{TrialRecord, TrialRow};
use chrono::DateTime;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during study file parsing
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to read study CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Study CSV contains no trial rows")]
    EmptyInput,
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Parse the study CSV export and derive per-trial fields
///
/// Reads every record by header name (extra columns such as the prompt text
/// are ignored), then attaches the derived tab and duration fields. Rows
/// with an unknown condition value or a malformed cell fail the whole
/// parse; a file with a header but no rows is also an error.
pub fn parse_study_csv(file_path: &Path) -> Result<Vec<TrialRecord>> {
    let mut reader = csv::Reader::from_path(file_path)?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let row: TrialRow = row?;
        records.push(derive_record(row));
    }

    if records.is_empty() {
        return Err(ParsingError::EmptyInput);
    }
    Ok(records)
}

/// Attaches the derived fields to a raw CSV row
fn derive_record(row: TrialRow) -> TrialRecord {
    let tabs_list = parse_tabs(row.tabs_visited.as_deref());
    let visited_coach = tabs_list.iter().any(|tab| tab == "coach");
    let visited_any_tab = !tabs_list.is_empty();
    let trial_time_sec = trial_duration_sec(row.started_at.as_deref(), row.finished_at.as_deref());

    TrialRecord {
        row,
        tabs_list,
        visited_coach,
        visited_any_tab,
        trial_time_sec,
    }
}

/// Decodes the `tabs_visited` column into a list of tab names
///
/// The column holds a JSON array of strings when the participant opened any
/// tabs. Anything else (blank cell, malformed JSON, a non-array value)
/// yields the empty list; non-string array elements are dropped.
fn parse_tabs(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    }
}

/// Wall-clock trial duration in fractional seconds
///
/// `None` when either timestamp is missing or not RFC 3339. Negative
/// durations are carried through; timestamps are trusted as recorded.
fn trial_duration_sec(started_at: Option<&str>, finished_at: Option<&str>) -> Option<f64> {
    let started = DateTime::parse_from_rfc3339(started_at?).ok()?;
    let finished = DateTime::parse_from_rfc3339(finished_at?).ok()?;
    Some((finished - started).num_milliseconds() as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::data_structures::Condition;
    use std::io::Write;

    #[test]
    fn test_parse_tabs_valid_list() {
        assert_eq!(
            parse_tabs(Some(r#"["coach","tips"]"#)),
            vec!["coach".to_string(), "tips".to_string()]
        );
        assert_eq!(parse_tabs(Some("[]")), Vec::<String>::new());
    }

    #[test]
    fn test_parse_tabs_malformed_inputs() {
        assert_eq!(parse_tabs(None), Vec::<String>::new());
        assert_eq!(parse_tabs(Some("")), Vec::<String>::new());
        assert_eq!(parse_tabs(Some("not json")), Vec::<String>::new());
        assert_eq!(parse_tabs(Some(r#"{"coach":true}"#)), Vec::<String>::new());
        assert_eq!(parse_tabs(Some("42")), Vec::<String>::new());
        // Non-string elements are dropped, string elements survive
        assert_eq!(
            parse_tabs(Some(r#"["coach", 3, null]"#)),
            vec!["coach".to_string()]
        );
    }

    #[test]
    fn test_trial_duration() {
        let duration = trial_duration_sec(
            Some("2026-01-10T10:00:00.000Z"),
            Some("2026-01-10T10:02:30.500Z"),
        );
        assert_eq!(duration, Some(150.5));

        assert_eq!(trial_duration_sec(None, Some("2026-01-10T10:00:00Z")), None);
        assert_eq!(trial_duration_sec(Some("2026-01-10T10:00:00Z"), None), None);
        assert_eq!(
            trial_duration_sec(Some("yesterday"), Some("2026-01-10T10:00:00Z")),
            None
        );

        // Reversed timestamps give a negative duration, not None
        let reversed = trial_duration_sec(
            Some("2026-01-10T10:01:00Z"),
            Some("2026-01-10T10:00:00Z"),
        );
        assert_eq!(reversed, Some(-60.0));
    }

    const HEADER: &str = "participant_code,participant_age,participant_gender,participant_education,\
participant_tech_adaptation,participant_speaking_anxiety,assigned_condition,trial_index,condition,\
prompt_id,prompt_text,suds_pre,suds_post,delta_suds,recording_duration_sec,rerecord_count,\
review_time_sec,audio_played,text_only_used,tabs_visited,felt_in_control,helpful,word_count,\
filler_count,wpm,started_at,finished_at";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn test_parse_study_csv() {
        let file = write_csv(&[
            "P01,34,female,bachelor,4,3,experiment,1,experiment,p1,\"Tell us...\",60,45,-15,32.10,1,\
12.00,true,false,\"[\"\"coach\"\"]\",4,5,120,6,140.5,2026-01-10T10:00:00.000Z,2026-01-10T10:04:00.000Z",
            "P02,41,male,master,3,4,control,1,control,p1,\"Tell us...\",50,,,,0,,false,false,,3,,,,,,",
        ]);

        let records = parse_study_csv(file.path()).unwrap();
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.row.participant_code, "P01");
        assert_eq!(first.row.condition, Condition::Experiment);
        assert_eq!(first.row.suds_pre, Some(60.0));
        assert_eq!(first.row.delta_suds, Some(-15.0));
        assert!(first.row.audio_played);
        assert_eq!(first.tabs_list, vec!["coach".to_string()]);
        assert!(first.visited_coach);
        assert!(first.visited_any_tab);
        assert_eq!(first.trial_time_sec, Some(240.0));

        let second = &records[1];
        assert_eq!(second.row.condition, Condition::Control);
        assert_eq!(second.row.suds_post, None);
        assert_eq!(second.row.word_count, None);
        assert!(!second.visited_any_tab);
        assert_eq!(second.trial_time_sec, None);
    }

    #[test]
    fn test_parse_study_csv_rejects_unknown_condition() {
        let file = write_csv(&[
            "P01,34,female,bachelor,4,3,placebo,1,placebo,p1,x,60,45,-15,32.10,1,12.00,true,false,,4,5,,,,,",
        ]);
        assert!(matches!(
            parse_study_csv(file.path()),
            Err(ParsingError::Csv(_))
        ));
    }

    #[test]
    fn test_parse_study_csv_rejects_empty_file() {
        let file = write_csv(&[]);
        assert!(matches!(
            parse_study_csv(file.path()),
            Err(ParsingError::EmptyInput)
        ));
    }
}
