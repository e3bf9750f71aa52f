//! Anxiety outcome charts and summary (figures 06-09)
//!
//! SUDS (Subjective Units of Distress Scale) scores before and after each
//! trial: participant-mean box plots, the change-score chart with raw
//! points, and the change over trial indices with error bars.

use crate::aggregate::{delta_suds_by_trial, metric_by_condition};
use crate::common::buckets::{bucket_values, format_bucket_table};
use crate::common::data_structures::{Condition, ParticipantMetrics, TrialPoint, TrialRecord};
use crate::common::plots::{create_condition_boxplot, create_trial_series_plot};
use crate::common::stats::mean;
use crate::common::PlotError;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during anxiety analysis
#[derive(Error, Debug)]
pub enum AnxietyError {
    #[error("Failed to write file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to generate plot: {0}")]
    PlotGeneration(#[from] PlotError),
}

type Result<T> = core::result::Result<T, AnxietyError>;

/// ΔSUDS ranges for the summary distribution table
const DELTA_SUDS_RANGES: [(f64, f64, &str); 5] = [
    (f64::NEG_INFINITY, -20.0, "below -20"),
    (-20.0, -10.0, "-20 to -10"),
    (-10.0, 0.0, "-10 to 0"),
    (0.0, 10.0, "0 to 10"),
    (10.0, f64::INFINITY, "10 and up"),
];

/// Generate the anxiety outcome figures
pub fn generate_anxiety_charts(
    metrics: &[ParticipantMetrics],
    trials: &[TrialRecord],
    output_dir: &Path,
) -> Result<()> {
    metric_boxplot(
        metrics,
        |m| m.suds_pre,
        "Average pre-trial SUDS by condition (participant means)",
        "SUDS (pre)",
        false,
        false,
        &output_dir.join("06_suds_pre_participant_mean.png"),
    )?;

    metric_boxplot(
        metrics,
        |m| m.suds_post,
        "Average post-trial SUDS by condition (participant means)",
        "SUDS (post)",
        false,
        false,
        &output_dir.join("07_suds_post_participant_mean.png"),
    )?;

    // Change score gets raw participant points and a zero reference line;
    // negative means anxiety decreased
    metric_boxplot(
        metrics,
        |m| m.delta_suds,
        "Average change in SUDS by condition (participant means)",
        "ΔSUDS (post - pre)",
        true,
        true,
        &output_dir.join("08_delta_suds_participant_mean.png"),
    )?;

    let series: Vec<(&str, Vec<TrialPoint>)> = Condition::all()
        .into_iter()
        .map(|condition| (condition.label(), delta_suds_by_trial(trials, condition)))
        .collect();
    if series.iter().any(|(_, points)| !points.is_empty()) {
        create_trial_series_plot(
            &series,
            "SUDS change over trials (mean ± SEM across trials)",
            "Trial index",
            "ΔSUDS (post - pre)",
            &output_dir.join("09_delta_suds_over_trials.png"),
        )?;
    }

    Ok(())
}

/// Generate the anxiety text summary
///
/// Writes anxiety-summary.txt: a per-condition distribution table of
/// participant-mean ΔSUDS plus overall counts and means.
pub fn generate_anxiety_summary(metrics: &[ParticipantMetrics], output_dir: &Path) -> Result<()> {
    let mut sections = vec![format!("Anxiety Outcome Summary\n{}", "=".repeat(23))];

    for condition in Condition::all() {
        let deltas = metric_by_condition(metrics, condition, |m| m.delta_suds);
        let buckets = bucket_values(&deltas, &DELTA_SUDS_RANGES);
        let title = format!(
            "ΔSUDS distribution, {} (participant means)",
            condition.label()
        );
        let mean_line = match mean(&deltas) {
            Some(value) => format!("Mean ΔSUDS: {:.2} across {} participants", value, deltas.len()),
            None => "Mean ΔSUDS: no data".to_string(),
        };
        sections.push(format!(
            "{}\n\n{}",
            format_bucket_table(&buckets, Some(&title)),
            mean_line
        ));
    }

    let output_file = output_dir.join("anxiety-summary.txt");
    fs::write(&output_file, sections.join("\n\n"))?;

    Ok(())
}

/// Box plot of one participant × condition metric; skipped when the metric
/// is missing everywhere
fn metric_boxplot<F>(
    metrics: &[ParticipantMetrics],
    select: F,
    title: &str,
    y_label: &str,
    show_points: bool,
    zero_line: bool,
    output_path: &Path,
) -> Result<()>
where
    F: Fn(&ParticipantMetrics) -> Option<f64>,
{
    let groups: Vec<(&str, Vec<f64>)> = Condition::all()
        .into_iter()
        .map(|condition| {
            (
                condition.label(),
                metric_by_condition(metrics, condition, &select),
            )
        })
        .collect();

    if groups.iter().all(|(_, values)| values.is_empty()) {
        return Ok(());
    }

    create_condition_boxplot(&groups, title, y_label, show_points, zero_line, output_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn metrics_row(code: &str, condition: Condition, delta: Option<f64>) -> ParticipantMetrics {
        ParticipantMetrics {
            participant_code: code.to_string(),
            condition,
            suds_pre: Some(55.0),
            suds_post: delta.map(|d| 55.0 + d),
            delta_suds: delta,
            recording_duration_sec: None,
            rerecord_count: None,
            review_time_sec: None,
            trial_time_sec: None,
            audio_played: None,
            text_only_used: None,
            tabs_count: None,
            visited_coach: None,
            helpful: None,
            felt_in_control: None,
        }
    }

    #[test]
    fn test_summary_contents() {
        let dir = tempdir().unwrap();
        let metrics = vec![
            metrics_row("P01", Condition::Control, Some(-15.0)),
            metrics_row("P02", Condition::Control, Some(-5.0)),
            metrics_row("P03", Condition::Experiment, Some(-25.0)),
        ];

        generate_anxiety_summary(&metrics, dir.path()).unwrap();
        let text = fs::read_to_string(dir.path().join("anxiety-summary.txt")).unwrap();

        assert!(text.contains("Anxiety Outcome Summary"));
        assert!(text.contains("ΔSUDS distribution, control (participant means)"));
        assert!(text.contains("ΔSUDS distribution, experiment (participant means)"));
        assert!(text.contains("Mean ΔSUDS: -10.00 across 2 participants"));
        assert!(text.contains("Mean ΔSUDS: -25.00 across 1 participants"));
        assert!(text.contains("below -20"));
    }

    #[test]
    fn test_summary_with_no_data() {
        let dir = tempdir().unwrap();
        generate_anxiety_summary(&[], dir.path()).unwrap();
        let text = fs::read_to_string(dir.path().join("anxiety-summary.txt")).unwrap();
        assert!(text.contains("Mean ΔSUDS: no data"));
    }

    #[test]
    fn test_charts_skipped_when_metric_absent() {
        let dir = tempdir().unwrap();
        let metrics = vec![metrics_row("P01", Condition::Control, None)];
        // suds_pre is present so figure 06 would render with fonts; delta
        // is absent everywhere so figure 08 must be skipped
        let groups: Vec<(&str, Vec<f64>)> = Condition::all()
            .into_iter()
            .map(|c| (c.label(), metric_by_condition(&metrics, c, |m| m.delta_suds)))
            .collect();
        assert!(groups.iter().all(|(_, v)| v.is_empty()));

        metric_boxplot(
            &metrics,
            |m| m.delta_suds,
            "ΔSUDS",
            "ΔSUDS",
            true,
            true,
            &dir.path().join("08_delta_suds_participant_mean.png"),
        )
        .unwrap();
        assert!(!dir.path().join("08_delta_suds_participant_mean.png").exists());
    }
}
