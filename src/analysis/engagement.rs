//! Engagement charts and summary (figures 10-17)
//!
//! How participants used the trial interface: recording and review time,
//! total trial time, re-record frequency, feature usage rates, tab visits,
//! and the two self-report ratings.

use crate::aggregate::metric_by_condition;
use crate::common::buckets::{bucket_values, format_bucket_table};
use crate::common::data_structures::{Condition, ParticipantMetrics, TrialRecord};
use crate::common::plots::{create_condition_boxplot, create_grouped_bar_chart};
use crate::common::stats::mean;
use crate::common::PlotError;
use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};
use thiserror::Error;

/// Errors that can occur during engagement analysis
#[derive(Error, Debug)]
pub enum EngagementError {
    #[error("Failed to write file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to generate plot: {0}")]
    PlotGeneration(#[from] PlotError),
}

type Result<T> = core::result::Result<T, EngagementError>;

/// The three usage-rate metrics shown in figure 14, with their chart labels
const FEATURE_METRICS: [(&str, fn(&ParticipantMetrics) -> Option<f64>); 3] = [
    ("Audio played", |m| m.audio_played),
    ("Text-only mode", |m| m.text_only_used),
    ("Coach tab visited", |m| m.visited_coach),
];

/// Tab-visit count ranges for the summary distribution table
const TABS_COUNT_RANGES: [(f64, f64, &str); 4] = [
    (0.0, 1.0, "0"),
    (1.0, 2.0, "1"),
    (2.0, 3.0, "2"),
    (3.0, f64::INFINITY, "3+"),
];

/// Generate the engagement figures
pub fn generate_engagement_charts(
    metrics: &[ParticipantMetrics],
    output_dir: &Path,
) -> Result<()> {
    let boxplots: [(fn(&ParticipantMetrics) -> Option<f64>, &str, &str, &str); 7] = [
        (
            |m| m.recording_duration_sec,
            "Average recording duration by condition (participant means)",
            "Seconds",
            "10_recording_duration_participant_mean.png",
        ),
        (
            |m| m.review_time_sec,
            "Average review time by condition (participant means)",
            "Seconds",
            "11_review_time_participant_mean.png",
        ),
        (
            |m| m.trial_time_sec,
            "Average total time per trial by condition (participant means)",
            "Seconds",
            "12_trial_time_participant_mean.png",
        ),
        (
            |m| m.rerecord_count,
            "Re-record frequency by condition (participant means)",
            "Re-records (average per trial)",
            "13_rerecord_count_participant_mean.png",
        ),
        (
            |m| m.tabs_count,
            "Tabs visited by condition (participant means)",
            "Tabs visited (average per trial)",
            "15_tabs_count_participant_mean.png",
        ),
        (
            |m| m.helpful,
            "Perceived helpfulness by condition (participant means)",
            "Helpful (rating)",
            "16_helpful_participant_mean.png",
        ),
        (
            |m| m.felt_in_control,
            "Sense of control by condition (participant means)",
            "Felt in control (rating)",
            "17_felt_in_control_participant_mean.png",
        ),
    ];

    for (select, title, y_label, file_name) in boxplots {
        let groups: Vec<(&str, Vec<f64>)> = Condition::all()
            .into_iter()
            .map(|condition| (condition.label(), metric_by_condition(metrics, condition, select)))
            .collect();
        if groups.iter().all(|(_, values)| values.is_empty()) {
            continue;
        }
        create_condition_boxplot(
            &groups,
            title,
            y_label,
            false,
            false,
            &output_dir.join(file_name),
        )?;
    }

    generate_feature_usage_chart(metrics, output_dir)?;

    Ok(())
}

/// Figure 14: grouped bars of the mean participant-level usage rate per
/// feature and condition, on a fixed 0..1 axis
fn generate_feature_usage_chart(metrics: &[ParticipantMetrics], output_dir: &Path) -> Result<()> {
    if metrics.is_empty() {
        return Ok(());
    }

    let categories: Vec<String> = FEATURE_METRICS
        .iter()
        .map(|(label, _)| (*label).to_string())
        .collect();
    let groups: Vec<(&str, Vec<f64>)> = Condition::all()
        .into_iter()
        .map(|condition| {
            let rates: Vec<f64> = FEATURE_METRICS
                .iter()
                .map(|(_, select)| {
                    mean(&metric_by_condition(metrics, condition, select)).unwrap_or(0.0)
                })
                .collect();
            (condition.label(), rates)
        })
        .collect();

    create_grouped_bar_chart(
        &categories,
        &groups,
        "Feature usage rates (participant-level means)",
        "Rate (0–1)",
        Some(1.0),
        &output_dir.join("14_feature_usage_rates.png"),
    )?;
    Ok(())
}

#[derive(Tabled)]
struct FeatureUsageRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Control")]
    control: String,
    #[tabled(rename = "Experiment")]
    experiment: String,
}

/// Generate the engagement text summary
///
/// Writes engagement-summary.txt: feature usage rates per condition and the
/// distribution of per-trial tab-visit counts.
pub fn generate_engagement_summary(
    metrics: &[ParticipantMetrics],
    trials: &[TrialRecord],
    output_dir: &Path,
) -> Result<()> {
    let usage_rows: Vec<FeatureUsageRow> = FEATURE_METRICS
        .iter()
        .map(|(label, select)| {
            let rate_for = |condition| {
                mean(&metric_by_condition(metrics, condition, select))
                    .map(|rate| format!("{:.1}%", rate * 100.0))
                    .unwrap_or_else(|| "-".to_string())
            };
            FeatureUsageRow {
                feature: (*label).to_string(),
                control: rate_for(Condition::Control),
                experiment: rate_for(Condition::Experiment),
            }
        })
        .collect();
    let usage_table = Table::new(&usage_rows).to_string();

    let tab_counts: Vec<f64> = trials.iter().map(|t| t.tabs_count() as f64).collect();
    let tab_buckets = bucket_values(&tab_counts, &TABS_COUNT_RANGES);
    let tab_table = format_bucket_table(
        &tab_buckets,
        Some("Tabs visited per trial (trial-level counts)"),
    );

    let any_tab = trials.iter().filter(|t| t.visited_any_tab).count();
    let any_tab_line = if trials.is_empty() {
        "Trials with any tab visited: no trials".to_string()
    } else {
        format!(
            "Trials with any tab visited: {} of {} ({:.1}%)",
            any_tab,
            trials.len(),
            (any_tab as f64 / trials.len() as f64) * 100.0
        )
    };

    let output = format!(
        "Engagement Summary\n{}\n\nFeature usage rates (participant-level means)\n{}\n{}\n\n{}\n\n{}",
        "=".repeat(18),
        "=".repeat(44),
        usage_table,
        tab_table,
        any_tab_line
    );
    fs::write(output_dir.join("engagement-summary.txt"), output)?;

    Ok(())
}
