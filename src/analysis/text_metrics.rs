//! Experiment-only transcript metric charts and summary (figures 20-22)
//!
//! Only experiment trials carry a transcript; control rows never appear
//! here. Charts are trial-level, the summary table is per participant.

use crate::common::data_structures::{Condition, TextMetrics, TrialRecord};
use crate::common::plots::{create_histogram, create_scatter_plot};
use crate::common::PlotError;
use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};
use thiserror::Error;

/// Errors that can occur during text metrics analysis
#[derive(Error, Debug)]
pub enum TextMetricsError {
    #[error("Failed to write file: {0}")]
    FileWrite(#[from] std::io::Error),

    #[error("Failed to generate plot: {0}")]
    PlotGeneration(#[from] PlotError),
}

type Result<T> = core::result::Result<T, TextMetricsError>;

/// Histogram bin count for both distribution charts
const HISTOGRAM_BINS: usize = 10;

/// Generate the experiment-only text metric figures
pub fn generate_text_metrics_charts(trials: &[TrialRecord], output_dir: &Path) -> Result<()> {
    let experiment: Vec<&TrialRecord> = trials
        .iter()
        .filter(|t| t.row.condition == Condition::Experiment)
        .collect();

    let word_counts: Vec<f64> = experiment.iter().filter_map(|t| t.row.word_count).collect();
    if !word_counts.is_empty() {
        create_histogram(
            &word_counts,
            HISTOGRAM_BINS,
            "Experiment condition: word count distribution (trials)",
            "Word count (trial)",
            "Trials (count)",
            &output_dir.join("20_experiment_word_count_hist.png"),
        )?;
    }

    let filler_rates: Vec<f64> = experiment.iter().filter_map(|t| t.filler_rate()).collect();
    if !filler_rates.is_empty() {
        create_histogram(
            &filler_rates,
            HISTOGRAM_BINS,
            "Experiment condition: filler rate distribution (trials)",
            "Filler rate (filler_count / word_count)",
            "Trials (count)",
            &output_dir.join("21_experiment_filler_rate_hist.png"),
        )?;
    }

    let pairs: Vec<(f64, f64)> = experiment
        .iter()
        .filter_map(|t| Some((t.row.word_count?, t.filler_rate()?)))
        .collect();
    if !pairs.is_empty() {
        create_scatter_plot(
            &[("experiment", pairs)],
            "Experiment condition: word count vs filler rate (trials)",
            "Word count (trial)",
            "Filler rate",
            false,
            &output_dir.join("22_experiment_wordcount_vs_fillerrate.png"),
        )?;
    }

    Ok(())
}

#[derive(Tabled)]
struct TextMetricsTableRow {
    #[tabled(rename = "Participant")]
    participant: String,
    #[tabled(rename = "Words (mean)")]
    word_count: String,
    #[tabled(rename = "Fillers (mean)")]
    filler_count: String,
    #[tabled(rename = "Filler rate (mean)")]
    filler_rate: String,
    #[tabled(rename = "WPM (mean)")]
    wpm: String,
    #[tabled(rename = "WPM n")]
    wpm_n: usize,
}

fn format_metric(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

/// Generate the text metrics summary
///
/// Writes text-metrics-summary.txt: one table row per experiment
/// participant with their transcript metric means.
pub fn generate_text_metrics_summary(
    text_metrics: &[TextMetrics],
    output_dir: &Path,
) -> Result<()> {
    let body = if text_metrics.is_empty() {
        "No experiment trials with transcripts".to_string()
    } else {
        let rows: Vec<TextMetricsTableRow> = text_metrics
            .iter()
            .map(|m| TextMetricsTableRow {
                participant: m.participant_code.clone(),
                word_count: format_metric(m.word_count_mean, 1),
                filler_count: format_metric(m.filler_count_mean, 1),
                filler_rate: format_metric(m.filler_rate_mean, 3),
                wpm: format_metric(m.wpm_mean, 1),
                wpm_n: m.wpm_n,
            })
            .collect();
        Table::new(&rows).to_string()
    };

    let output = format!(
        "Experiment Text Metrics (per participant)\n{}\n{}",
        "=".repeat(41),
        body
    );
    fs::write(output_dir.join("text-metrics-summary.txt"), output)?;

    Ok(())
}
