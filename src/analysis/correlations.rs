//! Rating vs SUDS-change scatter charts (figures 18-19)

use crate::common::data_structures::{Condition, ParticipantMetrics};
use crate::common::plots::{create_scatter_plot, PlotError};
use std::path::Path;

type Result<T> = core::result::Result<T, PlotError>;

/// Generate the correlation figures: helpfulness and sense of control
/// against participant-mean ΔSUDS, one point series per condition
pub fn generate_correlation_charts(
    metrics: &[ParticipantMetrics],
    output_dir: &Path,
) -> Result<()> {
    rating_scatter(
        metrics,
        |m| m.helpful,
        "Helpfulness vs SUDS change (participant means)",
        "Helpful (participant mean)",
        &output_dir.join("18_helpful_vs_delta_suds.png"),
    )?;

    rating_scatter(
        metrics,
        |m| m.felt_in_control,
        "Sense of control vs SUDS change (participant means)",
        "Felt in control (participant mean)",
        &output_dir.join("19_control_vs_delta_suds.png"),
    )?;

    Ok(())
}

/// Scatter of one rating metric against ΔSUDS; participants missing either
/// value are dropped, and a chart with no points at all is skipped
fn rating_scatter<F>(
    metrics: &[ParticipantMetrics],
    select: F,
    title: &str,
    x_label: &str,
    output_path: &Path,
) -> Result<()>
where
    F: Fn(&ParticipantMetrics) -> Option<f64>,
{
    let series: Vec<(&str, Vec<(f64, f64)>)> = Condition::all()
        .into_iter()
        .map(|condition| {
            let points: Vec<(f64, f64)> = metrics
                .iter()
                .filter(|m| m.condition == condition)
                .filter_map(|m| Some((select(m)?, m.delta_suds?)))
                .collect();
            (condition.label(), points)
        })
        .collect();

    if series.iter().all(|(_, points)| points.is_empty()) {
        return Ok(());
    }

    create_scatter_plot(
        &series,
        title,
        x_label,
        "ΔSUDS (participant mean)",
        true,
        output_path,
    )
}
