//! Plotting infrastructure for the study summary charts
//!
//! This module provides the chart primitives the analysis modules compose:
//! condition box plots, grouped bar charts, per-trial error-bar series,
//! scatter plots, and histograms. Charts are rendered with the [`plotters`]
//! bitmap backend as 1200x800 PNG files, which keeps rendering working in
//! headless environments (Docker/CI).

use crate::common::data_structures::TrialPoint;
use crate::common::stats::{jitter_offsets, BoxSummary};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// Fixed output resolution for every chart
const PLOT_SIZE: (u32, u32) = (1200, 800);

/// Series color by position: control first (blue), experiment second (red)
fn series_color(index: usize) -> RGBColor {
    match index {
        0 => BLUE,
        1 => RED,
        _ => BLACK,
    }
}

/// Pads a raw value range by 5% on each side so glyphs don't touch the
/// plot frame; degenerate ranges are widened to a unit span
fn padded_range(min: f64, max: f64) -> std::ops::Range<f64> {
    if min >= max {
        return (min - 1.0)..(min + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Formats a mesh position as a category label when it sits on an integer
/// position, and as nothing otherwise
fn category_label(x: f64, labels: &[String]) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    labels
        .get(nearest as usize)
        .cloned()
        .unwrap_or_default()
}

/// Draws a horizontal reference line at y = 0 across the given x span
fn draw_zero_line(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x_span: (f64, f64),
) -> Result<()> {
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(x_span.0, 0.0), (x_span.1, 0.0)],
            &BLACK,
        )))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    Ok(())
}

/// Creates a box-and-whisker chart with one glyph per named group
///
/// Groups are laid out left to right on a numeric axis. Whiskers extend to
/// the most extreme values within 1.5 IQR; values beyond are drawn as
/// outlier points. With `show_points`, every raw value is overlaid with a
/// small deterministic horizontal jitter. With `zero_line`, a y = 0
/// reference line is drawn under the glyphs.
///
/// Groups with no values are skipped; the call fails only when every group
/// is empty.
pub fn create_condition_boxplot(
    groups: &[(&str, Vec<f64>)],
    title: &str,
    y_label: &str,
    show_points: bool,
    zero_line: bool,
    output_path: &Path,
) -> Result<()> {
    if groups.iter().all(|(_, values)| values.is_empty()) {
        return Err(PlotError::InvalidData(
            "Box plot input cannot be empty".to_string(),
        ));
    }

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (_, values) in groups {
        for v in values {
            y_min = y_min.min(*v);
            y_max = y_max.max(*v);
        }
    }
    if zero_line {
        y_min = y_min.min(0.0);
        y_max = y_max.max(0.0);
    }

    let x_range = 0.5..(groups.len() as f64 + 0.5);
    let labels: Vec<String> = groups.iter().map(|(name, _)| (*name).to_string()).collect();

    let root = BitMapBackend::new(output_path, PLOT_SIZE);
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_range.clone(), padded_range(y_min, y_max))
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .y_desc(y_label)
        .y_label_style(("sans-serif", 35))
        .label_style(("sans-serif", 25))
        .x_labels(groups.len() * 2 + 1)
        .x_label_formatter(&|x| category_label(*x - 1.0, &labels))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if zero_line {
        draw_zero_line(&mut chart, (x_range.start, x_range.end))?;
    }

    for (index, (_, values)) in groups.iter().enumerate() {
        let Some(summary) = BoxSummary::new(values) else {
            continue;
        };
        let x = index as f64 + 1.0;
        let half_width = 0.25;
        let cap = half_width / 2.0;
        let color = series_color(index);

        // Box body with median line
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - half_width, summary.q1), (x + half_width, summary.q3)],
                color.mix(0.25).filled(),
            )))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(x - half_width, summary.q1), (x + half_width, summary.q3)],
                &color,
            )))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x - half_width, summary.median), (x + half_width, summary.median)],
                &color,
            )))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        // Whisker stems and caps
        let whisker_segments = vec![
            vec![(x, summary.q3), (x, summary.whisker_high)],
            vec![(x, summary.q1), (x, summary.whisker_low)],
            vec![(x - cap, summary.whisker_high), (x + cap, summary.whisker_high)],
            vec![(x - cap, summary.whisker_low), (x + cap, summary.whisker_low)],
        ];
        for segment in whisker_segments {
            chart
                .draw_series(std::iter::once(PathElement::new(segment, &BLACK)))
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }

        // Outliers beyond the whiskers
        chart
            .draw_series(
                summary
                    .outliers
                    .iter()
                    .map(|v| Circle::new((x, *v), 4, BLACK.stroke_width(1))),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        if show_points {
            let offsets = jitter_offsets(values.len(), 0.04);
            chart
                .draw_series(
                    values
                        .iter()
                        .zip(offsets)
                        .map(|(v, dx)| Circle::new((x + dx, *v), 4, color.mix(0.8).filled())),
                )
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }
    }

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a grouped bar chart: one cluster per category, one bar per
/// named group within each cluster
///
/// Each group must carry exactly one value per category. `y_max` pins the
/// y-axis (used for rate charts on 0..1); otherwise the axis spans the
/// data.
pub fn create_grouped_bar_chart(
    categories: &[String],
    groups: &[(&str, Vec<f64>)],
    title: &str,
    y_label: &str,
    y_max: Option<f64>,
    output_path: &Path,
) -> Result<()> {
    if categories.is_empty() || groups.is_empty() {
        return Err(PlotError::InvalidData(
            "Bar chart needs at least one category and one group".to_string(),
        ));
    }
    for (name, values) in groups {
        if values.len() != categories.len() {
            return Err(PlotError::InvalidData(format!(
                "Group '{}' has {} values for {} categories",
                name,
                values.len(),
                categories.len()
            )));
        }
    }

    let data_max = groups
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .fold(0.0f64, f64::max);
    let y_top = y_max.unwrap_or_else(|| if data_max > 0.0 { data_max * 1.1 } else { 1.0 });

    let x_range = -0.6..(categories.len() as f64 - 0.4);

    let root = BitMapBackend::new(output_path, PLOT_SIZE);
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_range, 0.0..y_top)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .y_desc(y_label)
        .y_label_style(("sans-serif", 35))
        .label_style(("sans-serif", 25))
        .x_labels(categories.len() * 2 + 1)
        .x_label_formatter(&|x| category_label(*x, categories))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let bar_width = 0.35;
    let group_count = groups.len() as f64;
    for (group_index, (name, values)) in groups.iter().enumerate() {
        let color = series_color(group_index);
        let offset = (group_index as f64 - (group_count - 1.0) / 2.0) * bar_width;

        chart
            .draw_series(values.iter().enumerate().map(|(category_index, value)| {
                let center = category_index as f64 + offset;
                Rectangle::new(
                    [(center - bar_width / 2.0, 0.0), (center + bar_width / 2.0, *value)],
                    color.filled(),
                )
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(*name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a per-trial line chart with error bars, one series per condition
///
/// Each point is a trial-index mean; points that carry a standard error get
/// a vertical mean ± SEM bar. A y = 0 reference line is always drawn, since
/// the chart shows a change score.
pub fn create_trial_series_plot(
    series: &[(&str, Vec<TrialPoint>)],
    title: &str,
    x_label: &str,
    y_label: &str,
    output_path: &Path,
) -> Result<()> {
    if series.iter().all(|(_, points)| points.is_empty()) {
        return Err(PlotError::InvalidData(
            "Trial series input cannot be empty".to_string(),
        ));
    }

    let mut x_min = u32::MAX;
    let mut x_max = 0u32;
    let mut y_min = 0.0f64;
    let mut y_max = 0.0f64;
    for (_, points) in series {
        for point in points {
            x_min = x_min.min(point.trial_index);
            x_max = x_max.max(point.trial_index);
            let spread = point.sem.unwrap_or(0.0);
            y_min = y_min.min(point.mean - spread);
            y_max = y_max.max(point.mean + spread);
        }
    }

    let x_range = (x_min as f64 - 0.5)..(x_max as f64 + 0.5);
    let label_count = (x_max - x_min + 1) as usize;

    let root = BitMapBackend::new(output_path, PLOT_SIZE);
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_range.clone(), padded_range(y_min, y_max))
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .x_label_style(("sans-serif", 35))
        .y_desc(y_label)
        .y_label_style(("sans-serif", 35))
        .label_style(("sans-serif", 25))
        .x_labels(label_count)
        .x_label_formatter(&|x| {
            let nearest = x.round();
            if (x - nearest).abs() < 1e-6 {
                format!("{:.0}", nearest)
            } else {
                String::new()
            }
        })
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    draw_zero_line(&mut chart, (x_range.start, x_range.end))?;

    for (index, (name, points)) in series.iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let color = series_color(index);

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.trial_index as f64, p.mean)),
                &color,
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));

        chart
            .draw_series(points.iter().filter_map(|p| {
                let sem = p.sem?;
                Some(ErrorBar::new_vertical(
                    p.trial_index as f64,
                    p.mean - sem,
                    p.mean,
                    p.mean + sem,
                    color.filled(),
                    10,
                ))
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|p| Circle::new((p.trial_index as f64, p.mean), 4, color.filled())),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates a scatter chart with one point series per named group
///
/// With `zero_line`, a y = 0 reference line is drawn under the points. A
/// legend is added when more than one series is present.
pub fn create_scatter_plot(
    series: &[(&str, Vec<(f64, f64)>)],
    title: &str,
    x_label: &str,
    y_label: &str,
    zero_line: bool,
    output_path: &Path,
) -> Result<()> {
    if series.iter().all(|(_, points)| points.is_empty()) {
        return Err(PlotError::InvalidData(
            "Scatter input cannot be empty".to_string(),
        ));
    }

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (_, points) in series {
        for (x, y) in points {
            x_min = x_min.min(*x);
            x_max = x_max.max(*x);
            y_min = y_min.min(*y);
            y_max = y_max.max(*y);
        }
    }
    if zero_line {
        y_min = y_min.min(0.0);
        y_max = y_max.max(0.0);
    }

    let x_range = padded_range(x_min, x_max);

    let root = BitMapBackend::new(output_path, PLOT_SIZE);
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_range.clone(), padded_range(y_min, y_max))
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .x_label_style(("sans-serif", 35))
        .y_desc(y_label)
        .y_label_style(("sans-serif", 35))
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if zero_line {
        draw_zero_line(&mut chart, (x_range.start, x_range.end))?;
    }

    for (index, (name, points)) in series.iter().enumerate() {
        if points.is_empty() {
            continue;
        }
        let color = series_color(index);

        chart
            .draw_series(
                points
                    .iter()
                    .map(|(x, y)| Circle::new((*x, *y), 5, color.mix(0.9).filled())),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(*name)
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font(("sans-serif", 25))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Creates an equal-width histogram of the given values
pub fn create_histogram(
    values: &[f64],
    bins: usize,
    title: &str,
    x_label: &str,
    y_label: &str,
    output_path: &Path,
) -> Result<()> {
    if values.is_empty() {
        return Err(PlotError::InvalidData(
            "Histogram input cannot be empty".to_string(),
        ));
    }
    if bins == 0 {
        return Err(PlotError::InvalidData(
            "Histogram needs at least one bin".to_string(),
        ));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // All-identical values still get a drawable single-bin span
    let span = if max > min { max - min } else { 1.0 };
    let bin_width = span / bins as f64;

    let mut counts = vec![0usize; bins];
    for value in values {
        let mut bin = ((value - min) / bin_width) as usize;
        if bin >= bins {
            bin = bins - 1;
        }
        counts[bin] += 1;
    }
    let count_max = counts.iter().copied().max().unwrap_or(0) as f64;

    let root = BitMapBackend::new(output_path, PLOT_SIZE);
    let drawing_area = root.into_drawing_area();
    drawing_area
        .fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&drawing_area)
        .caption(title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(min..(min + span), 0.0..(count_max * 1.1).max(1.0))
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .x_label_style(("sans-serif", 35))
        .y_desc(y_label)
        .y_label_style(("sans-serif", 35))
        .label_style(("sans-serif", 25))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    chart
        .draw_series(counts.iter().enumerate().map(|(index, count)| {
            let x0 = min + index as f64 * bin_width;
            let x1 = x0 + bin_width;
            Rectangle::new([(x0, 0.0), (x1, *count as f64)], BLUE.mix(0.6).filled())
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    drawing_area
        .present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}
