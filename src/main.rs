mod aggregate;
mod analysis;
mod archive;
mod captions;
mod common;
mod parsing;

use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;

// Import analysis functions
use analysis::{
    generate_anxiety_charts, generate_anxiety_summary, generate_correlation_charts,
    generate_demographics_charts, generate_engagement_charts, generate_engagement_summary,
    generate_text_metrics_charts, generate_text_metrics_summary,
};

use aggregate::{experiment_text_metrics, participant_condition_means, participant_roster};
use parsing::parse_study_csv;

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Parsing error: {0}")]
    Parsing(#[from] parsing::ParsingError),

    #[error("Chart error: {0}")]
    Plot(#[from] common::PlotError),

    #[error("Anxiety analysis error: {0}")]
    Anxiety(#[from] analysis::anxiety::AnxietyError),

    #[error("Engagement analysis error: {0}")]
    Engagement(#[from] analysis::engagement::EngagementError),

    #[error("Text metrics analysis error: {0}")]
    TextMetrics(#[from] analysis::text_metrics::TextMetricsError),

    #[error("Caption table error: {0}")]
    Captions(#[from] captions::CaptionError),

    #[error("Archive error: {0}")]
    Archive(#[from] archive::ArchiveError),

    #[error("Failed to create output directory: {0}")]
    OutputDir(std::io::Error),
}

type Result<T> = core::result::Result<T, AnalysisError>;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(input_file) = args.next().map(PathBuf::from) else {
        eprintln!("Usage: analyze-study-stats <study-csv> [output-dir]");
        std::process::exit(2);
    };

    // Check if input file exists
    if !input_file.exists() {
        eprintln!("Error: Input file does not exist: {}", input_file.display());
        std::process::exit(1);
    }

    // Output directory defaults to a sibling of the input file
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| {
        input_file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("study_visualizations")
    });
    std::fs::create_dir_all(&output_dir).map_err(AnalysisError::OutputDir)?;

    // Parse the study export and build the aggregates
    let trials = parse_study_csv(&input_file)?;
    let roster = participant_roster(&trials);
    let metrics = participant_condition_means(&trials);
    let text_metrics = experiment_text_metrics(&trials);

    println!(
        "Loaded {} trials from {} participants",
        trials.len(),
        roster.len()
    );

    let progress = ProgressBar::new(7);
    if let Ok(style) = ProgressStyle::with_template("[{bar:40}] {pos}/{len} {msg}") {
        progress.set_style(style);
    }

    progress.set_message("demographics charts");
    generate_demographics_charts(&roster, &output_dir)?;
    progress.inc(1);

    progress.set_message("anxiety charts");
    generate_anxiety_charts(&metrics, &trials, &output_dir)?;
    generate_anxiety_summary(&metrics, &output_dir)?;
    progress.inc(1);

    progress.set_message("engagement charts");
    generate_engagement_charts(&metrics, &output_dir)?;
    generate_engagement_summary(&metrics, &trials, &output_dir)?;
    progress.inc(1);

    progress.set_message("correlation charts");
    generate_correlation_charts(&metrics, &output_dir)?;
    progress.inc(1);

    progress.set_message("text metric charts");
    generate_text_metrics_charts(&trials, &output_dir)?;
    generate_text_metrics_summary(&text_metrics, &output_dir)?;
    progress.inc(1);

    progress.set_message("caption table");
    captions::write_caption_table(&output_dir)?;
    progress.inc(1);

    progress.set_message("bundling archive");
    let zip_path = output_dir.with_extension("zip");
    archive::create_archive(&output_dir, &zip_path)?;
    progress.inc(1);
    progress.finish_with_message("done");

    println!("Analysis complete. Figures saved to {}", output_dir.display());
    println!("Zip file created at {}", zip_path.display());

    Ok(())
}
