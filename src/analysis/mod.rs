//! Domain-specific analysis modules
//!
//! One module per chart domain:
//! - Demographics (roster composition)
//! - Anxiety outcomes (SUDS scores)
//! - Engagement (durations, re-records, feature usage)
//! - Correlations (ratings vs SUDS change)
//! - Experiment-only text metrics

pub mod anxiety;
pub mod correlations;
pub mod demographics;
pub mod engagement;
pub mod text_metrics;

// Re-export analysis entry points for convenience
pub use anxiety::{generate_anxiety_charts, generate_anxiety_summary};
pub use correlations::generate_correlation_charts;
pub use demographics::generate_demographics_charts;
pub use engagement::{generate_engagement_charts, generate_engagement_summary};
pub use text_metrics::{generate_text_metrics_charts, generate_text_metrics_summary};
