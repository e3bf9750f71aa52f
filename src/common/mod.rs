//! Common infrastructure modules shared across analysis phases
//!
//! This module provides reusable infrastructure for:
//! - Data structures for trial rows and derived aggregates
//! - Missing-aware statistics helpers
//! - Bucket types and ASCII table formatting
//! - Chart primitives built on plotters

pub mod buckets;
pub mod data_structures;
pub mod plots;
pub mod stats;

// Re-export commonly used items
pub use data_structures::{
    Condition, ParticipantMetrics, ParticipantProfile, TextMetrics, TrialPoint, TrialRecord,
};
pub use plots::PlotError;
