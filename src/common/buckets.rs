//! Bucket rows and ASCII table formatting for the text summary reports
//!
//! Summary files group metric values into fixed, human-chosen ranges and
//! print them with the [`tabled`] crate. The range definitions live with
//! the analysis module that owns the metric.

use tabled::{Table, Tabled};

/// One row of a distribution table: a labeled range, how many values fell
/// into it, and that count as a percentage of the total
#[derive(Debug, Clone, Tabled)]
pub struct BucketEntry {
    #[tabled(rename = "Range")]
    pub range: String,
    #[tabled(rename = "Count")]
    pub count: usize,
    #[tabled(rename = "Percentage")]
    pub percentage: String,
}

impl BucketEntry {
    pub fn new(range: String, count: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            "0.00%".to_string()
        } else {
            format!("{:.2}%", (count as f64 / total as f64) * 100.0)
        };

        Self {
            range,
            count,
            percentage,
        }
    }
}

/// Counts `values` into half-open `[low, high)` ranges with labels
///
/// The ranges are expected to cover the data; values outside every range
/// are simply not counted.
pub fn bucket_values(values: &[f64], ranges: &[(f64, f64, &str)]) -> Vec<BucketEntry> {
    let total = values.len();
    ranges
        .iter()
        .map(|(low, high, label)| {
            let count = values.iter().filter(|v| **v >= *low && **v < *high).count();
            BucketEntry::new((*label).to_string(), count, total)
        })
        .collect()
}

/// Formats bucket entries as an ASCII table, optionally under a title
pub fn format_bucket_table(buckets: &[BucketEntry], title: Option<&str>) -> String {
    if buckets.is_empty() {
        return "No data available for bucketing".to_string();
    }

    let table = Table::new(buckets).to_string();

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.len()), table)
    } else {
        table
    }
}
