//! Demographics charts (figures 01-05)
//!
//! Works off the participant roster: age, gender, education, tech
//! adaptation, and baseline speaking anxiety, each split by assigned
//! condition.

use crate::common::data_structures::{Condition, ParticipantProfile};
use crate::common::plots::{create_condition_boxplot, create_grouped_bar_chart, PlotError};
use std::collections::BTreeMap;
use std::path::Path;

type Result<T> = core::result::Result<T, PlotError>;

/// Generate the demographics figures
///
/// Charts whose input is entirely empty (for example, no participant has a
/// recorded age) are skipped without error.
pub fn generate_demographics_charts(
    roster: &[ParticipantProfile],
    output_dir: &Path,
) -> Result<()> {
    roster_boxplot(
        roster,
        |p| p.age,
        "Participant age by condition",
        "Age",
        &output_dir.join("01_age_by_condition.png"),
    )?;

    category_bar_chart(
        roster,
        |p| p.gender.as_str(),
        "Gender composition by condition",
        &output_dir.join("02_gender_by_condition.png"),
    )?;

    category_bar_chart(
        roster,
        |p| p.education.as_str(),
        "Education level by condition",
        &output_dir.join("03_education_by_condition.png"),
    )?;

    roster_boxplot(
        roster,
        |p| p.tech_adaptation,
        "Tech adaptation by condition (participants)",
        "Tech adaptation (scale)",
        &output_dir.join("04_tech_adaptation_by_condition.png"),
    )?;

    roster_boxplot(
        roster,
        |p| p.speaking_anxiety,
        "Baseline speaking anxiety by condition (participants)",
        "Speaking anxiety (trait scale)",
        &output_dir.join("05_trait_anxiety_by_condition.png"),
    )?;

    Ok(())
}

/// Box plot of one roster field split by condition; skipped when no
/// participant carries the field
fn roster_boxplot<F>(
    roster: &[ParticipantProfile],
    select: F,
    title: &str,
    y_label: &str,
    output_path: &Path,
) -> Result<()>
where
    F: Fn(&ParticipantProfile) -> Option<f64>,
{
    let groups: Vec<(&str, Vec<f64>)> = Condition::all()
        .into_iter()
        .map(|condition| {
            let values: Vec<f64> = roster
                .iter()
                .filter(|p| p.condition == condition)
                .filter_map(&select)
                .collect();
            (condition.label(), values)
        })
        .collect();

    if groups.iter().all(|(_, values)| values.is_empty()) {
        return Ok(());
    }

    create_condition_boxplot(&groups, title, y_label, false, false, output_path)
}

/// Grouped bar chart of participant counts per category and condition
///
/// Categories are the sorted union of the values seen in either condition.
/// Blank category strings are missing demographics and are dropped.
fn category_bar_chart<F>(
    roster: &[ParticipantProfile],
    select: F,
    title: &str,
    output_path: &Path,
) -> Result<()>
where
    F: Fn(&ParticipantProfile) -> &str,
{
    let mut counts: BTreeMap<String, [f64; 2]> = BTreeMap::new();
    for profile in roster {
        let category = select(profile);
        if category.is_empty() {
            continue;
        }
        let entry = counts.entry(category.to_string()).or_default();
        match profile.condition {
            Condition::Control => entry[0] += 1.0,
            Condition::Experiment => entry[1] += 1.0,
        }
    }

    if counts.is_empty() {
        return Ok(());
    }

    let categories: Vec<String> = counts.keys().cloned().collect();
    let control: Vec<f64> = counts.values().map(|c| c[0]).collect();
    let experiment: Vec<f64> = counts.values().map(|c| c[1]).collect();

    create_grouped_bar_chart(
        &categories,
        &[
            (Condition::Control.label(), control),
            (Condition::Experiment.label(), experiment),
        ],
        title,
        "Participants (count)",
        None,
        output_path,
    )
}
