//! Trial-level to participant-level aggregation
//!
//! The derivation core of the tool: grouping trial rows into the
//! participant roster, participant × condition metric means, experiment-only
//! transcript metrics, and the per-trial-index ΔSUDS series. All means skip
//! missing values; a group with nothing present yields `None`.

use crate::common::data_structures::{
    Condition, ParticipantMetrics, ParticipantProfile, TextMetrics, TrialPoint, TrialRecord,
};
use crate::common::stats::{mean_opt, sem};
use std::collections::{HashMap, HashSet};

/// Builds the participant roster from trial rows
///
/// Groups rows by participant code and takes the demographic fields and the
/// assigned condition from the first row seen for each code. First-appearance
/// order in the file is preserved.
pub fn participant_roster(trials: &[TrialRecord]) -> Vec<ParticipantProfile> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut roster = Vec::new();

    for trial in trials {
        let code = trial.row.participant_code.as_str();
        if !seen.insert(code) {
            continue;
        }
        roster.push(ParticipantProfile {
            participant_code: code.to_string(),
            age: trial.row.participant_age,
            gender: trial.row.participant_gender.clone(),
            education: trial.row.participant_education.clone(),
            tech_adaptation: trial.row.participant_tech_adaptation,
            speaking_anxiety: trial.row.participant_speaking_anxiety,
            condition: trial.row.assigned_condition,
        });
    }

    roster
}

/// Computes missing-aware metric means per (participant, trial condition)
///
/// Boolean usage flags are averaged as 0/1, turning them into rates. Group
/// order follows first appearance of each (code, condition) pair.
pub fn participant_condition_means(trials: &[TrialRecord]) -> Vec<ParticipantMetrics> {
    let mut order: Vec<(String, Condition)> = Vec::new();
    let mut groups: HashMap<(String, Condition), Vec<&TrialRecord>> = HashMap::new();

    for trial in trials {
        let key = (trial.row.participant_code.clone(), trial.row.condition);
        let entry = groups.entry(key.clone()).or_default();
        if entry.is_empty() {
            order.push(key);
        }
        entry.push(trial);
    }

    order
        .into_iter()
        .map(|key| {
            let rows = &groups[&key];
            let (participant_code, condition) = key;
            ParticipantMetrics {
                participant_code,
                condition,
                suds_pre: mean_opt(rows.iter().map(|t| t.row.suds_pre)),
                suds_post: mean_opt(rows.iter().map(|t| t.row.suds_post)),
                delta_suds: mean_opt(rows.iter().map(|t| t.row.delta_suds)),
                recording_duration_sec: mean_opt(rows.iter().map(|t| t.row.recording_duration_sec)),
                rerecord_count: mean_opt(rows.iter().map(|t| Some(t.row.rerecord_count))),
                review_time_sec: mean_opt(rows.iter().map(|t| t.row.review_time_sec)),
                trial_time_sec: mean_opt(rows.iter().map(|t| t.trial_time_sec)),
                audio_played: mean_opt(rows.iter().map(|t| Some(bool_as_f64(t.row.audio_played)))),
                text_only_used: mean_opt(
                    rows.iter().map(|t| Some(bool_as_f64(t.row.text_only_used))),
                ),
                tabs_count: mean_opt(rows.iter().map(|t| Some(t.tabs_count() as f64))),
                visited_coach: mean_opt(rows.iter().map(|t| Some(bool_as_f64(t.visited_coach)))),
                helpful: mean_opt(rows.iter().map(|t| t.row.helpful)),
                felt_in_control: mean_opt(rows.iter().map(|t| t.row.felt_in_control)),
            }
        })
        .collect()
}

/// Aggregates experiment-condition transcript metrics per participant
///
/// Only experiment trials carry transcripts; control rows are excluded
/// entirely. `wpm_n` counts trials with a present words-per-minute value.
pub fn experiment_text_metrics(trials: &[TrialRecord]) -> Vec<TextMetrics> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&TrialRecord>> = HashMap::new();

    for trial in trials {
        if trial.row.condition != Condition::Experiment {
            continue;
        }
        let code = trial.row.participant_code.clone();
        let entry = groups.entry(code.clone()).or_default();
        if entry.is_empty() {
            order.push(code);
        }
        entry.push(trial);
    }

    order
        .into_iter()
        .map(|code| {
            let rows = &groups[&code];
            TextMetrics {
                participant_code: code,
                word_count_mean: mean_opt(rows.iter().map(|t| t.row.word_count)),
                filler_count_mean: mean_opt(rows.iter().map(|t| t.row.filler_count)),
                filler_rate_mean: mean_opt(rows.iter().map(|t| t.filler_rate())),
                wpm_mean: mean_opt(rows.iter().map(|t| t.row.wpm)),
                wpm_n: rows.iter().filter(|t| t.row.wpm.is_some()).count(),
            }
        })
        .collect()
}

/// Per-trial-index mean ± SEM of ΔSUDS for one condition, over trial-level
/// rows (not participant means)
///
/// Trial indices with no present ΔSUDS value produce no point. Points are
/// returned in ascending trial-index order.
pub fn delta_suds_by_trial(trials: &[TrialRecord], condition: Condition) -> Vec<TrialPoint> {
    let mut by_index: HashMap<u32, Vec<f64>> = HashMap::new();
    for trial in trials {
        if trial.row.condition != condition {
            continue;
        }
        if let Some(delta) = trial.row.delta_suds {
            by_index.entry(trial.row.trial_index).or_default().push(delta);
        }
    }

    let mut indices: Vec<u32> = by_index.keys().copied().collect();
    indices.sort_unstable();

    indices
        .into_iter()
        .map(|trial_index| {
            let values = &by_index[&trial_index];
            TrialPoint {
                trial_index,
                mean: values.iter().sum::<f64>() / values.len() as f64,
                sem: sem(values),
            }
        })
        .collect()
}

/// Extracts one metric of the participant × condition means for a single
/// condition, dropping missing values
pub fn metric_by_condition<F>(
    metrics: &[ParticipantMetrics],
    condition: Condition,
    select: F,
) -> Vec<f64>
where
    F: Fn(&ParticipantMetrics) -> Option<f64>,
{
    metrics
        .iter()
        .filter(|m| m.condition == condition)
        .filter_map(select)
        .collect()
}

fn bool_as_f64(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::data_structures::TrialRow;

    fn record(
        code: &str,
        condition: Condition,
        trial_index: u32,
        delta_suds: Option<f64>,
    ) -> TrialRecord {
        let row = TrialRow {
            participant_code: code.to_string(),
            participant_age: Some(30.0),
            participant_gender: "female".to_string(),
            participant_education: "bachelor".to_string(),
            participant_tech_adaptation: Some(4.0),
            participant_speaking_anxiety: Some(3.0),
            assigned_condition: condition,
            trial_index,
            condition,
            suds_pre: Some(50.0),
            suds_post: delta_suds.map(|d| 50.0 + d),
            delta_suds,
            recording_duration_sec: Some(30.0),
            rerecord_count: 1.0,
            review_time_sec: None,
            audio_played: trial_index % 2 == 0,
            text_only_used: false,
            tabs_visited: None,
            felt_in_control: Some(4.0),
            helpful: None,
            word_count: Some(100.0 + trial_index as f64),
            filler_count: Some(5.0),
            wpm: if trial_index == 1 { None } else { Some(130.0) },
            started_at: None,
            finished_at: None,
        };
        TrialRecord {
            row,
            tabs_list: if trial_index == 1 {
                vec!["coach".to_string()]
            } else {
                Vec::new()
            },
            visited_coach: trial_index == 1,
            visited_any_tab: trial_index == 1,
            trial_time_sec: Some(200.0),
        }
    }

    #[test]
    fn test_participant_roster_first_row_wins() {
        let mut trials = vec![
            record("P01", Condition::Control, 1, Some(-5.0)),
            record("P01", Condition::Control, 2, Some(-8.0)),
            record("P02", Condition::Experiment, 1, Some(-3.0)),
        ];
        // Later rows for P01 carry different demographics; they are ignored
        trials[1].row.participant_age = Some(99.0);

        let roster = participant_roster(&trials);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].participant_code, "P01");
        assert_eq!(roster[0].age, Some(30.0));
        assert_eq!(roster[0].condition, Condition::Control);
        assert_eq!(roster[1].participant_code, "P02");
        assert_eq!(roster[1].condition, Condition::Experiment);
    }

    #[test]
    fn test_participant_condition_means() {
        let trials = vec![
            record("P01", Condition::Control, 1, Some(-10.0)),
            record("P01", Condition::Control, 2, Some(-20.0)),
            record("P01", Condition::Control, 3, None),
        ];

        let metrics = participant_condition_means(&trials);
        assert_eq!(metrics.len(), 1);
        let m = &metrics[0];
        // Missing delta in trial 3 is skipped, not treated as zero
        assert_eq!(m.delta_suds, Some(-15.0));
        assert_eq!(m.rerecord_count, Some(1.0));
        // audio_played true on trial 2 only -> rate 1/3
        assert!((m.audio_played.unwrap() - 1.0 / 3.0).abs() < 1e-12);
        // coach tab visited on trial 1 only
        assert!((m.visited_coach.unwrap() - 1.0 / 3.0).abs() < 1e-12);
        // helpful never present -> None
        assert_eq!(m.helpful, None);
        // tabs_count mean: (1 + 0 + 0) / 3
        assert!((m.tabs_count.unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_condition_split_creates_separate_groups() {
        let mut cross = record("P01", Condition::Control, 1, Some(-5.0));
        cross.row.condition = Condition::Experiment;
        let trials = vec![record("P01", Condition::Control, 1, Some(-5.0)), cross];

        let metrics = participant_condition_means(&trials);
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].condition, Condition::Control);
        assert_eq!(metrics[1].condition, Condition::Experiment);
    }

    #[test]
    fn test_experiment_text_metrics() {
        let trials = vec![
            record("P01", Condition::Experiment, 1, Some(-5.0)),
            record("P01", Condition::Experiment, 2, Some(-8.0)),
            record("P02", Condition::Control, 1, Some(-2.0)),
        ];

        let text = experiment_text_metrics(&trials);
        // Control participant P02 has no text metrics at all
        assert_eq!(text.len(), 1);
        let t = &text[0];
        assert_eq!(t.participant_code, "P01");
        assert_eq!(t.word_count_mean, Some(101.5));
        assert_eq!(t.filler_count_mean, Some(5.0));
        // filler rates: 5/101 and 5/102
        let expected = (5.0 / 101.0 + 5.0 / 102.0) / 2.0;
        assert!((t.filler_rate_mean.unwrap() - expected).abs() < 1e-12);
        // wpm missing on trial 1
        assert_eq!(t.wpm_mean, Some(130.0));
        assert_eq!(t.wpm_n, 1);
    }

    #[test]
    fn test_filler_rate_zero_word_count_is_missing() {
        let mut trial = record("P01", Condition::Experiment, 1, None);
        trial.row.word_count = Some(0.0);
        assert_eq!(trial.filler_rate(), None);

        trial.row.word_count = None;
        assert_eq!(trial.filler_rate(), None);

        trial.row.word_count = Some(50.0);
        trial.row.filler_count = None;
        assert_eq!(trial.filler_rate(), None);
    }

    #[test]
    fn test_delta_suds_by_trial() {
        let trials = vec![
            record("P01", Condition::Control, 1, Some(-10.0)),
            record("P02", Condition::Control, 1, Some(-20.0)),
            record("P03", Condition::Control, 2, Some(-5.0)),
            record("P04", Condition::Control, 3, None),
            record("P05", Condition::Experiment, 1, Some(-30.0)),
        ];

        let points = delta_suds_by_trial(&trials, Condition::Control);
        // Trial 3 has no present value and yields no point
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].trial_index, 1);
        assert_eq!(points[0].mean, -15.0);
        assert!(points[0].sem.is_some());
        assert_eq!(points[1].trial_index, 2);
        assert_eq!(points[1].mean, -5.0);
        // A single value has no sample standard deviation
        assert_eq!(points[1].sem, None);
    }

    #[test]
    fn test_metric_by_condition() {
        let trials = vec![
            record("P01", Condition::Control, 1, Some(-10.0)),
            record("P02", Condition::Experiment, 1, Some(-20.0)),
        ];
        let metrics = participant_condition_means(&trials);

        let control = metric_by_condition(&metrics, Condition::Control, |m| m.delta_suds);
        assert_eq!(control, vec![-10.0]);
        let experiment = metric_by_condition(&metrics, Condition::Experiment, |m| m.delta_suds);
        assert_eq!(experiment, vec![-20.0]);
        // Metrics that are entirely missing drop out instead of polluting charts
        let helpful = metric_by_condition(&metrics, Condition::Control, |m| m.helpful);
        assert!(helpful.is_empty());
    }
}
