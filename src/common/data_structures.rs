use serde::Deserialize;

/// Condition arm a participant or trial belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Control,
    Experiment,
}

impl Condition {
    /// Axis/legend label for this condition
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Control => "control",
            Condition::Experiment => "experiment",
        }
    }

    /// Both conditions, in chart order
    pub fn all() -> [Condition; 2] {
        [Condition::Control, Condition::Experiment]
    }
}

/// One row of the study CSV export, as written by the trial app
///
/// Blank cells deserialize to `None`. Columns not listed here
/// (prompt id/text) are ignored by the reader.
#[derive(Debug, Clone, Deserialize)]
pub struct TrialRow {
    pub participant_code: String,
    pub participant_age: Option<f64>,
    pub participant_gender: String,
    pub participant_education: String,
    pub participant_tech_adaptation: Option<f64>,
    pub participant_speaking_anxiety: Option<f64>,
    pub assigned_condition: Condition,
    pub trial_index: u32,
    pub condition: Condition,
    pub suds_pre: Option<f64>,
    pub suds_post: Option<f64>,
    pub delta_suds: Option<f64>,
    pub recording_duration_sec: Option<f64>,
    pub rerecord_count: f64,
    pub review_time_sec: Option<f64>,
    pub audio_played: bool,
    pub text_only_used: bool,
    pub tabs_visited: Option<String>,
    pub felt_in_control: Option<f64>,
    pub helpful: Option<f64>,
    pub word_count: Option<f64>,
    pub filler_count: Option<f64>,
    pub wpm: Option<f64>,
    pub started_at: Option<String>,
    pub finished_at: Option<String>,
}

/// A trial row together with the fields derived from it during parsing
#[derive(Debug, Clone)]
pub struct TrialRecord {
    pub row: TrialRow,
    /// Tab names decoded from the `tabs_visited` JSON column
    pub tabs_list: Vec<String>,
    /// Whether the coach tab appears in [`Self::tabs_list`]
    pub visited_coach: bool,
    /// Whether any tab was visited during the trial
    pub visited_any_tab: bool,
    /// Wall-clock trial duration in seconds, when both timestamps parse
    pub trial_time_sec: Option<f64>,
}

impl TrialRecord {
    pub fn tabs_count(&self) -> usize {
        self.tabs_list.len()
    }

    /// Per-trial filler rate (`filler_count / word_count`)
    ///
    /// `None` when either input is missing or the word count is zero; a
    /// zero-word trial has no meaningful rate.
    pub fn filler_rate(&self) -> Option<f64> {
        let word_count = self.row.word_count?;
        let filler_count = self.row.filler_count?;
        if word_count == 0.0 {
            return None;
        }
        Some(filler_count / word_count)
    }
}

/// Participant-level demographics, taken from the first trial row seen
/// for each participant code
#[derive(Debug, Clone)]
pub struct ParticipantProfile {
    pub participant_code: String,
    pub age: Option<f64>,
    pub gender: String,
    pub education: String,
    pub tech_adaptation: Option<f64>,
    pub speaking_anxiety: Option<f64>,
    /// The participant's assigned condition arm
    pub condition: Condition,
}

/// Missing-aware metric means for one (participant, condition) group
///
/// Boolean usage flags are averaged as 0/1, so those fields are rates.
#[derive(Debug, Clone)]
pub struct ParticipantMetrics {
    pub participant_code: String,
    pub condition: Condition,
    pub suds_pre: Option<f64>,
    pub suds_post: Option<f64>,
    pub delta_suds: Option<f64>,
    pub recording_duration_sec: Option<f64>,
    pub rerecord_count: Option<f64>,
    pub review_time_sec: Option<f64>,
    pub trial_time_sec: Option<f64>,
    pub audio_played: Option<f64>,
    pub text_only_used: Option<f64>,
    pub tabs_count: Option<f64>,
    pub visited_coach: Option<f64>,
    pub helpful: Option<f64>,
    pub felt_in_control: Option<f64>,
}

/// Experiment-only transcript metrics aggregated per participant
#[derive(Debug, Clone)]
pub struct TextMetrics {
    pub participant_code: String,
    pub word_count_mean: Option<f64>,
    pub filler_count_mean: Option<f64>,
    pub filler_rate_mean: Option<f64>,
    pub wpm_mean: Option<f64>,
    /// Number of trials with a present words-per-minute value
    pub wpm_n: usize,
}

/// Mean ± SEM of a metric at one trial index, for the over-trials chart
#[derive(Debug, Clone, Copy)]
pub struct TrialPoint {
    pub trial_index: u32,
    pub mean: f64,
    /// Standard error of the mean; `None` when fewer than two values exist
    pub sem: Option<f64>,
}
