//! Session state: everything one quiz attempt owns

use std::collections::BTreeSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::types::{Answer, Screen};

/// One answered question, kept for the audit trail only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question_id: String,
    pub answer: Answer,
    /// Delta the question produced, before clamping
    pub delta: i32,
    /// Score after clamping
    pub score_after: i32,
    pub answered_at: DateTime<Utc>,
}

/// Mutable state of one quiz attempt
///
/// Replaced wholesale on `start()` / `reset()`, never patched back to
/// defaults field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub screen: Screen,
    /// 0-based; equals the question count once the quiz is complete
    pub question_index: usize,
    /// Clamped calmness score
    pub score: i32,
    /// Highest score reached this session; committed stage derives from it
    pub peak_score: i32,
    /// Committed stage (1-based, never decreases)
    pub stage: u8,
    /// Stage whose visual is on screen; lags `stage` while a cut-in plays
    pub displayed_stage: u8,
    /// Stages whose cut-in already fired
    pub stages_announced: BTreeSet<u8>,
    pub history: Vec<HistoryEntry>,
    /// Set by `finish()`
    pub decision: Option<bool>,
}

impl Session {
    /// Fresh session on the home screen
    pub fn new(score_min: i32) -> Self {
        Self {
            screen: Screen::Home,
            question_index: 0,
            score: score_min,
            peak_score: score_min,
            stage: 1,
            displayed_stage: 1,
            stages_announced: BTreeSet::new(),
            history: Vec::new(),
            decision: None,
        }
    }

    /// Is a cut-in currently playing?
    pub fn in_cutin(&self) -> bool {
        self.screen == Screen::CutIn
    }
}

/// What a finished session produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub did_buy: bool,
    pub score: i32,
    pub stage: u8,
    pub stage_label: String,
    pub stages_announced: Vec<u8>,
    pub result_message: String,
    pub history: Vec<HistoryEntry>,
}
