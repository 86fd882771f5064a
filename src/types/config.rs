//! Quiz configuration data
//!
//! Thresholds, labels, visuals and flavor text are all data. Switching
//! between the 0-5 point scale and the 0-100 percentage scale is a
//! config choice, not a code path.

use serde::{Deserialize, Serialize};
use crate::types::Question;
use crate::CUTIN_DELAY_MS;

/// Text and visual played during a stage-up cut-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutInFlavor {
    pub text: String,
    pub visual: String,
}

impl CutInFlavor {
    pub fn new(text: impl Into<String>, visual: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visual: visual.into(),
        }
    }
}

/// Presentation and threshold for one stage
///
/// Stage numbers are 1-based positions in `QuizConfig::stages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProfile {
    /// Lowest score that reaches this stage
    pub min_score: i32,
    /// Short label, e.g. "Calm Lv.2"
    pub label: String,
    /// Character visual for this stage
    pub visual: String,
    /// Verdict shown on the final screen
    pub message: String,
    /// Flavor pool for the cut-in; one entry is picked uniformly at random
    #[serde(default)]
    pub cutins: Vec<CutInFlavor>,
}

/// Closing messages for the two decisions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMessages {
    pub bought: String,
    pub not_bought: String,
}

impl Default for ResultMessages {
    fn default() -> Self {
        Self {
            bought: "Decision made. Enjoy it - you thought it through.".to_string(),
            not_bought: "Decision made. The money stays in your pocket today.".to_string(),
        }
    }
}

impl ResultMessages {
    /// Message for a decision
    pub fn for_decision(&self, did_buy: bool) -> &str {
        if did_buy {
            &self.bought
        } else {
            &self.not_bought
        }
    }
}

fn default_cutin_delay_ms() -> u64 {
    CUTIN_DELAY_MS
}

/// Everything the engine needs, loaded once at construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Lower score bound (inclusive)
    pub score_min: i32,
    /// Upper score bound (inclusive)
    pub score_max: i32,
    /// Ordered question sequence
    pub questions: Vec<Question>,
    /// Ordered stages, ascending `min_score`, first starts at `score_min`
    pub stages: Vec<StageProfile>,
    /// Cut-in display time
    #[serde(default = "default_cutin_delay_ms")]
    pub cutin_delay_ms: u64,
    #[serde(default)]
    pub result: ResultMessages,
}

impl QuizConfig {
    /// Number of questions
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Stage thresholds in order, stage 1 first
    pub fn thresholds(&self) -> Vec<i32> {
        self.stages.iter().map(|s| s.min_score).collect()
    }

    /// Profile for a 1-based stage number
    pub fn stage(&self, stage: u8) -> Option<&StageProfile> {
        (stage as usize)
            .checked_sub(1)
            .and_then(|i| self.stages.get(i))
    }

    /// Highest stage number this config defines
    pub fn top_stage(&self) -> u8 {
        self.stages.len() as u8
    }

    /// Clamp a raw score into the configured bounds
    pub fn clamp_score(&self, score: i32) -> i32 {
        score.clamp(self.score_min, self.score_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_messages_are_distinct() {
        let msgs = ResultMessages::default();
        assert_ne!(msgs.for_decision(true), msgs.for_decision(false));
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let json = r#"{
            "score_min": 0,
            "score_max": 5,
            "questions": [{"id": "q1", "prompt": "?", "yes": 0, "no": 1}],
            "stages": [{"min_score": 0, "label": "Lv.1", "visual": "o", "message": "m"}]
        }"#;
        let cfg: QuizConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.cutin_delay_ms, CUTIN_DELAY_MS);
        assert_eq!(cfg.result, ResultMessages::default());
        assert!(cfg.stages[0].cutins.is_empty());
    }

    #[test]
    fn test_stage_lookup_is_one_based() {
        let json = r#"{
            "score_min": 0,
            "score_max": 5,
            "questions": [],
            "stages": [
                {"min_score": 0, "label": "one", "visual": "1", "message": ""},
                {"min_score": 2, "label": "two", "visual": "2", "message": ""}
            ]
        }"#;
        let cfg: QuizConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.stage(0).is_none());
        assert_eq!(cfg.stage(1).unwrap().label, "one");
        assert_eq!(cfg.stage(2).unwrap().label, "two");
        assert!(cfg.stage(3).is_none());
        assert_eq!(cfg.top_stage(), 2);
        assert_eq!(cfg.thresholds(), vec![0, 2]);
        assert_eq!(cfg.clamp_score(9), 5);
        assert_eq!(cfg.clamp_score(-3), 0);
    }
}
