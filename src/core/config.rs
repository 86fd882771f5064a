//! Config loading, validation and the two built-in presets

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::types::{CutInFlavor, Question, QuizConfig, ResultMessages, StageProfile};
use crate::{
    CUTIN_DELAY_MS, PERCENT_T2, PERCENT_T3, POINTS_MAX, POINTS_T2, POINTS_T3, SCORE_MAX,
    SCORE_MIN,
};

/// Why a config could not be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("config has no questions")]
    NoQuestions,
    #[error("duplicate question id {0:?}")]
    DuplicateQuestionId(String),
    #[error("score bounds are empty: min {min} must be below max {max}")]
    EmptyScoreRange { min: i32, max: i32 },
    #[error("config has no stages")]
    NoStages,
    #[error("stage 1 must start at score_min ({score_min}), found {found}")]
    FirstStageNotAtMin { score_min: i32, found: i32 },
    #[error("stage {stage} threshold {threshold} is not above the previous one")]
    ThresholdsNotAscending { stage: u8, threshold: i32 },
    #[error("stage {stage} threshold {threshold} lies outside {min}..={max}")]
    ThresholdOutOfRange { stage: u8, threshold: i32, min: i32, max: i32 },
    #[error("stage {0} has no cut-in flavor")]
    NoCutInFlavor(u8),
    #[error("too many stages ({0}), at most 255 are supported")]
    TooManyStages(usize),
}

impl QuizConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: QuizConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check every structural rule the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.questions.is_empty() {
            return Err(ConfigError::NoQuestions);
        }

        let mut seen = HashSet::new();
        for q in &self.questions {
            if !seen.insert(q.id.as_str()) {
                return Err(ConfigError::DuplicateQuestionId(q.id.clone()));
            }
        }

        if self.score_min >= self.score_max {
            return Err(ConfigError::EmptyScoreRange {
                min: self.score_min,
                max: self.score_max,
            });
        }

        let first = self.stages.first().ok_or(ConfigError::NoStages)?;
        if self.stages.len() > u8::MAX as usize {
            return Err(ConfigError::TooManyStages(self.stages.len()));
        }
        if first.min_score != self.score_min {
            return Err(ConfigError::FirstStageNotAtMin {
                score_min: self.score_min,
                found: first.min_score,
            });
        }

        for (i, pair) in self.stages.windows(2).enumerate() {
            let stage = (i + 2) as u8;
            let threshold = pair[1].min_score;
            if threshold <= pair[0].min_score {
                return Err(ConfigError::ThresholdsNotAscending { stage, threshold });
            }
            if threshold > self.score_max {
                return Err(ConfigError::ThresholdOutOfRange {
                    stage,
                    threshold,
                    min: self.score_min,
                    max: self.score_max,
                });
            }
            if pair[1].cutins.is_empty() {
                return Err(ConfigError::NoCutInFlavor(stage));
            }
        }

        Ok(())
    }

    /// 0-100 scale, T2=30, T3=65
    pub fn percentage() -> Self {
        Self {
            score_min: SCORE_MIN,
            score_max: SCORE_MAX,
            questions: vec![
                Question::new("q1", "Have you wanted this for more than a week?", 20, 5),
                Question::new("q2", "Did you compare prices somewhere else?", 15, 5),
                Question::new("q3", "Are you buying this on the spur of the moment?", 0, 25),
                Question::new("q4", "Do you already own something that does the same job?", 0, 20),
                Question::new("q5", "Does it fit this month's budget without stretching?", 20, 5),
            ],
            stages: default_stages(SCORE_MIN, PERCENT_T2, PERCENT_T3),
            cutin_delay_ms: CUTIN_DELAY_MS,
            result: ResultMessages::default(),
        }
    }

    /// 0-5 scale, one point per calm answer, T2=2, T3=4
    pub fn points() -> Self {
        Self {
            score_min: 0,
            score_max: POINTS_MAX,
            questions: vec![
                Question::new("q1", "Are you tired, or being pushed around by your mood right now?", 0, 1),
                Question::new("q2", "Will you still say \"I want it\" 24 hours from now?", 0, 1),
                Question::new("q3", "Do you need it right this minute?", 0, 1),
                Question::new("q4", "Don't you already own something like it?", 1, 0),
                Question::new("q5", "Is it worth more to you than its price?", 0, 1),
            ],
            stages: default_stages(0, POINTS_T2, POINTS_T3),
            cutin_delay_ms: CUTIN_DELAY_MS,
            result: ResultMessages::default(),
        }
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self::percentage()
    }
}

/// The three canonical stages, shared by both presets
fn default_stages(t1: i32, t2: i32, t3: i32) -> Vec<StageProfile> {
    vec![
        StageProfile {
            min_score: t1,
            label: "Impulse Lv.1".to_string(),
            visual: "🐚".to_string(),
            message: "Can't say I dislike the momentum. Still, the last call is yours.".to_string(),
            cutins: Vec::new(),
        },
        StageProfile {
            min_score: t2,
            label: "Calm Lv.2".to_string(),
            visual: "🐚✨".to_string(),
            message: "Looks like you've cooled off a little. So, what'll it be?".to_string(),
            cutins: vec![
                CutInFlavor::new("GREAT", "✨"),
                CutInFlavor::new("NICE AND STEADY", "🌊"),
            ],
        },
        StageProfile {
            min_score: t3,
            label: "Master Lv.3".to_string(),
            visual: "🐚⚡".to_string(),
            message: "Thought it through this far? Then whichever way it goes, no regrets.".to_string(),
            cutins: vec![
                CutInFlavor::new("COOL JUDGMENT", "❄️"),
                CutInFlavor::new("CLEAR HEAD", "🧊"),
            ],
        },
    ]
}
