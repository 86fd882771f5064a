//! Quiz questions and their score effects

use serde::{Deserialize, Serialize};
use crate::types::Answer;

/// One question in the fixed quiz sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Stable identifier, unique within a quiz
    pub id: String,
    /// Text shown to the user
    pub prompt: String,
    /// Score delta for a "yes"
    pub yes: i32,
    /// Score delta for a "no"
    pub no: i32,
    /// Score delta for "unsure"; falls back to the calmer of yes/no
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsure: Option<i32>,
}

impl Question {
    /// Create a yes/no question
    pub fn new(id: impl Into<String>, prompt: impl Into<String>, yes: i32, no: i32) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            yes,
            no,
            unsure: None,
        }
    }

    /// Set an explicit delta for "unsure"
    pub fn with_unsure(mut self, delta: i32) -> Self {
        self.unsure = Some(delta);
        self
    }

    /// Score delta produced by an answer
    pub fn effect(&self, answer: Answer) -> i32 {
        match answer {
            Answer::Yes => self.yes,
            Answer::No => self.no,
            Answer::Unsure => self.unsure.unwrap_or(self.yes.max(self.no)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_yes_no() {
        let q = Question::new("q1", "Wanted it for a week?", 20, 5);
        assert_eq!(q.effect(Answer::Yes), 20);
        assert_eq!(q.effect(Answer::No), 5);
    }

    #[test]
    fn test_unsure_defaults_to_calmer_answer() {
        let q = Question::new("q3", "Buying on impulse?", 0, 25);
        assert_eq!(q.effect(Answer::Unsure), 25);

        let q = q.with_unsure(10);
        assert_eq!(q.effect(Answer::Unsure), 10);
    }
}
