//! Reason codes for render frames
//! One code per transition that can produce a frame

use serde::{Deserialize, Serialize};

/// Why a render frame was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // Q001: Session lifecycle
    // =========================================================================
    /// Fresh session, first question on screen
    Q001_SESSION_STARTED,
    /// Session cleared, back on the home screen
    Q001_SESSION_RESET,

    // =========================================================================
    // Q002: Questions
    // =========================================================================
    /// Next question presented
    Q002_QUESTION_PRESENTED,

    // =========================================================================
    // Q003: Stages
    // =========================================================================
    /// Stage went up for the first time, cut-in playing
    Q003_STAGE_UP_CUTIN,
    /// Cut-in finished, new stage visible
    Q003_CUTIN_COMPLETE,

    // =========================================================================
    // Q004: Completion
    // =========================================================================
    /// All questions answered, decision prompt shown
    Q004_QUIZ_COMPLETE,

    // =========================================================================
    // Q005: Decision
    // =========================================================================
    /// User bought
    Q005_DECISION_BOUGHT,
    /// User walked away
    Q005_DECISION_NOT_BOUGHT,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::Q001_SESSION_STARTED => "Q001_SESSION_STARTED",
            Self::Q001_SESSION_RESET => "Q001_SESSION_RESET",
            Self::Q002_QUESTION_PRESENTED => "Q002_QUESTION_PRESENTED",
            Self::Q003_STAGE_UP_CUTIN => "Q003_STAGE_UP_CUTIN",
            Self::Q003_CUTIN_COMPLETE => "Q003_CUTIN_COMPLETE",
            Self::Q004_QUIZ_COMPLETE => "Q004_QUIZ_COMPLETE",
            Self::Q005_DECISION_BOUGHT => "Q005_DECISION_BOUGHT",
            Self::Q005_DECISION_NOT_BOUGHT => "Q005_DECISION_NOT_BOUGHT",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Q001_SESSION_STARTED => "Quiz started",
            Self::Q001_SESSION_RESET => "Back to home",
            Self::Q002_QUESTION_PRESENTED => "Next question",
            Self::Q003_STAGE_UP_CUTIN => "Stage up - cut-in playing",
            Self::Q003_CUTIN_COMPLETE => "Cut-in finished",
            Self::Q004_QUIZ_COMPLETE => "All questions answered",
            Self::Q005_DECISION_BOUGHT => "Decided to buy",
            Self::Q005_DECISION_NOT_BOUGHT => "Decided not to buy",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
