//! Screen and answer definitions

use serde::{Deserialize, Serialize};

/// The five presentation modes of a quiz session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Screen {
    /// Idle, waiting for `start()`
    Home,
    /// A question is on screen and expects one answer
    Quiz,
    /// Stage-up interstitial, no input accepted until it elapses
    CutIn,
    /// All questions answered, buy / don't buy prompt
    Final,
    /// Decision recorded, closing message shown
    Result,
}

impl Screen {
    /// Does this screen take a yes/no answer?
    pub fn accepts_answer(&self) -> bool {
        matches!(self, Screen::Quiz)
    }

    /// Get emoji for screen
    pub fn emoji(&self) -> &'static str {
        match self {
            Screen::Home => "🏠",
            Screen::Quiz => "❓",
            Screen::CutIn => "💥",
            Screen::Final => "🛒",
            Screen::Result => "🏁",
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Screen::Home => "HOME",
            Screen::Quiz => "QUIZ",
            Screen::CutIn => "CUT_IN",
            Screen::Final => "FINAL",
            Screen::Result => "RESULT",
        };
        write!(f, "{}", name)
    }
}

/// A user's reply to one question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Yes,
    No,
    /// "I don't know" - scored with the question's unsure delta
    Unsure,
}

impl Answer {
    /// Parse a terminal reply (`y`, `yes`, `n`, `no`, `?`, `unsure`)
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Answer::Yes),
            "n" | "no" => Some(Answer::No),
            "?" | "u" | "unsure" => Some(Answer::Unsure),
            _ => None,
        }
    }
}

impl From<bool> for Answer {
    fn from(is_yes: bool) -> Self {
        if is_yes {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Answer::Yes => "yes",
            Answer::No => "no",
            Answer::Unsure => "unsure",
        };
        write!(f, "{}", name)
    }
}
