//! Render frames: what the presenter is asked to show after each transition

use chrono::{DateTime, Utc};
use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};
use crate::types::{CutInFlavor, ReasonCode, Screen};

/// Question as shown on screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: String,
    pub prompt: String,
}

/// Snapshot of everything a presenter needs to draw the current screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Screen to show
    pub screen: Screen,
    /// Transition that produced this frame
    pub reason: ReasonCode,
    /// 0-based index of the question on screen (or answered count)
    pub question_index: usize,
    pub question_count: usize,
    /// Present on the quiz screen only
    pub question: Option<QuestionView>,
    pub score: i32,
    /// Committed stage
    pub stage: u8,
    /// Stage whose character is drawn; lags `stage` during a cut-in
    pub displayed_stage: u8,
    pub stage_label: String,
    pub stage_visual: String,
    /// Present when entering a cut-in
    pub cutin: Option<CutInFlavor>,
    /// Stage verdict, present on the final and result screens
    pub verdict: Option<String>,
    /// Closing message, present on the result screen
    pub result_message: Option<String>,
}

impl Screen {
    /// Terminal color for screen
    pub fn color(&self) -> Color {
        match self {
            Screen::Home => Color::BrightBlack,
            Screen::Quiz => Color::Cyan,
            Screen::CutIn => Color::Yellow,
            Screen::Final => Color::Green,
            Screen::Result => Color::Magenta,
        }
    }
}

impl RenderFrame {
    /// "Q2 / 5" progress marker (1-based)
    pub fn progress(&self) -> String {
        format!("Q{} / {}", self.question_index + 1, self.question_count)
    }

    /// Main line of the frame, shared by both output formats
    fn body(&self) -> String {
        match self.screen {
            Screen::Home => "Press start when you're about to buy something.".to_string(),
            Screen::Quiz => match &self.question {
                Some(q) => format!("{} {}", self.progress(), q.prompt),
                None => self.progress(),
            },
            Screen::CutIn => match &self.cutin {
                Some(c) => format!("{} {} {}", c.visual, c.text, c.visual),
                None => format!("STAGE {}", self.stage),
            },
            Screen::Final => self.verdict.clone().unwrap_or_default(),
            Screen::Result => self.result_message.clone().unwrap_or_default(),
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let color = self.screen.color();
        let header = format!(
            "{} [{}] {} {} | score={}",
            self.screen.emoji(),
            self.screen,
            self.stage_visual,
            self.stage_label,
            self.score
        );
        let body = match self.screen {
            Screen::CutIn => self.body().bold().to_string(),
            _ => self.body(),
        };
        format!("{}\n  {}", header.color(color), body)
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "screen={} | q={}/{} | score={} | stage={} | shown={} | reason={} | {}",
            self.screen,
            self.question_index,
            self.question_count,
            self.score,
            self.stage,
            self.displayed_stage,
            self.reason.code(),
            self.body()
        )
    }
}
