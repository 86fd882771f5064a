//! Core types for Cooldown

mod screen;
mod question;
mod config;
mod session;
mod render;
mod reason;

pub use screen::{Screen, Answer};
pub use question::Question;
pub use config::{QuizConfig, StageProfile, CutInFlavor, ResultMessages};
pub use session::{Session, HistoryEntry, SessionSummary};
pub use render::{RenderFrame, QuestionView};
pub use reason::ReasonCode;
