//! Core modules for Cooldown

pub mod stage;
pub mod config;
pub mod presenter;
pub mod engine;
pub mod timer;

pub use stage::stage_of;
pub use config::ConfigError;
pub use presenter::{Presenter, CutInTicket, RecordingPresenter};
pub use engine::{QuizEngine, EngineError};
pub use timer::{CutInTimer, EngineEvent};
