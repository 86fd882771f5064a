//! Presenter seam: the only collaborator the engine talks to
//!
//! The engine asks for two things: draw a frame, and call it back after a
//! fixed delay when a cut-in starts. Everything visual lives behind this.

use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::types::RenderFrame;

/// Identifies one scheduled cut-in
///
/// `generation` is the session epoch the cut-in was scheduled in. A ticket
/// from an older generation is stale and the engine ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CutInTicket {
    pub generation: u64,
    pub stage: u8,
}

/// Rendering + scheduling collaborator
pub trait Presenter {
    /// Draw the frame; called after every state change
    fn render(&mut self, frame: &RenderFrame);

    /// Arrange for `QuizEngine::cutin_elapsed(ticket)` after `delay`
    fn schedule_cutin(&mut self, ticket: CutInTicket, delay: Duration);

    /// Drop a pending callback. Best effort: the engine also rejects
    /// stale tickets on its own.
    fn cancel_cutin(&mut self, _ticket: CutInTicket) {}
}

/// Presenter that only records what it was asked to do
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub frames: Vec<RenderFrame>,
    pub scheduled: Vec<(CutInTicket, Duration)>,
    pub cancelled: Vec<CutInTicket>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent frame, if any
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.frames.last()
    }

    /// Most recently scheduled ticket, if any
    pub fn last_ticket(&self) -> Option<CutInTicket> {
        self.scheduled.last().map(|(t, _)| *t)
    }

    /// Stages whose cut-in was scheduled, in order
    pub fn cutin_stages(&self) -> Vec<u8> {
        self.scheduled.iter().map(|(t, _)| t.stage).collect()
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, frame: &RenderFrame) {
        self.frames.push(frame.clone());
    }

    fn schedule_cutin(&mut self, ticket: CutInTicket, delay: Duration) {
        self.scheduled.push((ticket, delay));
    }

    fn cancel_cutin(&mut self, ticket: CutInTicket) {
        self.cancelled.push(ticket);
    }
}
