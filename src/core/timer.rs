//! Cut-in timer on tokio
//!
//! The timer never touches the engine. When the delay is up it sends an
//! event into a channel; whoever owns the engine drains that channel in the
//! same loop that handles user input, so every mutation goes through one
//! place.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::presenter::CutInTicket;

/// Events the timer feeds back to the engine owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    CutInElapsed(CutInTicket),
}

/// Cancellable single-slot delay timer
#[derive(Debug)]
pub struct CutInTimer {
    tx: mpsc::UnboundedSender<EngineEvent>,
    pending: Option<(CutInTicket, JoinHandle<()>)>,
}

impl CutInTimer {
    /// Create a timer and the receiving end of its event channel
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, pending: None }, rx)
    }

    /// Send `CutInElapsed(ticket)` after `delay`
    ///
    /// Replaces any pending callback. Must be called inside a tokio runtime.
    pub fn schedule(&mut self, ticket: CutInTicket, delay: Duration) {
        self.cancel();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the host is shutting down
            let _ = tx.send(EngineEvent::CutInElapsed(ticket));
        });
        debug!(?ticket, ?delay, "cut-in scheduled");
        self.pending = Some((ticket, handle));
    }

    /// Abort the pending callback, if any
    pub fn cancel(&mut self) {
        if let Some((ticket, handle)) = self.pending.take() {
            handle.abort();
            debug!(?ticket, "cut-in cancelled");
        }
    }

    /// Ticket of a callback that has not fired yet
    pub fn pending(&self) -> Option<CutInTicket> {
        self.pending
            .as_ref()
            .filter(|(_, handle)| !handle.is_finished())
            .map(|(ticket, _)| *ticket)
    }
}

impl Drop for CutInTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
