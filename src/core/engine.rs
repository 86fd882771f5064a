//! Quiz Engine: session state machine
//!
//! Screen transitions:
//! - HOME → QUIZ: start()
//! - QUIZ → QUIZ: answer(), no new stage
//! - QUIZ → CUT_IN: answer() reaches a stage for the first time
//! - CUT_IN → QUIZ | FINAL: cutin_elapsed() after the fixed delay
//! - QUIZ → FINAL: last question answered
//! - FINAL → RESULT: finish()
//! - any → HOME: reset()
//!
//! Stage policy is sticky: the committed stage is derived from the peak
//! score, so it never drops within a session even if the score does.

use std::time::Duration;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::config::ConfigError;
use crate::core::presenter::{CutInTicket, Presenter};
use crate::core::stage::stage_of;
use crate::types::{
    Answer, CutInFlavor, HistoryEntry, QuestionView, QuizConfig, ReasonCode, RenderFrame,
    Screen, Session, SessionSummary,
};

/// Presenter/engine desync: an operation was called on the wrong screen
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("answer on {0} screen, expected QUIZ")]
    NotInQuiz(Screen),
    #[error("no question at index {index} (quiz has {count})")]
    QuestionOutOfRange { index: usize, count: usize },
    #[error("finish on {0} screen, expected FINAL")]
    NotInFinal(Screen),
    #[error("cut-in ticket {ticket:?} does not match the pending cut-in (screen {screen})")]
    NoCutInPending { ticket: CutInTicket, screen: Screen },
}

/// Quiz state machine engine
#[derive(Debug)]
pub struct QuizEngine<P: Presenter> {
    config: QuizConfig,
    thresholds: Vec<i32>,
    session: Session,
    /// Bumped on every start/reset; cut-in tickets carry it
    generation: u64,
    pending: Option<CutInTicket>,
    presenter: P,
    rng: StdRng,
}

impl<P: Presenter> QuizEngine<P> {
    /// Create engine on the home screen
    pub fn new(config: QuizConfig, presenter: P) -> Result<Self, ConfigError> {
        Self::with_rng(config, presenter, StdRng::from_entropy())
    }

    /// Create engine with deterministic cut-in flavor selection
    pub fn with_seed(config: QuizConfig, presenter: P, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, presenter, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: QuizConfig, presenter: P, rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            thresholds: config.thresholds(),
            session: Session::new(config.score_min),
            config,
            generation: 0,
            pending: None,
            presenter,
            rng,
        })
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Start a fresh session and show question 1. Valid from any screen.
    pub fn start(&mut self) -> RenderFrame {
        self.new_session();
        self.session.screen = Screen::Quiz;
        debug!(generation = self.generation, "session started");
        self.emit(ReasonCode::Q001_SESSION_STARTED, None)
    }

    /// Answer the current question yes/no
    ///
    /// # Panics
    ///
    /// Panics when not on the quiz screen.
    pub fn answer(&mut self, is_yes: bool) -> RenderFrame {
        self.respond(Answer::from(is_yes))
    }

    /// Answer the current question
    ///
    /// # Panics
    ///
    /// Panics when not on the quiz screen.
    pub fn respond(&mut self, answer: Answer) -> RenderFrame {
        self.try_respond(answer)
            .unwrap_or_else(|e| panic!("contract violation: {}", e))
    }

    /// Fallible form of `answer`
    pub fn try_answer(&mut self, is_yes: bool) -> Result<RenderFrame, EngineError> {
        self.try_respond(Answer::from(is_yes))
    }

    /// Fallible form of `respond`
    pub fn try_respond(&mut self, answer: Answer) -> Result<RenderFrame, EngineError> {
        if self.session.screen != Screen::Quiz {
            return Err(EngineError::NotInQuiz(self.session.screen));
        }
        let index = self.session.question_index;
        let question = self
            .config
            .questions
            .get(index)
            .ok_or(EngineError::QuestionOutOfRange {
                index,
                count: self.config.question_count(),
            })?;

        let delta = question.effect(answer);
        let question_id = question.id.clone();
        let score = self
            .config
            .clamp_score(self.session.score.saturating_add(delta));

        self.session.score = score;
        self.session.peak_score = self.session.peak_score.max(score);
        self.session.history.push(HistoryEntry {
            question_id,
            answer,
            delta,
            score_after: score,
            answered_at: chrono::Utc::now(),
        });
        debug!(index, %answer, delta, score, "answer applied");

        let new_stage = stage_of(self.session.peak_score, &self.thresholds);
        if new_stage > self.session.stage {
            self.session.stage = new_stage;
            if self.session.stages_announced.insert(new_stage) {
                return Ok(self.enter_cutin(new_stage));
            }
            self.session.displayed_stage = new_stage;
        }

        Ok(self.advance(ReasonCode::Q002_QUESTION_PRESENTED))
    }

    /// Timer callback: the cut-in has been on screen long enough
    ///
    /// Returns `None` for a stale ticket from an earlier session.
    ///
    /// # Panics
    ///
    /// Panics when a current-generation ticket arrives with no matching
    /// cut-in pending.
    pub fn cutin_elapsed(&mut self, ticket: CutInTicket) -> Option<RenderFrame> {
        self.try_cutin_elapsed(ticket)
            .unwrap_or_else(|e| panic!("contract violation: {}", e))
    }

    /// Fallible form of `cutin_elapsed`
    pub fn try_cutin_elapsed(
        &mut self,
        ticket: CutInTicket,
    ) -> Result<Option<RenderFrame>, EngineError> {
        if ticket.generation != self.generation {
            debug!(
                ticket_generation = ticket.generation,
                generation = self.generation,
                "stale cut-in ticket dropped"
            );
            return Ok(None);
        }
        if self.session.screen != Screen::CutIn || self.pending != Some(ticket) {
            return Err(EngineError::NoCutInPending {
                ticket,
                screen: self.session.screen,
            });
        }

        self.pending = None;
        self.session.displayed_stage = self.session.stage;
        debug!(stage = ticket.stage, "cut-in complete");
        Ok(Some(self.advance(ReasonCode::Q003_CUTIN_COMPLETE)))
    }

    /// Record the buy / don't-buy decision
    ///
    /// # Panics
    ///
    /// Panics when not on the final screen.
    pub fn finish(&mut self, did_buy: bool) -> RenderFrame {
        self.try_finish(did_buy)
            .unwrap_or_else(|e| panic!("contract violation: {}", e))
    }

    /// Fallible form of `finish`
    pub fn try_finish(&mut self, did_buy: bool) -> Result<RenderFrame, EngineError> {
        if self.session.screen != Screen::Final {
            return Err(EngineError::NotInFinal(self.session.screen));
        }
        self.session.decision = Some(did_buy);
        self.session.screen = Screen::Result;
        info!(
            did_buy,
            score = self.session.score,
            stage = self.session.stage,
            "session complete"
        );
        let reason = if did_buy {
            ReasonCode::Q005_DECISION_BOUGHT
        } else {
            ReasonCode::Q005_DECISION_NOT_BOUGHT
        };
        Ok(self.emit(reason, None))
    }

    /// Back to home from any screen; invalidates a pending cut-in
    pub fn reset(&mut self) -> RenderFrame {
        self.new_session();
        debug!(generation = self.generation, "session reset");
        self.emit(ReasonCode::Q001_SESSION_RESET, None)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen(&self) -> Screen {
        self.session.screen
    }

    pub fn score(&self) -> i32 {
        self.session.score
    }

    pub fn stage(&self) -> u8 {
        self.session.stage
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticket of the cut-in currently playing, if any
    pub fn pending_cutin(&self) -> Option<CutInTicket> {
        self.pending
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Frame for the current state without changing anything
    pub fn current_frame(&self) -> RenderFrame {
        let reason = match self.session.screen {
            Screen::Home => ReasonCode::Q001_SESSION_RESET,
            Screen::Quiz => ReasonCode::Q002_QUESTION_PRESENTED,
            Screen::CutIn => ReasonCode::Q003_STAGE_UP_CUTIN,
            Screen::Final => ReasonCode::Q004_QUIZ_COMPLETE,
            Screen::Result => match self.session.decision {
                Some(true) => ReasonCode::Q005_DECISION_BOUGHT,
                _ => ReasonCode::Q005_DECISION_NOT_BOUGHT,
            },
        };
        self.build_frame(reason, None)
    }

    /// Outcome of the session, once a decision has been recorded
    pub fn summary(&self) -> Option<SessionSummary> {
        let did_buy = self.session.decision?;
        Some(SessionSummary {
            did_buy,
            score: self.session.score,
            stage: self.session.stage,
            stage_label: self
                .config
                .stage(self.session.stage)
                .map(|p| p.label.clone())
                .unwrap_or_default(),
            stages_announced: self.session.stages_announced.iter().copied().collect(),
            result_message: self.config.result.for_decision(did_buy).to_string(),
            history: self.session.history.clone(),
        })
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Replace the session and invalidate any in-flight cut-in
    fn new_session(&mut self) {
        if let Some(ticket) = self.pending.take() {
            self.presenter.cancel_cutin(ticket);
        }
        self.generation += 1;
        self.session = Session::new(self.config.score_min);
    }

    fn enter_cutin(&mut self, stage: u8) -> RenderFrame {
        let rng = &mut self.rng;
        let flavor = self
            .config
            .stage(stage)
            .and_then(|p| p.cutins.choose(rng))
            .cloned()
            .unwrap_or_else(|| CutInFlavor::new(format!("STAGE {}", stage), ""));

        let ticket = CutInTicket {
            generation: self.generation,
            stage,
        };
        self.pending = Some(ticket);
        self.session.screen = Screen::CutIn;
        info!(stage, flavor = %flavor.text, "stage up");

        let frame = self.emit(ReasonCode::Q003_STAGE_UP_CUTIN, Some(flavor));
        let delay = Duration::from_millis(self.config.cutin_delay_ms);
        self.presenter.schedule_cutin(ticket, delay);
        frame
    }

    /// Move past the current question: next question or final screen
    fn advance(&mut self, quiz_reason: ReasonCode) -> RenderFrame {
        self.session.question_index += 1;
        let reason = if self.session.question_index >= self.config.question_count() {
            self.session.screen = Screen::Final;
            info!(score = self.session.score, stage = self.session.stage, "quiz complete");
            ReasonCode::Q004_QUIZ_COMPLETE
        } else {
            self.session.screen = Screen::Quiz;
            quiz_reason
        };
        self.emit(reason, None)
    }

    fn emit(&mut self, reason: ReasonCode, cutin: Option<CutInFlavor>) -> RenderFrame {
        let frame = self.build_frame(reason, cutin);
        self.presenter.render(&frame);
        frame
    }

    fn build_frame(&self, reason: ReasonCode, cutin: Option<CutInFlavor>) -> RenderFrame {
        let s = &self.session;
        let shown = self.config.stage(s.displayed_stage);
        let committed = self.config.stage(s.stage);

        let question = match s.screen {
            Screen::Quiz => self.config.questions.get(s.question_index).map(|q| QuestionView {
                id: q.id.clone(),
                prompt: q.prompt.clone(),
            }),
            _ => None,
        };
        let verdict = match s.screen {
            Screen::Final | Screen::Result => committed.map(|p| p.message.clone()),
            _ => None,
        };
        let result_message = match (s.screen, s.decision) {
            (Screen::Result, Some(did_buy)) => {
                Some(self.config.result.for_decision(did_buy).to_string())
            }
            _ => None,
        };

        RenderFrame {
            timestamp: chrono::Utc::now(),
            screen: s.screen,
            reason,
            question_index: s.question_index,
            question_count: self.config.question_count(),
            question,
            score: s.score,
            stage: s.stage,
            displayed_stage: s.displayed_stage,
            stage_label: shown.map(|p| p.label.clone()).unwrap_or_default(),
            stage_visual: shown.map(|p| p.visual.clone()).unwrap_or_default(),
            cutin,
            verdict,
            result_message,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::presenter::RecordingPresenter;
    use crate::types::Question;

    fn engine(config: QuizConfig) -> QuizEngine<RecordingPresenter> {
        QuizEngine::with_seed(config, RecordingPresenter::new(), 7).unwrap()
    }

    /// Fire the pending cut-in, if one is playing
    fn drain(engine: &mut QuizEngine<RecordingPresenter>) {
        if let Some(ticket) = engine.pending_cutin() {
            engine.cutin_elapsed(ticket);
        }
    }

    #[test]
    fn test_initial_state_is_home() {
        let engine = engine(QuizConfig::percentage());
        assert_eq!(engine.screen(), Screen::Home);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.stage(), 1);
        assert!(engine.presenter().frames.is_empty());
    }

    #[test]
    fn test_start_shows_first_question() {
        let mut engine = engine(QuizConfig::percentage());
        let frame = engine.start();
        assert_eq!(frame.screen, Screen::Quiz);
        assert_eq!(frame.reason, ReasonCode::Q001_SESSION_STARTED);
        assert_eq!(frame.question.unwrap().id, "q1");
        assert_eq!(engine.presenter().frames.len(), 1);
    }

    #[test]
    fn test_answer_without_stage_up_advances() {
        let mut engine = engine(QuizConfig::percentage());
        engine.start();
        let frame = engine.answer(true); // +20
        assert_eq!(frame.screen, Screen::Quiz);
        assert_eq!(frame.score, 20);
        assert_eq!(frame.question_index, 1);
        assert!(engine.presenter().scheduled.is_empty());
    }

    #[test]
    fn test_stage_up_enters_cutin_with_visual_lag() {
        let mut engine = engine(QuizConfig::percentage());
        engine.start();
        engine.answer(true); // 20
        let frame = engine.answer(true); // 35 → stage 2

        assert_eq!(frame.screen, Screen::CutIn);
        assert_eq!(frame.reason, ReasonCode::Q003_STAGE_UP_CUTIN);
        assert_eq!(frame.stage, 2);
        assert_eq!(frame.displayed_stage, 1);
        assert_eq!(frame.stage_label, "Impulse Lv.1");
        assert!(frame.cutin.is_some());
        // index advances only once the cut-in is over
        assert_eq!(frame.question_index, 1);

        let (ticket, delay) = engine.presenter().scheduled[0];
        assert_eq!(ticket.stage, 2);
        assert_eq!(delay, Duration::from_millis(crate::CUTIN_DELAY_MS));

        let frame = engine.cutin_elapsed(ticket).unwrap();
        assert_eq!(frame.screen, Screen::Quiz);
        assert_eq!(frame.reason, ReasonCode::Q003_CUTIN_COMPLETE);
        assert_eq!(frame.displayed_stage, 2);
        assert_eq!(frame.stage_label, "Calm Lv.2");
        assert_eq!(frame.question_index, 2);
        assert!(engine.pending_cutin().is_none());
    }

    #[test]
    fn test_cutin_flavor_comes_from_stage_pool() {
        let mut engine = engine(QuizConfig::percentage());
        engine.start();
        engine.answer(true);
        let frame = engine.answer(true);
        let pool = &engine.config().stage(2).unwrap().cutins;
        assert!(pool.contains(&frame.cutin.unwrap()));
    }

    #[test]
    fn test_same_seed_same_flavor() {
        let pick = |seed| {
            let mut e = QuizEngine::with_seed(QuizConfig::percentage(), RecordingPresenter::new(), seed)
                .unwrap();
            e.start();
            e.answer(true);
            e.answer(true).cutin.unwrap()
        };
        assert_eq!(pick(42), pick(42));
    }

    #[test]
    fn test_answer_during_cutin_is_rejected() {
        let mut engine = engine(QuizConfig::percentage());
        engine.start();
        engine.answer(true);
        engine.answer(true); // cut-in
        assert!(matches!(
            engine.try_answer(true),
            Err(EngineError::NotInQuiz(Screen::CutIn))
        ));
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_answer_on_home_panics() {
        let mut engine = engine(QuizConfig::percentage());
        engine.answer(true);
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_finish_during_quiz_panics() {
        let mut engine = engine(QuizConfig::percentage());
        engine.start();
        engine.finish(true);
    }

    #[test]
    fn test_duplicate_ticket_is_rejected() {
        let mut engine = engine(QuizConfig::percentage());
        engine.start();
        engine.answer(true);
        engine.answer(true);
        let ticket = engine.pending_cutin().unwrap();
        engine.cutin_elapsed(ticket);
        assert!(matches!(
            engine.try_cutin_elapsed(ticket),
            Err(EngineError::NoCutInPending { .. })
        ));
    }

    #[test]
    fn test_stale_ticket_after_reset_is_noop() {
        let mut engine = engine(QuizConfig::percentage());
        engine.start();
        engine.answer(true);
        engine.answer(true);
        let ticket = engine.pending_cutin().unwrap();

        engine.reset();
        assert_eq!(engine.presenter().cancelled, vec![ticket]);
        assert!(engine.cutin_elapsed(ticket).is_none());
        assert_eq!(engine.screen(), Screen::Home);

        // A new session ignores the old ticket too
        engine.start();
        let frames = engine.presenter().frames.len();
        assert!(engine.cutin_elapsed(ticket).is_none());
        assert_eq!(engine.presenter().frames.len(), frames);
        assert_eq!(engine.screen(), Screen::Quiz);
    }

    #[test]
    fn test_jump_straight_to_top_stage_announces_once() {
        let mut cfg = QuizConfig::percentage();
        cfg.questions = vec![
            Question::new("big", "?", 80, 0),
            Question::new("end", "?", 0, 0),
        ];
        let mut engine = engine(cfg);
        engine.start();
        let frame = engine.answer(true);
        assert_eq!(frame.stage, 3);
        assert_eq!(engine.presenter().cutin_stages(), vec![3]);
        drain(&mut engine);
        engine.answer(true);
        assert_eq!(engine.screen(), Screen::Final);
        assert_eq!(engine.session().stages_announced.iter().copied().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_stage_is_sticky_when_score_drops() {
        let mut cfg = QuizConfig::percentage();
        cfg.questions = vec![
            Question::new("up", "?", 40, 0),
            Question::new("down", "?", -30, 0),
            Question::new("up_again", "?", 30, 0),
            Question::new("end", "?", 0, 0),
        ];
        let mut engine = engine(cfg);
        engine.start();
        engine.answer(true); // 40 → stage 2, cut-in
        drain(&mut engine);
        let frame = engine.answer(true); // 10
        assert_eq!(frame.score, 10);
        assert_eq!(frame.stage, 2);
        let frame = engine.answer(true); // 40 again, no second cut-in
        assert_eq!(frame.screen, Screen::Quiz);
        assert_eq!(engine.presenter().cutin_stages(), vec![2]);
    }

    #[test]
    fn test_score_is_clamped_at_both_ends() {
        let mut cfg = QuizConfig::percentage();
        cfg.questions = vec![
            Question::new("neg", "?", -50, 0),
            Question::new("pos", "?", 500, 0),
            Question::new("end", "?", 0, 0),
        ];
        let mut engine = engine(cfg);
        engine.start();
        assert_eq!(engine.answer(true).score, 0);
        assert_eq!(engine.answer(true).score, 100);
        let h = &engine.session().history;
        assert_eq!(h[0].delta, -50);
        assert_eq!(h[0].score_after, 0);
        assert_eq!(h[1].score_after, 100);
    }

    #[test]
    fn test_final_cutin_leads_to_final_screen() {
        let mut cfg = QuizConfig::points();
        cfg.questions.truncate(2);
        let mut engine = engine(cfg);
        engine.start();
        engine.answer(false); // 1
        let frame = engine.answer(false); // 2 → stage 2 on the last question
        assert_eq!(frame.screen, Screen::CutIn);
        let frame = engine.cutin_elapsed(engine.pending_cutin().unwrap()).unwrap();
        assert_eq!(frame.screen, Screen::Final);
        assert_eq!(frame.reason, ReasonCode::Q004_QUIZ_COMPLETE);
        assert_eq!(frame.question_index, 2);
    }

    #[test]
    fn test_finish_selects_message_and_summary() {
        let mut engine = engine(QuizConfig::percentage());
        engine.start();
        for _ in 0..5 {
            engine.answer(false);
            drain(&mut engine);
        }
        assert_eq!(engine.screen(), Screen::Final);
        assert!(engine.summary().is_none());

        let frame = engine.finish(false);
        assert_eq!(frame.screen, Screen::Result);
        assert_eq!(frame.reason, ReasonCode::Q005_DECISION_NOT_BOUGHT);
        assert_eq!(
            frame.result_message.as_deref(),
            Some(engine.config().result.not_bought.as_str())
        );

        let summary = engine.summary().unwrap();
        assert!(!summary.did_buy);
        assert_eq!(summary.history.len(), 5);
    }

    #[test]
    fn test_reset_from_every_screen() {
        let mut engine = engine(QuizConfig::percentage());
        let to_cutin = |e: &mut QuizEngine<RecordingPresenter>| {
            e.start();
            e.answer(true);
            e.answer(true);
        };

        engine.reset();
        assert_eq!(engine.screen(), Screen::Home);

        engine.start();
        engine.answer(true);
        engine.reset();
        assert_eq!(engine.session(), &Session::new(0));

        to_cutin(&mut engine);
        assert_eq!(engine.screen(), Screen::CutIn);
        let frame = engine.reset();
        assert_eq!(frame.reason, ReasonCode::Q001_SESSION_RESET);
        assert_eq!(engine.session(), &Session::new(0));
        assert!(engine.pending_cutin().is_none());
    }

    #[test]
    fn test_start_bumps_generation() {
        let mut engine = engine(QuizConfig::percentage());
        let g0 = engine.generation();
        engine.start();
        engine.start();
        assert_eq!(engine.generation(), g0 + 2);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut cfg = QuizConfig::percentage();
        cfg.questions.clear();
        assert!(QuizEngine::new(cfg, RecordingPresenter::new()).is_err());
    }
}
