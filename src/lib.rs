//! Cooldown: a calm-purchase quiz engine
//!
//! The user answers a short, fixed run of questions before buying something.
//! Each answer moves a bounded calmness score; crossing a stage threshold
//! plays a one-shot cut-in and levels up the character; the last screen
//! records whether the user bought or walked away.
//!
//! Flow: Presenter → `QuizEngine` → `RenderFrame` → Presenter

pub mod core;
pub mod types;

// =============================================================================
// SCORE BOUNDS - percentage scale
// =============================================================================

/// Lowest calmness score on the percentage scale
pub const SCORE_MIN: i32 = 0;

/// Highest calmness score on the percentage scale
pub const SCORE_MAX: i32 = 100;

// =============================================================================
// STAGE THRESHOLDS - percentage scale (0-100)
// =============================================================================

/// Score at which stage 2 begins
pub const PERCENT_T2: i32 = 30;

/// Score at which stage 3 begins
pub const PERCENT_T3: i32 = 65;

// =============================================================================
// STAGE THRESHOLDS - point scale (0-5, one point per calm answer)
// =============================================================================

/// Highest score on the point scale
pub const POINTS_MAX: i32 = 5;

/// Calm answers needed for stage 2
pub const POINTS_T2: i32 = 2;

/// Calm answers needed for stage 3
pub const POINTS_T3: i32 = 4;

// =============================================================================
// TIMING
// =============================================================================

/// How long a cut-in stays on screen before the quiz continues (milliseconds)
pub const CUTIN_DELAY_MS: u64 = 1200;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
