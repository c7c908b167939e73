//! Match orchestration.
//!
//! This module provides:
//! - The closed match state machine and its transition table
//! - A match record with an auditable transition history
//! - The orchestrator that drives both sides through a match
//! - The completion event emitted once per match

pub mod outcome;
pub mod record;
pub mod runner;
pub mod state;

pub use outcome::{CompletedMatch, MatchStatus, Outcome};
pub use record::Match;
pub use runner::{MatchOrchestrator, with_deadline};
pub use state::{MatchError, MatchPhase, MatchState, Transition, Verdict};
