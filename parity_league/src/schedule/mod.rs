//! Round-robin fixture generation.
//!
//! This module provides:
//! - Fixture, Round and Schedule models
//! - Deterministic circle-method scheduling with byes for odd rosters
//!
//! ## Example
//!
//! ```
//! use parity_league::{ParticipantId, round_robin};
//!
//! let roster: Vec<ParticipantId> = ["P01", "P02", "P03", "P04"]
//!     .into_iter()
//!     .map(ParticipantId::from)
//!     .collect();
//!
//! let schedule = round_robin(&roster).unwrap();
//! assert_eq!(schedule.rounds.len(), 3);
//! assert_eq!(schedule.total_matches(), 6);
//! ```

pub mod models;
pub mod round_robin;

pub use models::{Fixture, MatchId, Round, RoundStatus, Schedule, match_id};
pub use round_robin::round_robin;

use thiserror::Error;

use crate::game::ParticipantId;

/// Scheduling errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Need at least 2 participants, have {0}")]
    NotEnoughParticipants(usize),

    #[error("Participant {0} appears more than once in the roster")]
    DuplicateParticipant(ParticipantId),
}
