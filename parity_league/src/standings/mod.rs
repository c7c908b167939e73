//! League standings.
//!
//! This module provides:
//! - The ranked standings table with tie-breaks
//! - Duplicate and unknown-participant rejection
//! - A lock-guarded handle shared by concurrent matches
//!
//! Ranking order: points, head-to-head (two-way ties only), win percentage,
//! wins, fewer draws, identifier.

pub mod errors;
pub mod shared;
pub mod table;

pub use errors::{StandingsError, StandingsResult};
pub use shared::SharedStandings;
pub use table::{Standings, StandingsEntry};
