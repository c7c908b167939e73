//! # Parity League
//!
//! Orchestration core for a round-robin league of the even/odd parity game.
//!
//! Two remote participants each pick `even` or `odd`, the referee draws a value
//! in `[1, N]`, and whoever matched the parity of the drawn value wins. The game
//! itself is trivial; this crate is about running it fairly:
//!
//! - **Match orchestration**: a closed state machine (`WaitingForParticipants →
//!   CollectingChoices → DrawingValue → Evaluating → Finished | Aborted`) that
//!   fans calls out to both sides at once and always reaches a terminal state.
//! - **Retry policy**: bounded attempts with a fixed delay, retrying only
//!   transport-level failures.
//! - **Scheduling**: deterministic circle-method round robin with byes.
//! - **Standings**: ranked table with deterministic tie-breaks and duplicate
//!   result rejection, serialized behind an async lock.
//! - **League runner**: drives a whole schedule round by round with bounded
//!   match concurrency.
//!
//! ## Example
//!
//! ```no_run
//! use parity_league::{LeagueConfig, LeagueRunner, LocalParticipant, Participant};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let roster: Vec<Arc<dyn Participant>> = ["P01", "P02", "P03", "P04"]
//!         .into_iter()
//!         .map(|id| Arc::new(LocalParticipant::random(id)) as Arc<dyn Participant>)
//!         .collect();
//!
//!     let mut league = LeagueRunner::new(LeagueConfig::default(), roster)?;
//!     let report = league.run().await?;
//!
//!     for entry in &report.standings {
//!         println!("{} {} {}", entry.rank, entry.participant, entry.points);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod game;
pub mod league;
pub mod orchestrator;
pub mod participant;
pub mod retry;
pub mod schedule;
pub mod sink;
pub mod standings;

pub use config::{LeagueConfig, MatchConfig};
pub use game::{
    ParityChoice, ParticipantId, Side,
    draw::{DrawSource, SecureDraw, SequenceDraw},
    rules::{Evaluation, Scoring, evaluate},
};
pub use league::{LeagueError, LeagueReport, LeagueResult, LeagueRunner};
pub use orchestrator::{CompletedMatch, MatchOrchestrator, MatchState, MatchStatus};
pub use participant::{
    CallError, ChoiceRequest, Invitation, InvitationReply, Participant,
    local::{LocalParticipant, Strategy},
};
pub use retry::{ErrorClass, RetryFailure, RetryPolicy, Sleeper, TokioSleeper};
pub use schedule::{Fixture, MatchId, Round, RoundStatus, Schedule, ScheduleError, round_robin};
pub use sink::{MatchSink, SinkError};
pub use standings::{SharedStandings, Standings, StandingsEntry, StandingsError};
