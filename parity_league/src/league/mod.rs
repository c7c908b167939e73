//! League runner.
//!
//! This module provides:
//! - Round-by-round execution of a round-robin schedule
//! - Bounded match concurrency within a round
//! - Round status tracking (pending, in progress, complete)
//! - League reports with events and final standings
//!
//! ## Example
//!
//! ```no_run
//! use parity_league::{LeagueConfig, LeagueRunner, LocalParticipant, Participant};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let roster: Vec<Arc<dyn Participant>> = (1..=6)
//!         .map(|i| Arc::new(LocalParticipant::random(format!("P{i:02}"))) as Arc<dyn Participant>)
//!         .collect();
//!
//!     let mut league = LeagueRunner::new(LeagueConfig::default(), roster)?;
//!     while let Some(round) = league.next_round() {
//!         let events = league.run_round(round).await?;
//!         println!("Round {} finished {} matches", round, events.len());
//!     }
//!
//!     println!("{}", league.standings().render_table().await);
//!     Ok(())
//! }
//! ```

pub mod manager;
pub mod models;

pub use manager::{LeagueError, LeagueResult, LeagueRunner};
pub use models::{LeagueReport, RoundSummary};
