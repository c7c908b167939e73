//! Structured logging configuration.
//!
//! Library records emitted through the `log` facade are captured by the same
//! subscriber, so match-level logs and runner events share one output.

use parity_league::{CompletedMatch, StandingsEntry};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the RUST_LOG env var (default `info`).
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a completed match with structured fields
pub fn log_match_completed(event: &CompletedMatch) {
    let winner = event.winner.as_ref().map(|w| w.as_str());
    if event.is_technical_loss() || event.is_double_forfeit() {
        tracing::warn!(
            match_id = %event.match_id,
            round = event.round,
            status = %event.status,
            winner = winner,
            points_a = event.points_a,
            points_b = event.points_b,
            "Match ended without play: {}",
            event.reason
        );
    } else {
        tracing::info!(
            match_id = %event.match_id,
            round = event.round,
            winner = winner,
            drawn = event.drawn,
            points_a = event.points_a,
            points_b = event.points_b,
            "Match completed: {}",
            event.reason
        );
    }
}

/// Log the end of a round
///
/// # Arguments
///
/// * `round` - Round number
/// * `matches` - Matches played in the round
/// * `duration` - Wall-clock time for the round
/// * `leader` - Current table leader
pub fn log_round_completed(
    round: u32,
    matches: usize,
    duration: Duration,
    leader: Option<&StandingsEntry>,
) {
    let duration_ms = duration.as_millis() as u64;
    tracing::info!(
        round = round,
        matches = matches,
        duration_ms = duration_ms,
        leader = leader.map(|l| l.participant.as_str()),
        leader_points = leader.map(|l| l.points),
        "Round completed"
    );

    if duration_ms > 60_000 {
        tracing::warn!(
            round = round,
            duration_ms = duration_ms,
            "PERFORMANCE: Slow round, participants are hitting deadlines"
        );
    }
}
