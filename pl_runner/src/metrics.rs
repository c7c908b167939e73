//! League metrics recorded through the `metrics` facade.
//!
//! No exporter is installed by the runner; without a recorder every call is a
//! no-op. Embedders that install a recorder get:
//!
//! - **Match Metrics**: completed matches by status, technical losses, draws
//! - **Round Metrics**: round duration, rounds completed
//! - **Standings Metrics**: leader points

use parity_league::{CompletedMatch, StandingsEntry};
use std::time::Duration;

// ============================================================================
// Match Metrics
// ============================================================================

/// Record one completed match.
pub fn record_match(event: &CompletedMatch) {
    metrics::counter!("league_matches_total",
        "status" => event.status.to_string()
    )
    .increment(1);

    if event.is_technical_loss() {
        metrics::counter!("league_technical_losses_total").increment(1);
    }

    if event.is_draw() {
        metrics::counter!("league_draws_total").increment(1);
    }
}

// ============================================================================
// Round Metrics
// ============================================================================

/// Record a finished round and its duration in milliseconds.
pub fn record_round(round: u32, duration: Duration) {
    metrics::counter!("league_rounds_total").increment(1);
    metrics::histogram!("league_round_duration_ms",
        "round" => round.to_string()
    )
    .record(duration.as_secs_f64() * 1000.0);
}

// ============================================================================
// Standings Metrics
// ============================================================================

/// Set current leader points.
pub fn leader_points(leader: Option<&StandingsEntry>) {
    if let Some(leader) = leader {
        metrics::gauge!("league_leader_points").set(f64::from(leader.points));
    }
}
