//! Runner configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use parity_league::{
    LeagueConfig, LocalParticipant, MatchConfig, Participant, ParticipantId, Scoring, Strategy,
    participant::local::RandomStrategy,
    config::{
        DEFAULT_CHOICE_ATTEMPTS, DEFAULT_CHOICE_TIMEOUT, DEFAULT_DRAW_MAX,
        DEFAULT_INVITATION_TIMEOUT, DEFAULT_RETRY_DELAY,
    },
};
use std::{collections::HashSet, sync::Arc, time::Duration};

/// Complete runner configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// League and match settings
    pub league: LeagueConfig,
    /// Roster in seeding order
    pub players: Vec<PlayerSpec>,
    /// Simulated response latency for every local player
    pub player_latency: Option<Duration>,
}

/// One local player
#[derive(Debug, Clone)]
pub struct PlayerSpec {
    pub id: ParticipantId,
    pub strategy: Strategy,
}

impl RunnerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `players_override` - Optional roster override (from CLI args)
    /// * `concurrency_override` - Optional max concurrent matches (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<RunnerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if the roster is missing or cannot be parsed
    pub fn from_env(
        players_override: Option<String>,
        concurrency_override: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let roster = players_override
            .or_else(|| std::env::var("LEAGUE_PLAYERS").ok())
            .ok_or_else(|| ConfigError::MissingRequired {
                var: "LEAGUE_PLAYERS".to_string(),
                hint: "Set LEAGUE_PLAYERS=alice:even,bob:odd,carol or pass --players 4"
                    .to_string(),
            })?;
        let players = parse_players(&roster)?;

        let defaults = Scoring::default();
        let match_config = MatchConfig {
            invitation_timeout: Duration::from_secs(parse_env_or(
                "INVITATION_TIMEOUT_SECS",
                DEFAULT_INVITATION_TIMEOUT.as_secs(),
            )),
            choice_timeout: Duration::from_secs(parse_env_or(
                "CHOICE_TIMEOUT_SECS",
                DEFAULT_CHOICE_TIMEOUT.as_secs(),
            )),
            choice_attempts: parse_env_or("RETRY_ATTEMPTS", DEFAULT_CHOICE_ATTEMPTS),
            retry_delay: Duration::from_secs(parse_env_or(
                "RETRY_DELAY_SECS",
                DEFAULT_RETRY_DELAY.as_secs(),
            )),
            max_corrections: parse_env_or("MAX_CORRECTIONS", MatchConfig::default().max_corrections),
            draw_max: parse_env_or("DRAW_MAX", DEFAULT_DRAW_MAX),
            scoring: Scoring {
                win: parse_env_or("WIN_POINTS", defaults.win),
                draw: parse_env_or("DRAW_POINTS", defaults.draw),
                loss: defaults.loss,
            },
        };

        let max_concurrent_matches = concurrency_override.unwrap_or_else(|| {
            parse_env_or(
                "MAX_CONCURRENT_MATCHES",
                LeagueConfig::default().max_concurrent_matches,
            )
        });

        let latency_ms: u64 = parse_env_or("PLAYER_LATENCY_MS", 0);

        Ok(RunnerConfig {
            league: LeagueConfig {
                match_config,
                max_concurrent_matches,
            },
            players,
            player_latency: (latency_ms > 0).then(|| Duration::from_millis(latency_ms)),
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.len() < 2 {
            return Err(ConfigError::Invalid {
                var: "LEAGUE_PLAYERS".to_string(),
                reason: format!("Need at least 2 players, have {}", self.players.len()),
            });
        }

        let mut seen = HashSet::new();
        for player in &self.players {
            if !seen.insert(&player.id) {
                return Err(ConfigError::Invalid {
                    var: "LEAGUE_PLAYERS".to_string(),
                    reason: format!("Player {} listed more than once", player.id),
                });
            }
        }

        if self.league.max_concurrent_matches == 0 {
            return Err(ConfigError::Invalid {
                var: "MAX_CONCURRENT_MATCHES".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        self.league
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "league settings".to_string(),
                reason,
            })
    }

    /// Build in-process participants for the roster
    pub fn participants(&self) -> Vec<Arc<dyn Participant>> {
        self.players
            .iter()
            .map(|player| {
                let mut local = LocalParticipant::new(player.id.clone(), player.strategy.clone());
                if let Some(latency) = self.player_latency {
                    local = local.with_latency(latency);
                }
                Arc::new(local) as Arc<dyn Participant>
            })
            .collect()
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse a roster spec.
///
/// Either a player count (`"6"`, all random) or a comma-separated list of
/// `id[:strategy]` entries where strategy is `random`, `even`, `odd` or
/// `alternating` (default `random`).
pub fn parse_players(spec: &str) -> Result<Vec<PlayerSpec>, ConfigError> {
    let spec = spec.trim();
    if let Ok(count) = spec.parse::<usize>() {
        return Ok((1..=count)
            .map(|i| PlayerSpec {
                id: ParticipantId::from(format!("P{i:02}")),
                strategy: RandomStrategy.into(),
            })
            .collect());
    }

    spec.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, strategy_name) = entry.split_once(':').unwrap_or((entry, "random"));
            let strategy =
                Strategy::from_name(strategy_name.trim()).ok_or_else(|| ConfigError::Invalid {
                    var: "LEAGUE_PLAYERS".to_string(),
                    reason: format!("Unknown strategy {strategy_name:?} for player {id}"),
                })?;
            Ok(PlayerSpec {
                id: ParticipantId::new(id),
                strategy,
            })
        })
        .collect()
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
