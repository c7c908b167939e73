//! Match and league configuration models.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Semaphore;

use crate::game::rules::Scoring;

/// Default invitation acknowledgement deadline.
pub const DEFAULT_INVITATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default deadline for a single choice attempt.
pub const DEFAULT_CHOICE_TIMEOUT: Duration = Duration::from_secs(30);

/// Default number of choice attempts per side.
pub const DEFAULT_CHOICE_ATTEMPTS: u32 = 3;

/// Default fixed delay between choice attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Default upper bound of the drawn value.
pub const DEFAULT_DRAW_MAX: u32 = 10;

/// Configuration for a single match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Deadline for both invitation acknowledgements
    pub invitation_timeout: Duration,

    /// Deadline for each choice attempt
    pub choice_timeout: Duration,

    /// Attempts per side for retryable choice failures
    pub choice_attempts: u32,

    /// Fixed delay between choice attempts
    pub retry_delay: Duration,

    /// Invalid submissions tolerated within one attempt
    pub max_corrections: u32,

    /// Values are drawn from `[1, draw_max]`
    pub draw_max: u32,

    /// Points per result
    pub scoring: Scoring,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            invitation_timeout: DEFAULT_INVITATION_TIMEOUT,
            choice_timeout: DEFAULT_CHOICE_TIMEOUT,
            choice_attempts: DEFAULT_CHOICE_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_corrections: 5,
            draw_max: DEFAULT_DRAW_MAX,
            scoring: Scoring::default(),
        }
    }
}

impl MatchConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.invitation_timeout.is_zero() {
            return Err("Invitation timeout must be greater than zero".to_string());
        }

        if self.choice_timeout.is_zero() {
            return Err("Choice timeout must be greater than zero".to_string());
        }

        if self.choice_attempts == 0 {
            return Err("Choice attempts must be at least 1".to_string());
        }

        if self.draw_max < 2 {
            return Err("Draw range must contain at least one even and one odd value".to_string());
        }

        if self.scoring.win <= self.scoring.draw || self.scoring.draw < self.scoring.loss {
            return Err("Scoring must satisfy win > draw >= loss".to_string());
        }

        Ok(())
    }
}

/// Configuration for a whole league
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueConfig {
    /// Settings applied to every match
    pub match_config: MatchConfig,

    /// Matches allowed in flight at once (default: 2)
    pub max_concurrent_matches: usize,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            max_concurrent_matches: 2,
        }
    }
}

impl LeagueConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent_matches == 0 {
            return Err("Max concurrent matches must be at least 1".to_string());
        }

        if self.max_concurrent_matches > Semaphore::MAX_PERMITS {
            return Err(format!(
                "Max concurrent matches must be at most {}",
                Semaphore::MAX_PERMITS
            ));
        }

        self.match_config.validate()
    }
}
