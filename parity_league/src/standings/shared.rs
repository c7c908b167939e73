//! Standings shared between concurrently running matches.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::{
    errors::StandingsResult,
    table::{Standings, StandingsEntry},
};
use crate::{game::ParticipantId, orchestrator::CompletedMatch};

/// Cloneable handle to one standings aggregate.
///
/// Updates are serialized by the lock; each event is fully applied, ranking
/// included, before the next one is looked at.
#[derive(Clone, Debug)]
pub struct SharedStandings {
    inner: Arc<Mutex<Standings>>,
}

impl SharedStandings {
    pub fn new(standings: Standings) -> Self {
        Self {
            inner: Arc::new(Mutex::new(standings)),
        }
    }

    pub fn for_roster(roster: &[ParticipantId]) -> Self {
        Self::new(Standings::new(roster))
    }

    /// Apply one completed match
    pub async fn apply(&self, event: &CompletedMatch) -> StandingsResult<()> {
        self.inner.lock().await.apply(event)
    }

    /// Current ranking
    pub async fn snapshot(&self) -> Vec<StandingsEntry> {
        self.inner.lock().await.ranking().to_vec()
    }

    /// Copy of the full aggregate
    pub async fn standings(&self) -> Standings {
        self.inner.lock().await.clone()
    }

    pub async fn render_table(&self) -> String {
        self.inner.lock().await.render_table()
    }
}
