//! Destinations for completed match events.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{
    orchestrator::CompletedMatch,
    standings::{SharedStandings, StandingsError},
};

/// Sink errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SinkError {
    /// Receiving side is gone
    #[error("Sink closed")]
    Closed,

    /// Standings refused the event
    #[error("Rejected by standings: {0}")]
    Rejected(#[from] StandingsError),
}

/// Accepts each completed match event
#[async_trait]
pub trait MatchSink: Send + Sync {
    async fn accept(&self, event: &CompletedMatch) -> Result<(), SinkError>;
}

#[async_trait]
impl MatchSink for mpsc::Sender<CompletedMatch> {
    async fn accept(&self, event: &CompletedMatch) -> Result<(), SinkError> {
        self.send(event.clone()).await.map_err(|_| SinkError::Closed)
    }
}

#[async_trait]
impl MatchSink for mpsc::UnboundedSender<CompletedMatch> {
    async fn accept(&self, event: &CompletedMatch) -> Result<(), SinkError> {
        self.send(event.clone()).map_err(|_| SinkError::Closed)
    }
}

#[async_trait]
impl MatchSink for SharedStandings {
    async fn accept(&self, event: &CompletedMatch) -> Result<(), SinkError> {
        Ok(self.apply(event).await?)
    }
}
