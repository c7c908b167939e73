//! Participant call abstraction.
//!
//! The orchestration core never talks to the network directly. Every
//! participant is reached through the [`Participant`] trait, which a transport
//! collaborator implements for remote agents. The core supplies deadlines and
//! treats a missed deadline and a broken connection the same way: no response.
//!
//! [`local::LocalParticipant`] is an in-process implementation used by the
//! runner binary and by tests.

pub mod errors;
pub mod local;

pub use errors::{CallError, CallResult};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    game::{ParticipantId, Side},
    orchestrator::CompletedMatch,
    schedule::MatchId,
};

/// Invitation offered to each side before a match starts
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Invitation {
    pub match_id: MatchId,
    pub round: u32,
    pub side: Side,
    pub opponent: ParticipantId,
}

/// A participant's answer to an [`Invitation`]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct InvitationReply {
    pub accept: bool,
    /// Free-form reason, usually set on rejection
    pub reason: Option<String>,
}

impl InvitationReply {
    pub fn accept() -> Self {
        Self {
            accept: true,
            reason: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            accept: false,
            reason: Some(reason.into()),
        }
    }
}

/// Request for a parity choice
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct ChoiceRequest {
    pub match_id: MatchId,
    pub round: u32,
    pub side: Side,
    pub opponent: ParticipantId,
    /// 1-based attempt number within the retry budget
    pub attempt: u32,
    /// Wall-clock time after which the submission is ignored
    pub deadline: DateTime<Utc>,
    /// Set when the previous submission in this attempt was invalid
    pub correction: Option<String>,
}

/// A league participant reachable by the orchestrator.
#[async_trait]
pub trait Participant: Send + Sync {
    /// Stable identifier of this participant
    fn id(&self) -> &ParticipantId;

    /// Offer a match invitation
    async fn offer_invitation(&self, invitation: &Invitation) -> CallResult<InvitationReply>;

    /// Ask for a choice token
    ///
    /// The raw token is returned unparsed; the orchestrator validates it so a
    /// malformed answer can be surfaced back to the same side.
    async fn request_choice(&self, request: &ChoiceRequest) -> CallResult<String>;

    /// Inform the participant of the final result
    ///
    /// Fire-and-forget: failures are logged and otherwise ignored.
    async fn notify_result(&self, _result: &CompletedMatch) -> CallResult<()> {
        Ok(())
    }
}
