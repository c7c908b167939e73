//! In-process participants with pluggable choice strategies.
//!
//! ## Strategies
//!
//! - **Random**: uniform 50/50, the equilibrium strategy for this game
//! - **Fixed**: always the same choice
//! - **Alternating**: even, odd, even, ...

use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use rand::Rng;
use std::time::Duration;
use tokio::sync::Mutex;

use super::{CallResult, ChoiceRequest, Invitation, InvitationReply, Participant};
use crate::{
    game::{ParityChoice, ParticipantId},
    orchestrator::CompletedMatch,
};

/// Decision logic for a local participant
#[enum_dispatch]
pub trait ChoiceStrategy {
    fn choose(&mut self, request: &ChoiceRequest) -> ParityChoice;

    fn name(&self) -> &'static str;
}

/// Uniformly random choice
#[derive(Clone, Debug, Default)]
pub struct RandomStrategy;

impl ChoiceStrategy for RandomStrategy {
    fn choose(&mut self, _request: &ChoiceRequest) -> ParityChoice {
        if rand::rng().random_bool(0.5) {
            ParityChoice::Even
        } else {
            ParityChoice::Odd
        }
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Always the same choice
#[derive(Clone, Debug)]
pub struct FixedStrategy(pub ParityChoice);

impl ChoiceStrategy for FixedStrategy {
    fn choose(&mut self, _request: &ChoiceRequest) -> ParityChoice {
        self.0
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Flips its choice after every submission
#[derive(Clone, Debug)]
pub struct AlternatingStrategy {
    next: ParityChoice,
}

impl AlternatingStrategy {
    pub fn starting_with(first: ParityChoice) -> Self {
        Self { next: first }
    }
}

impl Default for AlternatingStrategy {
    fn default() -> Self {
        Self::starting_with(ParityChoice::Even)
    }
}

impl ChoiceStrategy for AlternatingStrategy {
    fn choose(&mut self, _request: &ChoiceRequest) -> ParityChoice {
        let choice = self.next;
        self.next = choice.flipped();
        choice
    }

    fn name(&self) -> &'static str {
        "alternating"
    }
}

#[enum_dispatch(ChoiceStrategy)]
#[derive(Clone, Debug)]
pub enum Strategy {
    RandomStrategy,
    FixedStrategy,
    AlternatingStrategy,
}

impl Strategy {
    /// Parse a strategy name as used by the runner configuration.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "random" => Some(RandomStrategy.into()),
            "even" => Some(FixedStrategy(ParityChoice::Even).into()),
            "odd" => Some(FixedStrategy(ParityChoice::Odd).into()),
            "alternating" => Some(AlternatingStrategy::default().into()),
            _ => None,
        }
    }
}

/// Participant living in the same process as the orchestrator
pub struct LocalParticipant {
    id: ParticipantId,
    strategy: Mutex<Strategy>,
    /// Simulated response latency for every call
    latency: Option<Duration>,
    /// Results delivered through `notify_result`
    results: Mutex<Vec<CompletedMatch>>,
}

impl LocalParticipant {
    pub fn new(id: impl Into<ParticipantId>, strategy: Strategy) -> Self {
        Self {
            id: id.into(),
            strategy: Mutex::new(strategy),
            latency: None,
            results: Mutex::new(Vec::new()),
        }
    }

    pub fn random(id: impl Into<ParticipantId>) -> Self {
        Self::new(id, RandomStrategy.into())
    }

    pub fn fixed(id: impl Into<ParticipantId>, choice: ParityChoice) -> Self {
        Self::new(id, FixedStrategy(choice).into())
    }

    /// Delay every response by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn strategy_name(&self) -> &'static str {
        self.strategy.lock().await.name()
    }

    /// Results received so far, oldest first
    pub async fn results(&self) -> Vec<CompletedMatch> {
        self.results.lock().await.clone()
    }

    async fn pace(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl Participant for LocalParticipant {
    fn id(&self) -> &ParticipantId {
        &self.id
    }

    async fn offer_invitation(&self, invitation: &Invitation) -> CallResult<InvitationReply> {
        self.pace().await;
        log::debug!(
            "{} accepting invitation to {} against {}",
            self.id,
            invitation.match_id,
            invitation.opponent
        );
        Ok(InvitationReply::accept())
    }

    async fn request_choice(&self, request: &ChoiceRequest) -> CallResult<String> {
        self.pace().await;
        let choice = self.strategy.lock().await.choose(request);
        Ok(choice.as_str().to_string())
    }

    async fn notify_result(&self, result: &CompletedMatch) -> CallResult<()> {
        self.results.lock().await.push(result.clone());
        Ok(())
    }
}
