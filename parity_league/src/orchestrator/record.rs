//! Match record with transition history.

use chrono::{DateTime, Utc};

use super::{
    outcome::{CompletedMatch, MatchStatus},
    state::{MatchError, MatchPhase, MatchState, Transition, Verdict},
};
use crate::{
    game::{ParityChoice, ParticipantId, Side},
    schedule::{Fixture, MatchId},
};

/// One match: identity, current state and every phase entered so far
#[derive(Debug, Clone)]
pub struct Match {
    id: MatchId,
    round: u32,
    sides: [ParticipantId; 2],
    state: MatchState,
    history: Vec<(MatchPhase, DateTime<Utc>)>,
}

impl Match {
    pub fn new(fixture: &Fixture) -> Self {
        Self {
            id: fixture.match_id.clone(),
            round: fixture.round,
            sides: [fixture.side_a.clone(), fixture.side_b.clone()],
            state: MatchState::WaitingForParticipants,
            history: vec![(MatchPhase::WaitingForParticipants, Utc::now())],
        }
    }

    pub fn id(&self) -> &MatchId {
        &self.id
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn participant(&self, side: Side) -> &ParticipantId {
        &self.sides[side.index()]
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Phases entered so far, oldest first
    pub fn history(&self) -> &[(MatchPhase, DateTime<Utc>)] {
        &self.history
    }

    /// Apply a transition and record the new phase.
    ///
    /// The state is left untouched on error.
    pub fn apply(&mut self, transition: Transition) -> Result<MatchPhase, MatchError> {
        let next = self.state.next(transition)?;
        let from = self.state.phase();
        self.state = next;
        let to = self.state.phase();
        self.history.push((to, Utc::now()));
        log::debug!("Match {}: {} -> {}", self.id, from, to);
        Ok(to)
    }

    /// Build the completion event for a terminal match.
    pub fn completed(&self) -> Option<CompletedMatch> {
        match &self.state {
            MatchState::Finished {
                choices,
                drawn,
                verdict,
            } => Some(self.event(MatchStatus::Finished, *choices, *drawn, verdict)),
            MatchState::Aborted { verdict } => {
                Some(self.event(MatchStatus::Aborted, [None, None], None, verdict))
            }
            _ => None,
        }
    }

    /// Force a terminal state and build the completion event.
    ///
    /// Only used when the orchestrator itself failed to drive the match to an
    /// end; the match is recorded as a double forfeit.
    pub fn into_completed(mut self) -> CompletedMatch {
        if let Some(event) = self.completed() {
            return event;
        }

        log::error!(
            "Match {} left {} without a terminal state; recording double forfeit",
            self.id,
            self.phase()
        );
        let verdict = Verdict {
            winner: None,
            points: [0, 0],
            reason: format!("internal error: match stopped while {}", self.phase()),
        };
        self.history.push((MatchPhase::Aborted, Utc::now()));
        self.event(MatchStatus::Aborted, [None, None], None, &verdict)
    }

    fn event(
        &self,
        status: MatchStatus,
        choices: [Option<ParityChoice>; 2],
        drawn: Option<u32>,
        verdict: &Verdict,
    ) -> CompletedMatch {
        CompletedMatch {
            match_id: self.id.clone(),
            round: self.round,
            side_a: self.sides[0].clone(),
            side_b: self.sides[1].clone(),
            status,
            winner: verdict.winner.map(|side| self.participant(side).clone()),
            reason: verdict.reason.clone(),
            choice_a: choices[0],
            choice_b: choices[1],
            drawn,
            points_a: verdict.points[0],
            points_b: verdict.points[1],
            finished_at: self.history.last().map_or_else(Utc::now, |(_, at)| *at),
        }
    }
}
