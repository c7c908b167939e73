//! Drives one match from invitation to result.

use chrono::{TimeDelta, Utc};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::{
    task::{JoinError, JoinSet},
    time::Instant,
};

use super::{
    outcome::CompletedMatch,
    record::Match,
    state::{MatchError, Transition, Verdict},
};
use crate::{
    config::MatchConfig,
    game::{ParityChoice, ParticipantId, Side, draw::DrawSource, rules::evaluate},
    participant::{CallError, CallResult, ChoiceRequest, Invitation, Participant},
    retry::{RetryFailure, RetryPolicy, Sleeper},
    schedule::{Fixture, MatchId},
    sink::MatchSink,
};

/// Points awarded to a side that never showed up
const FORFEIT_POINTS: u32 = 0;

/// Run `future` with a deadline, mapping expiry to `CallError::DeadlineExpired`.
pub async fn with_deadline<F, T>(duration: Duration, future: F) -> CallResult<T>
where
    F: Future<Output = CallResult<T>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(CallError::DeadlineExpired(duration)),
    }
}

fn task_failure(error: &JoinError) -> RetryFailure {
    RetryFailure {
        attempts: 1,
        error: CallError::ConnectionFailure(format!("participant task failed: {error}")),
        exhausted: false,
    }
}

/// One side's choice exchange, owned so it can move into a spawned task
#[derive(Clone)]
struct ChoiceCall {
    participant: Arc<dyn Participant>,
    match_id: MatchId,
    round: u32,
    side: Side,
    opponent: ParticipantId,
    timeout: Duration,
    max_corrections: u32,
}

impl ChoiceCall {
    /// One retry attempt.
    ///
    /// Invalid tokens are sent back with a correction notice and the side may
    /// resubmit until the attempt deadline passes. Corrections do not count
    /// against the retry budget.
    async fn attempt(&self, attempt: u32) -> CallResult<ParityChoice> {
        let started = Instant::now();
        let deadline = TimeDelta::from_std(self.timeout)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta))
            .unwrap_or_else(Utc::now);

        let mut correction: Option<String> = None;
        let mut corrections = 0;

        loop {
            let remaining = self.timeout.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                return Err(self.expired(correction));
            }

            let request = ChoiceRequest {
                match_id: self.match_id.clone(),
                round: self.round,
                side: self.side,
                opponent: self.opponent.clone(),
                attempt,
                deadline,
                correction: correction.clone(),
            };

            let response =
                with_deadline(remaining, self.participant.request_choice(&request)).await;
            let invalid = match response {
                Ok(token) => match token.parse::<ParityChoice>() {
                    Ok(choice) => {
                        log::debug!(
                            "Match {}: {} ({}) chose {} on attempt {}",
                            self.match_id,
                            self.participant.id(),
                            self.side,
                            choice,
                            attempt
                        );
                        return Ok(choice);
                    }
                    Err(e) => e.to_string(),
                },
                Err(CallError::InvalidValue(detail)) => detail,
                Err(CallError::DeadlineExpired(_)) => return Err(self.expired(correction)),
                Err(e) => return Err(e),
            };

            corrections += 1;
            log::warn!(
                "Match {}: {} ({}) submitted an invalid choice ({}), correction {}/{}",
                self.match_id,
                self.participant.id(),
                self.side,
                invalid,
                corrections,
                self.max_corrections
            );
            if corrections > self.max_corrections {
                return Err(CallError::InvalidValue(invalid));
            }
            correction = Some(invalid);
        }
    }

    /// Deadline passed. After an invalid submission this is terminal.
    fn expired(&self, last_invalid: Option<String>) -> CallError {
        match last_invalid {
            Some(detail) => CallError::InvalidValue(detail),
            None => CallError::DeadlineExpired(self.timeout),
        }
    }
}

/// Runs a single match to a terminal state.
///
/// Both sides are contacted concurrently in every collection phase. Whatever
/// the participants do, [`MatchOrchestrator::run`] returns exactly one
/// [`CompletedMatch`].
pub struct MatchOrchestrator {
    record: Match,
    participants: [Arc<dyn Participant>; 2],
    config: MatchConfig,
    draw: Arc<dyn DrawSource>,
    invitation_policy: RetryPolicy,
    choice_policy: RetryPolicy,
}

impl MatchOrchestrator {
    /// Set up a match for `fixture`.
    ///
    /// # Errors
    ///
    /// `MatchError::ParticipantMismatch` if a participant's id differs from
    /// the one the fixture lists for its side.
    pub fn new(
        fixture: &Fixture,
        side_a: Arc<dyn Participant>,
        side_b: Arc<dyn Participant>,
        config: &MatchConfig,
        draw: Arc<dyn DrawSource>,
    ) -> Result<Self, MatchError> {
        for (side, expected, participant) in [
            (Side::A, &fixture.side_a, &side_a),
            (Side::B, &fixture.side_b, &side_b),
        ] {
            if participant.id() != expected {
                return Err(MatchError::ParticipantMismatch {
                    match_id: fixture.match_id.clone(),
                    side,
                    expected: expected.clone(),
                    actual: participant.id().clone(),
                });
            }
        }

        Ok(Self {
            record: Match::new(fixture),
            participants: [side_a, side_b],
            config: config.clone(),
            draw,
            invitation_policy: RetryPolicy::no_retry(),
            choice_policy: RetryPolicy::new(config.choice_attempts, config.retry_delay),
        })
    }

    /// Replace the timer used between retry attempts
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.invitation_policy = self.invitation_policy.with_sleeper(Arc::clone(&sleeper));
        self.choice_policy = self.choice_policy.with_sleeper(sleeper);
        self
    }

    pub fn record(&self) -> &Match {
        &self.record
    }

    /// Play the match and notify both participants of the result.
    pub async fn run(mut self) -> CompletedMatch {
        log::info!(
            "Match {} (round {}) starting: {} vs {}",
            self.record.id(),
            self.record.round(),
            self.record.participant(Side::A),
            self.record.participant(Side::B)
        );

        if let Some(verdict) = self.invite().await {
            self.transition(Transition::Abort(verdict));
            return self.finish();
        }
        self.transition(Transition::InvitationsAccepted);

        let choices = match self.collect_choices().await {
            [Ok(a), Ok(b)] => [a, b],
            [Err(failure), Ok(b)] => {
                self.technical_loss(Side::A, &failure, [None, Some(b)]);
                return self.finish();
            }
            [Ok(a), Err(failure)] => {
                self.technical_loss(Side::B, &failure, [Some(a), None]);
                return self.finish();
            }
            [Err(failure_a), Err(failure_b)] => {
                let verdict = self.double_forfeit("no valid choice", &failure_a, &failure_b);
                self.transition(Transition::Abort(verdict));
                return self.finish();
            }
        };
        self.transition(Transition::ChoicesCollected(choices));

        let drawn = self.draw.draw(self.config.draw_max);
        log::info!(
            "Match {}: drew {} ({})",
            self.record.id(),
            drawn,
            ParityChoice::of(drawn)
        );
        self.transition(Transition::ValueDrawn(drawn));

        let evaluation = evaluate(choices[0], choices[1], drawn, &self.config.scoring);
        self.transition(Transition::Evaluated(evaluation));

        self.finish()
    }

    /// Play the match and hand the result to `sink`.
    ///
    /// Sink failures are logged; the event is returned either way.
    pub async fn run_and_report(self, sink: &dyn MatchSink) -> CompletedMatch {
        let event = self.run().await;
        if let Err(e) = sink.accept(&event).await {
            log::error!("Match {}: failed to report result: {}", event.match_id, e);
        }
        event
    }

    /// Spawn one task per side and wait for both at a single barrier.
    ///
    /// The tasks live in a `JoinSet`, so dropping the match aborts any call
    /// still in flight.
    async fn fan_out<T, F, Fut>(&self, call: F) -> [Result<T, RetryFailure>; 2]
    where
        T: Send + 'static,
        F: Fn(Side) -> Fut,
        Fut: Future<Output = Result<T, RetryFailure>> + Send + 'static,
    {
        let mut tasks = JoinSet::new();
        let ids = Side::BOTH.map(|side| tasks.spawn(call(side)).id());

        let mut results: [Option<Result<T, RetryFailure>>; 2] = [None, None];
        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, result) = match joined {
                Ok((id, result)) => (id, result),
                Err(e) => (e.id(), Err(task_failure(&e))),
            };
            if let Some(idx) = ids.iter().position(|task| *task == id) {
                results[idx] = Some(result);
            }
        }

        results.map(|result| {
            result.unwrap_or_else(|| {
                Err(RetryFailure {
                    attempts: 1,
                    error: CallError::ConnectionFailure("participant task lost".to_string()),
                    exhausted: false,
                })
            })
        })
    }

    /// Offer both invitations. Returns the abort verdict if either side failed.
    async fn invite(&self) -> Option<Verdict> {
        let results = self
            .fan_out(|side| {
                let participant = Arc::clone(&self.participants[side.index()]);
                let invitation = Invitation {
                    match_id: self.record.id().clone(),
                    round: self.record.round(),
                    side,
                    opponent: self.record.participant(side.other()).clone(),
                };
                let policy = self.invitation_policy.clone();
                let timeout = self.config.invitation_timeout;

                async move {
                    policy
                        .run(|_| async {
                            let reply =
                                with_deadline(timeout, participant.offer_invitation(&invitation))
                                    .await?;
                            if reply.accept {
                                Ok(())
                            } else {
                                Err(CallError::Rejected(
                                    reply
                                        .reason
                                        .unwrap_or_else(|| "invitation declined".to_string()),
                                ))
                            }
                        })
                        .await
                }
            })
            .await;

        const DECLINED: &str = "did not accept the invitation";
        match results {
            [Ok(()), Ok(())] => None,
            [Err(failure), Ok(())] => Some(self.walkover(Side::A, DECLINED, &failure)),
            [Ok(()), Err(failure)] => Some(self.walkover(Side::B, DECLINED, &failure)),
            [Err(failure_a), Err(failure_b)] => {
                Some(self.double_forfeit("invitation not accepted", &failure_a, &failure_b))
            }
        }
    }

    async fn collect_choices(&self) -> [Result<ParityChoice, RetryFailure>; 2] {
        self.fan_out(|side| {
            let call = ChoiceCall {
                participant: Arc::clone(&self.participants[side.index()]),
                match_id: self.record.id().clone(),
                round: self.record.round(),
                side,
                opponent: self.record.participant(side.other()).clone(),
                timeout: self.config.choice_timeout,
                max_corrections: self.config.max_corrections,
            };
            let policy = self.choice_policy.clone();

            async move { policy.run(|attempt| call.attempt(attempt)).await }
        })
        .await
    }

    /// Verdict awarding the full win to the side opposite `absent`
    fn walkover(&self, absent: Side, what: &str, failure: &RetryFailure) -> Verdict {
        let present = absent.other();
        let mut points = self.config.scoring.for_winner(present);
        points[absent.index()] = FORFEIT_POINTS;
        log::warn!(
            "Match {}: {} {}: {}",
            self.record.id(),
            self.record.participant(absent),
            what,
            failure
        );
        Verdict {
            winner: Some(present),
            points,
            reason: format!(
                "technical loss: {} {} ({})",
                self.record.participant(absent),
                what,
                failure
            ),
        }
    }

    fn double_forfeit(
        &self,
        what: &str,
        failure_a: &RetryFailure,
        failure_b: &RetryFailure,
    ) -> Verdict {
        log::warn!(
            "Match {}: double forfeit, {} from either side",
            self.record.id(),
            what
        );
        Verdict {
            winner: None,
            points: [FORFEIT_POINTS; 2],
            reason: format!(
                "double forfeit: {} from either side ({}: {}; {}: {})",
                what,
                self.record.participant(Side::A),
                failure_a,
                self.record.participant(Side::B),
                failure_b
            ),
        }
    }

    fn technical_loss(
        &mut self,
        loser: Side,
        failure: &RetryFailure,
        choices: [Option<ParityChoice>; 2],
    ) {
        let verdict = self.walkover(loser, "gave no valid choice", failure);
        self.transition(Transition::TechnicalLoss { choices, verdict });
    }

    fn transition(&mut self, transition: Transition) {
        let name = transition.name();
        if let Err(e) = self.record.apply(transition) {
            log::error!("Match {}: {} rejected: {}", self.record.id(), name, e);
        }
    }

    /// Emit the completion event and notify both sides without waiting.
    fn finish(self) -> CompletedMatch {
        let event = self.record.into_completed();
        log::info!("Match {} completed: {}", event.match_id, event);

        for participant in self.participants {
            let result = event.clone();
            tokio::spawn(async move {
                if let Err(e) = participant.notify_result(&result).await {
                    log::warn!(
                        "Match {}: result notification to {} failed: {}",
                        result.match_id,
                        participant.id(),
                        e
                    );
                }
            });
        }

        event
    }
}
