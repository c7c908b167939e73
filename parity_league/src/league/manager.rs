//! League runner driving a whole round-robin schedule.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use thiserror::Error;
use tokio::{sync::Semaphore, task::JoinSet};

use super::models::{LeagueReport, RoundSummary};
use crate::{
    config::LeagueConfig,
    game::{
        ParticipantId,
        draw::{DrawSource, SecureDraw},
    },
    orchestrator::{CompletedMatch, Match, MatchError, MatchOrchestrator},
    participant::Participant,
    retry::Sleeper,
    schedule::{RoundStatus, Schedule, ScheduleError, round_robin},
    sink::{MatchSink, SinkError},
    standings::{SharedStandings, StandingsError},
};

/// League errors
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("Invalid league configuration: {0}")]
    Config(String),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Standings error: {0}")]
    Standings(#[from] StandingsError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Match error: {0}")]
    Match(#[from] MatchError),

    #[error("Round {0} not found")]
    UnknownRound(u32),

    #[error("Round {round} not in correct state: expected pending, got {status}")]
    InvalidRoundState { round: u32, status: RoundStatus },

    #[error("No participant registered as {0}")]
    UnknownParticipant(ParticipantId),

    #[error("Match task failed: {0}")]
    TaskFailed(String),
}

pub type LeagueResult<T> = Result<T, LeagueError>;

/// Runs every round of a league in order.
///
/// Matches inside a round run concurrently, bounded by
/// `max_concurrent_matches`. Each completed match is applied to the shared
/// standings before the round is marked complete.
pub struct LeagueRunner {
    config: LeagueConfig,
    roster: Vec<ParticipantId>,
    participants: HashMap<ParticipantId, Arc<dyn Participant>>,
    schedule: Schedule,
    round_status: BTreeMap<u32, RoundStatus>,
    standings: SharedStandings,
    draw: Arc<dyn DrawSource>,
    sink: Option<Arc<dyn MatchSink>>,
    sleeper: Option<Arc<dyn Sleeper>>,
    events: Vec<CompletedMatch>,
}

impl LeagueRunner {
    /// Create a runner and schedule the league
    ///
    /// # Arguments
    ///
    /// * `config` - League configuration
    /// * `participants` - Roster in seeding order
    ///
    /// # Returns
    ///
    /// * `LeagueResult<LeagueRunner>` - Error on invalid configuration,
    ///   a roster below two, or duplicate identifiers
    pub fn new(
        config: LeagueConfig,
        participants: Vec<Arc<dyn Participant>>,
    ) -> LeagueResult<Self> {
        config.validate().map_err(LeagueError::Config)?;

        let roster: Vec<ParticipantId> = participants.iter().map(|p| p.id().clone()).collect();
        let schedule = round_robin(&roster)?;
        let round_status = schedule
            .rounds
            .iter()
            .map(|round| (round.number, RoundStatus::Pending))
            .collect();

        log::info!(
            "League created: {} participants, {} rounds, {} matches",
            roster.len(),
            schedule.rounds.len(),
            schedule.total_matches()
        );

        Ok(Self {
            config,
            standings: SharedStandings::for_roster(&roster),
            participants: participants
                .into_iter()
                .map(|p| (p.id().clone(), p))
                .collect(),
            roster,
            schedule,
            round_status,
            draw: Arc::new(SecureDraw),
            sink: None,
            sleeper: None,
            events: Vec::new(),
        })
    }

    pub fn with_draw_source(mut self, draw: Arc<dyn DrawSource>) -> Self {
        self.draw = draw;
        self
    }

    /// Forward every completed match to `sink` as well
    pub fn with_sink(mut self, sink: Arc<dyn MatchSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the timer used between choice retries
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = Some(sleeper);
        self
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn roster(&self) -> &[ParticipantId] {
        &self.roster
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn standings(&self) -> &SharedStandings {
        &self.standings
    }

    pub fn round_status(&self, round: u32) -> Option<RoundStatus> {
        self.round_status.get(&round).copied()
    }

    /// Completed matches so far, in schedule order per round
    pub fn events(&self) -> &[CompletedMatch] {
        &self.events
    }

    /// Next round still pending
    pub fn next_round(&self) -> Option<u32> {
        self.round_status
            .iter()
            .find(|(_, status)| **status == RoundStatus::Pending)
            .map(|(number, _)| *number)
    }

    /// Play every match of one round.
    ///
    /// Returns the round's completed matches in fixture order.
    pub async fn run_round(&mut self, number: u32) -> LeagueResult<Vec<CompletedMatch>> {
        let status = self
            .round_status(number)
            .ok_or(LeagueError::UnknownRound(number))?;
        if status != RoundStatus::Pending {
            return Err(LeagueError::InvalidRoundState {
                round: number,
                status,
            });
        }
        let round = self
            .schedule
            .round(number)
            .ok_or(LeagueError::UnknownRound(number))?;

        let mut orchestrators = Vec::with_capacity(round.fixtures.len());
        for fixture in &round.fixtures {
            let side_a = self.participant(&fixture.side_a)?;
            let side_b = self.participant(&fixture.side_b)?;
            let mut orchestrator = MatchOrchestrator::new(
                fixture,
                side_a,
                side_b,
                &self.config.match_config,
                Arc::clone(&self.draw),
            )?;
            if let Some(sleeper) = &self.sleeper {
                orchestrator = orchestrator.with_sleeper(Arc::clone(sleeper));
            }
            orchestrators.push(orchestrator);
        }

        if let Some(bye) = &round.bye {
            log::info!("Round {}: {} has a bye", number, bye);
        }
        log::info!(
            "Round {} starting: {} matches, at most {} at once",
            number,
            orchestrators.len(),
            self.config.max_concurrent_matches
        );
        self.round_status.insert(number, RoundStatus::InProgress);

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_matches));
        let mut tasks = JoinSet::new();
        let mut task_fixtures = HashMap::with_capacity(orchestrators.len());

        for (idx, orchestrator) in orchestrators.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let standings = self.standings.clone();
            let sink = self.sink.clone();

            let task = tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let event = orchestrator.run().await;
                let outcome = record_event(&standings, sink.as_deref(), &event).await;
                (idx, event, outcome)
            });
            task_fixtures.insert(task.id(), idx);
        }

        let mut completed = Vec::with_capacity(tasks.len());
        let mut first_error = None;
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, (idx, event, outcome))) => {
                    if let Err(e) = outcome {
                        log::error!("Match {}: {}", event.match_id, e);
                        first_error.get_or_insert(e);
                    }
                    completed.push((idx, event));
                }
                Err(e) => {
                    log::error!("Round {}: match task failed: {}", number, e);
                    first_error.get_or_insert(LeagueError::TaskFailed(e.to_string()));

                    // The match never reached a terminal state; record it as a
                    // double forfeit so the round still accounts for every fixture.
                    let Some(&idx) = task_fixtures.get(&e.id()) else {
                        continue;
                    };
                    let Some(fixture) = round.fixtures.get(idx) else {
                        continue;
                    };
                    let event = Match::new(fixture).into_completed();
                    if let Err(e) =
                        record_event(&self.standings, self.sink.as_deref(), &event).await
                    {
                        log::error!("Match {}: {}", event.match_id, e);
                    }
                    completed.push((idx, event));
                }
            }
        }

        completed.sort_by_key(|(idx, _)| *idx);
        let events: Vec<CompletedMatch> = completed.into_iter().map(|(_, event)| event).collect();
        self.events.extend(events.iter().cloned());
        self.round_status.insert(number, RoundStatus::Complete);

        log::info!("Round {} complete: {} matches", number, events.len());

        match first_error {
            Some(e) => Err(e),
            None => Ok(events),
        }
    }

    /// Play all pending rounds in order and return the report
    pub async fn run(&mut self) -> LeagueResult<LeagueReport> {
        while let Some(number) = self.next_round() {
            self.run_round(number).await?;
        }

        let report = self.report().await;
        if let Some(leader) = report.leader() {
            log::info!(
                "League complete: {} leads with {} points",
                leader.participant,
                leader.points
            );
        }
        Ok(report)
    }

    /// Snapshot of rounds, events and standings
    pub async fn report(&self) -> LeagueReport {
        let rounds = self
            .schedule
            .rounds
            .iter()
            .map(|round| RoundSummary {
                number: round.number,
                status: self
                    .round_status(round.number)
                    .unwrap_or(RoundStatus::Pending),
                matches: round.fixtures.len(),
                bye: round.bye.clone(),
            })
            .collect();

        LeagueReport {
            rounds,
            events: self.events.clone(),
            standings: self.standings.snapshot().await,
        }
    }

    fn participant(&self, id: &ParticipantId) -> LeagueResult<Arc<dyn Participant>> {
        self.participants
            .get(id)
            .cloned()
            .ok_or_else(|| LeagueError::UnknownParticipant(id.clone()))
    }
}

/// Apply one event to the standings, then forward it to the sink
async fn record_event(
    standings: &SharedStandings,
    sink: Option<&dyn MatchSink>,
    event: &CompletedMatch,
) -> LeagueResult<()> {
    let applied = standings.apply(event).await.map_err(LeagueError::from);
    let forwarded = match sink {
        Some(sink) => sink.accept(event).await.map_err(LeagueError::from),
        None => Ok(()),
    };
    applied.and(forwarded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::MatchConfig,
        game::{ParityChoice, draw::SequenceDraw},
        participant::local::LocalParticipant,
    };

    fn roster(n: usize) -> Vec<Arc<dyn Participant>> {
        (1..=n)
            .map(|i| {
                Arc::new(LocalParticipant::random(format!("P{i:02}"))) as Arc<dyn Participant>
            })
            .collect()
    }

    #[test]
    fn test_new_rejects_single_participant() {
        let err = LeagueRunner::new(LeagueConfig::default(), roster(1)).err();
        assert!(matches!(
            err,
            Some(LeagueError::Schedule(ScheduleError::NotEnoughParticipants(1)))
        ));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = LeagueConfig {
            max_concurrent_matches: 0,
            ..Default::default()
        };
        assert!(matches!(
            LeagueRunner::new(config, roster(4)),
            Err(LeagueError::Config(_))
        ));
    }

    #[test]
    fn test_all_rounds_start_pending() {
        let runner = LeagueRunner::new(LeagueConfig::default(), roster(4)).unwrap();
        assert_eq!(runner.schedule().rounds.len(), 3);
        for round in 1..=3 {
            assert_eq!(runner.round_status(round), Some(RoundStatus::Pending));
        }
        assert_eq!(runner.round_status(4), None);
        assert_eq!(runner.next_round(), Some(1));
    }

    #[tokio::test]
    async fn test_round_cannot_run_twice() {
        let mut runner = LeagueRunner::new(LeagueConfig::default(), roster(4))
            .unwrap()
            .with_draw_source(Arc::new(SequenceDraw::constant(2)));

        let events = runner.run_round(1).await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].match_id, "R1M1");
        assert_eq!(events[1].match_id, "R1M2");
        assert_eq!(runner.round_status(1), Some(RoundStatus::Complete));

        assert!(matches!(
            runner.run_round(1).await,
            Err(LeagueError::InvalidRoundState { round: 1, .. })
        ));
        assert!(matches!(
            runner.run_round(9).await,
            Err(LeagueError::UnknownRound(9))
        ));
    }

    #[tokio::test]
    async fn test_fixed_strategies_decide_standings() {
        let participants: Vec<Arc<dyn Participant>> = vec![
            Arc::new(LocalParticipant::fixed("EVEN", ParityChoice::Even)),
            Arc::new(LocalParticipant::fixed("ODD", ParityChoice::Odd)),
        ];
        let config = LeagueConfig {
            match_config: MatchConfig::default(),
            max_concurrent_matches: 1,
        };
        let mut runner = LeagueRunner::new(config, participants)
            .unwrap()
            .with_draw_source(Arc::new(SequenceDraw::constant(6)));

        let report = runner.run().await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.events.len(), 1);
        let leader = report.leader().unwrap();
        assert_eq!(leader.participant, ParticipantId::from("EVEN"));
        assert_eq!(leader.points, 3);
    }

    /// Draw source whose match task dies mid-match
    struct BrokenDraw;

    impl DrawSource for BrokenDraw {
        fn draw(&self, _max: u32) -> u32 {
            panic!("draw source unavailable");
        }
    }

    #[tokio::test]
    async fn test_failed_match_task_recorded_as_forfeit() {
        let mut runner = LeagueRunner::new(LeagueConfig::default(), roster(2))
            .unwrap()
            .with_draw_source(Arc::new(BrokenDraw));

        let result = runner.run_round(1).await;
        assert!(matches!(result, Err(LeagueError::TaskFailed(_))));
        assert_eq!(runner.round_status(1), Some(RoundStatus::Complete));

        let events = runner.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].match_id, "R1M1");
        assert!(events[0].is_double_forfeit());

        let standings = runner.standings().standings().await;
        assert_eq!(standings.matches_applied(), 1);
        assert_eq!(standings.entry(&"P01".into()).unwrap().losses, 1);
        assert_eq!(standings.entry(&"P02".into()).unwrap().played, 1);
    }

    #[test]
    fn test_new_rejects_oversized_concurrency() {
        let config = LeagueConfig {
            max_concurrent_matches: usize::MAX,
            ..Default::default()
        };
        assert!(matches!(
            LeagueRunner::new(config, roster(4)),
            Err(LeagueError::Config(_))
        ));
    }
}
