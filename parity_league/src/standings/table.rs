//! Ranked standings table.

use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    fmt::Write,
};

use super::errors::{StandingsError, StandingsResult};
use crate::{
    game::ParticipantId,
    orchestrator::{CompletedMatch, Outcome},
    schedule::MatchId,
};

/// One participant's line in the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsEntry {
    /// 1-based position after the latest recompute
    pub rank: usize,
    pub participant: ParticipantId,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub points: u32,
}

impl StandingsEntry {
    fn new(participant: ParticipantId) -> Self {
        Self {
            rank: 0,
            participant,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            points: 0,
        }
    }

    /// Fraction of played matches won, 0.0 before the first match
    pub fn win_percentage(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.played)
        }
    }

    /// Compare win percentages exactly, without floating point
    fn cmp_win_rate(&self, other: &Self) -> Ordering {
        let lhs = u64::from(self.wins) * u64::from(other.played.max(1));
        let rhs = u64::from(other.wins) * u64::from(self.played.max(1));
        lhs.cmp(&rhs)
    }
}

/// Aggregated league table.
///
/// Events are applied one at a time and the ranking is recomputed after
/// every event, so [`Standings::ranking`] never reflects a partial update.
#[derive(Debug, Clone, Default)]
pub struct Standings {
    entries: HashMap<ParticipantId, StandingsEntry>,
    applied: HashSet<MatchId>,
    /// Points each side earned in their meetings, keyed by the ordered pair
    head_to_head: HashMap<(ParticipantId, ParticipantId), (u32, u32)>,
    ranking: Vec<StandingsEntry>,
}

impl Standings {
    /// Create an empty table for `roster`
    pub fn new(roster: &[ParticipantId]) -> Self {
        let mut standings = Self {
            entries: roster
                .iter()
                .map(|id| (id.clone(), StandingsEntry::new(id.clone())))
                .collect(),
            ..Self::default()
        };
        standings.recompute();
        standings
    }

    /// Count one completed match.
    ///
    /// # Arguments
    ///
    /// * `event` - Completed match, finished or aborted
    ///
    /// # Returns
    ///
    /// * `StandingsResult<()>` - Error if the match was already counted or
    ///   names a participant outside the roster; the table is unchanged then
    pub fn apply(&mut self, event: &CompletedMatch) -> StandingsResult<()> {
        if self.applied.contains(&event.match_id) {
            log::warn!("Ignoring duplicate result for match {}", event.match_id);
            return Err(StandingsError::DuplicateResult(event.match_id.clone()));
        }

        for id in [&event.side_a, &event.side_b] {
            if !self.entries.contains_key(id) {
                log::warn!("Match {} names unknown participant {}", event.match_id, id);
                return Err(StandingsError::UnknownParticipant(id.clone()));
            }
        }

        for id in [&event.side_a, &event.side_b] {
            let (Some(outcome), Some(points)) = (event.outcome_for(id), event.points_for(id)) else {
                continue;
            };
            if let Some(entry) = self.entries.get_mut(id) {
                entry.played += 1;
                entry.points += points;
                match outcome {
                    Outcome::Win => entry.wins += 1,
                    Outcome::Draw => entry.draws += 1,
                    Outcome::Loss => entry.losses += 1,
                }
            }
        }

        let (key, earned) = if event.side_a <= event.side_b {
            (
                (event.side_a.clone(), event.side_b.clone()),
                (event.points_a, event.points_b),
            )
        } else {
            (
                (event.side_b.clone(), event.side_a.clone()),
                (event.points_b, event.points_a),
            )
        };
        let record = self.head_to_head.entry(key).or_default();
        record.0 += earned.0;
        record.1 += earned.1;

        self.applied.insert(event.match_id.clone());
        self.recompute();
        log::debug!("Applied result of match {}", event.match_id);
        Ok(())
    }

    /// Ranked entries, best first
    pub fn ranking(&self) -> &[StandingsEntry] {
        &self.ranking
    }

    pub fn entry(&self, participant: &ParticipantId) -> Option<&StandingsEntry> {
        self.entries.get(participant)
    }

    /// Whether the result of `match_id` has been counted
    pub fn is_applied(&self, match_id: &str) -> bool {
        self.applied.contains(match_id)
    }

    pub fn matches_applied(&self) -> usize {
        self.applied.len()
    }

    /// Sum of all points awarded so far
    pub fn total_points(&self) -> u32 {
        self.entries.values().map(|entry| entry.points).sum()
    }

    /// Points `a` and `b` earned against each other, if they have met
    pub fn head_to_head(&self, a: &ParticipantId, b: &ParticipantId) -> Option<(u32, u32)> {
        if a <= b {
            self.head_to_head.get(&(a.clone(), b.clone())).copied()
        } else {
            self.head_to_head
                .get(&(b.clone(), a.clone()))
                .map(|&(b_points, a_points)| (a_points, b_points))
        }
    }

    /// Render the ranking as a fixed-width text table
    pub fn render_table(&self) -> String {
        let width = self
            .ranking
            .iter()
            .map(|entry| entry.participant.as_str().len())
            .max()
            .unwrap_or(0)
            .max("Participant".len());

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>4}  {:<width$}  {:>3}  {:>3}  {:>3}  {:>3}  {:>4}",
            "Rank", "Participant", "P", "W", "D", "L", "Pts"
        );
        for entry in &self.ranking {
            let _ = writeln!(
                out,
                "{:>4}  {:<width$}  {:>3}  {:>3}  {:>3}  {:>3}  {:>4}",
                entry.rank,
                entry.participant.as_str(),
                entry.played,
                entry.wins,
                entry.draws,
                entry.losses,
                entry.points
            );
        }
        out
    }

    fn recompute(&mut self) {
        let mut tied: HashMap<u32, usize> = HashMap::new();
        for entry in self.entries.values() {
            *tied.entry(entry.points).or_default() += 1;
        }

        let mut ranking: Vec<StandingsEntry> = self.entries.values().cloned().collect();
        ranking.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| {
                    // head-to-head only separates a two-way tie
                    if tied.get(&a.points) == Some(&2) {
                        self.head_to_head(&a.participant, &b.participant)
                            .map_or(Ordering::Equal, |(pa, pb)| pb.cmp(&pa))
                    } else {
                        Ordering::Equal
                    }
                })
                .then_with(|| b.cmp_win_rate(a))
                .then_with(|| b.wins.cmp(&a.wins))
                .then_with(|| a.draws.cmp(&b.draws))
                .then_with(|| a.participant.cmp(&b.participant))
        });

        for (idx, entry) in ranking.iter_mut().enumerate() {
            entry.rank = idx + 1;
            if let Some(stored) = self.entries.get_mut(&entry.participant) {
                stored.rank = entry.rank;
            }
        }
        self.ranking = ranking;
    }
}
