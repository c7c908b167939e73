//! Circle-method round robin.

use std::collections::HashSet;

use super::{
    ScheduleError,
    models::{Fixture, Round, Schedule, match_id},
};
use crate::game::ParticipantId;

/// Generate a round-robin schedule for `roster`.
///
/// Every unordered pair meets exactly once. With an odd roster a placeholder
/// is appended, and whoever is paired with it sits the round out. The first
/// entry stays fixed while the rest rotate one position per round, so the
/// same input order always yields the same schedule.
///
/// # Errors
///
/// * `ScheduleError::NotEnoughParticipants` - fewer than two entries
/// * `ScheduleError::DuplicateParticipant` - an identifier appears twice
pub fn round_robin(roster: &[ParticipantId]) -> Result<Schedule, ScheduleError> {
    if roster.len() < 2 {
        return Err(ScheduleError::NotEnoughParticipants(roster.len()));
    }

    let mut seen = HashSet::with_capacity(roster.len());
    for participant in roster {
        if !seen.insert(participant) {
            return Err(ScheduleError::DuplicateParticipant(participant.clone()));
        }
    }

    // `None` is the bye placeholder.
    let mut slots: Vec<Option<&ParticipantId>> = roster.iter().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let size = slots.len();
    let mut rounds = Vec::with_capacity(size - 1);

    for round_idx in 0..size - 1 {
        let number = round_idx as u32 + 1;
        let mut fixtures = Vec::with_capacity(size / 2);
        let mut bye = None;

        for i in 0..size / 2 {
            match (slots[i], slots[size - 1 - i]) {
                (Some(a), Some(b)) => fixtures.push(Fixture {
                    match_id: match_id(number, fixtures.len() + 1),
                    round: number,
                    side_a: a.clone(),
                    side_b: b.clone(),
                }),
                (Some(resting), None) | (None, Some(resting)) => bye = Some(resting.clone()),
                (None, None) => {}
            }
        }

        rounds.push(Round {
            number,
            fixtures,
            bye,
        });

        slots[1..].rotate_right(1);
    }

    log::debug!(
        "Generated round robin for {} participants: {} rounds",
        roster.len(),
        rounds.len()
    );

    Ok(Schedule { rounds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn roster(n: usize) -> Vec<ParticipantId> {
        (1..=n).map(|i| ParticipantId::new(&format!("P{i:02}"))).collect()
    }

    fn pair(fixture: &Fixture) -> (ParticipantId, ParticipantId) {
        if fixture.side_a < fixture.side_b {
            (fixture.side_a.clone(), fixture.side_b.clone())
        } else {
            (fixture.side_b.clone(), fixture.side_a.clone())
        }
    }

    #[test]
    fn test_four_participants_three_rounds() {
        let schedule = round_robin(&roster(4)).unwrap();
        assert_eq!(schedule.rounds.len(), 3);
        for round in &schedule.rounds {
            assert_eq!(round.fixtures.len(), 2);
            assert!(round.bye.is_none());
        }
        assert_eq!(schedule.total_matches(), 6);
    }

    #[test]
    fn test_circle_method_pairings() {
        let ids: Vec<ParticipantId> = ["A", "B", "C", "D"].into_iter().map(Into::into).collect();
        let schedule = round_robin(&ids).unwrap();

        let names = |round: &Round| -> Vec<(String, String)> {
            round
                .fixtures
                .iter()
                .map(|f| (f.side_a.to_string(), f.side_b.to_string()))
                .collect()
        };

        let s = |a: &str, b: &str| (a.to_string(), b.to_string());
        assert_eq!(names(&schedule.rounds[0]), vec![s("A", "D"), s("B", "C")]);
        assert_eq!(names(&schedule.rounds[1]), vec![s("A", "C"), s("D", "B")]);
        assert_eq!(names(&schedule.rounds[2]), vec![s("A", "B"), s("C", "D")]);
    }

    #[test]
    fn test_every_pair_once() {
        for n in 2..=11 {
            let schedule = round_robin(&roster(n)).unwrap();
            let mut pairs = HashSet::new();
            for fixture in schedule.fixtures() {
                assert!(pairs.insert(pair(fixture)), "pair repeated for n={n}");
            }
            assert_eq!(pairs.len(), n * (n - 1) / 2);
        }
    }

    #[test]
    fn test_participant_at_most_once_per_round() {
        let schedule = round_robin(&roster(7)).unwrap();
        for round in &schedule.rounds {
            let mut seen = HashSet::new();
            for fixture in &round.fixtures {
                assert!(seen.insert(fixture.side_a.clone()));
                assert!(seen.insert(fixture.side_b.clone()));
            }
            if let Some(bye) = &round.bye {
                assert!(!seen.contains(bye));
            }
        }
    }

    #[test]
    fn test_odd_roster_one_bye_each() {
        let ids = roster(5);
        let schedule = round_robin(&ids).unwrap();
        assert_eq!(schedule.rounds.len(), 5);

        let mut byes: HashMap<ParticipantId, usize> = HashMap::new();
        for round in &schedule.rounds {
            assert_eq!(round.fixtures.len(), 2);
            *byes.entry(round.bye.clone().unwrap()).or_default() += 1;
        }
        assert_eq!(byes.len(), 5);
        assert!(byes.values().all(|&count| count == 1));
    }

    #[test]
    fn test_match_ids_are_sequential() {
        let schedule = round_robin(&roster(4)).unwrap();
        let ids: Vec<&str> = schedule.fixtures().map(|f| f.match_id.as_str()).collect();
        assert_eq!(ids, vec!["R1M1", "R1M2", "R2M1", "R2M2", "R3M1", "R3M2"]);
    }

    #[test]
    fn test_deterministic() {
        let ids = roster(6);
        assert_eq!(round_robin(&ids).unwrap(), round_robin(&ids).unwrap());
    }

    #[test]
    fn test_two_participants() {
        let schedule = round_robin(&roster(2)).unwrap();
        assert_eq!(schedule.rounds.len(), 1);
        assert_eq!(schedule.total_matches(), 1);
    }

    #[test]
    fn test_rejects_small_roster() {
        assert_eq!(
            round_robin(&roster(1)),
            Err(ScheduleError::NotEnoughParticipants(1))
        );
        assert_eq!(round_robin(&[]), Err(ScheduleError::NotEnoughParticipants(0)));
    }

    #[test]
    fn test_rejects_duplicates() {
        let ids: Vec<ParticipantId> = ["A", "B", "A"].into_iter().map(Into::into).collect();
        assert_eq!(
            round_robin(&ids),
            Err(ScheduleError::DuplicateParticipant("A".into()))
        );
    }
}
