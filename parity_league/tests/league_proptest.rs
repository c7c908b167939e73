/// Property-based tests for scheduling, evaluation and standings
///
/// These tests check the invariants that must hold for any roster size,
/// any pair of choices and any sequence of results.
use chrono::Utc;
use parity_league::{
    CompletedMatch, MatchStatus, ParityChoice, ParticipantId, Scoring, Side, Standings, evaluate,
    round_robin,
};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn choice_strategy() -> impl Strategy<Value = ParityChoice> {
    prop_oneof![Just(ParityChoice::Even), Just(ParityChoice::Odd)]
}

fn roster(n: usize) -> Vec<ParticipantId> {
    (0..n).map(|i| ParticipantId::from(format!("P{i:02}"))).collect()
}

proptest! {
    #[test]
    fn test_schedule_covers_every_pair_once(n in 2usize..=24) {
        let ids = roster(n);
        let schedule = round_robin(&ids).unwrap();

        prop_assert_eq!(schedule.total_matches(), n * (n - 1) / 2);
        let expected_rounds = if n % 2 == 0 { n - 1 } else { n };
        prop_assert_eq!(schedule.rounds.len(), expected_rounds);

        let mut pairs = HashSet::new();
        for fixture in schedule.fixtures() {
            let key = if fixture.side_a < fixture.side_b {
                (fixture.side_a.clone(), fixture.side_b.clone())
            } else {
                (fixture.side_b.clone(), fixture.side_a.clone())
            };
            prop_assert!(pairs.insert(key));
        }
    }

    #[test]
    fn test_schedule_rounds_are_disjoint(n in 2usize..=24) {
        let schedule = round_robin(&roster(n)).unwrap();
        let mut byes: HashMap<ParticipantId, usize> = HashMap::new();

        for round in &schedule.rounds {
            let mut seen = HashSet::new();
            for fixture in &round.fixtures {
                prop_assert!(seen.insert(fixture.side_a.clone()));
                prop_assert!(seen.insert(fixture.side_b.clone()));
            }
            if let Some(bye) = &round.bye {
                prop_assert!(!seen.contains(bye));
                *byes.entry(bye.clone()).or_default() += 1;
            }
        }

        if n % 2 == 1 {
            prop_assert_eq!(byes.len(), n);
            prop_assert!(byes.values().all(|&count| count == 1));
        } else {
            prop_assert!(byes.is_empty());
        }
    }

    #[test]
    fn test_evaluate_follows_parity(a in choice_strategy(), b in choice_strategy(), drawn in 1u32..=10) {
        let eval = evaluate(a, b, drawn, &Scoring::default());
        prop_assert!(eval.reason.contains(&drawn.to_string()));

        if a == b {
            prop_assert_eq!(eval.winner, None);
            prop_assert_eq!(eval.points, [1, 1]);
        } else {
            let winner = eval.winner.unwrap();
            let chosen = if winner == Side::A { a } else { b };
            prop_assert_eq!(chosen, ParityChoice::of(drawn));
            prop_assert_eq!(eval.points[winner.index()], 3);
            prop_assert_eq!(eval.points[winner.other().index()], 0);
        }
    }

    #[test]
    fn test_standings_points_conserved(
        n in 2usize..=8,
        outcomes in prop::collection::vec(0u8..3, 28),
    ) {
        let ids = roster(n);
        let schedule = round_robin(&ids).unwrap();
        let mut standings = Standings::new(&ids);
        let mut expected_total = 0;

        for (fixture, outcome) in schedule.fixtures().zip(outcomes.iter()) {
            let (winner, points) = match outcome {
                0 => (Some(fixture.side_a.clone()), (3, 0)),
                1 => (Some(fixture.side_b.clone()), (0, 3)),
                _ => (None, (1, 1)),
            };
            expected_total += points.0 + points.1;
            let event = CompletedMatch {
                match_id: fixture.match_id.clone(),
                round: fixture.round,
                side_a: fixture.side_a.clone(),
                side_b: fixture.side_b.clone(),
                status: MatchStatus::Finished,
                winner,
                reason: String::new(),
                choice_a: None,
                choice_b: None,
                drawn: None,
                points_a: points.0,
                points_b: points.1,
                finished_at: Utc::now(),
            };
            standings.apply(&event).unwrap();
            prop_assert!(standings.apply(&event).is_err());
        }

        prop_assert_eq!(standings.total_points(), expected_total);

        let ranking = standings.ranking();
        prop_assert_eq!(ranking.len(), n);
        for pair in ranking.windows(2) {
            prop_assert!(pair[0].points >= pair[1].points);
        }
        for (idx, entry) in ranking.iter().enumerate() {
            prop_assert_eq!(entry.rank, idx + 1);
        }
    }
}
