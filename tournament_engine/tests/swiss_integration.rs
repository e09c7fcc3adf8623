//! Integration tests for Swiss tournaments
//!
//! These tests drive complete Swiss events through the public API: seeding,
//! byes, score-group pairing, draws and completion.

use std::collections::HashSet;
use tournament_engine::tournament::{
    MatchStatus, Metadata, Tournament, TournamentConfig, TournamentState,
};

fn pair_set(t: &Tournament, round: u32) -> HashSet<(String, String)> {
    t.matches(Some(round))
        .into_iter()
        .filter_map(|m| {
            let b = m.player_b.clone()?;
            let mut pair = [m.player_a.clone(), b];
            pair.sort();
            let [a, b] = pair;
            Some((a, b))
        })
        .collect()
}

fn pair(a: &str, b: &str) -> (String, String) {
    if a < b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[test]
fn test_four_player_two_round_scenario() {
    let mut t = Tournament::new(TournamentConfig::swiss("Scenario").with_rounds(2)).unwrap();
    // Round one folds top half against bottom half by seed, so P1-P2 and P3-P4
    // meet only because P2 is seeded third. See the natural seed case below.
    for (name, seed) in [("P1", 1), ("P2", 3), ("P3", 2), ("P4", 4)] {
        t.add_participant(name, seed, Metadata::new()).unwrap();
    }
    t.start().unwrap();

    // Round 1
    assert_eq!(t.matches(Some(1)).len(), 2);
    assert_eq!(
        pair_set(&t, 1),
        HashSet::from([pair("P1", "P2"), pair("P3", "P4")])
    );
    t.report_match(1, 0, "P1", 4, 2).unwrap();
    t.report_match(1, 1, "P3", 4, 0).unwrap();

    for name in ["P1", "P3"] {
        let s = t.standing(name).unwrap();
        assert_eq!((s.wins, s.losses, s.points), (1, 0, 1.0));
    }
    for name in ["P2", "P4"] {
        let s = t.standing(name).unwrap();
        assert_eq!((s.wins, s.losses, s.points), (0, 1, 0.0));
    }

    // Round 2: undefeated together, winless together, no repeats
    assert_eq!(t.current_round(), 2);
    let round_two = pair_set(&t, 2);
    assert_eq!(
        round_two,
        HashSet::from([pair("P1", "P3"), pair("P2", "P4")])
    );
    assert!(round_two.is_disjoint(&pair_set(&t, 1)));

    for m in t.matches(Some(2)).into_iter().cloned().collect::<Vec<_>>() {
        t.report_match(2, m.match_num, &m.player_a, 2, 1).unwrap();
    }
    assert!(t.is_completed());
    assert_eq!(t.state(), TournamentState::Completed);
}

#[test]
fn test_four_player_natural_seeds_fold() {
    let mut t = Tournament::with_participants(
        TournamentConfig::swiss("Natural").with_rounds(2),
        ["P1", "P2", "P3", "P4"],
    )
    .unwrap();
    t.start().unwrap();

    // Seeds 1..4: the fold meets 1 v 3 and 2 v 4
    assert_eq!(
        pair_set(&t, 1),
        HashSet::from([pair("P1", "P3"), pair("P2", "P4")])
    );
    t.report_match(1, 0, "P1", 4, 2).unwrap();
    t.report_match(1, 1, "P2", 4, 0).unwrap();

    // Winners meet winners without repeating round one
    assert_eq!(
        pair_set(&t, 2),
        HashSet::from([pair("P1", "P2"), pair("P3", "P4")])
    );
}

#[test]
fn test_three_player_bye() {
    let mut t =
        Tournament::with_participants(TournamentConfig::swiss("Trio"), ["A", "B", "C"]).unwrap();
    t.start().unwrap();

    assert_eq!(t.matches(Some(1)).len(), 2);

    let bye = t
        .matches(Some(1))
        .into_iter()
        .find(|m| m.is_bye())
        .cloned()
        .unwrap();
    assert_eq!(bye.status, MatchStatus::Bye);
    assert_eq!(bye.winner.as_deref(), Some(bye.player_a.as_str()));

    let receiver = t.standing(&bye.player_a).unwrap();
    assert_eq!((receiver.wins, receiver.losses, receiver.points), (1, 0, 1.0));

    // Only the real match needs a report
    assert_eq!(t.pending_matches().len(), 1);
    let err = t.report_match(1, bye.match_num, &bye.player_a, 1, 0).unwrap_err();
    assert!(err.to_string().contains("already completed"));
}

#[test]
fn test_bye_goes_to_a_new_player_each_round() {
    let mut t = Tournament::with_participants(
        TournamentConfig::swiss("Five").with_rounds(3),
        ["A", "B", "C", "D", "E"],
    )
    .unwrap();
    t.start().unwrap();

    while !t.is_completed() {
        let round = t.current_round();
        for m in t.pending_matches().into_iter().cloned().collect::<Vec<_>>() {
            t.report_match(round, m.match_num, &m.player_a, 2, 0).unwrap();
        }
    }

    let byes: Vec<&str> = t
        .all_matches()
        .iter()
        .filter(|m| m.is_bye())
        .map(|m| m.player_a.as_str())
        .collect();
    assert_eq!(byes.len(), 3);
    let distinct: HashSet<&str> = byes.iter().copied().collect();
    assert_eq!(distinct.len(), 3);
}

#[test]
fn test_no_rematches_in_eight_player_event() {
    let names: Vec<String> = (1..=8).map(|i| format!("Player {i}")).collect();
    let mut t = Tournament::with_participants(TournamentConfig::swiss("Eight"), names).unwrap();
    assert_eq!(t.num_rounds(), 3);
    t.start().unwrap();

    while !t.is_completed() {
        let round = t.current_round();
        for m in t.pending_matches().into_iter().cloned().collect::<Vec<_>>() {
            // Higher seed (lower name) wins
            let b = m.player_b.clone().unwrap();
            let winner = if m.player_a < b { m.player_a.clone() } else { b };
            t.report_match(round, m.match_num, &winner, 2, 1).unwrap();
        }
    }

    let mut seen = HashSet::new();
    for round in 1..=3 {
        for p in pair_set(&t, round) {
            assert!(seen.insert(p.clone()), "rematch: {p:?}");
        }
    }
    assert_eq!(seen.len(), 12);
    assert!(t.history().iter().all(|(_, &count)| count == 1));

    // Player 1 won every match
    assert_eq!(t.winner(), Some("Player 1"));
    let top = &t.standings()[0];
    assert_eq!((top.rank, top.wins), (1, 3));
}

#[test]
fn test_draws_and_withdrawals() {
    let mut t = Tournament::with_participants(
        TournamentConfig::swiss("Draws").with_rounds(2),
        ["A", "B", "C", "D"],
    )
    .unwrap();
    t.start().unwrap();

    t.report_draw(1, 0, 1, 1).unwrap();
    // Withdraw before the round closes so round 2 is paired without D
    t.remove_participant("D").unwrap();
    t.report_draw(1, 1, 0, 0).unwrap();

    assert!(t.standings().iter().all(|row| row.draws == 1 && row.losses == 0));
    assert_eq!(t.standing("D").unwrap().points, 0.5);

    let round_two = t.matches(Some(2));
    assert_eq!(round_two.len(), 2);
    assert!(round_two.iter().all(|m| !m.involves("D")));
    assert_eq!(round_two.iter().filter(|m| m.is_bye()).count(), 1);
}
