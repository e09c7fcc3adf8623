//! Integration tests for knockout formats
//!
//! Single and double elimination brackets, and Swiss events with a top cut.

use std::collections::HashSet;
use tournament_engine::tournament::{
    Bracket, Format, Match, Tournament, TournamentConfig, TournamentError,
};

fn field(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("P{i}")).collect()
}

/// Lower seed number wins every match (names stay single digit)
fn favourite(m: &Match) -> String {
    let b = m.player_b.clone().unwrap_or_default();
    if m.player_a < b { m.player_a.clone() } else { b }
}

fn play_out(t: &mut Tournament) {
    while !t.is_completed() {
        let pending: Vec<Match> = t.pending_matches().into_iter().cloned().collect();
        assert!(!pending.is_empty(), "stalled in round {}", t.current_round());
        for m in pending {
            let winner = favourite(&m);
            t.report_match(m.round, m.match_num, &winner, 2, 0).unwrap();
        }
    }
}

fn decided(t: &Tournament) -> usize {
    t.all_matches().iter().filter(|m| !m.is_bye()).count()
}

fn unbeaten(t: &Tournament) -> Vec<String> {
    t.standings()
        .into_iter()
        .filter(|row| row.losses == 0)
        .map(|row| row.player)
        .collect()
}

#[test]
fn test_single_elimination_eight_players() {
    let mut t =
        Tournament::with_participants(TournamentConfig::single_elimination("Cup"), field(8))
            .unwrap();
    assert_eq!(t.num_rounds(), 3);
    t.start().unwrap();

    let round_one: Vec<(String, Option<String>)> = t
        .matches(Some(1))
        .into_iter()
        .map(|m| (m.player_a.clone(), m.player_b.clone()))
        .collect();
    assert_eq!(round_one.len(), 4);
    assert_eq!(round_one[0], ("P1".to_string(), Some("P2".to_string())));

    play_out(&mut t);

    assert_eq!(decided(&t), 7);
    assert_eq!(t.matches(Some(3)).len(), 1);
    assert_eq!(t.winner(), Some("P1"));
    assert_eq!(unbeaten(&t), vec!["P1".to_string()]);
    assert!(t.standings().iter().all(|row| row.losses <= 1));
}

#[test]
fn test_single_elimination_with_byes() {
    let mut t =
        Tournament::with_participants(TournamentConfig::single_elimination("Odd"), field(5))
            .unwrap();
    assert_eq!(t.num_rounds(), 3);
    t.start().unwrap();

    let bye = t.matches(Some(1)).into_iter().find(|m| m.is_bye()).cloned();
    assert_eq!(bye.map(|m| m.player_a), Some("P5".to_string()));

    play_out(&mut t);

    // One elimination per decided match
    assert_eq!(decided(&t), 4);
    assert_eq!(t.current_round(), 3);
    assert_eq!(t.winner(), Some("P1"));
    assert_eq!(unbeaten(&t).len(), 1);
}

#[test]
fn test_knockout_rejects_draws() {
    let mut t =
        Tournament::with_participants(TournamentConfig::single_elimination("No draws"), field(4))
            .unwrap();
    t.start().unwrap();

    let err = t.report_draw(1, 0, 1, 1).unwrap_err();
    assert!(matches!(err, TournamentError::DrawNotAllowed { round: 1 }));
    assert_eq!(t.pending_matches().len(), 2);
}

#[test]
fn test_eliminated_player_is_not_paired_again() {
    let mut t =
        Tournament::with_participants(TournamentConfig::single_elimination("Out"), field(4))
            .unwrap();
    t.start().unwrap();
    t.report_match(1, 0, "P2", 1, 2).unwrap();
    t.report_match(1, 1, "P3", 2, 0).unwrap();

    let final_match = t.matches(Some(2));
    assert_eq!(final_match.len(), 1);
    assert!(final_match[0].involves("P2") && final_match[0].involves("P3"));
    assert!(!final_match[0].involves("P1"));
}

#[test]
fn test_double_elimination_losers_bracket() {
    let mut t =
        Tournament::with_participants(TournamentConfig::double_elimination("Double"), field(8))
            .unwrap();
    t.start().unwrap();
    let round_one_losers: HashSet<String> = ["P2", "P4", "P6", "P8"]
        .into_iter()
        .map(String::from)
        .collect();

    for m in t.pending_matches().into_iter().cloned().collect::<Vec<_>>() {
        t.report_match(1, m.match_num, &favourite(&m), 2, 0).unwrap();
    }

    let round_two = t.matches(Some(2));
    let losers: Vec<&Match> = round_two
        .iter()
        .copied()
        .filter(|m| m.bracket == Bracket::Losers)
        .collect();
    assert_eq!(losers.len(), 2);
    for m in &losers {
        assert!(round_one_losers.contains(&m.player_a));
        assert!(round_one_losers.contains(m.player_b.as_ref().unwrap()));
    }
    // Losers bracket numbering continues after the main bracket
    assert_eq!(losers[0].match_num, 2);

    for m in t.pending_matches().into_iter().cloned().collect::<Vec<_>>() {
        t.report_match(2, m.match_num, &favourite(&m), 2, 0).unwrap();
    }
    let round_two_main_losers: Vec<String> = t
        .matches(Some(2))
        .into_iter()
        .filter(|m| m.bracket == Bracket::Main)
        .filter_map(|m| m.loser().map(str::to_string))
        .collect();
    assert_eq!(round_two_main_losers, vec!["P3", "P7"]);

    // Round 3: only the round 2 main bracket losers drop down
    let round_three_losers: Vec<(String, Option<String>)> = t
        .matches(Some(3))
        .into_iter()
        .filter(|m| m.bracket == Bracket::Losers)
        .map(|m| (m.player_a.clone(), m.player_b.clone()))
        .collect();
    assert_eq!(
        round_three_losers,
        vec![("P3".to_string(), Some("P7".to_string()))]
    );
    assert!(
        t.matches(Some(3))
            .iter()
            .all(|m| !m.involves("P2") && !m.involves("P6"))
    );

    play_out(&mut t);
    assert_eq!(t.winner(), Some("P1"));
}

#[test]
fn test_hybrid_top_cut_seeding() {
    let mut t = Tournament::with_participants(TournamentConfig::hybrid("Cut", false, 4), field(8))
        .unwrap();
    assert_eq!(t.format(), Format::HybridSwissSe);
    t.start().unwrap();
    // Three Swiss rounds and two knockout rounds
    assert_eq!(t.num_rounds(), 5);
    assert_eq!(t.top_cut(), Some(4));

    while t.current_round() <= 3 {
        for m in t.pending_matches().into_iter().cloned().collect::<Vec<_>>() {
            t.report_match(m.round, m.match_num, &favourite(&m), 2, 1).unwrap();
        }
    }

    let top: Vec<String> = t
        .standings()
        .into_iter()
        .take(4)
        .map(|row| row.player)
        .collect();
    let cut = t.matches(Some(4));
    assert_eq!(cut.len(), 2);
    assert_eq!(cut[0].player_a, top[0]);
    assert_eq!(cut[0].player_b.as_deref(), Some(top[3].as_str()));
    assert_eq!(cut[1].player_a, top[1]);
    assert_eq!(cut[1].player_b.as_deref(), Some(top[2].as_str()));

    // No draws once the cut starts
    let err = t.report_draw(4, 0, 1, 1).unwrap_err();
    assert!(matches!(err, TournamentError::DrawNotAllowed { .. }));

    play_out(&mut t);
    assert_eq!(t.winner(), Some("P1"));
    assert_eq!(t.matches(Some(5)).len(), 1);
}

#[test]
fn test_hybrid_swiss_rounds_allow_draws() {
    let mut t =
        Tournament::with_participants(TournamentConfig::hybrid("Draws", true, 4), field(8))
            .unwrap();
    t.start().unwrap();
    t.report_draw(1, 0, 1, 1).unwrap();
    assert_eq!(t.standing("P1").unwrap().points, 0.5);
}

#[test]
fn test_hybrid_double_elimination_completes() {
    let mut t = Tournament::with_participants(TournamentConfig::hybrid("Double cut", true, 4), field(8))
        .unwrap();
    t.start().unwrap();
    play_out(&mut t);

    assert!(t.is_completed());
    assert_eq!(t.winner(), Some("P1"));
    let losers_bracket = t
        .all_matches()
        .iter()
        .filter(|m| m.bracket == Bracket::Losers)
        .count();
    assert_eq!(losers_bracket, 1);
}

#[test]
fn test_knockout_without_byes_requires_power_of_two() {
    let mut t = Tournament::with_participants(
        TournamentConfig::single_elimination("Strict").without_byes(),
        field(6),
    )
    .unwrap();
    assert!(matches!(t.start(), Err(TournamentError::InvalidConfig(_))));
    assert!(!t.is_started());
}
