//! Single and double elimination brackets.
//!
//! Double elimination is a simplified model: each round, winners of the previous
//! main bracket round meet in the main bracket, while the losers of that same main
//! bracket round meet in the losers bracket. A losers bracket match is a player's
//! last one. There is no re-entry depth tracking and no bracket reset after a grand
//! final upset.

use log::debug;

use super::{PairingHistory, PairingStrategy, RoundContext, pair_sequential};
use crate::tournament::models::{Bracket, Match};

/// Single elimination strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleElimination;

impl PairingStrategy for SingleElimination {
    fn pair_round(&self, ctx: &RoundContext<'_>, history: &mut PairingHistory) -> Vec<Match> {
        if ctx.round == 1 {
            let seeds = ctx.active_by_seed();
            pair_sequential(ctx, history, &seeds, Bracket::Main, 0)
        } else {
            advance(ctx, history, false)
        }
    }
}

/// Double elimination strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleElimination;

impl PairingStrategy for DoubleElimination {
    fn pair_round(&self, ctx: &RoundContext<'_>, history: &mut PairingHistory) -> Vec<Match> {
        if ctx.round == 1 {
            let seeds = ctx.active_by_seed();
            pair_sequential(ctx, history, &seeds, Bracket::Main, 0)
        } else {
            advance(ctx, history, true)
        }
    }
}

/// Pair the round after `ctx.round - 1` of a knockout phase
pub(crate) fn advance(
    ctx: &RoundContext<'_>,
    history: &mut PairingHistory,
    double_elimination: bool,
) -> Vec<Match> {
    let previous = ctx.round - 1;

    let main_winners: Vec<&str> = ctx
        .round_matches(previous)
        .filter(|m| m.bracket == Bracket::Main)
        .filter_map(|m| m.winner.as_deref())
        .filter(|p| ctx.is_active(p))
        .collect();

    let mut matches = pair_sequential(ctx, history, &main_winners, Bracket::Main, 0);

    if double_elimination {
        // Only the previous main bracket round feeds the losers bracket
        let losers: Vec<&str> = ctx
            .round_matches(previous)
            .filter(|m| m.bracket == Bracket::Main)
            .filter_map(Match::loser)
            .filter(|p| ctx.is_active(p))
            .collect();

        let first_num = matches.len();
        matches.extend(pair_sequential(ctx, history, &losers, Bracket::Losers, first_num));
        debug!(
            "round {}: {} main bracket and {} losers bracket players",
            ctx.round,
            main_winners.len(),
            losers.len()
        );
    }

    matches
}

/// Reorder seeds so sequential pairing meets 1st v last, 2nd v second-to-last, ...
pub(crate) fn bracket_order<'a>(seeds: &[&'a str]) -> Vec<&'a str> {
    let mut ordered = Vec::with_capacity(seeds.len());
    let (mut lo, mut hi) = (0, seeds.len());
    while lo < hi {
        ordered.push(seeds[lo]);
        lo += 1;
        if lo < hi {
            hi -= 1;
            ordered.push(seeds[hi]);
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::StandingsTable;
    use crate::tournament::models::{MatchStatus, Participant};

    fn field(n: usize) -> Vec<Participant> {
        (1..=n).map(|i| Participant::new(format!("P{i}"), i as u32)).collect()
    }

    fn decide(m: &mut Match, winner: &str) {
        m.winner = Some(winner.to_string());
        m.status = MatchStatus::Completed;
    }

    #[test]
    fn test_first_round_pairs_adjacent_seeds() {
        let participants = field(5);
        let standings = StandingsTable::from_participants(&participants);
        let ctx = RoundContext {
            tournament_id: "t",
            round: 1,
            participants: &participants,
            standings: &standings,
            matches: &[],
        };
        let matches = SingleElimination.pair_round(&ctx, &mut PairingHistory::new());

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].player_a, "P1");
        assert_eq!(matches[0].player_b.as_deref(), Some("P2"));
        assert_eq!(matches[1].player_a, "P3");
        assert!(matches[2].is_bye());
        assert_eq!(matches[2].player_a, "P5");
    }

    #[test]
    fn test_winners_advance_in_order() {
        let participants = field(4);
        let standings = StandingsTable::from_participants(&participants);
        let mut history = PairingHistory::new();
        let mut round_one = {
            let ctx = RoundContext {
                tournament_id: "t",
                round: 1,
                participants: &participants,
                standings: &standings,
                matches: &[],
            };
            SingleElimination.pair_round(&ctx, &mut history)
        };
        decide(&mut round_one[0], "P2");
        decide(&mut round_one[1], "P3");

        let ctx = RoundContext {
            tournament_id: "t",
            round: 2,
            participants: &participants,
            standings: &standings,
            matches: &round_one,
        };
        let final_round = SingleElimination.pair_round(&ctx, &mut history);
        assert_eq!(final_round.len(), 1);
        assert_eq!(final_round[0].player_a, "P2");
        assert_eq!(final_round[0].player_b.as_deref(), Some("P3"));
    }

    #[test]
    fn test_double_elimination_drops_losers() {
        let participants = field(4);
        let standings = StandingsTable::from_participants(&participants);
        let mut history = PairingHistory::new();
        let mut round_one = {
            let ctx = RoundContext {
                tournament_id: "t",
                round: 1,
                participants: &participants,
                standings: &standings,
                matches: &[],
            };
            DoubleElimination.pair_round(&ctx, &mut history)
        };
        decide(&mut round_one[0], "P1");
        decide(&mut round_one[1], "P4");

        let ctx = RoundContext {
            tournament_id: "t",
            round: 2,
            participants: &participants,
            standings: &standings,
            matches: &round_one,
        };
        let round_two = DoubleElimination.pair_round(&ctx, &mut history);
        assert_eq!(round_two.len(), 2);
        assert_eq!(round_two[0].bracket, Bracket::Main);
        assert_eq!(round_two[0].player_a, "P1");
        assert_eq!(round_two[0].player_b.as_deref(), Some("P4"));
        assert_eq!(round_two[1].bracket, Bracket::Losers);
        assert_eq!(round_two[1].player_a, "P2");
        assert_eq!(round_two[1].player_b.as_deref(), Some("P3"));
        assert_eq!(round_two[1].match_num, 1);
    }

    #[test]
    fn test_inactive_winner_does_not_advance() {
        let mut participants = field(4);
        participants[0].active = false;
        let standings = StandingsTable::from_participants(&participants);
        let mut round_one = vec![
            Match::pending("t", 1, 0, "P1".into(), "P2".into(), Bracket::Main),
            Match::pending("t", 1, 1, "P3".into(), "P4".into(), Bracket::Main),
        ];
        decide(&mut round_one[0], "P1");
        decide(&mut round_one[1], "P3");

        let ctx = RoundContext {
            tournament_id: "t",
            round: 2,
            participants: &participants,
            standings: &standings,
            matches: &round_one,
        };
        let round_two = SingleElimination.pair_round(&ctx, &mut PairingHistory::new());
        assert_eq!(round_two.len(), 1);
        assert!(round_two[0].is_bye());
        assert_eq!(round_two[0].player_a, "P3");
    }

    #[test]
    fn test_losers_bracket_takes_only_latest_main_losers() {
        let participants = field(8);
        let standings = StandingsTable::from_participants(&participants);
        let mut round_two = vec![
            Match::pending("t", 2, 0, "P1".into(), "P3".into(), Bracket::Main),
            Match::pending("t", 2, 1, "P5".into(), "P7".into(), Bracket::Main),
            Match::pending("t", 2, 2, "P2".into(), "P4".into(), Bracket::Losers),
            Match::pending("t", 2, 3, "P6".into(), "P8".into(), Bracket::Losers),
        ];
        for (m, winner) in round_two.iter_mut().zip(["P1", "P5", "P2", "P6"]) {
            decide(m, winner);
        }

        let ctx = RoundContext {
            tournament_id: "t",
            round: 3,
            participants: &participants,
            standings: &standings,
            matches: &round_two,
        };
        let round_three = DoubleElimination.pair_round(&ctx, &mut PairingHistory::new());

        assert_eq!(round_three.len(), 2);
        assert_eq!(round_three[0].bracket, Bracket::Main);
        assert!(round_three[0].involves("P1") && round_three[0].involves("P5"));
        assert_eq!(round_three[1].bracket, Bracket::Losers);
        assert_eq!(round_three[1].player_a, "P3");
        assert_eq!(round_three[1].player_b.as_deref(), Some("P7"));
    }

    #[test]
    fn test_bracket_order() {
        assert_eq!(
            bracket_order(&["1", "2", "3", "4", "5", "6", "7", "8"]),
            vec!["1", "8", "2", "7", "3", "6", "4", "5"]
        );
        assert_eq!(bracket_order(&["1", "2"]), vec!["1", "2"]);
    }
}
