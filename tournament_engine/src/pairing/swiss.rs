//! Swiss system pairing.
//!
//! Round one folds the seeded field (top half against bottom half). Later rounds
//! order players by score and pair each one with the first opponent below them
//! they have not met yet, backtracking when a greedy choice would leave the rest
//! of the pool with only rematches. A rematch is accepted only when no
//! rematch-free assignment exists (or the search budget runs out).

use log::{debug, warn};

use super::{PairingHistory, PairingStrategy, RoundContext, make_match};
use crate::tournament::models::{Bracket, Match};

/// Search steps allowed before falling back to greedy pairing
const SEARCH_BUDGET: usize = 200_000;

/// Swiss pairing strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct SwissPairing;

impl PairingStrategy for SwissPairing {
    fn pair_round(&self, ctx: &RoundContext<'_>, history: &mut PairingHistory) -> Vec<Match> {
        if ctx.round == 1 {
            let players = ctx.active_by_seed();
            fold_pairing(ctx, history, &players)
        } else {
            let players = ctx.active_by_standing();
            score_group_pairing(ctx, history, &players)
        }
    }
}

/// top[i] vs bottom[i]; an odd player out (the lowest seed) gets the bye
fn fold_pairing(
    ctx: &RoundContext<'_>,
    history: &mut PairingHistory,
    players: &[&str],
) -> Vec<Match> {
    let half = players.len() / 2;
    let mut matches: Vec<Match> = (0..half)
        .map(|i| {
            make_match(
                ctx,
                history,
                i,
                players[i],
                Some(players[half + i]),
                Bracket::Main,
            )
        })
        .collect();

    if players.len() % 2 == 1 {
        let last = players[players.len() - 1];
        matches.push(make_match(ctx, history, matches.len(), last, None, Bracket::Main));
    }

    matches
}

/// Pair `players` (already sorted by standing) avoiding rematches where possible
fn score_group_pairing<'a>(
    ctx: &RoundContext<'_>,
    history: &mut PairingHistory,
    players: &[&'a str],
) -> Vec<Match> {
    let mut budget = SEARCH_BUDGET;

    let plan = if players.len() % 2 == 0 {
        rematch_free(players, history, &mut budget).map(|pairs| (resolve(players, &pairs), None))
    } else {
        bye_candidates(ctx, players).into_iter().find_map(|bye| {
            let rest: Vec<&str> = players
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != bye)
                .map(|(_, p)| *p)
                .collect();
            rematch_free(&rest, history, &mut budget)
                .map(|pairs| (resolve(&rest, &pairs), Some(players[bye])))
        })
    };

    let (pairs, bye) = match plan {
        Some(plan) => plan,
        None => {
            warn!(
                "round {}: no rematch-free pairing exists for {} players, accepting rematches",
                ctx.round,
                players.len()
            );
            greedy(players, history)
        }
    };

    let mut matches: Vec<Match> = pairs
        .iter()
        .enumerate()
        .map(|(i, &(a, b))| make_match(ctx, history, i, a, Some(b), Bracket::Main))
        .collect();
    if let Some(bye) = bye {
        matches.push(make_match(ctx, history, matches.len(), bye, None, Bracket::Main));
    }

    debug!(
        "round {}: paired {} matches{}",
        ctx.round,
        pairs.len(),
        if bye.is_some() { " plus a bye" } else { "" }
    );
    matches
}

fn resolve<'a>(players: &[&'a str], pairs: &[(usize, usize)]) -> Vec<(&'a str, &'a str)> {
    pairs.iter().map(|&(a, b)| (players[a], players[b])).collect()
}

/// Bye candidates, lowest standing first among those with the fewest byes
fn bye_candidates(ctx: &RoundContext<'_>, players: &[&str]) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..players.len()).rev().collect();
    candidates.sort_by_key(|&i| ctx.bye_count(players[i]));
    candidates
}

/// Depth-first search for a perfect matching without rematches. Candidates are
/// tried in list order, so the first solution found is the greedy one whenever
/// greedy succeeds.
fn rematch_free(
    players: &[&str],
    history: &PairingHistory,
    budget: &mut usize,
) -> Option<Vec<(usize, usize)>> {
    let mut used = vec![false; players.len()];
    let mut pairs = Vec::with_capacity(players.len() / 2);
    if search(players, history, &mut used, &mut pairs, budget) {
        Some(pairs)
    } else {
        None
    }
}

fn search(
    players: &[&str],
    history: &PairingHistory,
    used: &mut [bool],
    pairs: &mut Vec<(usize, usize)>,
    budget: &mut usize,
) -> bool {
    let Some(first) = used.iter().position(|u| !u) else {
        return true;
    };
    used[first] = true;

    for j in first + 1..players.len() {
        if used[j] || history.has_played(players[first], players[j]) {
            continue;
        }
        if *budget == 0 {
            break;
        }
        *budget -= 1;

        used[j] = true;
        pairs.push((first, j));
        if search(players, history, used, pairs, budget) {
            return true;
        }
        pairs.pop();
        used[j] = false;
    }

    used[first] = false;
    false
}

/// First unplayed opponent below each player, else the first unused one. The
/// player left over gets the bye.
fn greedy<'a>(
    players: &[&'a str],
    history: &PairingHistory,
) -> (Vec<(&'a str, &'a str)>, Option<&'a str>) {
    let mut paired = vec![false; players.len()];
    let mut pairs = Vec::with_capacity(players.len() / 2);
    let mut bye = None;

    for i in 0..players.len() {
        if paired[i] {
            continue;
        }
        paired[i] = true;

        let fresh = (i + 1..players.len())
            .find(|&j| !paired[j] && !history.has_played(players[i], players[j]));
        let opponent = fresh.or_else(|| (i + 1..players.len()).find(|&j| !paired[j]));

        match opponent {
            Some(j) => {
                paired[j] = true;
                pairs.push((players[i], players[j]));
            }
            None => bye = Some(players[i]),
        }
    }

    (pairs, bye)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::StandingsTable;
    use crate::tournament::models::{MatchStatus, Participant};

    fn field(n: usize) -> Vec<Participant> {
        (1..=n).map(|i| Participant::new(format!("P{i}"), i as u32)).collect()
    }

    fn names(m: &Match) -> (String, Option<String>) {
        (m.player_a.clone(), m.player_b.clone())
    }

    #[test]
    fn test_round_one_folds_by_seed() {
        let participants = field(6);
        let standings = StandingsTable::from_participants(&participants);
        let ctx = RoundContext {
            tournament_id: "t",
            round: 1,
            participants: &participants,
            standings: &standings,
            matches: &[],
        };
        let mut history = PairingHistory::new();
        let matches = SwissPairing.pair_round(&ctx, &mut history);

        let pairs: Vec<_> = matches.iter().map(names).collect();
        assert_eq!(
            pairs,
            vec![
                ("P1".to_string(), Some("P4".to_string())),
                ("P2".to_string(), Some("P5".to_string())),
                ("P3".to_string(), Some("P6".to_string())),
            ]
        );
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_round_one_odd_gives_lowest_seed_the_bye() {
        let participants = field(3);
        let standings = StandingsTable::from_participants(&participants);
        let ctx = RoundContext {
            tournament_id: "t",
            round: 1,
            participants: &participants,
            standings: &standings,
            matches: &[],
        };
        let matches = SwissPairing.pair_round(&ctx, &mut PairingHistory::new());

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].player_a, "P3");
        assert_eq!(matches[1].status, MatchStatus::Bye);
    }

    #[test]
    fn test_backtracks_instead_of_rematch() {
        // Greedy would pair A-B, leaving C-D who already met.
        let players = ["A", "B", "C", "D"];
        let mut history = PairingHistory::new();
        history.record("C", "D");
        history.record("A", "D");

        let mut budget = SEARCH_BUDGET;
        let pairs = rematch_free(&players, &history, &mut budget).unwrap();
        assert_eq!(pairs, vec![(0, 2), (1, 3)]);
    }

    #[test]
    fn test_no_rematch_free_solution() {
        let players = ["A", "B"];
        let mut history = PairingHistory::new();
        history.record("A", "B");
        let mut budget = SEARCH_BUDGET;
        assert!(rematch_free(&players, &history, &mut budget).is_none());

        let (pairs, bye) = greedy(&players, &history);
        assert_eq!(pairs, vec![("A", "B")]);
        assert_eq!(bye, None);
    }

    #[test]
    fn test_bye_rotates_to_players_without_one() {
        let participants = field(3);
        let standings = StandingsTable::from_participants(&participants);
        let previous = vec![Match::bye("t", 1, 1, "P3".to_string(), Bracket::Main)];
        let ctx = RoundContext {
            tournament_id: "t",
            round: 2,
            participants: &participants,
            standings: &standings,
            matches: &previous,
        };
        let candidates = bye_candidates(&ctx, &["P1", "P2", "P3"]);
        assert_eq!(candidates, vec![1, 0, 2]);
    }
}
