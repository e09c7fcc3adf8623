//! Tie-breaker computation and ranking.

use std::cmp::Ordering;

use super::table::StandingsTable;
use crate::tournament::models::{DRAW_POINTS, Match, MatchStatus, Standing, TieBreaker};

/// Recompute every tie-breaker, then assign ranks 1..N.
///
/// Only matches of rounds up to and including `round` count towards head-to-head.
pub fn finalize_round(
    table: &mut StandingsTable,
    matches: &[Match],
    round: u32,
    tie_breakers: &[TieBreaker],
) {
    compute_tiebreakers(table, matches, round);
    assign_ranks(table, tie_breakers);
}

/// Buchholz, opponent win % and head-to-head for every standing
pub fn compute_tiebreakers(table: &mut StandingsTable, matches: &[Match], round: u32) {
    let computed: Vec<(f64, f64)> = table
        .rows()
        .iter()
        .map(|standing| (buchholz(table, standing), opponent_win_pct(table, standing)))
        .collect();

    let head_to_head = head_to_head_scores(table, matches, round);

    for (idx, standing) in table.rows_mut().iter_mut().enumerate() {
        let (buchholz, owp) = computed[idx];
        standing.buchholz = buchholz;
        standing.opponent_win_pct = owp;
        standing.head_to_head = head_to_head[idx];
    }
}

/// Sum of the current points of every recorded opponent
pub fn buchholz(table: &StandingsTable, standing: &Standing) -> f64 {
    standing
        .opponents
        .iter()
        .filter_map(|opp| table.get(opp))
        .map(|opp| opp.points)
        .sum()
}

/// (opponent wins + half their draws) / opponent games played, 0.0 without opponents
pub fn opponent_win_pct(table: &StandingsTable, standing: &Standing) -> f64 {
    let (won, played) = standing
        .opponents
        .iter()
        .filter_map(|opp| table.get(opp))
        .fold((0.0, 0u32), |(won, played), opp| {
            (
                won + f64::from(opp.wins) + DRAW_POINTS * f64::from(opp.draws),
                played + opp.games_played(),
            )
        });

    if played == 0 {
        0.0
    } else {
        won / f64::from(played)
    }
}

fn head_to_head_scores(table: &StandingsTable, matches: &[Match], round: u32) -> Vec<f64> {
    let mut scores = vec![0.0; table.len()];

    for m in matches
        .iter()
        .filter(|m| m.round <= round && m.status == MatchStatus::Completed && !m.is_bye())
    {
        let Some(player_b) = m.player_b.as_deref() else {
            continue;
        };
        let (Some(a), Some(b)) = (table.position(&m.player_a), table.position(player_b)) else {
            continue;
        };
        let rows = table.rows();
        if rows[a].points.total_cmp(&rows[b].points) != Ordering::Equal {
            continue;
        }

        match m.winner.as_deref() {
            Some(winner) if winner == m.player_a => scores[a] += 1.0,
            Some(_) => scores[b] += 1.0,
            None => {
                scores[a] += DRAW_POINTS;
                scores[b] += DRAW_POINTS;
            }
        }
    }

    scores
}

fn tie_breaker_value(standing: &Standing, tie_breaker: TieBreaker) -> f64 {
    match tie_breaker {
        TieBreaker::Buchholz => standing.buchholz,
        TieBreaker::OpponentWinPct => standing.opponent_win_pct,
        TieBreaker::GameWinPct => standing.game_win_pct(),
        TieBreaker::HeadToHead => standing.head_to_head,
    }
}

/// Order two standings: points, then the configured tie-breakers, then game
/// differential, all descending.
pub fn compare(a: &Standing, b: &Standing, tie_breakers: &[TieBreaker]) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then_with(|| {
            tie_breakers
                .iter()
                .map(|&tb| tie_breaker_value(b, tb).total_cmp(&tie_breaker_value(a, tb)))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| b.game_differential().cmp(&a.game_differential()))
}

/// Indices into the table's rows, best standing first. Full ties keep
/// registration order.
pub fn sorted_order(table: &StandingsTable, tie_breakers: &[TieBreaker]) -> Vec<usize> {
    let rows = table.rows();
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| compare(&rows[a], &rows[b], tie_breakers));
    order
}

/// Assign ranks 1..N following [`sorted_order`]
pub fn assign_ranks(table: &mut StandingsTable, tie_breakers: &[TieBreaker]) {
    let order = sorted_order(table, tie_breakers);
    let rows = table.rows_mut();
    for (position, idx) in order.into_iter().enumerate() {
        rows[idx].rank = position + 1;
    }
}
