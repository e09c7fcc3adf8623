//! Per-participant standings and their incremental update from match results.

use log::debug;
use std::collections::HashMap;

use super::tiebreak;
use crate::tournament::models::{
    DRAW_POINTS, Match, MatchStatus, Participant, Standing, StandingRow, TieBreaker, WIN_POINTS,
};

/// Standings of every participant, kept in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandingsTable {
    rows: Vec<Standing>,
    index: HashMap<String, usize>,
}

impl StandingsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty standings for each participant
    pub fn from_participants(participants: &[Participant]) -> Self {
        let mut table = Self::new();
        for participant in participants {
            table.insert(&participant.name);
        }
        table
    }

    /// Rebuild standings from scratch by replaying every decided match.
    ///
    /// Tie-breakers and ranks are recomputed at each round boundary that had been
    /// finalized (every round before `current_round`, plus `current_round` itself once
    /// the tournament is completed), which reproduces the incremental standings
    /// exactly.
    pub fn replay(
        participants: &[Participant],
        matches: &[Match],
        current_round: u32,
        completed: bool,
        tie_breakers: &[TieBreaker],
    ) -> Self {
        let mut table = Self::from_participants(participants);
        let last_round = matches.iter().map(|m| m.round).max().unwrap_or(0);

        for round in 1..=last_round {
            for m in matches.iter().filter(|m| m.round == round) {
                table.apply(m);
            }
            if round < current_round || (completed && round == current_round) {
                tiebreak::finalize_round(&mut table, matches, round, tie_breakers);
            }
        }

        table
    }

    /// Add an empty standing for `player` unless one already exists
    pub fn insert(&mut self, player: &str) -> usize {
        if let Some(&idx) = self.index.get(player) {
            return idx;
        }
        let idx = self.rows.len();
        self.rows.push(Standing::new(player));
        self.index.insert(player.to_string(), idx);
        idx
    }

    pub fn get(&self, player: &str) -> Option<&Standing> {
        self.index.get(player).map(|&idx| &self.rows[idx])
    }

    pub fn points(&self, player: &str) -> f64 {
        self.get(player).map_or(0.0, |s| s.points)
    }

    pub fn rank(&self, player: &str) -> usize {
        self.get(player).map_or(0, |s| s.rank)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Standings in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Standing> {
        self.rows.iter()
    }

    pub(crate) fn rows(&self) -> &[Standing] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Standing] {
        &mut self.rows
    }

    pub(crate) fn position(&self, player: &str) -> Option<usize> {
        self.index.get(player).copied()
    }

    /// Standings sorted by points and tie-breakers, best first
    pub fn sorted(&self, tie_breakers: &[TieBreaker]) -> Vec<&Standing> {
        tiebreak::sorted_order(self, tie_breakers)
            .into_iter()
            .map(|idx| &self.rows[idx])
            .collect()
    }

    /// Sorted snapshot rows as exported
    pub fn snapshot(&self, tie_breakers: &[TieBreaker]) -> Vec<StandingRow> {
        self.sorted(tie_breakers)
            .into_iter()
            .map(Standing::row)
            .collect()
    }

    /// Apply a decided match. Pending and in-progress matches are ignored.
    pub fn apply(&mut self, m: &Match) {
        if !m.status.is_terminal() {
            return;
        }

        if m.is_bye() {
            let idx = self.insert(&m.player_a);
            let standing = &mut self.rows[idx];
            standing.wins += 1;
            standing.points += WIN_POINTS;
            debug!("{} receives a bye in round {}", m.player_a, m.round);
            return;
        }

        let Some(player_b) = m.player_b.as_deref() else {
            return;
        };
        let a = self.insert(&m.player_a);
        let b = self.insert(player_b);

        {
            let standing_a = &mut self.rows[a];
            if !standing_a.opponents.iter().any(|o| o == player_b) {
                standing_a.opponents.push(player_b.to_string());
            }
            standing_a.game_wins += m.score_a;
            standing_a.game_losses += m.score_b;
        }
        {
            let standing_b = &mut self.rows[b];
            if !standing_b.opponents.iter().any(|o| *o == m.player_a) {
                standing_b.opponents.push(m.player_a.clone());
            }
            standing_b.game_wins += m.score_b;
            standing_b.game_losses += m.score_a;
        }

        match m.winner.as_deref() {
            Some(winner) if winner == m.player_a => {
                self.rows[a].wins += 1;
                self.rows[a].points += WIN_POINTS;
                self.rows[b].losses += 1;
            }
            Some(_) => {
                self.rows[b].wins += 1;
                self.rows[b].points += WIN_POINTS;
                self.rows[a].losses += 1;
            }
            None if m.status == MatchStatus::Completed => {
                for idx in [a, b] {
                    self.rows[idx].draws += 1;
                    self.rows[idx].points += DRAW_POINTS;
                }
            }
            None => {}
        }
    }
}
