//! Tournament creation parameters.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::errors::{TournamentError, TournamentResult};
use super::models::{Format, TieBreaker};

/// Top cut size used by hybrid formats when none is configured
pub const DEFAULT_TOP_CUT: usize = 8;

/// Tournament configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Tournament name
    pub name: String,
    /// Pairing format
    pub format: Format,
    /// Fixed number of rounds (`None` derives it from format and participant count)
    pub num_rounds: Option<u32>,
    /// Tournament id (`None` generates one)
    pub tournament_id: Option<String>,
    /// ISO-8601 date (`None` uses the creation time)
    pub date: Option<String>,
    /// Tie-breakers applied after points, in order
    pub tie_breakers: Vec<TieBreaker>,
    /// Number of players advancing to the knockout phase of hybrid formats
    pub top_cut: Option<usize>,
    /// Whether odd pools may hand out byes
    pub allow_byes: bool,
}

impl TournamentConfig {
    /// Create a configuration with default settings for `format`
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        Self {
            name: name.into(),
            format,
            num_rounds: None,
            tournament_id: None,
            date: None,
            tie_breakers: TieBreaker::defaults(),
            top_cut: None,
            allow_byes: true,
        }
    }

    pub fn swiss(name: impl Into<String>) -> Self {
        Self::new(name, Format::Swiss)
    }

    pub fn single_elimination(name: impl Into<String>) -> Self {
        Self::new(name, Format::SingleElimination)
    }

    pub fn double_elimination(name: impl Into<String>) -> Self {
        Self::new(name, Format::DoubleElimination)
    }

    pub fn round_robin(name: impl Into<String>) -> Self {
        Self::new(name, Format::RoundRobin)
    }

    /// Swiss rounds followed by a top cut of `top_cut` players
    pub fn hybrid(name: impl Into<String>, double_elimination: bool, top_cut: usize) -> Self {
        let format = if double_elimination {
            Format::HybridSwissDe
        } else {
            Format::HybridSwissSe
        };
        Self::new(name, format).with_top_cut(top_cut)
    }

    pub fn with_rounds(mut self, num_rounds: u32) -> Self {
        self.num_rounds = Some(num_rounds);
        self
    }

    pub fn with_id(mut self, tournament_id: impl Into<String>) -> Self {
        self.tournament_id = Some(tournament_id.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_tie_breakers(mut self, tie_breakers: Vec<TieBreaker>) -> Self {
        self.tie_breakers = tie_breakers;
        self
    }

    pub fn with_top_cut(mut self, top_cut: usize) -> Self {
        self.top_cut = Some(top_cut);
        self
    }

    pub fn without_byes(mut self) -> Self {
        self.allow_byes = false;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> TournamentResult<()> {
        if self.name.trim().is_empty() {
            return Err(TournamentError::InvalidConfig(
                "tournament name must not be empty".to_string(),
            ));
        }

        if self.num_rounds == Some(0) {
            return Err(TournamentError::InvalidConfig(
                "number of rounds must be at least 1".to_string(),
            ));
        }

        if let Some(id) = &self.tournament_id
            && (id.is_empty() || id.starts_with('.') || id.contains(['/', '\\']))
        {
            return Err(TournamentError::InvalidConfig(format!(
                "invalid tournament id: {id:?}"
            )));
        }

        if let Some(top_cut) = self.top_cut
            && top_cut < 2
        {
            return Err(TournamentError::InvalidConfig(format!(
                "top cut must be at least 2, got {top_cut}"
            )));
        }

        if let Some(date) = &self.date
            && !is_iso_date(date)
        {
            return Err(TournamentError::InvalidConfig(format!(
                "date is not ISO-8601: {date}"
            )));
        }

        Ok(())
    }
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.f]` and plain dates
pub fn is_iso_date(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
