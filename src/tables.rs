use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A table exactly as the spreadsheet reader delivered it: header names and
/// string cells, no typing, no guarantees about casing or column presence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Cell text for a resolved column, or "" when the column is unresolved
    /// or the row is shorter than the header (ragged CSV rows are normal).
    pub fn cell(&self, row: usize, col: Option<usize>) -> &str {
        let Some(col) = col else {
            return "";
        };
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    pub fn from_score(goals_for: u32, goals_against: u32) -> Self {
        if goals_for > goals_against {
            MatchResult::Win
        } else if goals_for < goals_against {
            MatchResult::Loss
        } else {
            MatchResult::Draw
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchResult::Win => "W",
            MatchResult::Draw => "D",
            MatchResult::Loss => "L",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeAway {
    Home,
    Away,
    Unknown,
}

impl HomeAway {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "h" | "home" => HomeAway::Home,
            "a" | "away" => HomeAway::Away,
            _ => HomeAway::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HomeAway::Home => "H",
            HomeAway::Away => "A",
            HomeAway::Unknown => "",
        }
    }
}

/// Set-piece category normalized into a closed vocabulary; tags outside the
/// known free-kick aliases pass through lowercased and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetPiece {
    FkDirect,
    FkIndirect,
    Other(String),
}

impl SetPiece {
    pub fn parse(raw: &str) -> Self {
        let tag = raw.trim().to_lowercase();
        match tag.as_str() {
            "direct" | "fk direct" | "fk_direct" => SetPiece::FkDirect,
            "indirect" | "fk indirect" | "fk_indirect" => SetPiece::FkIndirect,
            _ => SetPiece::Other(tag),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SetPiece::FkDirect => "fk_direct",
            SetPiece::FkIndirect => "fk_indirect",
            SetPiece::Other(tag) => tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub match_id: String,
    pub date: Option<NaiveDate>,
    pub opponent: String,
    pub home_away: HomeAway,
    pub division_game: bool,
    pub goals_for: u32,
    pub goals_against: u32,
    pub shots_for: u32,
    pub shots_against: u32,
    pub saves: u32,
    pub result: MatchResult,
    pub recording_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRow {
    pub player_id: String,
    pub name: String,
    pub jersey: u32,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub event_id: String,
    pub match_id: String,
    pub player_id: String,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub fouls: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPlayRow {
    pub match_id: String,
    pub set_piece: SetPiece,
    pub play_call_id: String,
    pub play_type: String,
    pub taker_notes: String,
    pub goal_created: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalAllowedRow {
    pub match_id: String,
    pub goal_id: String,
    pub goalie_player_id: String,
    pub minute: Option<f64>,
    pub situation: String,
    pub description: String,
}

/// Coach notes are free-form: whatever columns the sheet carries besides
/// match_id are kept as ordered key/value pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub match_id: String,
    pub notes: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamTables {
    pub matches: Vec<MatchRow>,
    pub players: Vec<PlayerRow>,
    pub events: Vec<EventRow>,
    pub plays: Vec<SetPlayRow>,
    pub summaries: Vec<SummaryRow>,
    pub goals_allowed: Vec<GoalAllowedRow>,
}
