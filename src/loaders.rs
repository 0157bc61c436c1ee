//! Cached table loaders: sheet fetch (through the TTL cache) plus the Row
//! Normalizer, one function per tab. Matches, players and events are
//! required and propagate fetch errors; plays, summaries and goals-allowed
//! degrade to empty.

use anyhow::Result;

use crate::normalize;
use crate::sheet_cache::{read_table_cached, read_table_cached_opt};
use crate::sheets::TableFetch;
use crate::tables::{
    EventRow, GoalAllowedRow, MatchRow, PlayerRow, SetPlayRow, SummaryRow, TeamTables,
};

pub fn load_matches(spreadsheet_key: &str) -> Result<Vec<MatchRow>> {
    Ok(normalize::matches_from_raw(&read_table_cached(
        spreadsheet_key,
        "matches",
    )?))
}

pub fn load_players(spreadsheet_key: &str) -> Result<Vec<PlayerRow>> {
    Ok(normalize::players_from_raw(&read_table_cached(
        spreadsheet_key,
        "players",
    )?))
}

pub fn load_events(spreadsheet_key: &str) -> Result<Vec<EventRow>> {
    Ok(normalize::events_from_raw(&read_table_cached(
        spreadsheet_key,
        "events",
    )?))
}

pub fn load_plays(spreadsheet_key: &str) -> Vec<SetPlayRow> {
    normalize::plays_from_raw(&read_table_cached_opt(spreadsheet_key, "plays").into_table())
}

/// Coach notes live on a tab named either `summary` or `summaries`; the
/// first one that reads wins, and neither reading is an error.
pub fn load_summaries(spreadsheet_key: &str) -> Vec<SummaryRow> {
    for tab in ["summary", "summaries"] {
        if let TableFetch::Loaded(table) = read_table_cached_opt(spreadsheet_key, tab) {
            return normalize::summaries_from_raw(&table);
        }
    }
    Vec::new()
}

pub fn load_goals_allowed(spreadsheet_key: &str) -> Vec<GoalAllowedRow> {
    normalize::goals_allowed_from_raw(
        &read_table_cached_opt(spreadsheet_key, "goals_allowed").into_table(),
    )
}

pub fn load_all(spreadsheet_key: &str) -> Result<TeamTables> {
    Ok(TeamTables {
        matches: load_matches(spreadsheet_key)?,
        players: load_players(spreadsheet_key)?,
        events: load_events(spreadsheet_key)?,
        plays: load_plays(spreadsheet_key),
        summaries: load_summaries(spreadsheet_key),
        goals_allowed: load_goals_allowed(spreadsheet_key),
    })
}
