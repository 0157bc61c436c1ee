//! Filter Engine and View Propagator: pure derivations from the loaded
//! tables to the currently-visible views. Inputs are never mutated; every
//! call returns fresh copies so callers can keep the full tables around
//! while filters change one at a time.

use std::collections::HashSet;

use crate::query_params::{self, QueryMap};
use crate::tables::{EventRow, GoalAllowedRow, HomeAway, MatchRow, SetPlayRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeAwaySelect {
    #[default]
    Any,
    Home,
    Away,
}

impl HomeAwaySelect {
    /// "h"/"home" and "a"/"away" select; anything else (including "any") is
    /// a no-op selector.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "h" | "home" => HomeAwaySelect::Home,
            "a" | "away" => HomeAwaySelect::Away,
            _ => HomeAwaySelect::Any,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HomeAwaySelect::Any => "any",
            HomeAwaySelect::Home => "home",
            HomeAwaySelect::Away => "away",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            HomeAwaySelect::Any => HomeAwaySelect::Home,
            HomeAwaySelect::Home => HomeAwaySelect::Away,
            HomeAwaySelect::Away => HomeAwaySelect::Any,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchFilters {
    pub division_only: bool,
    pub opponent: String,
    pub home_away: HomeAwaySelect,
}

impl MatchFilters {
    pub fn from_query(params: &QueryMap) -> Self {
        Self {
            division_only: query_params::get_bool(params, "div_only", false),
            opponent: query_params::get_first(params, "opp")
                .unwrap_or("")
                .to_string(),
            home_away: HomeAwaySelect::parse(
                query_params::get_first(params, "ha").unwrap_or("any"),
            ),
        }
    }

    pub fn is_active(&self) -> bool {
        self.division_only
            || !self.opponent.trim().is_empty()
            || self.home_away != HomeAwaySelect::Any
    }
}

/// Apply the current filters to the matches table and return a filtered
/// copy. Each filter is a row-retention predicate over an independent
/// column, so composition order does not matter.
pub fn apply_match_filters(matches: &[MatchRow], filters: &MatchFilters) -> Vec<MatchRow> {
    let mut view: Vec<MatchRow> = matches.to_vec();

    if filters.division_only {
        view.retain(|m| m.division_game);
    }

    let needle = filters.opponent.trim().to_lowercase();
    if !needle.is_empty() {
        // An empty opponent cell never matches a non-empty needle.
        view.retain(|m| m.opponent.to_lowercase().contains(&needle));
    }

    match filters.home_away {
        HomeAwaySelect::Any => {}
        HomeAwaySelect::Home => view.retain(|m| m.home_away == HomeAway::Home),
        HomeAwaySelect::Away => view.retain(|m| m.home_away == HomeAway::Away),
    }

    view
}

/// Restrict events/plays/goals-allowed to the matches that survived
/// filtering. An empty matches view means "no filter bite here": all three
/// outputs equal their inputs unchanged.
pub fn derive_related_views(
    matches_view: &[MatchRow],
    events: &[EventRow],
    plays: &[SetPlayRow],
    goals_allowed: &[GoalAllowedRow],
) -> (Vec<EventRow>, Vec<SetPlayRow>, Vec<GoalAllowedRow>) {
    if matches_view.is_empty() {
        return (events.to_vec(), plays.to_vec(), goals_allowed.to_vec());
    }

    let keep: HashSet<&str> = matches_view.iter().map(|m| m.match_id.as_str()).collect();

    let events_view = events
        .iter()
        .filter(|e| keep.contains(e.match_id.as_str()))
        .cloned()
        .collect();
    let plays_view = plays
        .iter()
        .filter(|p| keep.contains(p.match_id.as_str()))
        .cloned()
        .collect();
    let ga_view = goals_allowed
        .iter()
        .filter(|g| keep.contains(g.match_id.as_str()))
        .cloned()
        .collect();

    (events_view, plays_view, ga_view)
}
