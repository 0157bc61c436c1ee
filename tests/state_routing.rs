use varsity_terminal::provider::seed_tables;
use varsity_terminal::query_params::{get_first, get_match_id, parse};
use varsity_terminal::state::{AppState, Delta, Screen, apply_delta};
use varsity_terminal::views::HomeAwaySelect;

fn loaded_state(query: &str) -> AppState {
    let mut state = AppState::from_query(parse(query));
    apply_delta(&mut state, Delta::SetTables(seed_tables()));
    state
}

#[test]
fn deep_link_with_match_id_opens_drilldown() {
    let state = loaded_state("?match_id=m3");
    assert_eq!(
        state.screen,
        Screen::Drilldown {
            match_id: "m3".to_string()
        }
    );
    assert!(state.drilldown_match("m3").is_some());
}

#[test]
fn unknown_match_id_enters_drilldown_but_does_not_resolve() {
    let state = loaded_state("?match_id=nope");
    assert_eq!(
        state.screen,
        Screen::Drilldown {
            match_id: "nope".to_string()
        }
    );
    // The routing layer only checks resolvability; presentation shows the
    // not-found state and offers the way back.
    assert!(state.drilldown_match("nope").is_none());
}

#[test]
fn back_home_clears_match_id_but_keeps_filters() {
    let mut state = loaded_state("?match_id=m3&ha=away&div_only=true");
    assert_eq!(state.filters.home_away, HomeAwaySelect::Away);
    assert!(state.filters.division_only);

    state.back_home();
    assert_eq!(state.screen, Screen::Home);
    assert_eq!(get_match_id(&state.query), None);
    assert_eq!(get_first(&state.query, "ha"), Some("away"));
    assert_eq!(get_first(&state.query, "div_only"), Some("true"));
}

#[test]
fn open_selected_round_trips_through_the_query() {
    let mut state = loaded_state("");
    state.selected = 2;
    let match_id = state.open_selected().expect("a match is selected");
    assert_eq!(get_match_id(&state.query).as_deref(), Some(match_id.as_str()));
    assert!(state.share_link().contains("match_id="));
}

#[test]
fn sync_query_is_equality_gated() {
    let mut state = loaded_state("");
    state.sync_query();
    let first = state.query.clone();
    state.sync_query();
    assert_eq!(state.query, first);

    state.toggle_division_only();
    assert_ne!(state.query, first);
    assert_eq!(get_first(&state.query, "div_only"), Some("true"));
}

#[test]
fn set_tables_recomputes_views_with_referential_consistency() {
    let mut state = loaded_state("?div_only=true&ha=home");
    assert!(state.matches_view.iter().all(|m| m.division_game));

    let keep: Vec<&str> = state
        .matches_view
        .iter()
        .map(|m| m.match_id.as_str())
        .collect();
    assert!(!keep.is_empty());
    assert!(
        state
            .events_view
            .iter()
            .all(|e| keep.contains(&e.match_id.as_str()))
    );
    assert!(
        state
            .plays_view
            .iter()
            .all(|p| keep.contains(&p.match_id.as_str()))
    );
    assert!(
        state
            .ga_view
            .iter()
            .all(|g| keep.contains(&g.match_id.as_str()))
    );
}

#[test]
fn filter_changes_recompute_views_and_clamp_selection() {
    let mut state = loaded_state("");
    let all = state.matches_view.len();
    state.selected = all - 1;

    state.set_opponent_filter("riverside".to_string());
    assert!(state.matches_view.len() < all);
    assert!(state.selected < state.matches_view.len());
    assert!(
        state
            .matches_view
            .iter()
            .all(|m| m.opponent.to_lowercase().contains("riverside"))
    );

    // Clearing the filter restores the full view.
    state.set_opponent_filter(String::new());
    assert_eq!(state.matches_view.len(), all);
}

#[test]
fn empty_filter_result_passes_full_related_tables_through() {
    let mut state = loaded_state("");
    state.set_opponent_filter("no such opponent".to_string());
    assert!(state.matches_view.is_empty());
    // No retained matches behaves like "show everything".
    assert_eq!(state.events_view.len(), state.tables.events.len());
    assert_eq!(state.plays_view.len(), state.tables.plays.len());
    assert_eq!(state.ga_view.len(), state.tables.goals_allowed.len());
}

#[test]
fn summaries_resolve_by_match_id() {
    let state = loaded_state("");
    assert!(state.summary_for("m5").is_some());
    assert!(state.summary_for("nope").is_none());
    assert!(state.summary_for("").is_none());
}
