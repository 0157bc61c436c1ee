use varsity_terminal::tables::{
    EventRow, GoalAllowedRow, HomeAway, MatchResult, MatchRow, SetPiece, SetPlayRow,
};
use varsity_terminal::views::{
    HomeAwaySelect, MatchFilters, apply_match_filters, derive_related_views,
};

fn match_row(match_id: &str, opponent: &str, home_away: HomeAway, division: bool) -> MatchRow {
    MatchRow {
        match_id: match_id.to_string(),
        date: None,
        opponent: opponent.to_string(),
        home_away,
        division_game: division,
        goals_for: 1,
        goals_against: 0,
        shots_for: 5,
        shots_against: 3,
        saves: 3,
        result: MatchResult::from_score(1, 0),
        recording_url: String::new(),
    }
}

fn event_row(event_id: &str, match_id: &str) -> EventRow {
    EventRow {
        event_id: event_id.to_string(),
        match_id: match_id.to_string(),
        player_id: "p1".to_string(),
        goals: 1,
        assists: 0,
        shots: 2,
        fouls: 0,
    }
}

fn play_row(match_id: &str) -> SetPlayRow {
    SetPlayRow {
        match_id: match_id.to_string(),
        set_piece: SetPiece::FkDirect,
        play_call_id: "thunder".to_string(),
        play_type: "shot".to_string(),
        taker_notes: "p2".to_string(),
        goal_created: false,
    }
}

fn ga_row(goal_id: &str, match_id: &str) -> GoalAllowedRow {
    GoalAllowedRow {
        match_id: match_id.to_string(),
        goal_id: goal_id.to_string(),
        goalie_player_id: "p7".to_string(),
        minute: Some(40.0),
        situation: "counter".to_string(),
        description: String::new(),
    }
}

fn sample_matches() -> Vec<MatchRow> {
    vec![
        match_row("1", "Riverside", HomeAway::Home, true),
        match_row("2", "Lakeview", HomeAway::Away, false),
        match_row("3", "River City", HomeAway::Away, true),
        match_row("4", "", HomeAway::Unknown, false),
    ]
}

fn ids(view: &[MatchRow]) -> Vec<&str> {
    view.iter().map(|m| m.match_id.as_str()).collect()
}

#[test]
fn filters_never_add_rows() {
    let matches = sample_matches();
    let filters = MatchFilters {
        division_only: true,
        opponent: "river".to_string(),
        home_away: HomeAwaySelect::Away,
    };
    let view = apply_match_filters(&matches, &filters);
    assert!(view.len() <= matches.len());
    for row in &view {
        assert!(matches.contains(row));
    }
}

#[test]
fn filters_do_not_mutate_input() {
    let matches = sample_matches();
    let before = matches.clone();
    let filters = MatchFilters {
        division_only: true,
        opponent: "lake".to_string(),
        home_away: HomeAwaySelect::Home,
    };
    let _ = apply_match_filters(&matches, &filters);
    assert_eq!(matches, before);
}

#[test]
fn filter_composition_is_order_independent() {
    let matches = sample_matches();
    let division = MatchFilters {
        division_only: true,
        ..MatchFilters::default()
    };
    let opponent = MatchFilters {
        opponent: "rive".to_string(),
        ..MatchFilters::default()
    };
    let away = MatchFilters {
        home_away: HomeAwaySelect::Away,
        ..MatchFilters::default()
    };
    let combined = MatchFilters {
        division_only: true,
        opponent: "rive".to_string(),
        home_away: HomeAwaySelect::Away,
    };

    let expected = apply_match_filters(&matches, &combined);
    let orders: [[&MatchFilters; 3]; 6] = [
        [&division, &opponent, &away],
        [&division, &away, &opponent],
        [&opponent, &division, &away],
        [&opponent, &away, &division],
        [&away, &division, &opponent],
        [&away, &opponent, &division],
    ];
    for order in orders {
        let mut view = matches.clone();
        for step in order {
            view = apply_match_filters(&view, step);
        }
        assert_eq!(ids(&view), ids(&expected));
    }
}

#[test]
fn opponent_substring_is_case_insensitive_and_skips_missing() {
    let matches = sample_matches();
    let filters = MatchFilters {
        opponent: "rive".to_string(),
        ..MatchFilters::default()
    };
    let view = apply_match_filters(&matches, &filters);
    // "Riverside" and "River City" match; "Lakeview" and the row with no
    // opponent text drop out.
    assert_eq!(ids(&view), vec!["1", "3"]);
}

#[test]
fn opponent_filter_is_trimmed_and_blank_is_noop() {
    let matches = sample_matches();
    let blank = MatchFilters {
        opponent: "   ".to_string(),
        ..MatchFilters::default()
    };
    assert_eq!(apply_match_filters(&matches, &blank).len(), matches.len());

    let padded = MatchFilters {
        opponent: " rive ".to_string(),
        ..MatchFilters::default()
    };
    assert_eq!(ids(&apply_match_filters(&matches, &padded)), vec!["1", "3"]);
}

#[test]
fn away_selector_retains_only_away_rows() {
    // "Away" as typed by a user; the lowercase "a" source value was already
    // normalized to Away at load time.
    let matches = vec![
        match_row("1", "Riverside", HomeAway::Home, false),
        match_row("2", "Lakeview", HomeAway::parse("A"), false),
        match_row("3", "Eastview", HomeAway::parse("a"), false),
    ];
    let filters = MatchFilters {
        home_away: HomeAwaySelect::parse("Away"),
        ..MatchFilters::default()
    };
    let view = apply_match_filters(&matches, &filters);
    assert_eq!(ids(&view), vec!["2", "3"]);
}

#[test]
fn home_away_selector_parses_all_spellings() {
    assert_eq!(HomeAwaySelect::parse("h"), HomeAwaySelect::Home);
    assert_eq!(HomeAwaySelect::parse("HOME"), HomeAwaySelect::Home);
    assert_eq!(HomeAwaySelect::parse("a"), HomeAwaySelect::Away);
    assert_eq!(HomeAwaySelect::parse("Away"), HomeAwaySelect::Away);
    assert_eq!(HomeAwaySelect::parse("any"), HomeAwaySelect::Any);
    assert_eq!(HomeAwaySelect::parse("whatever"), HomeAwaySelect::Any);
}

#[test]
fn filtering_empty_table_is_noop() {
    let filters = MatchFilters {
        division_only: true,
        opponent: "rive".to_string(),
        home_away: HomeAwaySelect::Home,
    };
    assert!(apply_match_filters(&[], &filters).is_empty());
}

#[test]
fn related_views_keep_only_retained_match_ids() {
    let matches_view = vec![
        match_row("1", "Riverside", HomeAway::Home, true),
        match_row("3", "River City", HomeAway::Away, true),
    ];
    let events = vec![event_row("e1", "1"), event_row("e2", "2"), event_row("e3", "3")];
    let plays = vec![play_row("2"), play_row("3")];
    let goals_allowed = vec![ga_row("g1", "1"), ga_row("g2", "2")];

    let (events_view, plays_view, ga_view) =
        derive_related_views(&matches_view, &events, &plays, &goals_allowed);

    let keep: Vec<&str> = matches_view.iter().map(|m| m.match_id.as_str()).collect();
    assert!(events_view.iter().all(|e| keep.contains(&e.match_id.as_str())));
    assert!(plays_view.iter().all(|p| keep.contains(&p.match_id.as_str())));
    assert!(ga_view.iter().all(|g| keep.contains(&g.match_id.as_str())));
    assert_eq!(events_view.len(), 2);
    assert_eq!(plays_view.len(), 1);
    assert_eq!(ga_view.len(), 1);
}

#[test]
fn related_views_pass_through_when_matches_view_empty() {
    let events = vec![event_row("e1", "1"), event_row("e2", "2")];
    let plays = vec![play_row("1")];
    let goals_allowed = vec![ga_row("g1", "2")];

    let (events_view, plays_view, ga_view) =
        derive_related_views(&[], &events, &plays, &goals_allowed);

    assert_eq!(events_view, events);
    assert_eq!(plays_view, plays);
    assert_eq!(ga_view, goals_allowed);
}

#[test]
fn related_views_are_idempotent() {
    let matches_view = vec![match_row("1", "Riverside", HomeAway::Home, true)];
    let events = vec![event_row("e1", "1"), event_row("e2", "2")];
    let plays = vec![play_row("1"), play_row("2")];
    let goals_allowed = vec![ga_row("g1", "1")];

    let (events_1, plays_1, ga_1) =
        derive_related_views(&matches_view, &events, &plays, &goals_allowed);
    let (events_2, plays_2, ga_2) =
        derive_related_views(&matches_view, &events_1, &plays_1, &ga_1);

    assert_eq!(events_1, events_2);
    assert_eq!(plays_1, plays_2);
    assert_eq!(ga_1, ga_2);
}
