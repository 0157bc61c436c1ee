use varsity_terminal::normalize::{
    events_from_raw, goals_allowed_from_raw, matches_from_raw, players_from_raw, plays_from_raw,
    summaries_from_raw,
};
use varsity_terminal::tables::{HomeAway, MatchResult, RawTable, SetPiece};

fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

#[test]
fn match_results_derive_from_score() {
    let table = raw(
        &["match_id", "goals_for", "goals_against"],
        &[&["1", "3", "1"], &["2", "0", "0"], &["3", "1", "2"]],
    );
    let matches = matches_from_raw(&table);
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].result, MatchResult::Win);
    assert_eq!(matches[1].result, MatchResult::Draw);
    assert_eq!(matches[2].result, MatchResult::Loss);
}

#[test]
fn matches_alias_shots_and_normalize_home_away() {
    let table = raw(
        &[" match_id", "opponent", "home_away", "shots", "division_game"],
        &[
            &["m1", "Riverside", "h", "12", "TRUE"],
            &["m2", "Lakeview", "Away", "7", "no"],
            &["m3", "River City", "neutral", "9", "1"],
        ],
    );
    let matches = matches_from_raw(&table);
    assert_eq!(matches[0].shots_for, 12);
    assert_eq!(matches[0].home_away, HomeAway::Home);
    assert_eq!(matches[0].home_away.label(), "H");
    assert!(matches[0].division_game);
    assert_eq!(matches[1].home_away, HomeAway::Away);
    assert!(!matches[1].division_game);
    assert_eq!(matches[2].home_away, HomeAway::Unknown);
    assert!(matches[2].division_game);
}

#[test]
fn matches_synthesize_ids_from_row_index() {
    let table = raw(
        &["opponent", "goals_for", "goals_against"],
        &[&["Riverside", "2", "1"], &["Lakeview", "0", "3"]],
    );
    let matches = matches_from_raw(&table);
    assert_eq!(matches[0].match_id, "0");
    assert_eq!(matches[1].match_id, "1");
}

#[test]
fn matches_unparseable_counts_default_to_zero() {
    let table = raw(
        &["match_id", "goals_for", "goals_against", "saves"],
        &[&["m1", "two", "", "4.0"]],
    );
    let matches = matches_from_raw(&table);
    assert_eq!(matches[0].goals_for, 0);
    assert_eq!(matches[0].goals_against, 0);
    assert_eq!(matches[0].saves, 4);
    assert_eq!(matches[0].result, MatchResult::Draw);
}

#[test]
fn matches_resolve_recording_url_aliases() {
    let table = raw(
        &["match_id", "video_url", "link"],
        &[
            &["m1", "youtu.be/abc", "ignored.example"],
            &["m2", "", "https://example.com/m2"],
            &["m3", "", ""],
        ],
    );
    let matches = matches_from_raw(&table);
    assert_eq!(matches[0].recording_url, "https://youtu.be/abc");
    assert_eq!(matches[1].recording_url, "https://example.com/m2");
    assert_eq!(matches[2].recording_url, "");
}

#[test]
fn events_alias_assist_column() {
    let table = raw(
        &["Event_ID", "MATCH_ID", "player_id", "goals", "assist", "shots"],
        &[&["e1", "7", "p1", "1", "2", "3"]],
    );
    let events = events_from_raw(&table);
    assert_eq!(events[0].event_id, "e1");
    assert_eq!(events[0].match_id, "7");
    assert_eq!(events[0].assists, 2);
    // fouls column is absent entirely and still defaults.
    assert_eq!(events[0].fouls, 0);
}

#[test]
fn events_prefer_canonical_assists_over_alias() {
    let table = raw(
        &["match_id", "player_id", "assists", "assist"],
        &[&["m1", "p1", "4", "9"]],
    );
    let events = events_from_raw(&table);
    assert_eq!(events[0].assists, 4);
}

#[test]
fn plays_normalize_set_piece_vocabulary() {
    let table = raw(
        &["match_id", "set_piece", "Play Type", "play_call_id", "taker_id", "goal_created"],
        &[
            &["m1", "Direct", "shot", "thunder", "p2", "yes"],
            &["m1", "fk indirect", "cross", "overlap", "p4", "0"],
            &["m2", "Corner", "cross", "near post", "p2", "TRUE"],
        ],
    );
    let plays = plays_from_raw(&table);
    assert_eq!(plays[0].set_piece, SetPiece::FkDirect);
    assert!(plays[0].goal_created);
    assert_eq!(plays[0].play_type, "shot");
    assert_eq!(plays[0].taker_notes, "p2");
    assert_eq!(plays[1].set_piece, SetPiece::FkIndirect);
    assert!(!plays[1].goal_created);
    // Unknown tags pass through lowercased.
    assert_eq!(plays[2].set_piece, SetPiece::Other("corner".to_string()));
    assert_eq!(plays[2].set_piece.label(), "corner");
}

#[test]
fn goals_allowed_alias_goalie_first_match_wins() {
    let table = raw(
        &["match_id", "goalkeeper_player_id", "goalie", "minute", "description_of_goal"],
        &[&["m1", "p7", "p9", "71", "Header off a corner"]],
    );
    let goals = goals_allowed_from_raw(&table);
    assert_eq!(goals[0].goalie_player_id, "p7");
    assert_eq!(goals[0].minute, Some(71.0));
    assert_eq!(goals[0].description, "Header off a corner");
    assert_eq!(goals[0].situation, "");
}

#[test]
fn goals_allowed_minute_is_missing_not_zero() {
    let table = raw(
        &["match_id", "goalie", "minute"],
        &[&["m1", "p7", "stoppage"], &["m2", "p7", ""]],
    );
    let goals = goals_allowed_from_raw(&table);
    assert_eq!(goals[0].minute, None);
    assert_eq!(goals[1].minute, None);
}

#[test]
fn goals_allowed_without_goalie_column_defaults_empty() {
    let table = raw(&["match_id", "minute"], &[&["m1", "12"]]);
    let goals = goals_allowed_from_raw(&table);
    assert_eq!(goals[0].goalie_player_id, "");
    assert_eq!(goals[0].goal_id, "");
}

#[test]
fn summaries_keep_free_form_notes_without_match_id() {
    let table = raw(
        &["Match_ID", "Key_Takeaway", "needs work"],
        &[&["m5", "High press worked", "restarts"]],
    );
    let summaries = summaries_from_raw(&table);
    assert_eq!(summaries[0].match_id, "m5");
    assert_eq!(
        summaries[0].notes,
        vec![
            ("key_takeaway".to_string(), "High press worked".to_string()),
            ("needs work".to_string(), "restarts".to_string()),
        ]
    );
}

#[test]
fn players_default_jersey_to_zero() {
    let table = raw(
        &["player_id", "name", "jersey", "position"],
        &[&["1", "A. Okafor", "", "FW"], &["2", "L. Dias", "10", "MF"]],
    );
    let players = players_from_raw(&table);
    assert_eq!(players[0].jersey, 0);
    assert_eq!(players[0].player_id, "1");
    assert_eq!(players[1].jersey, 10);
}

#[test]
fn empty_tables_normalize_to_empty_rows() {
    let empty = RawTable::empty();
    assert!(matches_from_raw(&empty).is_empty());
    assert!(events_from_raw(&empty).is_empty());
    assert!(plays_from_raw(&empty).is_empty());
    assert!(goals_allowed_from_raw(&empty).is_empty());
    assert!(summaries_from_raw(&empty).is_empty());
}
