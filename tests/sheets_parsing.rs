use std::fs;
use std::path::PathBuf;

use varsity_terminal::normalize::matches_from_raw;
use varsity_terminal::sheets::{TableFetch, parse_csv_table};
use varsity_terminal::tables::{HomeAway, MatchResult};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_matches_csv_fixture() {
    let raw = read_fixture("matches.csv");
    let table = parse_csv_table(&raw).expect("fixture should parse");
    assert_eq!(table.len(), 3);
    // Header whitespace survives parsing; the normalizer trims it.
    assert_eq!(table.headers[0], "match_id ");

    let matches = matches_from_raw(&table);
    assert_eq!(matches[0].match_id, "m1");
    assert_eq!(matches[0].home_away, HomeAway::Home);
    assert!(matches[0].division_game);
    assert_eq!(matches[0].shots_for, 14);
    assert_eq!(matches[0].result, MatchResult::Win);

    // Quoted cell with an embedded comma stays one field.
    assert_eq!(matches[1].opponent, "Lakeview, North");
    assert_eq!(matches[1].recording_url, "https://youtu.be/demo-m2");

    assert_eq!(matches[2].result, MatchResult::Loss);
    // "six" is unparseable and collapses to 0.
    assert_eq!(matches[2].saves, 0);
    assert_eq!(matches[2].recording_url, "https://example.com/m3");
}

#[test]
fn blank_body_is_an_empty_table() {
    let table = parse_csv_table("").expect("blank should parse");
    assert!(table.is_empty());
    let table = parse_csv_table("\n  \n").expect("whitespace should parse");
    assert!(table.is_empty());
}

#[test]
fn ragged_rows_read_as_empty_cells() {
    let table = parse_csv_table("a,b,c\n1,2\n4,5,6,7\n").expect("ragged should parse");
    assert_eq!(table.len(), 2);
    assert_eq!(table.cell(0, Some(2)), "");
    assert_eq!(table.cell(1, Some(2)), "6");
    // Unresolved columns always read as empty.
    assert_eq!(table.cell(0, None), "");
}

#[test]
fn unavailable_collapses_to_empty_table() {
    let table = TableFetch::Unavailable.into_table();
    assert!(table.is_empty());
    assert!(table.headers.is_empty());
    assert!(!TableFetch::Unavailable.is_loaded());
}
