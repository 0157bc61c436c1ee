//! Row Normalizer: turns raw spreadsheet tables into the canonical typed
//! rows. All header aliasing, type coercion and default-filling happens
//! here, so nothing downstream ever checks whether a column exists.

use chrono::NaiveDate;

use crate::tables::{
    EventRow, GoalAllowedRow, HomeAway, MatchResult, MatchRow, PlayerRow, RawTable, SetPiece,
    SetPlayRow, SummaryRow,
};

/// Truthy spellings accepted for boolean-like cells, case-insensitive.
const TRUTHY: [&str; 5] = ["true", "1", "yes", "y", "t"];

const RECORDING_URL_ALIASES: [&str; 5] = ["url", "recording_url", "game_url", "video_url", "link"];
const GOALIE_ALIASES: [&str; 3] = ["goalie_player_id", "goalkeeper_player_id", "goalie"];

pub fn matches_from_raw(raw: &RawTable) -> Vec<MatchRow> {
    let headers = canonical_headers(raw, false);
    let match_id = find(&headers, "match_id");
    let date = find(&headers, "date");
    let opponent = find(&headers, "opponent");
    let home_away = find(&headers, "home_away");
    let division = find(&headers, "division_game");
    let goals_for = find(&headers, "goals_for");
    let goals_against = find(&headers, "goals_against");
    // Legacy sheets labeled the column plain "shots".
    let shots_for = find(&headers, "shots_for").or_else(|| find(&headers, "shots"));
    let shots_against = find(&headers, "shots_against");
    let saves = find(&headers, "saves");
    let url_cols: Vec<Option<usize>> = RECORDING_URL_ALIASES
        .iter()
        .map(|name| find(&headers, name))
        .collect();

    let mut out = Vec::with_capacity(raw.len());
    for idx in 0..raw.len() {
        let goals_for = parse_count(raw.cell(idx, goals_for));
        let goals_against = parse_count(raw.cell(idx, goals_against));
        out.push(MatchRow {
            match_id: id_cell(raw, idx, match_id),
            date: parse_date(raw.cell(idx, date)),
            opponent: raw.cell(idx, opponent).trim().to_string(),
            home_away: HomeAway::parse(raw.cell(idx, home_away)),
            division_game: parse_bool(raw.cell(idx, division)),
            goals_for,
            goals_against,
            shots_for: parse_count(raw.cell(idx, shots_for)),
            shots_against: parse_count(raw.cell(idx, shots_against)),
            saves: parse_count(raw.cell(idx, saves)),
            result: MatchResult::from_score(goals_for, goals_against),
            recording_url: recording_url(raw, idx, &url_cols),
        });
    }
    out
}

pub fn players_from_raw(raw: &RawTable) -> Vec<PlayerRow> {
    let headers = canonical_headers(raw, false);
    let player_id = find(&headers, "player_id");
    let name = find(&headers, "name");
    let jersey = find(&headers, "jersey");
    let position = find(&headers, "position");

    (0..raw.len())
        .map(|idx| PlayerRow {
            player_id: raw.cell(idx, player_id).trim().to_string(),
            name: raw.cell(idx, name).trim().to_string(),
            jersey: parse_count(raw.cell(idx, jersey)),
            position: raw.cell(idx, position).trim().to_string(),
        })
        .collect()
}

pub fn events_from_raw(raw: &RawTable) -> Vec<EventRow> {
    let headers = canonical_headers(raw, true);
    let event_id = find(&headers, "event_id");
    let match_id = find(&headers, "match_id");
    let player_id = find(&headers, "player_id");
    let goals = find(&headers, "goals");
    // Some sheets carry a singular "assist" column instead.
    let assists = find(&headers, "assists").or_else(|| find(&headers, "assist"));
    let shots = find(&headers, "shots");
    let fouls = find(&headers, "fouls");

    (0..raw.len())
        .map(|idx| EventRow {
            event_id: raw.cell(idx, event_id).trim().to_string(),
            match_id: raw.cell(idx, match_id).trim().to_string(),
            player_id: raw.cell(idx, player_id).trim().to_string(),
            goals: parse_count(raw.cell(idx, goals)),
            assists: parse_count(raw.cell(idx, assists)),
            shots: parse_count(raw.cell(idx, shots)),
            fouls: parse_count(raw.cell(idx, fouls)),
        })
        .collect()
}

pub fn plays_from_raw(raw: &RawTable) -> Vec<SetPlayRow> {
    let headers = canonical_headers(raw, true);
    let match_id = find(&headers, "match_id");
    let set_piece = find(&headers, "set_piece");
    let play_call_id = find(&headers, "play_call_id");
    let play_type = find(&headers, "play_type").or_else(|| find(&headers, "play type"));
    let taker_id = find(&headers, "taker_id");
    let goal_created = find(&headers, "goal_created");

    (0..raw.len())
        .map(|idx| SetPlayRow {
            match_id: raw.cell(idx, match_id).trim().to_string(),
            set_piece: SetPiece::parse(raw.cell(idx, set_piece)),
            play_call_id: raw.cell(idx, play_call_id).trim().to_string(),
            play_type: raw.cell(idx, play_type).trim().to_string(),
            taker_notes: raw.cell(idx, taker_id).trim().to_string(),
            goal_created: parse_bool(raw.cell(idx, goal_created)),
        })
        .collect()
}

pub fn goals_allowed_from_raw(raw: &RawTable) -> Vec<GoalAllowedRow> {
    let headers = canonical_headers(raw, true);
    let match_id = find(&headers, "match_id");
    let goal_id = find(&headers, "goal_id");
    // First alias present wins; rows without any keeper column get "".
    let goalie = GOALIE_ALIASES
        .iter()
        .find_map(|name| find(&headers, name));
    let minute = find(&headers, "minute");
    let situation = find(&headers, "situation");
    let description =
        find(&headers, "description").or_else(|| find(&headers, "description_of_goal"));

    (0..raw.len())
        .map(|idx| GoalAllowedRow {
            match_id: raw.cell(idx, match_id).trim().to_string(),
            goal_id: raw.cell(idx, goal_id).trim().to_string(),
            goalie_player_id: raw.cell(idx, goalie).trim().to_string(),
            minute: parse_minute(raw.cell(idx, minute)),
            situation: raw.cell(idx, situation).trim().to_string(),
            description: raw.cell(idx, description).trim().to_string(),
        })
        .collect()
}

pub fn summaries_from_raw(raw: &RawTable) -> Vec<SummaryRow> {
    let headers = canonical_headers(raw, true);
    let match_id = find(&headers, "match_id");

    (0..raw.len())
        .map(|idx| {
            let notes = headers
                .iter()
                .enumerate()
                .filter(|(col, name)| Some(*col) != match_id && !name.is_empty())
                .map(|(col, name)| (name.clone(), raw.cell(idx, Some(col)).trim().to_string()))
                .collect();
            SummaryRow {
                match_id: raw.cell(idx, match_id).trim().to_string(),
                notes,
            }
        })
        .collect()
}

fn canonical_headers(raw: &RawTable, lowercase: bool) -> Vec<String> {
    raw.headers
        .iter()
        .map(|h| {
            let trimmed = h.trim();
            if lowercase {
                trimmed.to_lowercase()
            } else {
                trimmed.to_string()
            }
        })
        .collect()
}

fn find(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

/// Match identity: the cell when a match_id column exists, otherwise the
/// stringified row index so every row still joins and routes.
fn id_cell(raw: &RawTable, idx: usize, col: Option<usize>) -> String {
    match col {
        Some(_) => raw.cell(idx, col).trim().to_string(),
        None => idx.to_string(),
    }
}

fn recording_url(raw: &RawTable, idx: usize, cols: &[Option<usize>]) -> String {
    for col in cols {
        let value = raw.cell(idx, *col).trim();
        if !value.is_empty() {
            return if value.starts_with("http") {
                value.to_string()
            } else {
                format!("https://{value}")
            };
        }
    }
    String::new()
}

fn parse_bool(raw: &str) -> bool {
    let lowered = raw.trim().to_lowercase();
    TRUTHY.contains(&lowered.as_str())
}

/// Count cells arrive as "3", "3.0", "" or garbage; everything unparseable
/// (or negative) collapses to 0.
fn parse_count(raw: &str) -> u32 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.max(0.0) as u32)
        .unwrap_or(0)
}

/// The minute a goal was conceded has no sensible zero default, so
/// unparseable stays absent.
fn parse_minute(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d.%m.%Y"];
    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{parse_bool, parse_count, parse_date, parse_minute};

    #[test]
    fn parse_bool_accepts_truthy_spellings() {
        for raw in ["true", "TRUE", " 1 ", "yes", "Y", "t"] {
            assert!(parse_bool(raw), "{raw:?} should be true");
        }
        for raw in ["false", "0", "no", "", "maybe"] {
            assert!(!parse_bool(raw), "{raw:?} should be false");
        }
    }

    #[test]
    fn parse_count_is_permissive() {
        assert_eq!(parse_count("3"), 3);
        assert_eq!(parse_count("3.0"), 3);
        assert_eq!(parse_count(" 12 "), 12);
        assert_eq!(parse_count("-2"), 0);
        assert_eq!(parse_count("n/a"), 0);
        assert_eq!(parse_count(""), 0);
    }

    #[test]
    fn parse_minute_has_no_zero_default() {
        assert_eq!(parse_minute("55"), Some(55.0));
        assert_eq!(parse_minute("55.5"), Some(55.5));
        assert_eq!(parse_minute(""), None);
        assert_eq!(parse_minute("abc"), None);
    }

    #[test]
    fn parse_date_tries_common_layouts() {
        let expected = chrono::NaiveDate::from_ymd_opt(2025, 9, 12).unwrap();
        assert_eq!(parse_date("2025-09-12"), Some(expected));
        assert_eq!(parse_date("09/12/2025"), Some(expected));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
    }
}
