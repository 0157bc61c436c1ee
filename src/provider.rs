//! Background provider: owns all blocking external I/O (sheet reads, AI
//! requests) so the render loop never stalls. Commands arrive over one
//! channel, deltas leave over the other; every failure is logged and
//! degraded, never raised across the channel.

use std::env;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use chrono::Local;

use crate::ai_summary;
use crate::loaders;
use crate::sheet_cache;
use crate::state::{Delta, ProviderCommand};
use crate::tables::{
    EventRow, GoalAllowedRow, HomeAway, MatchResult, MatchRow, PlayerRow, SetPiece, SetPlayRow,
    SummaryRow, TeamTables,
};
use crate::views::{apply_match_filters, derive_related_views};

pub fn spawn_sheet_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let spreadsheet_key = opt_env("VARSITY_SHEET_KEY");
        let mut tables = initial_tables(spreadsheet_key.as_deref(), &tx);
        let _ = tx.send(Delta::SetTables(tables.clone()));

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::RefreshTables { force } => {
                    if force {
                        sheet_cache::clear();
                        let _ = tx.send(Delta::Log(format!(
                            "[INFO] Sheet cache cleared at {}",
                            Local::now().format("%H:%M:%S")
                        )));
                    }
                    match spreadsheet_key.as_deref() {
                        Some(key) => match loaders::load_all(key) {
                            Ok(loaded) => {
                                tables = loaded;
                                let _ = tx.send(Delta::SetTables(tables.clone()));
                            }
                            Err(err) => {
                                // Keep the previous snapshot on a failed reload.
                                let _ = tx
                                    .send(Delta::Log(format!("[WARN] Sheet reload failed: {err}")));
                            }
                        },
                        None => {
                            tables = seed_tables();
                            let _ = tx.send(Delta::SetTables(tables.clone()));
                        }
                    }
                }
                ProviderCommand::AiTeamQuestion { question, filters } => {
                    // Views are pure functions of tables + filters, so the
                    // provider derives the same slices the UI is showing.
                    let matches_view = apply_match_filters(&tables.matches, &filters);
                    let (events_view, plays_view, ga_view) = derive_related_views(
                        &matches_view,
                        &tables.events,
                        &tables.plays,
                        &tables.goals_allowed,
                    );
                    let reply = match ai_summary::generate_team_analysis(
                        &question,
                        &matches_view,
                        &tables.players,
                        &events_view,
                        &plays_view,
                        &ga_view,
                    ) {
                        Ok(text) => text,
                        Err(err) => {
                            let _ = tx.send(Delta::Log(format!("[WARN] AI assistant: {err}")));
                            ai_summary::user_error_message(
                                "I'm sorry, I couldn't generate a response.",
                            )
                        }
                    };
                    let _ = tx.send(Delta::AiTeamReply(reply));
                }
                ProviderCommand::AiGameSummary { match_id } => {
                    let Some(m) = tables.matches.iter().find(|m| m.match_id == match_id) else {
                        let _ = tx.send(Delta::Log(format!(
                            "[WARN] AI game summary requested for unknown match {match_id}"
                        )));
                        continue;
                    };
                    let summary = tables.summaries.iter().find(|s| s.match_id == match_id);
                    let text =
                        match ai_summary::generate_game_summary(m, summary, &tables.events) {
                            Ok(text) => text,
                            Err(err) => {
                                let _ =
                                    tx.send(Delta::Log(format!("[WARN] AI game summary: {err}")));
                                ai_summary::user_error_message("AI summary unavailable.")
                            }
                        };
                    let _ = tx.send(Delta::SetGameSummary { match_id, text });
                }
            }
        }
    });
}

fn initial_tables(spreadsheet_key: Option<&str>, tx: &Sender<Delta>) -> TeamTables {
    match spreadsheet_key {
        Some(key) => match loaders::load_all(key) {
            Ok(tables) => tables,
            Err(err) => {
                let _ = tx.send(Delta::Log(format!(
                    "[WARN] Initial sheet load failed: {err}; starting empty"
                )));
                TeamTables::default()
            }
        },
        None => {
            let _ = tx.send(Delta::Log(
                "[INFO] VARSITY_SHEET_KEY not set; using demo season data".to_string(),
            ));
            seed_tables()
        }
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}

// ----- demo season ------------------------------------------------------

fn seed_match(
    match_id: &str,
    date: &str,
    opponent: &str,
    home_away: HomeAway,
    division_game: bool,
    goals_for: u32,
    goals_against: u32,
    shots_for: u32,
    shots_against: u32,
    saves: u32,
) -> MatchRow {
    MatchRow {
        match_id: match_id.to_string(),
        date: chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        opponent: opponent.to_string(),
        home_away,
        division_game,
        goals_for,
        goals_against,
        shots_for,
        shots_against,
        saves,
        result: MatchResult::from_score(goals_for, goals_against),
        recording_url: String::new(),
    }
}

fn seed_player(player_id: &str, name: &str, jersey: u32, position: &str) -> PlayerRow {
    PlayerRow {
        player_id: player_id.to_string(),
        name: name.to_string(),
        jersey,
        position: position.to_string(),
    }
}

fn seed_event(
    event_id: &str,
    match_id: &str,
    player_id: &str,
    goals: u32,
    assists: u32,
    shots: u32,
    fouls: u32,
) -> EventRow {
    EventRow {
        event_id: event_id.to_string(),
        match_id: match_id.to_string(),
        player_id: player_id.to_string(),
        goals,
        assists,
        shots,
        fouls,
    }
}

/// Small but complete sample season so the dashboard is driveable without a
/// configured sheet.
pub fn seed_tables() -> TeamTables {
    let matches = vec![
        seed_match("m1", "2025-09-02", "Riverside", HomeAway::Home, true, 3, 1, 14, 6, 5),
        seed_match("m2", "2025-09-06", "Lakeview", HomeAway::Away, true, 0, 0, 8, 9, 7),
        seed_match("m3", "2025-09-10", "River City", HomeAway::Home, false, 1, 2, 10, 11, 6),
        seed_match("m4", "2025-09-16", "Eastview", HomeAway::Away, true, 2, 1, 12, 7, 4),
        seed_match("m5", "2025-09-20", "Northgate", HomeAway::Home, true, 4, 0, 18, 4, 4),
        seed_match("m6", "2025-09-25", "Lakeview", HomeAway::Home, true, 1, 1, 9, 8, 5),
        seed_match("m7", "2025-09-30", "Riverside", HomeAway::Away, true, 2, 3, 11, 13, 7),
        seed_match("m8", "2025-10-04", "Westbrook", HomeAway::Away, false, 3, 2, 15, 10, 6),
    ];

    let players = vec![
        seed_player("p1", "A. Okafor", 9, "FW"),
        seed_player("p2", "L. Dias", 10, "MF"),
        seed_player("p3", "M. Hart", 7, "FW"),
        seed_player("p4", "S. Kim", 8, "MF"),
        seed_player("p5", "J. Alvarez", 4, "DF"),
        seed_player("p6", "T. Brooks", 5, "DF"),
        seed_player("p7", "R. Patel", 1, "GK"),
        seed_player("p8", "C. Nguyen", 11, "FW"),
    ];

    let events = vec![
        seed_event("e1", "m1", "p1", 2, 0, 5, 1),
        seed_event("e2", "m1", "p2", 1, 2, 3, 0),
        seed_event("e3", "m2", "p3", 0, 0, 3, 2),
        seed_event("e4", "m3", "p1", 1, 0, 4, 0),
        seed_event("e5", "m4", "p2", 1, 0, 2, 1),
        seed_event("e6", "m4", "p8", 1, 1, 3, 0),
        seed_event("e7", "m5", "p1", 2, 1, 6, 0),
        seed_event("e8", "m5", "p4", 1, 2, 2, 1),
        seed_event("e9", "m5", "p8", 1, 0, 4, 0),
        seed_event("e10", "m6", "p3", 1, 0, 3, 1),
        seed_event("e11", "m7", "p1", 1, 0, 4, 2),
        seed_event("e12", "m7", "p2", 1, 1, 3, 0),
        seed_event("e13", "m8", "p8", 2, 0, 5, 1),
        seed_event("e14", "m8", "p4", 1, 1, 2, 0),
    ];

    let plays = vec![
        SetPlayRow {
            match_id: "m1".to_string(),
            set_piece: SetPiece::FkDirect,
            play_call_id: "thunder".to_string(),
            play_type: "shot".to_string(),
            taker_notes: "p2".to_string(),
            goal_created: true,
        },
        SetPlayRow {
            match_id: "m4".to_string(),
            set_piece: SetPiece::FkIndirect,
            play_call_id: "overlap".to_string(),
            play_type: "cross".to_string(),
            taker_notes: "p4".to_string(),
            goal_created: false,
        },
        SetPlayRow {
            match_id: "m5".to_string(),
            set_piece: SetPiece::Other("corner".to_string()),
            play_call_id: "near post".to_string(),
            play_type: "cross".to_string(),
            taker_notes: "p2".to_string(),
            goal_created: true,
        },
        SetPlayRow {
            match_id: "m7".to_string(),
            set_piece: SetPiece::Other("corner".to_string()),
            play_call_id: "far post".to_string(),
            play_type: "cross".to_string(),
            taker_notes: "p4".to_string(),
            goal_created: false,
        },
    ];

    let summaries = vec![SummaryRow {
        match_id: "m5".to_string(),
        notes: vec![
            (
                "key_takeaway".to_string(),
                "High press forced turnovers all half".to_string(),
            ),
            (
                "needs_work".to_string(),
                "Slow restarts after goal kicks".to_string(),
            ),
        ],
    }];

    let goals_allowed = vec![
        GoalAllowedRow {
            match_id: "m1".to_string(),
            goal_id: "g1".to_string(),
            goalie_player_id: "p7".to_string(),
            minute: Some(71.0),
            situation: "counter".to_string(),
            description: "Long ball over the back line".to_string(),
        },
        GoalAllowedRow {
            match_id: "m3".to_string(),
            goal_id: "g2".to_string(),
            goalie_player_id: "p7".to_string(),
            minute: Some(33.0),
            situation: "set piece".to_string(),
            description: "Header off a corner".to_string(),
        },
        GoalAllowedRow {
            match_id: "m3".to_string(),
            goal_id: "g3".to_string(),
            goalie_player_id: "p7".to_string(),
            minute: Some(80.0),
            situation: "run of play".to_string(),
            description: String::new(),
        },
        GoalAllowedRow {
            match_id: "m7".to_string(),
            goal_id: "g4".to_string(),
            goalie_player_id: "p7".to_string(),
            minute: None,
            situation: "penalty".to_string(),
            description: "Soft call in the box".to_string(),
        },
    ];

    TeamTables {
        matches,
        players,
        events,
        plays,
        summaries,
        goals_allowed,
    }
}
