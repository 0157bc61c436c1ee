//! Aggregations behind the home tabs and the drilldown: team KPIs, the
//! points leaderboard, the per-game player breakdown, and the set-piece and
//! goals-allowed summaries. All of these run over the filtered views and
//! are recomputed per render.

use std::collections::HashMap;

use crate::tables::{EventRow, GoalAllowedRow, MatchResult, MatchRow, PlayerRow, SetPlayRow};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamKpis {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_diff: i64,
    pub save_pct: Option<f64>,
    pub division_games: usize,
}

pub fn team_kpis(matches_view: &[MatchRow]) -> TeamKpis {
    let mut kpis = TeamKpis {
        games: matches_view.len(),
        ..TeamKpis::default()
    };
    let mut saves = 0u32;

    for m in matches_view {
        match m.result {
            MatchResult::Win => kpis.wins += 1,
            MatchResult::Draw => kpis.draws += 1,
            MatchResult::Loss => kpis.losses += 1,
        }
        kpis.goals_for += m.goals_for;
        kpis.goals_against += m.goals_against;
        saves += m.saves;
        if m.division_game {
            kpis.division_games += 1;
        }
    }

    kpis.goal_diff = i64::from(kpis.goals_for) - i64::from(kpis.goals_against);
    kpis.save_pct = save_pct(saves, kpis.goals_against);
    kpis
}

pub fn save_pct(saves: u32, goals_against: u32) -> Option<f64> {
    let faced = saves + goals_against;
    if faced == 0 {
        return None;
    }
    Some(f64::from(saves) / f64::from(faced) * 100.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderRow {
    pub player_id: String,
    pub name: String,
    pub jersey: u32,
    pub position: String,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub points: u32,
}

/// Points leaderboard over the events view joined to the roster.
/// Points = 2 * goals + assists; players missing from the roster still rank
/// but render as "Unknown".
pub fn points_leaderboard(
    events_view: &[EventRow],
    players: &[PlayerRow],
    top_n: usize,
) -> Vec<LeaderRow> {
    let mut rows = sum_by_player(events_view, players);
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goals.cmp(&a.goals))
            .then(b.shots.cmp(&a.shots))
            .then(a.name.cmp(&b.name))
    });
    rows.truncate(top_n);
    rows
}

/// Per-player lines for one match. A match with no event rows still shows
/// the full roster zero-filled so the drilldown table is never blank.
pub fn per_player_breakdown(
    match_id: &str,
    events: &[EventRow],
    players: &[PlayerRow],
) -> Vec<LeaderRow> {
    let for_match: Vec<EventRow> = events
        .iter()
        .filter(|e| e.match_id == match_id)
        .cloned()
        .collect();

    if for_match.is_empty() {
        return players
            .iter()
            .map(|p| LeaderRow {
                player_id: p.player_id.clone(),
                name: p.name.clone(),
                jersey: p.jersey,
                position: p.position.clone(),
                goals: 0,
                assists: 0,
                shots: 0,
                points: 0,
            })
            .collect();
    }

    let mut rows = sum_by_player(&for_match, players);
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goals.cmp(&a.goals))
            .then(b.shots.cmp(&a.shots))
            .then(a.name.cmp(&b.name))
    });
    rows
}

fn sum_by_player(events: &[EventRow], players: &[PlayerRow]) -> Vec<LeaderRow> {
    let roster: HashMap<&str, &PlayerRow> =
        players.iter().map(|p| (p.player_id.as_str(), p)).collect();

    let mut by_player: HashMap<&str, (u32, u32, u32)> = HashMap::new();
    for e in events {
        let entry = by_player.entry(e.player_id.as_str()).or_default();
        entry.0 += e.goals;
        entry.1 += e.assists;
        entry.2 += e.shots;
    }

    by_player
        .into_iter()
        .map(|(player_id, (goals, assists, shots))| {
            let player = roster.get(player_id);
            LeaderRow {
                player_id: player_id.to_string(),
                name: player
                    .map(|p| p.name.clone())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "Unknown".to_string()),
                jersey: player.map(|p| p.jersey).unwrap_or(0),
                position: player.map(|p| p.position.clone()).unwrap_or_default(),
                goals,
                assists,
                shots,
                points: 2 * goals + assists,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetPieceSummary {
    pub label: String,
    pub attempts: usize,
    pub goals: usize,
    pub conversion_pct: f64,
}

pub fn set_piece_summary(plays_view: &[SetPlayRow]) -> Vec<SetPieceSummary> {
    let mut by_category: HashMap<String, (usize, usize)> = HashMap::new();
    for play in plays_view {
        let entry = by_category
            .entry(play.set_piece.label().to_string())
            .or_default();
        entry.0 += 1;
        if play.goal_created {
            entry.1 += 1;
        }
    }

    let mut rows: Vec<SetPieceSummary> = by_category
        .into_iter()
        .map(|(label, (attempts, goals))| SetPieceSummary {
            label,
            attempts,
            goals,
            conversion_pct: goals as f64 / attempts as f64 * 100.0,
        })
        .collect();
    rows.sort_by(|a, b| b.attempts.cmp(&a.attempts).then(a.label.cmp(&b.label)));
    rows
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalsAllowedSummary {
    pub total: usize,
    pub by_situation: Vec<(String, usize)>,
    pub by_goalie: Vec<(String, usize)>,
}

pub fn goals_allowed_summary(
    ga_view: &[GoalAllowedRow],
    players: &[PlayerRow],
) -> GoalsAllowedSummary {
    let roster: HashMap<&str, &PlayerRow> =
        players.iter().map(|p| (p.player_id.as_str(), p)).collect();

    let mut by_situation: HashMap<String, usize> = HashMap::new();
    let mut by_goalie: HashMap<String, usize> = HashMap::new();
    for goal in ga_view {
        let situation = if goal.situation.is_empty() {
            "unspecified".to_string()
        } else {
            goal.situation.clone()
        };
        *by_situation.entry(situation).or_default() += 1;

        let goalie = roster
            .get(goal.goalie_player_id.as_str())
            .map(|p| p.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| {
                if goal.goalie_player_id.is_empty() {
                    "Unknown".to_string()
                } else {
                    goal.goalie_player_id.clone()
                }
            });
        *by_goalie.entry(goalie).or_default() += 1;
    }

    let mut by_situation: Vec<(String, usize)> = by_situation.into_iter().collect();
    by_situation.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut by_goalie: Vec<(String, usize)> = by_goalie.into_iter().collect();
    by_goalie.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    GoalsAllowedSummary {
        total: ga_view.len(),
        by_situation,
        by_goalie,
    }
}
