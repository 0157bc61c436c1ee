//! Trend frames for the Trends tab: all-games vs last-3-games averages and
//! a per-game series. Matches are ordered by date (undated rows keep their
//! sheet position, ahead of dated ones) and the final three count as the
//! recent window.

use crate::analysis::save_pct;
use crate::tables::MatchRow;

pub const LAST_N: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendComparisonRow {
    pub metric: &'static str,
    pub all_games: f64,
    pub last3: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameTrendRow {
    pub game_no: usize,
    pub date: Option<chrono::NaiveDate>,
    pub opponent: String,
    pub goals_for: u32,
    pub goals_against: u32,
    pub save_pct: Option<f64>,
    pub gf_conversion_pct: Option<f64>,
    pub ga_conversion_pct: Option<f64>,
    pub last3: bool,
}

pub fn build_individual_game_trends(matches_view: &[MatchRow]) -> Vec<GameTrendRow> {
    let ordered = ordered_by_date(matches_view);
    let last3_start = ordered.len().saturating_sub(LAST_N);

    ordered
        .iter()
        .enumerate()
        .map(|(idx, m)| GameTrendRow {
            game_no: idx + 1,
            date: m.date,
            opponent: m.opponent.clone(),
            goals_for: m.goals_for,
            goals_against: m.goals_against,
            save_pct: save_pct(m.saves, m.goals_against),
            gf_conversion_pct: ratio_pct(m.goals_for, m.shots_for),
            ga_conversion_pct: ratio_pct(m.goals_against, m.shots_against),
            last3: idx >= last3_start,
        })
        .collect()
}

pub fn build_comparison_trend_frame(matches_view: &[MatchRow]) -> Vec<TrendComparisonRow> {
    let games = build_individual_game_trends(matches_view);
    let recent: Vec<&GameTrendRow> = games.iter().filter(|g| g.last3).collect();

    let rows = [
        (
            "GF",
            mean(games.iter().map(|g| Some(f64::from(g.goals_for)))),
            mean(recent.iter().map(|g| Some(f64::from(g.goals_for)))),
        ),
        (
            "GA",
            mean(games.iter().map(|g| Some(f64::from(g.goals_against)))),
            mean(recent.iter().map(|g| Some(f64::from(g.goals_against)))),
        ),
        (
            "Save%",
            mean(games.iter().map(|g| g.save_pct)),
            mean(recent.iter().map(|g| g.save_pct)),
        ),
        (
            "GF Conv%",
            mean(games.iter().map(|g| g.gf_conversion_pct)),
            mean(recent.iter().map(|g| g.gf_conversion_pct)),
        ),
        (
            "GA Conv%",
            mean(games.iter().map(|g| g.ga_conversion_pct)),
            mean(recent.iter().map(|g| g.ga_conversion_pct)),
        ),
    ];

    rows.into_iter()
        .map(|(metric, all_games, last3)| TrendComparisonRow {
            metric,
            all_games: all_games.unwrap_or(0.0),
            last3: last3.unwrap_or(0.0),
        })
        .collect()
}

fn ordered_by_date(matches_view: &[MatchRow]) -> Vec<MatchRow> {
    let mut ordered = matches_view.to_vec();
    // Stable sort: rows without a date stay in sheet order, ahead of dated
    // rows so "last 3" always means the latest dated games.
    ordered.sort_by(|a, b| match (a.date, b.date) {
        (Some(da), Some(db)) => da.cmp(&db),
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    ordered
}

fn ratio_pct(numer: u32, denom: u32) -> Option<f64> {
    if denom == 0 {
        return None;
    }
    Some(f64::from(numer) / f64::from(denom) * 100.0)
}

/// Average over the present values only; None when nothing is present.
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for value in values.flatten() {
        sum += value;
        n += 1;
    }
    if n == 0 { None } else { Some(sum / n as f64) }
}
