use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use varsity_terminal::analysis::points_leaderboard;
use varsity_terminal::normalize::{events_from_raw, matches_from_raw};
use varsity_terminal::tables::{EventRow, PlayerRow, RawTable};
use varsity_terminal::views::{HomeAwaySelect, MatchFilters, apply_match_filters, derive_related_views};

fn sample_matches_raw(rows: usize) -> RawTable {
    let headers = vec![
        "match_id".to_string(),
        "date".to_string(),
        "opponent".to_string(),
        "home_away".to_string(),
        "division_game".to_string(),
        "goals_for".to_string(),
        "goals_against".to_string(),
        "shots".to_string(),
        "shots_against".to_string(),
        "saves".to_string(),
    ];
    let opponents = ["Riverside", "Lakeview", "River City", "Eastview", "Northgate"];
    let data = (0..rows)
        .map(|idx| {
            vec![
                format!("m{idx}"),
                format!("2025-09-{:02}", (idx % 28) + 1),
                opponents[idx % opponents.len()].to_string(),
                if idx % 2 == 0 { "h" } else { "away" }.to_string(),
                if idx % 3 == 0 { "true" } else { "no" }.to_string(),
                (idx % 5).to_string(),
                (idx % 3).to_string(),
                (8 + idx % 10).to_string(),
                (4 + idx % 8).to_string(),
                (3 + idx % 6).to_string(),
            ]
        })
        .collect();
    RawTable::new(headers, data)
}

fn sample_events_raw(rows: usize) -> RawTable {
    let headers = vec![
        "event_id".to_string(),
        "match_id".to_string(),
        "player_id".to_string(),
        "goals".to_string(),
        "assist".to_string(),
        "shots".to_string(),
    ];
    let data = (0..rows)
        .map(|idx| {
            vec![
                format!("e{idx}"),
                format!("m{}", idx % 200),
                format!("p{}", idx % 18),
                (idx % 2).to_string(),
                (idx % 3).to_string(),
                (idx % 5).to_string(),
            ]
        })
        .collect();
    RawTable::new(headers, data)
}

fn sample_events(rows: usize) -> Vec<EventRow> {
    events_from_raw(&sample_events_raw(rows))
}

fn sample_players(count: usize) -> Vec<PlayerRow> {
    (0..count)
        .map(|idx| PlayerRow {
            player_id: format!("p{idx}"),
            name: format!("Player {idx}"),
            jersey: idx as u32 + 1,
            position: "MF".to_string(),
        })
        .collect()
}

fn bench_normalize_matches(c: &mut Criterion) {
    let raw = sample_matches_raw(200);
    c.bench_function("normalize_matches", |b| {
        b.iter(|| {
            let matches = matches_from_raw(black_box(&raw));
            black_box(matches.len());
        })
    });
}

fn bench_normalize_events(c: &mut Criterion) {
    let raw = sample_events_raw(2_000);
    c.bench_function("normalize_events", |b| {
        b.iter(|| {
            let events = events_from_raw(black_box(&raw));
            black_box(events.len());
        })
    });
}

fn bench_filter_and_propagate(c: &mut Criterion) {
    let matches = matches_from_raw(&sample_matches_raw(200));
    let events = sample_events(2_000);
    let filters = MatchFilters {
        division_only: true,
        opponent: "rive".to_string(),
        home_away: HomeAwaySelect::Home,
    };
    c.bench_function("filter_and_propagate", |b| {
        b.iter(|| {
            let view = apply_match_filters(black_box(&matches), black_box(&filters));
            let (events_view, plays_view, ga_view) =
                derive_related_views(&view, black_box(&events), &[], &[]);
            black_box((view.len(), events_view.len(), plays_view.len(), ga_view.len()));
        })
    });
}

fn bench_leaderboard(c: &mut Criterion) {
    let events = sample_events(2_000);
    let players = sample_players(18);
    c.bench_function("points_leaderboard", |b| {
        b.iter(|| {
            let rows = points_leaderboard(black_box(&events), black_box(&players), 5);
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_normalize_matches,
    bench_normalize_events,
    bench_filter_and_propagate,
    bench_leaderboard
);
criterion_main!(perf);
