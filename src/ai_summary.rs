//! AI summarization collaborator (Gemini). Builds a compact text context
//! from the current views, calls generateContent, and extracts the reply.
//! Every failure path ends as an error the provider logs and degrades to an
//! informational message; nothing here can abort a render.

use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};

use crate::analysis;
use crate::http_client::http_client;
use crate::tables::{EventRow, GoalAllowedRow, MatchRow, PlayerRow, SetPlayRow, SummaryRow};
use crate::trends;

const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const MAX_CONTEXT_MATCHES: usize = 20;

pub fn api_key() -> Option<String> {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
}

pub fn user_error_message(detail: &str) -> String {
    format!("{detail} Set GEMINI_API_KEY to enable the assistant.")
}

pub fn generate_team_analysis(
    question: &str,
    matches_view: &[MatchRow],
    players: &[PlayerRow],
    events_view: &[EventRow],
    plays_view: &[SetPlayRow],
    ga_view: &[GoalAllowedRow],
) -> Result<String> {
    let context = build_team_context(matches_view, players, events_view, plays_view, ga_view);
    let prompt = format!(
        "You are an assistant coach for a high-school varsity soccer team. \
         Answer the question using only the season data below. Be concise \
         and concrete.\n\n{context}\nQuestion: {question}"
    );
    request_completion(&prompt)
}

pub fn generate_game_summary(
    m: &MatchRow,
    summary: Option<&SummaryRow>,
    events: &[EventRow],
) -> Result<String> {
    let context = build_game_context(m, summary, events);
    let prompt = format!(
        "You are an assistant coach for a high-school varsity soccer team. \
         Write a short post-game summary (3-5 sentences) for the match \
         below, based only on this data.\n\n{context}"
    );
    request_completion(&prompt)
}

fn build_team_context(
    matches_view: &[MatchRow],
    players: &[PlayerRow],
    events_view: &[EventRow],
    plays_view: &[SetPlayRow],
    ga_view: &[GoalAllowedRow],
) -> String {
    let kpis = analysis::team_kpis(matches_view);
    let mut out = String::new();

    out.push_str(&format!(
        "Season record: {}-{}-{} (W-L-D) over {} games, GF {}, GA {}, diff {:+}.\n",
        kpis.wins, kpis.losses, kpis.draws, kpis.games, kpis.goals_for, kpis.goals_against,
        kpis.goal_diff
    ));
    if let Some(pct) = kpis.save_pct {
        out.push_str(&format!("Save percentage: {pct:.1}%.\n"));
    }

    out.push_str("Results:\n");
    for m in matches_view.iter().take(MAX_CONTEXT_MATCHES) {
        let date = m
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "undated".to_string());
        out.push_str(&format!(
            "- {date} vs {} ({}): {} {}-{}{}\n",
            m.opponent,
            m.home_away.label(),
            m.result.label(),
            m.goals_for,
            m.goals_against,
            if m.division_game { " [division]" } else { "" },
        ));
    }
    if matches_view.len() > MAX_CONTEXT_MATCHES {
        out.push_str(&format!(
            "- ... and {} more games\n",
            matches_view.len() - MAX_CONTEXT_MATCHES
        ));
    }

    let leaders = analysis::points_leaderboard(events_view, players, 5);
    if !leaders.is_empty() {
        out.push_str("Scoring leaders (points = 2*goals + assists):\n");
        for row in &leaders {
            out.push_str(&format!(
                "- #{} {}: {} pts ({}g {}a, {} shots)\n",
                row.jersey, row.name, row.points, row.goals, row.assists, row.shots
            ));
        }
    }

    let set_pieces = analysis::set_piece_summary(plays_view);
    if !set_pieces.is_empty() {
        out.push_str("Set pieces:\n");
        for row in &set_pieces {
            out.push_str(&format!(
                "- {}: {} attempts, {} goals ({:.0}%)\n",
                row.label, row.attempts, row.goals, row.conversion_pct
            ));
        }
    }

    let conceded = analysis::goals_allowed_summary(ga_view, players);
    if conceded.total > 0 {
        out.push_str(&format!("Goals allowed: {} total.", conceded.total));
        let situations: Vec<String> = conceded
            .by_situation
            .iter()
            .map(|(situation, count)| format!("{situation} {count}"))
            .collect();
        if !situations.is_empty() {
            out.push_str(&format!(" By situation: {}.", situations.join(", ")));
        }
        out.push('\n');
    }

    let comparison = trends::build_comparison_trend_frame(matches_view);
    if !comparison.is_empty() {
        out.push_str("Recent form (all games vs last 3):\n");
        for row in &comparison {
            out.push_str(&format!(
                "- {}: {:.2} vs {:.2}\n",
                row.metric, row.all_games, row.last3
            ));
        }
    }

    out
}

fn build_game_context(m: &MatchRow, summary: Option<&SummaryRow>, events: &[EventRow]) -> String {
    let mut out = String::new();
    let date = m
        .date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "undated".to_string());
    out.push_str(&format!(
        "Match: {date} vs {} ({}), result {} {}-{}, division game: {}.\n",
        m.opponent,
        m.home_away.label(),
        m.result.label(),
        m.goals_for,
        m.goals_against,
        if m.division_game { "yes" } else { "no" },
    ));

    if let Some(summary) = summary {
        out.push_str("Coach notes:\n");
        for (key, value) in &summary.notes {
            if !value.is_empty() {
                out.push_str(&format!("- {key}: {value}\n"));
            }
        }
    }

    let mut lines = 0usize;
    for e in events.iter().filter(|e| e.match_id == m.match_id) {
        if lines == 0 {
            out.push_str("Player stat lines:\n");
        }
        out.push_str(&format!(
            "- player {}: {}g {}a, {} shots, {} fouls\n",
            e.player_id, e.goals, e.assists, e.shots, e.fouls
        ));
        lines += 1;
    }

    out
}

fn request_completion(prompt: &str) -> Result<String> {
    let key = api_key().ok_or_else(|| anyhow!("GEMINI_API_KEY is not set"))?;
    let model =
        std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent?key={key}"
    );

    let body = json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    });

    let client = http_client()?;
    let resp = client
        .post(&url)
        .json(&body)
        .send()
        .context("ai request failed")?;
    let status = resp.status();
    let raw = resp.text().context("failed reading ai response body")?;
    if !status.is_success() {
        return Err(anyhow!("ai http {status}"));
    }

    let value: Value = serde_json::from_str(raw.trim()).context("invalid ai response json")?;
    extract_text(&value).ok_or_else(|| anyhow!("ai response contained no text"))
}

/// Pull the reply text out of a generateContent response: all text parts of
/// the first candidate, joined.
fn extract_text(value: &Value) -> Option<String> {
    let parts = value
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let mut out = String::new();
    for part in parts {
        if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
            out.push_str(text);
        }
    }

    let trimmed = out.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::extract_text;
    use serde_json::json;

    #[test]
    fn extract_text_joins_candidate_parts() {
        let value = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Strong " }, { "text": "season." }] }
            }]
        });
        assert_eq!(extract_text(&value).as_deref(), Some("Strong season."));
    }

    #[test]
    fn extract_text_handles_empty_and_malformed() {
        assert_eq!(extract_text(&json!({})), None);
        assert_eq!(extract_text(&json!({ "candidates": [] })), None);
        let blank = json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        });
        assert_eq!(extract_text(&blank), None);
    }
}
