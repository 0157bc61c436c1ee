use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Wrap};

use varsity_terminal::analysis;
use varsity_terminal::provider;
use varsity_terminal::query_params;
use varsity_terminal::state::{
    AppState, ChatMessage, ChatRole, Delta, HomeTab, ProviderCommand, Screen, apply_delta,
};
use varsity_terminal::tables::MatchRow;
use varsity_terminal::trends;
use varsity_terminal::views::HomeAwaySelect;

const TEAM_TITLE: &str = "Milton Varsity Boys Soccer 2025";

const QUICK_SEASON_SUMMARY: &str = "Provide a comprehensive summary of our season performance \
     including strengths, weaknesses, and key insights";
const QUICK_PERFORMANCE_TRENDS: &str =
    "Analyze our performance trends and identify areas for improvement";

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.chat_input_active {
            self.on_chat_key(key);
            return;
        }
        if self.state.opponent_input_active {
            self.on_opponent_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('r') => self.request_refresh(),
            KeyCode::Char('c') => self.state.toggle_compact(),
            _ => match self.state.screen.clone() {
                Screen::Home => self.on_home_key(key),
                Screen::Drilldown { match_id } => self.on_drilldown_key(key, &match_id),
            },
        }
    }

    fn on_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.state.tab = self.state.tab.next(),
            KeyCode::BackTab => self.state.tab = self.state.tab.prev(),
            KeyCode::Char(c @ '1'..='5') => {
                let idx = (c as usize) - ('1' as usize);
                self.state.tab = HomeTab::all()[idx];
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('d') | KeyCode::Enter => {
                if let Some(match_id) = self.state.open_selected() {
                    self.request_game_summary(&match_id);
                }
            }
            KeyCode::Char('v') => self.state.toggle_division_only(),
            KeyCode::Char('h') => self.state.cycle_home_away(),
            KeyCode::Char('o') => self.state.opponent_input_active = true,
            KeyCode::Char('a') => {
                self.state.tab = HomeTab::Games;
                self.state.chat_input_active = true;
            }
            KeyCode::Char('s') => self.send_chat_question(QUICK_SEASON_SUMMARY.to_string()),
            KeyCode::Char('t') => self.send_chat_question(QUICK_PERFORMANCE_TRENDS.to_string()),
            KeyCode::Char('x') => self.state.chat_history.clear(),
            _ => {}
        }
    }

    fn on_drilldown_key(&mut self, key: KeyEvent, match_id: &str) {
        match key.code {
            KeyCode::Char('b') | KeyCode::Esc => self.state.back_home(),
            KeyCode::Char('g') => self.request_game_summary(match_id),
            _ => {}
        }
    }

    fn on_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.state.chat_input_active = false;
                self.state.chat_input.clear();
            }
            KeyCode::Enter => {
                let question = self.state.chat_input.trim().to_string();
                self.state.chat_input.clear();
                self.state.chat_input_active = false;
                if !question.is_empty() {
                    self.send_chat_question(question);
                }
            }
            KeyCode::Backspace => {
                self.state.chat_input.pop();
            }
            KeyCode::Char(c) => self.state.chat_input.push(c),
            _ => {}
        }
    }

    fn on_opponent_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.state.opponent_input_active = false,
            KeyCode::Backspace => {
                let mut opponent = self.state.filters.opponent.clone();
                opponent.pop();
                self.state.set_opponent_filter(opponent);
            }
            KeyCode::Char(c) => {
                let mut opponent = self.state.filters.opponent.clone();
                opponent.push(c);
                self.state.set_opponent_filter(opponent);
            }
            _ => {}
        }
    }

    fn send_chat_question(&mut self, question: String) {
        self.state.tab = HomeTab::Games;
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[WARN] AI assistant unavailable");
            return;
        };
        self.state.chat_history.push(ChatMessage {
            role: ChatRole::User,
            content: question.clone(),
        });
        let filters = self.state.filters.clone();
        if tx
            .send(ProviderCommand::AiTeamQuestion { question, filters })
            .is_ok()
        {
            self.state.ai_pending = true;
        } else {
            self.state.push_log("[WARN] AI request failed to send");
        }
    }

    fn request_game_summary(&mut self, match_id: &str) {
        if self.state.game_summaries.contains_key(match_id) {
            return;
        }
        let Some(tx) = &self.cmd_tx else {
            return;
        };
        if tx
            .send(ProviderCommand::AiGameSummary {
                match_id: match_id.to_string(),
            })
            .is_ok()
        {
            self.state.game_summary_pending = Some(match_id.to_string());
        }
    }

    fn request_refresh(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Refresh unavailable");
            return;
        };
        if tx
            .send(ProviderCommand::RefreshTables { force: true })
            .is_err()
        {
            self.state.push_log("[WARN] Refresh request failed");
        } else {
            self.state.last_refresh = Some(
                chrono::Local::now().format("%H:%M:%S").to_string(),
            );
            self.state.push_log("[INFO] Refresh requested");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    // Deep link: first CLI argument or VARSITY_QUERY, e.g. "?match_id=m3".
    let initial_query = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("VARSITY_QUERY").ok())
        .unwrap_or_default();
    let state = AppState::from_query(query_params::parse(&initial_query));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_sheet_provider(tx, cmd_rx);

    let mut app = App::new(state, Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &app.state.screen {
        Screen::Home => render_home(frame, chunks[1], &app.state),
        Screen::Drilldown { match_id } => render_drilldown(frame, chunks[1], &app.state, match_id),
    }

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let kpis = analysis::team_kpis(&state.matches_view);
    let record = format!(
        "{}-{}-{} | GF {} GA {} ({:+})",
        kpis.wins, kpis.losses, kpis.draws, kpis.goals_for, kpis.goals_against, kpis.goal_diff
    );

    let mut filters = Vec::new();
    if state.filters.division_only {
        filters.push("division only".to_string());
    }
    if !state.filters.opponent.trim().is_empty() {
        filters.push(format!("opp~\"{}\"", state.filters.opponent.trim()));
    }
    if state.filters.home_away != HomeAwaySelect::Any {
        filters.push(state.filters.home_away.label().to_string());
    }
    let filters = if filters.is_empty() {
        "none".to_string()
    } else {
        filters.join(", ")
    };

    let health = format!(
        "{} matches · {} players · {} events · {} plays · {} summaries · {} goals allowed",
        state.tables.matches.len(),
        state.tables.players.len(),
        state.tables.events.len(),
        state.tables.plays.len(),
        state.tables.summaries.len(),
        state.tables.goals_allowed.len(),
    );
    let refresh = state
        .last_refresh
        .as_deref()
        .map(|at| format!(" | refreshed {at}"))
        .unwrap_or_default();

    format!(
        "{TEAM_TITLE} | {record} | Filters: {filters}\n{health} | sheets cached up to 5 min{refresh}"
    )
}

fn footer_text(state: &AppState) -> String {
    if state.chat_input_active {
        return "Type your question | Enter Send | Esc Cancel".to_string();
    }
    if state.opponent_input_active {
        return "Type opponent filter | Enter/Esc Done".to_string();
    }
    match state.screen {
        Screen::Home => {
            "Tab/1-5 Tabs | j/k Move | Enter Drilldown | v Division | h Home/Away | o Opponent | a Ask AI | r Refresh | c Compact | ? Help | q Quit"
                .to_string()
        }
        Screen::Drilldown { .. } => {
            "b/Esc Back | g AI Summary | r Refresh | ? Help | q Quit".to_string()
        }
    }
}

fn render_home(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
        ])
        .split(area);

    render_tab_bar(frame, rows[0], state);

    match state.tab {
        HomeTab::Games => render_games_tab(frame, rows[1], state),
        HomeTab::Trends => render_trends_tab(frame, rows[1], state),
        HomeTab::Leaders => render_leaders_tab(frame, rows[1], state),
        HomeTab::GoalsAllowed => render_goals_allowed_tab(frame, rows[1], state),
        HomeTab::SetPieces => render_set_pieces_tab(frame, rows[1], state),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[2]);
}

fn render_tab_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let labels: Vec<String> = HomeTab::all()
        .iter()
        .enumerate()
        .map(|(idx, tab)| {
            if *tab == state.tab {
                format!("[{} {}]", idx + 1, tab.label())
            } else {
                format!(" {} {} ", idx + 1, tab.label())
            }
        })
        .collect();
    let bar = Paragraph::new(labels.join(" "))
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(bar, area);
}

fn render_games_tab(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(11)])
        .split(area);

    render_games_table(frame, rows[0], state);
    render_chat(frame, rows[1], state);
}

fn games_columns(compact: bool) -> Vec<Constraint> {
    if compact {
        vec![
            Constraint::Length(6),
            Constraint::Min(14),
            Constraint::Length(7),
            Constraint::Length(3),
        ]
    } else {
        vec![
            Constraint::Length(12),
            Constraint::Min(16),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Length(6),
        ]
    }
}

fn render_games_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = games_columns(state.compact);
    let header_style = Style::default().add_modifier(Modifier::BOLD);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths.clone())
        .split(sections[0]);
    if state.compact {
        render_cell_text(frame, cols[0], "Date", header_style);
        render_cell_text(frame, cols[1], "Opponent", header_style);
        render_cell_text(frame, cols[2], "Score", header_style);
        render_cell_text(frame, cols[3], "R", header_style);
    } else {
        render_cell_text(frame, cols[0], "Date", header_style);
        render_cell_text(frame, cols[1], "Opponent", header_style);
        render_cell_text(frame, cols[2], "H/A", header_style);
        render_cell_text(frame, cols[3], "Div", header_style);
        render_cell_text(frame, cols[4], "Score", header_style);
        render_cell_text(frame, cols[5], "Result", header_style);
    }

    let list_area = sections[1];
    if state.matches_view.is_empty() {
        let msg = if state.tables_loaded {
            "No matches for the current filters"
        } else {
            "Loading tables..."
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, state.matches_view.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths.clone())
            .split(row_area);

        let m = &state.matches_view[idx];
        let date = format_match_date(m, state.compact);
        let score = format!("{}-{}", m.goals_for, m.goals_against);
        if state.compact {
            render_cell_text(frame, cols[0], &date, row_style);
            render_cell_text(frame, cols[1], &m.opponent, row_style);
            render_cell_text(frame, cols[2], &score, row_style);
            render_cell_text(frame, cols[3], m.result.label(), row_style);
        } else {
            render_cell_text(frame, cols[0], &date, row_style);
            render_cell_text(frame, cols[1], &m.opponent, row_style);
            render_cell_text(frame, cols[2], m.home_away.label(), row_style);
            let div = if m.division_game { "yes" } else { "" };
            render_cell_text(frame, cols[3], div, row_style);
            render_cell_text(frame, cols[4], &score, row_style);
            render_cell_text(frame, cols[5], m.result.label(), row_style);
        }
    }
}

fn render_chat(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("AI Assistant").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let mut lines: Vec<String> = Vec::new();
    for message in state.chat_history.iter().rev().take(4).rev() {
        let who = match message.role {
            ChatRole::User => "You",
            ChatRole::Assistant => "AI",
        };
        lines.push(format!("{who}: {}", message.content));
    }
    if state.ai_pending {
        lines.push("AI is analyzing...".to_string());
    }
    if lines.is_empty() {
        lines.push("Ask about team performance and season trends.".to_string());
    }
    if state.chat_input_active {
        lines.push(format!("> {}_", state.chat_input));
    } else {
        lines.push("a ask | s season summary | t trends | x clear".to_string());
    }

    let chat = Paragraph::new(lines.join("\n")).wrap(Wrap { trim: true });
    frame.render_widget(chat, inner);
}

fn render_trends_tab(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.matches_view.is_empty() {
        let empty = Paragraph::new("No games yet to build trends.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(4)])
        .split(area);

    let comparison = trends::build_comparison_trend_frame(&state.matches_view);
    let mut lines = vec![format!(
        "{:<10} {:>10} {:>12}",
        "Metric", "All Games", "Last 3"
    )];
    for row in &comparison {
        lines.push(format!(
            "{:<10} {:>10.2} {:>12.2}",
            row.metric, row.all_games, row.last3
        ));
    }
    let table = Paragraph::new(lines.join("\n")).block(
        Block::default()
            .title("All Games vs Last 3 Games")
            .borders(Borders::ALL),
    );
    frame.render_widget(table, rows[0]);

    let games = trends::build_individual_game_trends(&state.matches_view);
    let max_goals = games.iter().map(|g| g.goals_for).max().unwrap_or(0).max(1);
    let bars: Vec<Bar> = games
        .iter()
        .map(|g| {
            let style = if g.last3 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Cyan)
            };
            Bar::default()
                .value(u64::from(g.goals_for))
                .text_value(format!("{}", g.goals_for))
                .style(style)
        })
        .collect();
    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(3)
        .bar_gap(1)
        .max(u64::from(max_goals))
        .block(
            Block::default()
                .title("Goals For by game (last 3 highlighted)")
                .borders(Borders::ALL),
        );
    frame.render_widget(chart, rows[1]);
}

fn render_leaders_tab(frame: &mut Frame, area: Rect, state: &AppState) {
    let leaders = analysis::points_leaderboard(&state.events_view, &state.tables.players, 5);
    let mut lines = Vec::new();
    if leaders.is_empty() {
        lines.push("No events recorded for the current filters.".to_string());
    } else {
        lines.push(format!(
            "{:<4} {:<20} {:<4} {:>3} {:>3} {:>4} {:>4}",
            "#", "Player", "Pos", "G", "A", "Sh", "Pts"
        ));
        for row in &leaders {
            lines.push(format!(
                "{:<4} {:<20} {:<4} {:>3} {:>3} {:>4} {:>4}",
                row.jersey, row.name, row.position, row.goals, row.assists, row.shots, row.points
            ));
        }
        lines.push(String::new());
        lines.push("Points = 2*goals + assists".to_string());
    }
    let table = Paragraph::new(lines.join("\n")).block(
        Block::default()
            .title("Points Leaderboard (Top 5)")
            .borders(Borders::ALL),
    );
    frame.render_widget(table, area);
}

fn render_goals_allowed_tab(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3)])
        .split(area);

    let summary = analysis::goals_allowed_summary(&state.ga_view, &state.tables.players);
    let mut lines = vec![format!("Total goals allowed: {}", summary.total)];
    if !summary.by_situation.is_empty() {
        let parts: Vec<String> = summary
            .by_situation
            .iter()
            .map(|(situation, count)| format!("{situation} {count}"))
            .collect();
        lines.push(format!("By situation: {}", parts.join(" · ")));
    }
    if !summary.by_goalie.is_empty() {
        let parts: Vec<String> = summary
            .by_goalie
            .iter()
            .map(|(goalie, count)| format!("{goalie} {count}"))
            .collect();
        lines.push(format!("By goalie: {}", parts.join(" · ")));
    }
    let top = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Goals Allowed").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(top, rows[0]);

    let mut detail = Vec::new();
    for goal in &state.ga_view {
        let opponent = state
            .drilldown_match(&goal.match_id)
            .map(|m| m.opponent.clone())
            .unwrap_or_else(|| goal.match_id.clone());
        let minute = goal
            .minute
            .map(|m| format!("{m:.0}'"))
            .unwrap_or_else(|| "--'".to_string());
        let situation = if goal.situation.is_empty() {
            "unspecified"
        } else {
            &goal.situation
        };
        let description = if goal.description.is_empty() {
            String::new()
        } else {
            format!(" — {}", goal.description)
        };
        detail.push(format!("vs {opponent} {minute} {situation}{description}"));
    }
    if detail.is_empty() {
        detail.push("No goals allowed in the current view.".to_string());
    }
    let bottom = Paragraph::new(detail.join("\n"))
        .block(Block::default().title("Conceded").borders(Borders::ALL));
    frame.render_widget(bottom, rows[1]);
}

fn render_set_pieces_tab(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(3)])
        .split(area);

    let summary = analysis::set_piece_summary(&state.plays_view);
    let mut lines = Vec::new();
    if summary.is_empty() {
        lines.push("No set-play rows in the current view.".to_string());
    } else {
        lines.push(format!(
            "{:<14} {:>8} {:>6} {:>7}",
            "Category", "Attempts", "Goals", "Conv%"
        ));
        for row in &summary {
            lines.push(format!(
                "{:<14} {:>8} {:>6} {:>6.0}%",
                row.label, row.attempts, row.goals, row.conversion_pct
            ));
        }
    }
    let top = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Set Pieces").borders(Borders::ALL));
    frame.render_widget(top, rows[0]);

    let mut detail = Vec::new();
    for play in &state.plays_view {
        let opponent = state
            .drilldown_match(&play.match_id)
            .map(|m| m.opponent.clone())
            .unwrap_or_else(|| play.match_id.clone());
        let goal = if play.goal_created { " GOAL" } else { "" };
        detail.push(format!(
            "vs {opponent}: {} \"{}\" ({}) taker {}{goal}",
            play.set_piece.label(),
            play.play_call_id,
            play.play_type,
            play.taker_notes,
        ));
    }
    if detail.is_empty() {
        detail.push("No attempts recorded.".to_string());
    }
    let bottom = Paragraph::new(detail.join("\n"))
        .block(Block::default().title("Attempts").borders(Borders::ALL));
    frame.render_widget(bottom, rows[1]);
}

fn render_drilldown(frame: &mut Frame, area: Rect, state: &AppState, match_id: &str) {
    let Some(m) = state.drilldown_match(match_id) else {
        let text = format!("Match not found: {match_id}\n\nb/Esc Back to Dashboard");
        let error = Paragraph::new(text)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().title("Game View").borders(Borders::ALL));
        frame.render_widget(error, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(6),
            Constraint::Length(7),
        ])
        .split(area);

    render_drilldown_header(frame, rows[0], state, m);
    render_drilldown_players(frame, rows[1], state, m);
    render_drilldown_set_plays(frame, rows[2], state, m);
    render_drilldown_notes(frame, rows[3], state, m);
}

fn render_drilldown_header(frame: &mut Frame, area: Rect, state: &AppState, m: &MatchRow) {
    let date = m
        .date
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "undated".to_string());
    let division = if m.division_game { "Yes" } else { "No" };
    let recording = if m.recording_url.is_empty() {
        "No game recording available for this match.".to_string()
    } else {
        format!("Recording: {}", m.recording_url)
    };

    let text = format!(
        "Game View – {date} vs {} ({})\nDivision: {division} | Result: {} | Score: {}-{}\n{recording}\nShare: {}",
        m.opponent,
        m.home_away.label(),
        m.result.label(),
        m.goals_for,
        m.goals_against,
        state.share_link(),
    );
    let header = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(header, area);
}

fn render_drilldown_players(frame: &mut Frame, area: Rect, state: &AppState, m: &MatchRow) {
    let breakdown =
        analysis::per_player_breakdown(&m.match_id, &state.tables.events, &state.tables.players);
    let mut lines = vec![format!(
        "{:<4} {:<20} {:<4} {:>4} {:>3} {:>3} {:>4}",
        "#", "Player", "Pos", "Sh", "G", "A", "Pts"
    )];
    for row in &breakdown {
        lines.push(format!(
            "{:<4} {:<20} {:<4} {:>4} {:>3} {:>3} {:>4}",
            row.jersey, row.name, row.position, row.shots, row.goals, row.assists, row.points
        ));
    }
    let table = Paragraph::new(lines.join("\n")).block(
        Block::default()
            .title("Per-Player Breakdown")
            .borders(Borders::ALL),
    );
    frame.render_widget(table, area);
}

fn render_drilldown_set_plays(frame: &mut Frame, area: Rect, state: &AppState, m: &MatchRow) {
    let mut lines = Vec::new();
    for play in state.tables.plays.iter().filter(|p| p.match_id == m.match_id) {
        let goal = if play.goal_created { " GOAL" } else { "" };
        lines.push(format!(
            "{} \"{}\" ({}) taker {}{goal}",
            play.set_piece.label(),
            play.play_call_id,
            play.play_type,
            play.taker_notes,
        ));
    }
    if lines.is_empty() {
        lines.push("No set-play rows for this match.".to_string());
    }
    let block = Paragraph::new(lines.join("\n")).block(
        Block::default()
            .title("Set-Play Attempts (this game)")
            .borders(Borders::ALL),
    );
    frame.render_widget(block, area);
}

fn render_drilldown_notes(frame: &mut Frame, area: Rect, state: &AppState, m: &MatchRow) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut notes = Vec::new();
    match state.summary_for(&m.match_id) {
        Some(summary) => {
            for (key, value) in &summary.notes {
                if !value.is_empty() {
                    notes.push(format!("{}: {value}", title_case(key)));
                }
            }
        }
        None => notes.push(
            "No coach notes yet for this game. Add a row in the summary tab with this match_id."
                .to_string(),
        ),
    }
    let notes = Paragraph::new(notes.join("\n"))
        .block(Block::default().title("Coach Notes").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(notes, cols[0]);

    let ai_text = match state.game_summaries.get(&m.match_id) {
        Some(text) => text.clone(),
        None if state.game_summary_pending.as_deref() == Some(m.match_id.as_str()) => {
            "AI is analyzing...".to_string()
        }
        None => "Press g to request an AI game summary.".to_string(),
    };
    let ai = Paragraph::new(ai_text)
        .block(
            Block::default()
                .title("AI Game Summary")
                .borders(Borders::ALL),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(ai, cols[1]);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, area);
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn format_match_date(m: &MatchRow, compact: bool) -> String {
    match m.date {
        Some(date) if compact => date.format("%m/%d").to_string(),
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => "--".to_string(),
    }
}

fn title_case(raw: &str) -> String {
    raw.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Varsity Terminal - Help",
        "",
        "Global:",
        "  r            Refresh (clears sheet cache)",
        "  c            Compact mode",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Dashboard:",
        "  Tab / 1-5    Switch tab",
        "  j/k or ↑/↓   Move selection",
        "  Enter / d    Open game drilldown",
        "  v            Division games only",
        "  h            Cycle Any/Home/Away",
        "  o            Opponent contains...",
        "  a            Ask the AI assistant",
        "  s / t        Quick AI actions",
        "  x            Clear chat history",
        "",
        "Drilldown:",
        "  b / Esc      Back to dashboard",
        "  g            Request AI game summary",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
