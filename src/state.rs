use std::collections::{HashMap, VecDeque};

use crate::query_params::{self, QueryMap};
use crate::tables::{EventRow, GoalAllowedRow, MatchRow, SetPlayRow, SummaryRow, TeamTables};
use crate::views::{self, MatchFilters};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Drilldown { match_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeTab {
    Games,
    Trends,
    Leaders,
    GoalsAllowed,
    SetPieces,
}

impl HomeTab {
    pub fn all() -> [HomeTab; 5] {
        [
            HomeTab::Games,
            HomeTab::Trends,
            HomeTab::Leaders,
            HomeTab::GoalsAllowed,
            HomeTab::SetPieces,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            HomeTab::Games => "Games",
            HomeTab::Trends => "Trends",
            HomeTab::Leaders => "Leaders",
            HomeTab::GoalsAllowed => "Goals Allowed",
            HomeTab::SetPieces => "Set Pieces",
        }
    }

    pub fn next(self) -> Self {
        match self {
            HomeTab::Games => HomeTab::Trends,
            HomeTab::Trends => HomeTab::Leaders,
            HomeTab::Leaders => HomeTab::GoalsAllowed,
            HomeTab::GoalsAllowed => HomeTab::SetPieces,
            HomeTab::SetPieces => HomeTab::Games,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            HomeTab::Games => HomeTab::SetPieces,
            HomeTab::Trends => HomeTab::Games,
            HomeTab::Leaders => HomeTab::Trends,
            HomeTab::GoalsAllowed => HomeTab::Leaders,
            HomeTab::SetPieces => HomeTab::GoalsAllowed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub tab: HomeTab,
    pub compact: bool,
    pub filters: MatchFilters,

    pub tables: TeamTables,
    pub tables_loaded: bool,
    pub matches_view: Vec<MatchRow>,
    pub events_view: Vec<EventRow>,
    pub plays_view: Vec<SetPlayRow>,
    pub ga_view: Vec<GoalAllowedRow>,

    pub selected: usize,
    pub query: QueryMap,

    pub chat_history: Vec<ChatMessage>,
    pub chat_input: String,
    pub chat_input_active: bool,
    pub ai_pending: bool,
    pub game_summaries: HashMap<String, String>,
    pub game_summary_pending: Option<String>,

    pub opponent_input_active: bool,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub last_refresh: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Home,
            tab: HomeTab::Games,
            compact: true,
            filters: MatchFilters::default(),
            tables: TeamTables::default(),
            tables_loaded: false,
            matches_view: Vec::new(),
            events_view: Vec::new(),
            plays_view: Vec::new(),
            ga_view: Vec::new(),
            selected: 0,
            query: QueryMap::new(),
            chat_history: Vec::new(),
            chat_input: String::new(),
            chat_input_active: false,
            ai_pending: false,
            game_summaries: HashMap::with_capacity(8),
            game_summary_pending: None,
            opponent_input_active: false,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
            last_refresh: None,
        }
    }

    /// Seed routing and filters from a deep link ("?match_id=...&ha=away").
    pub fn from_query(query: QueryMap) -> Self {
        let mut state = Self::new();
        state.compact = query_params::get_bool(&query, "compact", true);
        state.filters = MatchFilters::from_query(&query);
        if let Some(match_id) = query_params::get_match_id(&query) {
            state.screen = Screen::Drilldown { match_id };
        }
        state.query = query;
        state.sync_query();
        state
    }

    // ----- views -------------------------------------------------------

    /// Re-derive every view from the full tables plus the active filters.
    /// Views are never mutated in place; this is the only place they are
    /// produced.
    pub fn recompute_views(&mut self) {
        self.matches_view = views::apply_match_filters(&self.tables.matches, &self.filters);
        let (events_view, plays_view, ga_view) = views::derive_related_views(
            &self.matches_view,
            &self.tables.events,
            &self.tables.plays,
            &self.tables.goals_allowed,
        );
        self.events_view = events_view;
        self.plays_view = plays_view;
        self.ga_view = ga_view;
        self.clamp_selection();
    }

    pub fn selected_match(&self) -> Option<&MatchRow> {
        self.matches_view.get(self.selected)
    }

    /// Resolve a drilldown id against the filtered view (a filtered-out
    /// match renders the not-found state).
    pub fn drilldown_match(&self, match_id: &str) -> Option<&MatchRow> {
        self.matches_view.iter().find(|m| m.match_id == match_id)
    }

    pub fn summary_for(&self, match_id: &str) -> Option<&SummaryRow> {
        if match_id.is_empty() {
            return None;
        }
        self.tables
            .summaries
            .iter()
            .find(|s| s.match_id == match_id)
    }

    // ----- selection ---------------------------------------------------

    pub fn select_next(&mut self) {
        let total = self.matches_view.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.matches_view.len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.matches_view.len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    // ----- routing -----------------------------------------------------

    pub fn open_selected(&mut self) -> Option<String> {
        let match_id = self.selected_match().map(|m| m.match_id.clone())?;
        self.screen = Screen::Drilldown {
            match_id: match_id.clone(),
        };
        self.sync_query();
        Some(match_id)
    }

    /// Back to the dashboard: clears the parameter set wholesale, then the
    /// reconciliation writes the filters back without match_id.
    pub fn back_home(&mut self) {
        self.screen = Screen::Home;
        self.query.clear();
        self.sync_query();
    }

    /// Equality-gated reconciliation of the shareable query state; only
    /// rewrites the map when an encoded value actually changed.
    pub fn sync_query(&mut self) {
        let compact = self.compact.to_string();
        let div_only = self.filters.division_only.to_string();
        let opp = self.filters.opponent.trim().to_string();
        // Full word stored so "any" is never mistaken for away.
        let ha = self.filters.home_away.label().to_string();

        let mut desired: Vec<(&str, String)> = vec![
            ("compact", compact),
            ("div_only", div_only),
            ("opp", opp),
            ("ha", ha),
        ];
        if let Screen::Drilldown { match_id } = &self.screen {
            desired.push(("match_id", match_id.clone()));
        }

        if let Some(next) = query_params::merge_update(&self.query, &desired) {
            self.query = next;
        }
    }

    pub fn share_link(&self) -> String {
        format!("?{}", query_params::encode(&self.query))
    }

    // ----- filter actions ----------------------------------------------

    pub fn toggle_division_only(&mut self) {
        self.filters.division_only = !self.filters.division_only;
        self.recompute_views();
        self.sync_query();
    }

    pub fn cycle_home_away(&mut self) {
        self.filters.home_away = self.filters.home_away.cycle();
        self.recompute_views();
        self.sync_query();
    }

    pub fn set_opponent_filter(&mut self, opponent: String) {
        self.filters.opponent = opponent;
        self.recompute_views();
        self.sync_query();
    }

    pub fn toggle_compact(&mut self) {
        self.compact = !self.compact;
        self.sync_query();
    }

    // ----- logs --------------------------------------------------------

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetTables(TeamTables),
    AiTeamReply(String),
    SetGameSummary { match_id: String, text: String },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    RefreshTables { force: bool },
    AiTeamQuestion { question: String, filters: MatchFilters },
    AiGameSummary { match_id: String },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetTables(tables) => {
            state.push_log(format!(
                "[INFO] Loaded {} matches, {} players, {} events, {} plays, {} summaries, {} goals allowed",
                tables.matches.len(),
                tables.players.len(),
                tables.events.len(),
                tables.plays.len(),
                tables.summaries.len(),
                tables.goals_allowed.len(),
            ));
            state.tables = tables;
            state.tables_loaded = true;
            // Old per-game summaries may describe rows that no longer exist.
            state.game_summaries.clear();
            state.recompute_views();
        }
        Delta::AiTeamReply(content) => {
            state.ai_pending = false;
            state.chat_history.push(ChatMessage {
                role: ChatRole::Assistant,
                content,
            });
        }
        Delta::SetGameSummary { match_id, text } => {
            if state.game_summary_pending.as_deref() == Some(match_id.as_str()) {
                state.game_summary_pending = None;
            }
            state.game_summaries.insert(match_id, text);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
