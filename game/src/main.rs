//! Veritaminal — interactive terminal game
//!
//! Shift screen layout:
//!   ┌─── header: day / score / trust & corruption ────────────────────────┐
//!   ├─── document panel ──────────────┬─── booth transcript ──────────────┤
//!   │  the traveler's papers          │  arrivals, hints, narration       │
//!   ├─────────────────────────────────┴───────────────────────────────────┤
//!   │  status line + command input (approve / deny / hint / ...)          │
//!   ├─────────────────────────────────────────────────────────────────────┤
//!   │  footer (key bindings)                                              │
//!   └─────────────────────────────────────────────────────────────────────┘
//!
//! The other screens (menu, border select, save select, feedback, game
//! over) are full-screen panels; `rules` and `help` open popups over the
//! shift screen.

mod config;

use std::io;
use std::path::Path;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::{error, info, warn};

use veritaminal_borders::catalog;
use veritaminal_contracts::{
    border::BorderSetting,
    decision::Decision,
    error::{GameResult, VeritaminalError},
    report::Assessment,
    story::{Ending, EndingKind, MAX_DAYS},
};
use veritaminal_core::{ContentSource, DocumentFlaw, Outcome, ShiftEngine};
use veritaminal_memory::{SaveEntry, SaveStore};
use veritaminal_narrative::{CORRUPTION_LIMIT, TRUST_FLOOR, WINNING_SCORE};

/// Transcript lines kept in memory; older lines scroll away.
const TRANSCRIPT_CAP: usize = 200;

// ── Screens and view state ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu,
    BorderSelect,
    SaveSelect,
    BorderInfo,
    GameRules,
    Shift,
    Feedback,
    GameOver,
}

/// Popups available over the shift screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlay {
    Rules,
    Help,
}

/// Everything the feedback screen shows for one decision.
struct FeedbackView {
    outcome: Outcome,
    /// Veritas's call, captured before the decision. `None` when the
    /// source could not produce one; the screen degrades gracefully.
    assessment: Option<Assessment>,
}

/// Session statistics shown on the main menu once a career has finished.
#[derive(Debug, Default)]
struct CareerStats {
    games_completed: u32,
    total_score: u32,
    borders_served: Vec<String>,
    highest_day: u32,
}

impl CareerStats {
    fn record(&mut self, border_name: String, score: u32, days_served: u32) {
        self.games_completed += 1;
        self.total_score += score;
        if !self.borders_served.contains(&border_name) {
            self.borders_served.push(border_name);
        }
        self.highest_day = self.highest_day.max(days_served);
    }
}

// ── App state ─────────────────────────────────────────────────────────────────

struct App {
    screen: Screen,
    source: Box<dyn ContentSource>,
    store: SaveStore,
    engine: Option<ShiftEngine>,

    // Menu data.
    borders: Vec<BorderSetting>,
    saves: Vec<SaveEntry>,
    save_index: usize,

    // Shift screen state.
    input: String,
    transcript: Vec<String>,
    status: Option<String>,
    overlay: Option<Overlay>,
    confirm_quit: bool,

    feedback: Option<FeedbackView>,
    ending: Option<Ending>,

    stats: CareerStats,
    should_quit: bool,
}

impl App {
    fn new(source: Box<dyn ContentSource>, store: SaveStore) -> Self {
        Self {
            screen: Screen::Menu,
            source,
            store,
            engine: None,
            borders: catalog::available_settings(),
            saves: Vec::new(),
            save_index: 0,
            input: String::new(),
            transcript: Vec::new(),
            status: None,
            overlay: None,
            confirm_quit: false,
            feedback: None,
            ending: None,
            stats: CareerStats::default(),
            should_quit: false,
        }
    }

    fn push_transcript(&mut self, line: String) {
        self.transcript.push(line);
        if self.transcript.len() > TRANSCRIPT_CAP {
            let excess = self.transcript.len() - TRANSCRIPT_CAP;
            self.transcript.drain(..excess);
        }
    }

    // ── Career lifecycle ──────────────────────────────────────────────────────

    /// Start a fresh career at `border_id` and bring the first traveler up.
    fn start_career(&mut self, border_id: &str) -> GameResult<()> {
        let engine = catalog::shift_for(border_id)?;
        info!(border_id, "new career started");

        self.transcript.clear();
        self.input.clear();
        self.status = None;
        self.ending = None;

        let banner = engine.current_day_start().banner();
        self.engine = Some(engine);
        self.push_transcript(banner);
        self.screen = Screen::Shift;
        self.ensure_traveler();
        Ok(())
    }

    /// Resume the career stored at `path`.
    fn load_career(&mut self, path: &Path) -> GameResult<()> {
        let log = self.store.load(path)?;
        let setting = catalog::setting_by_id(&log.border_id).ok_or_else(|| {
            VeritaminalError::Config {
                reason: format!("save references unknown border '{}'", log.border_id),
            }
        })?;
        let rulebook = catalog::rulebook_for(&setting.id)?;
        let milestones = catalog::milestones_for(&setting.id)?;
        let engine = ShiftEngine::resume(setting, rulebook, milestones, log);
        info!(path = %path.display(), day = engine.day(), "career resumed");

        self.transcript.clear();
        self.input.clear();
        self.status = None;

        // A save taken after the career resolved goes straight to the
        // ending screen; session statistics only count live careers.
        if let Some(ending) = engine.check_game_over() {
            self.engine = Some(engine);
            self.ending = Some(ending);
            self.screen = Screen::GameOver;
            return Ok(());
        }

        let banner = engine.current_day_start().banner();
        let resumed = format!("Career resumed at {} (day {}).", engine.border().name, engine.day());
        self.engine = Some(engine);
        self.push_transcript(resumed);
        self.push_transcript(banner);
        self.screen = Screen::Shift;
        self.ensure_traveler();
        Ok(())
    }

    /// Bring a traveler to the booth if none is waiting.
    fn ensure_traveler(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if engine.pending().is_some() {
            return;
        }
        match engine.next_traveler(self.source.as_ref()) {
            Ok(encounter) => {
                let line = format!(
                    "A traveler approaches: {} ({}).",
                    encounter.document.name, encounter.document.permit
                );
                self.push_transcript(line);
            }
            Err(e) => {
                warn!(error = %e, "traveler generation failed");
                self.status = Some(format!("The queue stalls: {}", e));
            }
        }
    }

    /// Conclude the live career and show the ending screen.
    fn finish_career(&mut self, ending: Ending) {
        if let Some(engine) = self.engine.as_ref() {
            let days_served = engine.day().saturating_sub(1).min(MAX_DAYS);
            self.stats
                .record(engine.border().name.clone(), engine.score(), days_served);
        }
        self.ending = Some(ending);
        self.screen = Screen::GameOver;
    }

    /// Drop the current career and return to the menu. The last autosave
    /// stays on disk.
    fn back_to_menu(&mut self) {
        self.engine = None;
        self.feedback = None;
        self.ending = None;
        self.overlay = None;
        self.confirm_quit = false;
        self.input.clear();
        self.status = None;
        self.transcript.clear();
        self.screen = Screen::Menu;
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    fn submit_command(&mut self, raw: &str) {
        self.status = None;
        let cmd = raw.trim().to_ascii_lowercase();
        match cmd.as_str() {
            "" => {}
            "approve" => self.decide(Decision::Approve),
            "deny" => self.decide(Decision::Deny),
            "hint" => self.show_hint(),
            "rules" => self.overlay = Some(Overlay::Rules),
            "help" => self.overlay = Some(Overlay::Help),
            "save" => self.save_career(),
            "quit" => self.confirm_quit = true,
            other => {
                self.status = Some(format!(
                    "Unknown command '{}'. Type 'help' for the list.",
                    other
                ));
            }
        }
        // A failed generation leaves the booth empty; quietly retry so the
        // player is never stuck without a traveler.
        if self.screen == Screen::Shift {
            self.ensure_traveler();
        }
    }

    fn decide(&mut self, decision: Decision) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if engine.pending().is_none() {
            self.status = Some("No traveler at the booth.".to_string());
            return;
        }

        // Capture Veritas's call before the decision consumes the encounter.
        let assessment = match engine.assessment(self.source.as_ref()) {
            Ok(a) => Some(a),
            Err(e) => {
                warn!(error = %e, "assessment unavailable");
                None
            }
        };

        match engine.decide(decision, self.source.as_ref()) {
            Ok(outcome) => {
                let verb = match outcome.verdict.decision {
                    Decision::Approve => "approved",
                    Decision::Deny => "denied",
                };
                let line = format!("You {} {}.", verb, outcome.document.name);
                let narrative = outcome.narrative.clone();
                self.push_transcript(line);
                self.push_transcript(narrative);
                self.feedback = Some(FeedbackView {
                    outcome,
                    assessment,
                });
                self.screen = Screen::Feedback;
            }
            Err(e) => {
                error!(error = %e, "decision failed");
                self.status = Some(e.to_string());
            }
        }
    }

    /// End the day after feedback: advance, autosave, check the ending.
    fn end_day(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        let banner = engine.advance_day().banner();
        self.transcript.push(banner);

        match self.store.save(engine.log()) {
            Ok(path) => info!(path = %path.display(), "autosaved at day end"),
            Err(e) => {
                warn!(error = %e, "autosave failed");
                self.status = Some(format!("Autosave failed: {}", e));
            }
        }

        if let Some(ending) = engine.check_game_over() {
            self.finish_career(ending);
        } else {
            self.screen = Screen::Shift;
            self.ensure_traveler();
        }
    }

    fn show_hint(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        match engine.hint(self.source.as_ref()) {
            Ok(hint) => {
                let line = format!("Veritas: {}", hint);
                self.push_transcript(line);
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn save_career(&mut self) {
        let Some(engine) = self.engine.as_ref() else {
            return;
        };
        match self.store.save(engine.log()) {
            Ok(path) => self.status = Some(format!("Career saved to {}.", path.display())),
            Err(e) => self.status = Some(format!("Save failed: {}", e)),
        }
    }

    fn open_saves(&mut self) {
        match self.store.list() {
            Ok(entries) if entries.is_empty() => {
                self.status = Some("No saved careers found.".to_string());
            }
            Ok(entries) => {
                self.saves = entries;
                self.save_index = 0;
                self.status = None;
                self.screen = Screen::SaveSelect;
            }
            Err(e) => self.status = Some(format!("Cannot list saves: {}", e)),
        }
    }

    fn load_selected(&mut self) {
        let Some(path) = self.saves.get(self.save_index).map(|e| e.path.clone()) else {
            return;
        };
        if let Err(e) = self.load_career(&path) {
            warn!(path = %path.display(), error = %e, "save rejected");
            self.status = Some(format!("Cannot load: {}", e));
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.overlay.is_some() {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')
            ) {
                self.overlay = None;
            }
            return;
        }

        if self.confirm_quit {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    info!("career left at the booth");
                    self.back_to_menu();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return;
        }

        match self.screen {
            Screen::Menu => self.handle_menu_key(key.code),
            Screen::BorderSelect => self.handle_border_select_key(key.code),
            Screen::SaveSelect => self.handle_save_select_key(key.code),
            Screen::BorderInfo | Screen::GameRules => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.screen = Screen::Menu;
                }
            }
            Screen::Shift => self.handle_shift_key(key.code),
            Screen::Feedback => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.feedback = None;
                    self.end_day();
                }
            }
            Screen::GameOver => match key.code {
                KeyCode::Char('n') | KeyCode::Char('N') => self.back_to_menu(),
                KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
                _ => {}
            },
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('1') => {
                self.status = None;
                self.screen = Screen::BorderSelect;
            }
            KeyCode::Char('2') => self.open_saves(),
            KeyCode::Char('3') => self.screen = Screen::BorderInfo,
            KeyCode::Char('4') => self.screen = Screen::GameRules,
            KeyCode::Char('5') | KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_border_select_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                if index < self.borders.len() {
                    let id = self.borders[index].id.clone();
                    if let Err(e) = self.start_career(&id) {
                        error!(border_id = %id, error = %e, "career start failed");
                        self.status = Some(format!("Cannot start career: {}", e));
                    }
                }
            }
            KeyCode::Esc => self.screen = Screen::Menu,
            _ => {}
        }
    }

    fn handle_save_select_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.save_index = self.save_index.saturating_sub(1),
            KeyCode::Down => {
                if self.save_index + 1 < self.saves.len() {
                    self.save_index += 1;
                }
            }
            KeyCode::Enter => self.load_selected(),
            KeyCode::Esc => self.screen = Screen::Menu,
            _ => {}
        }
    }

    fn handle_shift_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                let raw = std::mem::take(&mut self.input);
                self.submit_command(&raw);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => self.confirm_quit = true,
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn ui(f: &mut Frame, app: &App) {
    match app.screen {
        Screen::Menu => render_menu(f, app),
        Screen::BorderSelect => render_border_select(f, app),
        Screen::SaveSelect => render_save_select(f, app),
        Screen::BorderInfo => render_border_info(f, app),
        Screen::GameRules => render_game_rules(f),
        Screen::Shift => render_shift(f, app),
        Screen::Feedback => render_feedback(f, app),
        Screen::GameOver => render_game_over(f, app),
    }

    if app.overlay.is_some() || app.confirm_quit {
        render_popup(f, app);
    }
}

fn title_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn dim_border() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn render_menu(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // title
            Constraint::Min(9),    // menu items
            Constraint::Length(5), // session stats
        ])
        .split(f.area());

    let title = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("V E R I T A M I N A L", title_style())),
        Line::from(Span::styled(
            "document verification at the edge of the map",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(dim_border()));
    f.render_widget(title, chunks[0]);

    let mut lines = vec![
        Line::from(""),
        menu_item("1", "New career"),
        menu_item("2", "Continue from a save"),
        menu_item("3", "View borders"),
        menu_item("4", "Game rules"),
        menu_item("5", "Quit"),
    ];
    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::Yellow),
        )));
    }
    let menu = Paragraph::new(lines).block(
        Block::default()
            .title(" Main Menu ")
            .borders(Borders::ALL)
            .border_style(dim_border()),
    );
    f.render_widget(menu, chunks[1]);

    let stats_lines = if app.stats.games_completed > 0 {
        vec![
            Line::from(format!(
                "  Careers completed: {}   Total score: {}   Highest day: {}",
                app.stats.games_completed, app.stats.total_score, app.stats.highest_day
            )),
            Line::from(format!(
                "  Borders served: {}",
                app.stats.borders_served.join(", ")
            )),
        ]
    } else {
        vec![Line::from(Span::styled(
            "  No careers finished this session.",
            Style::default().fg(Color::DarkGray),
        ))]
    };
    let stats = Paragraph::new(stats_lines).block(
        Block::default()
            .title(" Session ")
            .borders(Borders::ALL)
            .border_style(dim_border()),
    );
    f.render_widget(stats, chunks[2]);
}

fn menu_item(key: &str, label: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  [{}] ", key), Style::default().fg(Color::Cyan)),
        Span::raw(label.to_string()),
    ])
}

fn render_border_select(f: &mut Frame, app: &App) {
    let mut lines = vec![Line::from("")];
    for (i, setting) in app.borders.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("  [{}] ", i + 1), Style::default().fg(Color::Cyan)),
            Span::styled(
                setting.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("      {}", setting.description),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        "  [Esc] back",
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Choose a posting ")
            .borders(Borders::ALL)
            .border_style(dim_border()),
    );
    f.render_widget(panel, f.area());
}

fn render_save_select(f: &mut Frame, app: &App) {
    let mut items: Vec<ListItem> = Vec::new();
    for (i, entry) in app.saves.iter().enumerate() {
        let border_name = catalog::setting_by_id(&entry.border_id)
            .map(|s| s.name)
            .unwrap_or_else(|| entry.border_id.clone());
        let marker = if i == app.save_index { "> " } else { "  " };
        let style = if i == app.save_index {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        items.push(ListItem::new(Line::from(Span::styled(
            format!(
                "{}{:<24} day {:>2}   score {:>2}   {}",
                marker,
                border_name,
                entry.day,
                entry.score,
                entry.saved_at.format("%Y-%m-%d %H:%M")
            ),
            style,
        ))));
    }
    if let Some(status) = &app.status {
        items.push(ListItem::new(""));
        items.push(ListItem::new(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::Red),
        )));
    }
    items.push(ListItem::new(""));
    items.push(ListItem::new(Span::styled(
        "  [Up/Down] select   [Enter] load   [Esc] back",
        Style::default().fg(Color::DarkGray),
    )));

    let list = List::new(items).block(
        Block::default()
            .title(" Saved careers ")
            .borders(Borders::ALL)
            .border_style(dim_border()),
    );
    f.render_widget(list, f.area());
}

fn render_border_info(f: &mut Frame, app: &App) {
    let mut lines = vec![Line::from("")];
    for setting in &app.borders {
        lines.push(Line::from(Span::styled(
            format!("  {}", setting.name),
            title_style(),
        )));
        lines.push(Line::from(format!("  {}", setting.description)));
        lines.push(Line::from(Span::styled(
            format!("  {}", setting.situation),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from("  Requires:"));
        for req in &setting.document_requirements {
            lines.push(Line::from(format!("    - {}", req)));
        }
        lines.push(Line::from("  Watch for:"));
        for issue in &setting.common_issues {
            lines.push(Line::from(Span::styled(
                format!("    - {}", issue),
                Style::default().fg(Color::Yellow),
            )));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "  [Esc] back",
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" The borders ")
            .borders(Borders::ALL)
            .border_style(dim_border()),
    );
    f.render_widget(panel, f.area());
}

fn render_game_rules(f: &mut Frame) {
    let lines = vec![
        Line::from(""),
        Line::from(format!(
            "  A career runs up to {} days, one traveler per day.",
            MAX_DAYS
        )),
        Line::from("  Inspect the papers and the directives in force, then approve or deny."),
        Line::from(""),
        Line::from("  Correct calls score a point and build trust."),
        Line::from(format!(
            "  Waving a forgery through raises corruption; corruption {} ends the career.",
            CORRUPTION_LIMIT
        )),
        Line::from(format!(
            "  Turning away honest travelers burns trust; trust {} ends the career.",
            TRUST_FLOOR
        )),
        Line::from(format!(
            "  Survive all {} days with a score of {} or better for a commendation.",
            MAX_DAYS, WINNING_SCORE
        )),
        Line::from(""),
        Line::from("  New directives come into force as the days pass; check 'rules' each"),
        Line::from("  morning. The career autosaves at the end of every day, and save files"),
        Line::from("  are tamper-evident: an edited file will not load."),
        Line::from(""),
        Line::from(Span::styled(
            "  [Esc] back",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" How the job works ")
            .borders(Borders::ALL)
            .border_style(dim_border()),
    );
    f.render_widget(panel, f.area());
}

fn render_shift(f: &mut Frame, app: &App) {
    let Some(engine) = app.engine.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header HUD
            Constraint::Min(8),    // document + transcript
            Constraint::Length(1), // status line
            Constraint::Length(3), // command input
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    // ── Header ────────────────────────────────────────────────────────────────

    let header = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", engine.border().name), title_style()),
        Span::raw(format!(
            "   Day {} of {}   Score {}   {}",
            engine.day(),
            MAX_DAYS,
            engine.score(),
            engine.story().summary()
        )),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(dim_border()));
    f.render_widget(header, chunks[0]);

    // ── Document and transcript ───────────────────────────────────────────────

    let mid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(chunks[1]);

    render_document(f, mid[0], app);
    render_transcript(f, mid[1], app);

    // ── Status, input, footer ─────────────────────────────────────────────────

    let status = Paragraph::new(match &app.status {
        Some(s) => Line::from(Span::styled(
            format!(" {}", s),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(""),
    });
    f.render_widget(status, chunks[2]);

    let input = Paragraph::new(Line::from(vec![
        Span::raw(format!(" > {}", app.input)),
        Span::styled("_", Style::default().fg(Color::Cyan)),
    ]))
    .block(
        Block::default()
            .title(" Command ")
            .borders(Borders::ALL)
            .border_style(dim_border()),
    );
    f.render_widget(input, chunks[3]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" approve · deny · hint · rules · help · save · quit ", Style::default().fg(Color::Gray)),
        Span::styled("[Enter]", Style::default().fg(Color::Cyan)),
        Span::raw(" submit  "),
        Span::styled("[Esc]", Style::default().fg(Color::Cyan)),
        Span::raw(" quit"),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(dim_border()));
    f.render_widget(footer, chunks[4]);
}

fn render_document(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Traveler documents ")
        .borders(Borders::ALL)
        .border_style(dim_border());

    let Some(encounter) = app.engine.as_ref().and_then(|e| e.pending()) else {
        let empty = Paragraph::new(Span::styled(
            "  The booth is empty.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    };

    let doc = &encounter.document;
    let field = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(
                format!("  {:<10}", label),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(value),
        ])
    };

    let seals = if doc.seals.is_empty() {
        "(none)".to_string()
    } else {
        doc.seals.join(", ")
    };
    let issued = doc
        .issued_on
        .map(|d| d.to_string())
        .unwrap_or_else(|| "(missing)".to_string());
    let expires = doc
        .expires_on
        .map(|d| d.to_string())
        .unwrap_or_else(|| "(missing)".to_string());

    let lines = vec![
        Line::from(""),
        field("Name:", doc.name.clone()),
        field("Permit:", doc.permit.clone()),
        field("Seals:", seals),
        field("Issued:", issued),
        field("Expires:", expires),
        Line::from(""),
        Line::from(Span::styled(
            "  Backstory:",
            Style::default().fg(Color::Gray),
        )),
        Line::from(format!("  {}", doc.backstory)),
    ];

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(panel, area);
}

fn render_transcript(f: &mut Frame, area: Rect, app: &App) {
    let width = area.width.saturating_sub(3) as usize;
    let height = area.height.saturating_sub(2) as usize;

    let wrapped: Vec<String> = app
        .transcript
        .iter()
        .flat_map(|entry| wrap_text(entry, width))
        .collect();
    let skip = wrapped.len().saturating_sub(height);

    let items: Vec<ListItem> = wrapped
        .into_iter()
        .skip(skip)
        .map(|line| ListItem::new(format!(" {}", line)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Booth transcript ")
            .borders(Borders::ALL)
            .border_style(dim_border()),
    );
    f.render_widget(list, area);
}

fn render_feedback(f: &mut Frame, app: &App) {
    let Some(feedback) = app.feedback.as_ref() else {
        return;
    };
    let Some(engine) = app.engine.as_ref() else {
        return;
    };
    let outcome = &feedback.outcome;

    let (title, color) = if outcome.verdict.correct {
        ("CORRECT DECISION", Color::Green)
    } else {
        ("WRONG DECISION", Color::Red)
    };

    let verb = match outcome.verdict.decision {
        Decision::Approve => "approved",
        Decision::Deny => "denied",
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("You {} {}.", verb, outcome.document.name)),
    ];

    if !outcome.verdict.correct && !outcome.report.valid {
        lines.push(Line::from(Span::styled(
            format!("The checklist found: {}", outcome.report.summary()),
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some(flaw) = outcome.flaw {
        lines.push(Line::from(Span::styled(
            format!("The document had been tampered with: {}.", flaw_label(flaw)),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(outcome.narrative.clone()));
    lines.push(Line::from(""));

    if let Some(assessment) = &feedback.assessment {
        lines.push(Line::from(Span::styled(
            format!(
                "Veritas recommended {} ({:.0}% confident): {}",
                assessment.verdict,
                assessment.confidence * 100.0,
                assessment.reasoning
            ),
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(format!(
        "Score {}   {}",
        engine.score(),
        engine.story().summary()
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "[Enter] end the day",
        Style::default().fg(Color::Cyan),
    )));

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Decision ")
                .borders(Borders::ALL)
                .border_style(dim_border()),
        );
    f.render_widget(panel, f.area());
}

fn render_game_over(f: &mut Frame, app: &App) {
    let Some(ending) = app.ending.as_ref() else {
        return;
    };

    let (label, color) = match ending.kind {
        EndingKind::Good => ("COMMENDATION", Color::Green),
        EndingKind::Bad => ("DISCHARGE", Color::Yellow),
        EndingKind::Corrupt => ("DISMISSAL", Color::Red),
        EndingKind::Strict => ("REASSIGNMENT", Color::Red),
    };
    let closing = match ending.kind {
        EndingKind::Good => "Congratulations! You've successfully completed your mission.",
        EndingKind::Corrupt => "Your corruption has caught up with you.",
        EndingKind::Strict => "Your strict adherence to rules has made you unpopular.",
        EndingKind::Bad => "Your career has come to an unfortunate end.",
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(ending.message.clone()),
        Line::from(Span::styled(closing, Style::default().fg(Color::Gray))),
        Line::from(""),
    ];

    if let Some(engine) = app.engine.as_ref() {
        let story = engine.story();
        lines.push(Line::from(format!(
            "Days served: {}   Final score: {}",
            engine.day().saturating_sub(1).min(MAX_DAYS),
            engine.score()
        )));
        lines.push(Line::from(format!(
            "Approvals: {}   Denials: {}   {}",
            story.approvals,
            story.denials,
            story.summary()
        )));
        lines.push(Line::from(""));

        let tail = engine.log().recent(3);
        if !tail.is_empty() {
            lines.push(Line::from(Span::styled(
                "Last entries in the ledger:",
                Style::default().fg(Color::Gray),
            )));
            for rec in tail {
                lines.push(Line::from(Span::styled(
                    format!(
                        "day {}  {}  {} ({})",
                        rec.record.day,
                        rec.record.traveler_name,
                        rec.record.decision,
                        if rec.record.correct { "correct" } else { "wrong" }
                    ),
                    Style::default().fg(Color::Gray),
                )));
            }
            lines.push(Line::from(""));
        }
    }

    lines.push(Line::from(vec![
        Span::styled("[n]", Style::default().fg(Color::Cyan)),
        Span::raw(" main menu   "),
        Span::styled("[q]", Style::default().fg(Color::Cyan)),
        Span::raw(" quit"),
    ]));

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" End of career ")
                .borders(Borders::ALL)
                .border_style(dim_border()),
        );
    f.render_widget(panel, f.area());
}

fn render_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(64, 60, f.area());
    f.render_widget(Clear, area);

    let (title, lines) = if app.confirm_quit {
        (
            " Leave the booth? ",
            vec![
                Line::from(""),
                Line::from("Return to the main menu?"),
                Line::from("Progress since the last autosave will be lost."),
                Line::from(""),
                Line::from(Span::styled(
                    "[y] leave   [n] stay",
                    Style::default().fg(Color::Cyan),
                )),
            ],
        )
    } else {
        match app.overlay {
            Some(Overlay::Rules) => (" Directives in force ", rules_lines(app)),
            Some(Overlay::Help) => (" Commands ", help_lines()),
            None => return,
        }
    };

    let popup = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(popup, area);
}

fn rules_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];
    if let Some(engine) = app.engine.as_ref() {
        for rule in engine.rulebook().active_rules(engine.day()) {
            lines.push(Line::from(Span::styled(
                format!("  {}", rule.name),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                format!("    {}", rule.description),
                Style::default().fg(Color::Gray),
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  [Esc] close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from("  approve  stamp the document and wave the traveler through"),
        Line::from("  deny     turn the traveler away"),
        Line::from("  hint     ask Veritas for a nudge"),
        Line::from("  rules    show the directives in force today"),
        Line::from("  save     write the career to disk now"),
        Line::from("  quit     leave the booth (asks first)"),
        Line::from(""),
        Line::from(Span::styled(
            "  [Esc] close",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

/// Label for a planted flaw, shown in post-decision feedback.
fn flaw_label(flaw: DocumentFlaw) -> &'static str {
    match flaw {
        DocumentFlaw::PermitPrefix => "the permit prefix was altered",
        DocumentFlaw::PermitSuffix => "an extra character was added to the permit",
        DocumentFlaw::DroppedSurname => "the surname was dropped",
        DocumentFlaw::MissingSeals => "the seals were stripped",
        DocumentFlaw::ReversedDates => "the issue and expiry dates were swapped",
        DocumentFlaw::MissingExpiry => "the expiry date was removed",
    }
}

// ── Layout helpers ────────────────────────────────────────────────────────────

/// A rect centered in `r`, `percent_x` wide and `percent_y` tall.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
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

/// Greedy word wrap for transcript entries; the List widget does not wrap.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    lines.push(current);
    lines
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}

fn run_tui(app: &mut App) -> io::Result<()> {
    // Restore the terminal before printing any panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let loop_result = event_loop(&mut terminal, app);
    let restore_result = restore_terminal(&mut terminal);
    loop_result.and(restore_result)
}

fn main() {
    let cli = config::Cli::parse();

    if let Err(e) = config::init_logging(cli.debug) {
        eprintln!("Game error: {}", e);
        std::process::exit(1);
    }

    info!(version = env!("CARGO_PKG_VERSION"), "veritaminal starting");

    let source = config::select_source(cli.offline);
    let store = SaveStore::new(&cli.saves_dir);
    let mut app = App::new(source, store);

    // Resolve the startup mode before touching the terminal so any error
    // prints cleanly to stderr.
    let startup = if let Some(path) = cli.load.as_deref() {
        app.load_career(path)
    } else if cli.skip_menu {
        let id = catalog::default_setting().id;
        app.start_career(&id)
    } else {
        Ok(())
    };
    if let Err(e) = startup {
        eprintln!("Game error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_tui(&mut app) {
        eprintln!("Game error: {}", e);
        std::process::exit(1);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
