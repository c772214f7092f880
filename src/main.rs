use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap};

use matchup_terminal::api::{HttpStatsApi, StatsApi};
use matchup_terminal::config::{AppConfig, StatsSource};
use matchup_terminal::confidence::ConfidenceTier;
use matchup_terminal::demo_api::DemoStatsApi;
use matchup_terminal::history_export;
use matchup_terminal::http_client;
use matchup_terminal::session::SessionOrchestrator;
use matchup_terminal::state::{AppState, TeamStats, View};

struct App {
    session: SessionOrchestrator,
    config: AppConfig,
    should_quit: bool,
}

impl App {
    fn new(session: SessionOrchestrator, config: AppConfig) -> Self {
        Self {
            session,
            config,
            should_quit: false,
        }
    }

    fn state(&self) -> &AppState {
        &self.session.state
    }

    fn on_key(&mut self, key: KeyEvent) {
        let state = &mut self.session.state;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => state.view = View::Overview,
            KeyCode::Char('2') => state.view = View::Compare,
            KeyCode::Tab => state.toggle_view(),
            KeyCode::Char('j') | KeyCode::Down => state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => state.select_prev(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                state.push_log("[INFO] Reloading team list");
                self.session.load_team_roster();
            }
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_history(),
            KeyCode::Char('?') => state.help_overlay = !state.help_overlay,
            KeyCode::Enter if state.view == View::Overview => {
                let team = state.cursor_team().unwrap_or_default().to_string();
                self.session.select_team_and_fetch_stats(&team);
            }
            KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P')
                if state.view == View::Compare =>
            {
                self.session.predict_picked();
            }
            KeyCode::Char('a') | KeyCode::Char('A') if state.view == View::Compare => {
                state.pick_team1()
            }
            KeyCode::Char('b') | KeyCode::Char('B') if state.view == View::Compare => {
                state.pick_team2()
            }
            KeyCode::Char('x') | KeyCode::Char('X') if state.view == View::Compare => {
                state.clear_picks()
            }
            _ => {}
        }
    }

    fn export_history(&mut self) {
        let state = &mut self.session.state;
        if state.history.is_empty() {
            state.push_log("[INFO] No predictions to export yet");
            return;
        }
        let path = history_export::default_export_path(&self.config.export_dir);
        match history_export::export_history(&path, &state.history) {
            Ok(rows) => state.push_log(format!(
                "[INFO] Exported {rows} predictions to {}",
                path.display()
            )),
            Err(err) => state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env()?;
    let api: Arc<dyn StatsApi> = match config.source {
        StatsSource::Http => {
            http_client::init_http_client(config.request_timeout_secs)?;
            Arc::new(HttpStatsApi::new(config.api_base_url.clone()))
        }
        StatsSource::Demo => Arc::new(DemoStatsApi::new()),
    };

    let mut session = SessionOrchestrator::with_worker(api);
    session.state.push_log(match config.source {
        StatsSource::Http => format!(
            "[INFO] Source: {} (timeout {}s)",
            config.api_base_url, config.request_timeout_secs
        ),
        StatsSource::Demo => "[INFO] Source: offline demo data".to_string(),
    });
    session.load_team_roster();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(session, config);
    let res = run_app(&mut terminal, &mut app);

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

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);

    loop {
        app.session.pump();

        terminal.draw(|f| ui(f, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = app.state();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(30)])
        .split(chunks[1]);

    let roster = Paragraph::new(roster_text(state))
        .block(Block::default().title("Teams").borders(Borders::ALL));
    frame.render_widget(roster, body[0]);

    match state.view {
        View::Overview => render_overview(frame, body[1], state),
        View::Compare => render_compare(frame, body[1], state),
    }

    let error = Paragraph::new(
        state
            .error
            .as_ref()
            .map(|e| format!("Error: {e}"))
            .unwrap_or_default(),
    )
    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    frame.render_widget(error, chunks[2]);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text(state));
    frame.render_widget(footer, chunks[4]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let view = match state.view {
        View::Overview => "TEAM OVERVIEW",
        View::Compare => "COMPARE TEAMS",
    };
    let status = if state.roster_loading() {
        " | loading teams..."
    } else if state.stats_loading() || !state.in_flight.is_empty() {
        " | working..."
    } else {
        ""
    };
    format!(" \\_/  MATCHUP | {view}{status}\n  |\n ---")
}

fn footer_text(state: &AppState) -> String {
    match state.view {
        View::Overview => {
            "1/2/Tab View | j/k Move | Enter Stats | r Reload | e Export | ? Help | q Quit".to_string()
        }
        View::Compare => {
            "1/2/Tab View | j/k Move | a/b Pick | x Clear | p/Enter Predict | e Export | ? Help | q Quit"
                .to_string()
        }
    }
}

fn roster_text(state: &AppState) -> String {
    if state.roster.is_empty() {
        return if state.roster_loading() {
            "Loading...".to_string()
        } else {
            "No teams".to_string()
        };
    }

    let mut lines = Vec::new();
    for (idx, team) in state.roster.iter().enumerate() {
        let prefix = if idx == state.cursor { "> " } else { "  " };
        let tag = match state.view {
            View::Overview if state.selected_team.as_deref() == Some(team.as_str()) => " *",
            View::Compare if state.team1.as_deref() == Some(team.as_str()) => " [1]",
            View::Compare if state.team2.as_deref() == Some(team.as_str()) => " [2]",
            _ => "",
        };
        lines.push(format!("{prefix}{team}{tag}"));
    }
    lines.join("\n")
}

fn render_overview(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(area);

    let stats = Paragraph::new(stats_text(state))
        .block(Block::default().title("Stats").borders(Borders::ALL));
    frame.render_widget(stats, rows[0]);

    let recent = Paragraph::new(recent_matches_text(state))
        .block(Block::default().title("Recent Matches").borders(Borders::ALL));
    frame.render_widget(recent, rows[1]);
}

fn stats_text(state: &AppState) -> String {
    match state.team_stats.present() {
        Some(stats) => format!(
            "{}\nTotal Games: {}   Win Rate: {}   Avg Score: {}",
            stats.team,
            stats.games_played,
            stats.win_rate_text(),
            stats.avg_score_text()
        ),
        None if state.stats_loading() => "Loading stats...".to_string(),
        None => "Select a team and press Enter".to_string(),
    }
}

fn recent_matches_text(state: &AppState) -> String {
    if state.team_stats.is_absent() {
        return String::new();
    }
    if state.recent_matches.is_empty() {
        return "No recent matches in the database.".to_string();
    }
    state
        .recent_matches
        .iter()
        .map(|m| format!("vs {} → Winner: {}", m.opponent, m.winner()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_compare(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(3),
        ])
        .split(area);

    let picks = Paragraph::new(picks_text(state))
        .block(Block::default().title("Matchup").borders(Borders::ALL));
    frame.render_widget(picks, rows[0]);

    render_confidence(frame, rows[1], state);

    let table = Paragraph::new(comparison_text(state))
        .block(Block::default().title("Stat Comparison").borders(Borders::ALL));
    frame.render_widget(table, rows[2]);

    let history = Paragraph::new(history_text(state))
        .block(Block::default().title("Match History").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(history, rows[3]);
}

fn picks_text(state: &AppState) -> String {
    let team1 = state.team1.as_deref().unwrap_or("Select Team 1");
    let team2 = state.team2.as_deref().unwrap_or("Select Team 2");
    let mut lines = vec![format!("{team1} vs {team2}")];
    if let Some(result) = state.result.present() {
        let line = match state.last_match.present() {
            Some(last) => format!(
                "Predicted Winner: {} | Last Match: {} vs {} → {}",
                result.predicted_winner, last.team1, last.team2, last.winner
            ),
            None => format!("Predicted Winner: {}", result.predicted_winner),
        };
        lines.push(line);
    }
    lines.join("\n")
}

fn render_confidence(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Confidence").borders(Borders::ALL);
    let Some(result) = state.result.present() else {
        frame.render_widget(Paragraph::new("No prediction yet").block(block), area);
        return;
    };
    let display = result.display();
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().fg(tier_color(display.tier)))
        .ratio(display.percent / 100.0)
        .label(format!("{} ({})", display.percent_text(), display.label()));
    frame.render_widget(gauge, area);
}

fn comparison_text(state: &AppState) -> String {
    let Some(result) = state.result.present() else {
        return String::new();
    };
    let team1 = state.team1.as_deref().unwrap_or("Team 1");
    let team2 = state.team2.as_deref().unwrap_or("Team 2");
    let s1 = result.team1_stats.as_ref();
    let s2 = result.team2_stats.as_ref();
    let cell = |stats: Option<&TeamStats>, f: fn(&TeamStats) -> String| {
        stats.map(f).unwrap_or_else(|| "-".to_string())
    };
    [
        format!("{:<14}{:>12}{:>12}", "", team1, team2),
        format!(
            "{:<14}{:>12}{:>12}",
            "Games Played",
            cell(s1, |s| s.games_played.to_string()),
            cell(s2, |s| s.games_played.to_string())
        ),
        format!(
            "{:<14}{:>12}{:>12}",
            "Win Rate",
            cell(s1, TeamStats::win_rate_text),
            cell(s2, TeamStats::win_rate_text)
        ),
        format!(
            "{:<14}{:>12}{:>12}",
            "Avg Score",
            cell(s1, TeamStats::avg_score_text),
            cell(s2, TeamStats::avg_score_text)
        ),
    ]
    .join("\n")
}

fn history_text(state: &AppState) -> String {
    if state.history.is_empty() {
        return "No predictions yet".to_string();
    }
    state
        .history
        .iter()
        .map(|entry| entry.line())
        .collect::<Vec<_>>()
        .join("\n")
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

fn tier_color(tier: ConfidenceTier) -> Color {
    let (r, g, b) = tier.rgb();
    Color::Rgb(r, g, b)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchup Terminal - Help",
        "",
        "Global:",
        "  1 / 2 / Tab  Overview / Compare",
        "  j/k or ↑/↓   Move team cursor",
        "  r            Reload team list",
        "  e            Export prediction history (.xlsx)",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Overview:",
        "  Enter        Load stats for team",
        "",
        "Compare:",
        "  a / b        Pick team 1 / team 2",
        "  x            Clear picks",
        "  p / Enter    Predict",
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
