//! Watch command implementation - Interactive TUI.

// CLI watch uses intentional casts for display and timing
#![allow(
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use super::{CliError, load_config, seed_or_random};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rampart::game::{Snapshot, UnitView};
use rampart::{Difficulty, Grade, MatchController, MatchEvent, MatchPhase, SpawnOutcome, Team};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use std::collections::VecDeque;
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Fixed simulation step.
const STEP: f64 = 1.0 / 60.0;
/// Event lines kept for the log panel.
const LOG_LINES: usize = 200;

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the TUI fails.
pub(crate) fn execute(
    seed: Option<u64>,
    difficulty: Difficulty,
    autopilot: Option<Difficulty>,
    config: Option<PathBuf>,
    speed: f64,
) -> Result<(), CliError> {
    let config = load_config(config.as_deref(), None)?;
    let seed = seed_or_random(seed);
    let mut game = MatchController::new(config, difficulty, seed);
    if let Some(tier) = autopilot {
        game = game.with_player_autopilot(tier);
    }
    game.start();
    run_tui(App::new(game, speed))
}

/// App state for the TUI.
#[derive(Debug)]
struct App {
    game: MatchController,
    speed: f64,
    accumulator: f64,
    last_frame: Instant,
    log: VecDeque<String>,
    status: String,
}

impl App {
    fn new(game: MatchController, speed: f64) -> Self {
        let mut app = Self {
            game,
            speed: speed.clamp(0.25, 8.0),
            accumulator: 0.0,
            last_frame: Instant::now(),
            log: VecDeque::new(),
            status: String::from("Press 1-0 to spawn a card"),
        };
        app.collect_events();
        app
    }

    /// Advance the simulation by the wall-clock time since the last frame.
    fn advance(&mut self) {
        let now = Instant::now();
        let real = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        if self.game.phase() != MatchPhase::Running {
            self.accumulator = 0.0;
            return;
        }
        // Cap catch-up so a stalled terminal does not fast-forward the match.
        self.accumulator = (self.accumulator + real * self.speed).min(0.5);
        while self.accumulator >= STEP {
            self.game.tick(STEP);
            self.accumulator -= STEP;
        }
        self.collect_events();
    }

    fn collect_events(&mut self) {
        let elapsed = self.game.elapsed();
        for event in self.game.drain_events() {
            if let Some(line) = describe(&event) {
                self.log.push_front(format!("{elapsed:>6.1}s {line}"));
            }
        }
        self.log.truncate(LOG_LINES);
    }

    fn toggle_pause(&mut self) {
        match self.game.phase() {
            MatchPhase::Running => self.game.pause(),
            MatchPhase::Paused => self.game.resume(),
            MatchPhase::Pending | MatchPhase::Over => {}
        }
    }

    fn play_card(&mut self, slot: usize) {
        let Some(card) = self.game.deck().card(slot) else {
            return;
        };
        self.status = match self.game.try_spawn_card(slot) {
            Some(SpawnOutcome::Spawned(id)) => {
                format!("Spawned {} {} (#{id})", card.grade, card.unit_type)
            }
            Some(SpawnOutcome::InsufficientEnergy) => format!(
                "Not enough energy for {} (cost {})",
                card.grade,
                self.game.config().stats.cost(card.grade)
            ),
            Some(SpawnOutcome::FieldFull) => "Field is full".to_string(),
            Some(SpawnOutcome::NotRunning) | None => "Match is not running".to_string(),
        };
        self.collect_events();
    }

    fn restart(&mut self) {
        self.game.start();
        self.log.clear();
        self.accumulator = 0.0;
        self.status = String::from("Restarted");
        self.collect_events();
    }
}

fn describe(event: &MatchEvent) -> Option<String> {
    match event {
        MatchEvent::Started => Some("match started".to_string()),
        MatchEvent::UnitSpawned {
            team,
            grade,
            unit_type,
            ..
        } => Some(format!("{team} sends {grade} {unit_type}")),
        MatchEvent::UnitDied { id, team } => Some(format!("{team} #{id} falls")),
        MatchEvent::GameOver(summary) => Some(format!("GAME OVER: {}", summary.outcome)),
        MatchEvent::ProjectileFired { .. }
        | MatchEvent::ProjectileLanded { .. }
        | MatchEvent::CastleDamaged { .. } => None,
    }
}

fn run_tui(mut app: App) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    loop {
        app.advance();
        terminal
            .draw(|f| ui(f, &app))
            .map_err(|e| CliError::new(e.to_string()))?;

        // Handle input with timeout
        if event::poll(Duration::from_millis(16)).map_err(|e| CliError::new(e.to_string()))? {
            if let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char(' ') => app.toggle_pause(),
                        KeyCode::Char('r') => app.restart(),
                        KeyCode::Char('+' | '=') => app.speed = (app.speed * 2.0).min(8.0),
                        KeyCode::Char('-') => app.speed = (app.speed / 2.0).max(0.25),
                        KeyCode::Char(c @ '0'..='9') => {
                            // Keys 1-9 map to slots 0-8, key 0 to slot 9.
                            let digit = c.to_digit(10).unwrap_or(0) as usize;
                            app.play_card((digit + 9) % 10);
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Castle health
            Constraint::Length(8), // Lane
            Constraint::Min(6),    // Deck and log
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    let snapshot = app.game.snapshot();

    render_header(f, chunks[0], app);
    render_castles(f, chunks[1], &snapshot);
    render_lane(f, chunks[2], app, &snapshot);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);
    render_deck(f, bottom[0], app);
    render_log(f, bottom[1], app);

    render_footer(f, chunks[4], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let status = match app.game.phase() {
        MatchPhase::Over => "GAME OVER",
        MatchPhase::Paused => "PAUSED",
        MatchPhase::Running => "RUNNING",
        MatchPhase::Pending => "PENDING",
    };
    let hud = app.game.hud();

    let title = format!(
        " Rampart | {} | seed {} | {}s left | {} | Speed: {}x ",
        app.game.difficulty(),
        app.game.seed(),
        hud.remaining_time,
        status,
        app.speed
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_castles(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (i, castle) in snapshot.castles.iter().enumerate() {
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} castle ", castle.team)),
            )
            .gauge_style(Style::default().fg(team_color(castle.team)))
            .ratio(castle.hp_ratio.clamp(0.0, 1.0))
            .label(format!("{} hp", castle.hp));
        f.render_widget(gauge, halves[i]);
    }
}

fn render_lane(f: &mut Frame, area: Rect, app: &App, snapshot: &Snapshot) {
    let cols = (area.width as usize).saturating_sub(2).max(1);
    let lane_width = app.game.config().lane.width;
    let col_of = |x: f64| ((x / lane_width) * cols as f64).clamp(0.0, (cols - 1) as f64) as usize;

    let mut sky = vec![' '; cols];
    for p in &snapshot.projectiles {
        sky[col_of(p.position.x)] = '*';
    }

    let mut player_row = vec![(' ', Color::Reset); cols];
    let mut ai_row = vec![(' ', Color::Reset); cols];
    for unit in &snapshot.units {
        let row = match unit.team {
            Team::Player => &mut player_row,
            Team::Ai => &mut ai_row,
        };
        row[col_of(unit.position.x)] = (grade_glyph(unit.grade), unit_color(unit));
    }

    let mut ground = vec!['_'; cols];
    for castle in &snapshot.castles {
        let left = col_of(castle.position.x - castle.width / 2.0);
        let right = col_of(castle.position.x + castle.width / 2.0);
        for cell in &mut ground[left..=right] {
            *cell = '#';
        }
    }

    let styled = |row: Vec<(char, Color)>| {
        Line::from(
            row.into_iter()
                .map(|(c, color)| Span::styled(c.to_string(), Style::default().fg(color)))
                .collect::<Vec<_>>(),
        )
    };

    let lines = vec![
        Line::from(sky.into_iter().collect::<String>()).style(Style::default().fg(Color::Yellow)),
        Line::from(""),
        styled(player_row),
        styled(ai_row),
        Line::from(""),
        Line::from(ground.into_iter().collect::<String>())
            .style(Style::default().fg(Color::DarkGray)),
    ];

    let lane = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Lane "));
    f.render_widget(lane, area);
}

fn render_deck(f: &mut Frame, area: Rect, app: &App) {
    let hud = app.game.hud();
    let stats = &app.game.config().stats;
    let mut lines = vec![
        Line::from(format!(
            "Energy {:>3}   Field {}/{}",
            hud.player_energy, hud.field_count, hud.field_cap
        )),
        Line::from(""),
    ];

    for (slot, card) in app.game.deck().cards().iter().enumerate() {
        let cost = stats.cost(card.grade);
        let affordable = hud.player_energy >= cost;
        let style = if affordable {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", (slot + 1) % 10),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("{:<10} {:<8} {:>2}e", card.grade.name(), card.unit_type.name(), cost),
                style,
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(app.status.clone()).style(Style::default().fg(Color::Yellow)));

    let deck = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Deck "))
        .wrap(Wrap { trim: false });
    f.render_widget(deck, area);
}

fn render_log(f: &mut Frame, area: Rect, app: &App) {
    let visible = (area.height as usize).saturating_sub(2);
    let mut lines: Vec<Line> = app
        .log
        .iter()
        .take(visible)
        .map(|l| Line::from(l.as_str()))
        .collect();
    if let Some(summary) = app.game.summary() {
        lines.insert(
            0,
            Line::from(format!(
                "Result: {} ({} vs {} hp)",
                summary.outcome, summary.player_hp, summary.ai_hp
            ))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        );
    }

    let log = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Events "));
    f.render_widget(log, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let controls = if app.game.is_over() {
        " [q] Quit  [r] Restart "
    } else {
        " [q] Quit  [Space] Pause  [1-0] Spawn card  [+/-] Speed  [r] Restart "
    };

    let footer = Paragraph::new(controls)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

fn team_color(team: Team) -> Color {
    match team {
        Team::Player => Color::Blue,
        Team::Ai => Color::Red,
    }
}

fn unit_color(unit: &UnitView) -> Color {
    if unit.hp_ratio < 0.34 {
        Color::DarkGray
    } else {
        team_color(unit.team)
    }
}

fn grade_glyph(grade: Grade) -> char {
    match grade {
        Grade::Common => 'c',
        Grade::Rare => 'r',
        Grade::Epic => 'e',
        Grade::SuperEpic => 'S',
        Grade::Mystic => 'M',
        Grade::Legendary => 'L',
        Grade::Hero => 'H',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart::game::Damageable;

    #[test]
    fn test_describe_skips_noise() {
        assert!(describe(&MatchEvent::Started).is_some());
        assert!(
            describe(&MatchEvent::ProjectileLanded {
                id: 1,
                struck: None
            })
            .is_none()
        );
    }

    #[test]
    fn test_castle_damageable_used_for_hud() {
        let mut game = MatchController::new(rampart::MatchConfig::default(), Difficulty::Easy, 1);
        game.start();
        let app = App::new(game, 1.0);
        assert_eq!(app.game.castle(Team::Player).hp(), app.game.hud().player_hp);
        assert_eq!(app.log.len(), 1);
    }
}
