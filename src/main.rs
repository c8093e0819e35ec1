pub mod app_dirs;
pub mod board;
pub mod clock;
pub mod error;
pub mod game;
pub mod game_config;
pub mod runtime;
pub mod stats;
pub mod symbols;
pub mod target;
pub mod ui;
pub mod util;

use crate::{
    board::DisplayList,
    game::{GameSession, SessionOutcome, ViewController},
    game_config::{preset, Difficulty, GameConfig, GameType},
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    stats::{export_csv, FileHistoryStore, HistoryStore},
    symbols::SymbolSpec,
};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};

const TICK_RATE_MS: u64 = 100;

/// Board pixels per terminal cell. A cell is roughly twice as tall as it is
/// wide, so the board space stays close to square on screen.
pub const PX_PER_COL: i32 = 10;
pub const PX_PER_ROW: i32 = 20;

/// click-the-numbers minigame for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Click numbered targets in order before the board fills up. Presets range from plain speed rounds to memory games where the labels vanish."
)]
pub struct Cli {
    /// game preset to play
    #[clap(short = 'g', long, value_enum, default_value = "clear-the-board")]
    game_type: GameType,

    /// preset difficulty
    #[clap(short = 'd', long, value_enum, default_value = "easy")]
    difficulty: Difficulty,

    /// play a custom game described by a JSON config file instead of a preset
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// label series for a custom game
    #[clap(long, value_enum)]
    symbols: Option<SymbolKind>,

    /// starting value for the descending numeric series
    #[clap(long, value_name = "N")]
    start: Option<u32>,

    /// starting letter for the descending alphabetic series
    #[clap(long, value_name = "LETTER")]
    start_letter: Option<char>,

    /// number of targets placed at session start
    #[clap(short = 'a', long)]
    amount: Option<u32>,

    /// spawn an extra target on every misclick
    #[clap(long)]
    spawn_on_misclick: bool,

    /// spawn a replacement target on every correct hit
    #[clap(long)]
    spawn_on_hit: bool,

    /// spawn a target every N seconds
    #[clap(long, value_name = "SECONDS")]
    auto_spawn: Option<u32>,

    /// conceal labels N seconds into the session
    #[clap(long, value_name = "SECONDS")]
    hide_after: Option<u32>,

    /// conceal labels once the first click lands
    #[clap(long)]
    hide_after_first_click: bool,

    /// reveal concealed labels for N seconds after a misclick
    #[clap(long, value_name = "SECONDS")]
    reveal_on_misclick: Option<u32>,

    /// allow peeking at concealed labels for N seconds, at the cost of an
    /// extra target per peek
    #[clap(long, value_name = "SECONDS")]
    peek: Option<u32>,

    /// misclicks allowed before the session ends, 0 for unlimited
    #[clap(short = 'l', long)]
    lives: Option<u32>,

    /// persist finished sessions to the stats file
    #[clap(long)]
    store: bool,

    /// print the stored stats history as CSV and exit
    #[clap(long)]
    export: bool,

    /// stats file to read/write instead of the default location
    #[clap(long)]
    stats_file: Option<PathBuf>,
}

/// CLI-facing symbol series names. Flattened so the descending variants can
/// take their starting point from `--start` / `--start-letter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SymbolKind {
    NumericAsc,
    NumericDesc,
    AlphaAsc,
    AlphaDesc,
    MixAsc,
}

impl Cli {
    fn resolve_config(&self) -> Result<GameConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                serde_json::from_str(&raw)?
            }
            None => preset(self.game_type, self.difficulty)?,
        };
        if self.has_modifier_flags() {
            self.apply_modifiers(&mut config);
        }
        Ok(config)
    }

    fn has_modifier_flags(&self) -> bool {
        self.symbols.is_some()
            || self.start.is_some()
            || self.start_letter.is_some()
            || self.amount.is_some()
            || self.spawn_on_misclick
            || self.spawn_on_hit
            || self.auto_spawn.is_some()
            || self.hide_after.is_some()
            || self.hide_after_first_click
            || self.reveal_on_misclick.is_some()
            || self.peek.is_some()
            || self.lives.is_some()
    }

    /// Overlays modifier flags on the resolved base config. A modified game
    /// no longer plays like its preset, so its records file under custom.
    fn apply_modifiers(&self, config: &mut GameConfig) {
        if let Some(kind) = self.symbols {
            config.symbol_generator = match kind {
                SymbolKind::NumericAsc => SymbolSpec::NumericAsc,
                SymbolKind::NumericDesc => SymbolSpec::NumericDesc {
                    start: self.start.unwrap_or(10),
                },
                SymbolKind::AlphaAsc => SymbolSpec::AlphaAsc,
                SymbolKind::AlphaDesc => SymbolSpec::AlphaDesc {
                    start_letter: self.start_letter.unwrap_or('J'),
                },
                SymbolKind::MixAsc => SymbolSpec::MixAsc,
            };
        }
        if let Some(amount) = self.amount {
            config.amount = amount;
        }
        if self.spawn_on_misclick {
            config.add_number_on_misclick = true;
        }
        if self.spawn_on_hit {
            config.add_number_on_target_hit = true;
        }
        if let Some(secs) = self.auto_spawn {
            config.auto_add_number_interval = Some(secs);
        }
        if let Some(secs) = self.hide_after {
            config.hide_numbers_after = Some(secs);
        }
        if self.hide_after_first_click {
            config.hide_after_first_click = true;
        }
        if let Some(secs) = self.reveal_on_misclick {
            config.show_numbers_on_misclick = Some(secs);
        }
        if let Some(secs) = self.peek {
            config.enable_show_button = Some(secs);
        }
        if let Some(lives) = self.lives {
            config.lives = Some(lives);
        }
        config.game_type = GameType::Custom;
        config.difficulty = Difficulty::Unknown;
    }

    fn history_store(&self) -> FileHistoryStore {
        match &self.stats_file {
            Some(path) => FileHistoryStore::with_path(path.clone()),
            None => FileHistoryStore::new(),
        }
    }
}

/// Session state the view reports into: lives left, peek availability, and
/// the end-of-game summary.
#[derive(Debug, Default)]
pub struct Hud {
    pub peek_visible: bool,
    pub lives: Option<u32>,
    pub summary: Option<String>,
}

impl ViewController for Hud {
    fn show_peek_affordance(&mut self) {
        self.peek_visible = true;
    }

    fn hide_peek_affordance(&mut self) {
        self.peek_visible = false;
    }

    fn report_lives_remaining(&mut self, lives: u32) {
        self.lives = Some(lives);
    }

    fn present_summary(&mut self, text: &str) {
        self.summary = Some(text.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Playing,
    Results,
}

pub struct App {
    pub cli: Option<Cli>,
    pub session: GameSession,
    pub hud: Hud,
    pub display: DisplayList,
    pub state: AppState,
}

impl App {
    pub fn new(cli: &Cli, cols: u16, rows: u16) -> Result<Self, Box<dyn Error>> {
        let config = cli.resolve_config()?;
        let store: Option<Box<dyn HistoryStore>> = if cli.store {
            Some(Box::new(cli.history_store()))
        } else {
            None
        };

        // Top row is the status line, the rest is board.
        let board_rows = rows.saturating_sub(1).max(1);
        let width = u32::from(cols) * PX_PER_COL as u32;
        let height = u32::from(board_rows) * PX_PER_ROW as u32;

        let mut hud = Hud::default();
        let session = GameSession::new(config, width, height, Instant::now(), &mut hud, store)?;

        Ok(Self {
            cli: Some(cli.clone()),
            session,
            hud,
            display: DisplayList::default(),
            state: AppState::Playing,
        })
    }

    /// Records the current board into the display list the UI replays.
    /// Targets become hit-testable here, so this runs before input handling.
    pub fn record_frame(&mut self) {
        self.session.board.draw(&mut self.display);
    }
}

/// Maps a terminal cell to the board pixel at its center. Row 0 is the
/// status line and never reaches here.
fn board_pixel(column: u16, row: u16) -> (i32, i32) {
    let x = i32::from(column) * PX_PER_COL + PX_PER_COL / 2;
    let y = i32::from(row.saturating_sub(1)) * PX_PER_ROW + PX_PER_ROW / 2;
    (x, y)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.export {
        let history = cli.history_store().load();
        print!("{}", export_csv(&history)?);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &cli);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

#[derive(Debug)]
enum ExitType {
    Restart,
    Quit,
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, cli: &Cli) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        let size = terminal.size()?;
        let mut app = App::new(cli, size.width, size.height)?;

        match run_session(terminal, &runner, &mut app)? {
            ExitType::Restart => continue,
            ExitType::Quit => break,
        }
    }

    Ok(())
}

fn run_session<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    runner: &Runner<E, T>,
    app: &mut App,
) -> Result<ExitType, Box<dyn Error>> {
    loop {
        app.record_frame();
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Tick => {
                if app.state == AppState::Playing {
                    app.session.on_tick(Instant::now())?;
                    if app.session.is_finished() {
                        app.state = AppState::Results;
                    }
                }
            }
            // Board dimensions are fixed at session start; a resized terminal
            // keeps playing on the original cell->pixel mapping until the next
            // restart picks up the new size.
            AppEvent::Resize => {}
            AppEvent::Mouse(mouse) => {
                if app.state == AppState::Playing
                    && matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
                {
                    if mouse.row == 0 {
                        // The status line doubles as the reveal control.
                        app.session.on_peek(Instant::now())?;
                    } else {
                        let (x, y) = board_pixel(mouse.column, mouse.row);
                        app.session.on_click(x, y, Instant::now(), &mut app.hud)?;
                        if app.session.is_finished() {
                            app.state = AppState::Results;
                        }
                    }
                }
            }
            AppEvent::Key(key) => {
                let ctrl_c = key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL);

                match app.state {
                    AppState::Playing => {
                        if key.code == KeyCode::Esc || ctrl_c {
                            app.session.finish(SessionOutcome::Aborted, &mut app.hud);
                            return Ok(ExitType::Quit);
                        }
                    }
                    AppState::Results => match key.code {
                        KeyCode::Char('r') => return Ok(ExitType::Restart),
                        KeyCode::Esc | KeyCode::Char('q') => return Ok(ExitType::Quit),
                        _ if ctrl_c => return Ok(ExitType::Quit),
                        _ => {}
                    },
                }
            }
        }
    }
}
