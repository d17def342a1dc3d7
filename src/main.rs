pub mod ui;

use chrono::{DateTime, Local};
use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use hanzi_cards::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    flashcards::FlashcardDeck,
    game::{GameEvent, GameSession, Outcome},
    logging,
    mode::ProjectionMode,
    runtime::{fire_due, AppEvent, CrosstermEventSource, FixedTicker, Runner},
    scheduler::TimerQueue,
    vocabulary::{clamp_word_count, VocabularyStore, MAX_WORDS, MIN_WORDS},
    Error,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Position, Rect},
    Terminal,
};
use std::{
    collections::HashMap,
    error::Error as StdError,
    io::{self, stdin},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{debug, error, info, warn};

use crate::ui::{grid, theme::Theme};

const TICK_RATE_MS: u64 = 50;

/// chinese vocabulary practice: flashcards and a timed matching game
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice Chinese vocabulary in the terminal, either with self-paced flashcards or a matching game where prompts are paired with their solutions against the clock."
)]
pub struct Cli {
    /// which fields become prompt and solution, e.g. pinyin-hanzi or hanzi+pinyin-english
    #[clap(short = 'm', long)]
    mode: Option<ProjectionMode>,

    /// number of words per session (clamped to 3..=15 and the deck size)
    #[clap(short = 'w', long)]
    number_of_words: Option<usize>,

    /// embedded vocabulary deck to use
    #[clap(short = 'd', long)]
    deck: Option<String>,

    /// json vocabulary file to use instead of an embedded deck
    #[clap(short = 'f', long)]
    vocabulary_file: Option<PathBuf>,

    /// seed for word sampling and tile shuffling
    #[clap(long)]
    seed: Option<u64>,

    /// jump straight into a session instead of the menu
    #[clap(long, value_enum)]
    start: Option<StartScreen>,

    /// persist the given options as the new defaults
    #[clap(long)]
    save_config: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, ValueEnum, strum_macros::Display)]
pub enum StartScreen {
    Flashcards,
    Matching,
}

impl Cli {
    /// Layer command line options over the stored configuration
    fn apply(&self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(n) = self.number_of_words {
            config.number_of_words = n;
        }
        if let Some(ref deck) = self.deck {
            config.deck = deck.clone();
            config.vocabulary_file = None;
        }
        if let Some(ref path) = self.vocabulary_file {
            config.vocabulary_file = Some(path.clone());
        }
        config
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Menu,
    Flashcards,
    FlashcardResults,
    Matching,
    GameResults,
}

/// Matching session plus the purely visual state the terminal needs
#[derive(Debug)]
pub struct MatchingBoard {
    pub session: GameSession,
    pub cursor: usize,
    pub feedback: HashMap<usize, Outcome>,
    pub finished_at: Option<DateTime<Local>>,
}

impl MatchingBoard {
    fn new(session: GameSession) -> Self {
        Self {
            session,
            cursor: 0,
            feedback: HashMap::new(),
            finished_at: None,
        }
    }

    fn apply(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::Feedback { index, outcome } => {
                    self.feedback.insert(index, outcome);
                }
                GameEvent::Completed { .. } => self.finished_at = Some(Local::now()),
                ref other => {
                    if let Some((a, b)) = other.settled_tiles() {
                        self.feedback.remove(&a);
                        self.feedback.remove(&b);
                    }
                }
            }
        }
    }

    fn move_cursor(&mut self, d_col: isize, d_row: isize) {
        let total = self.session.tiles().len();
        let cols = grid::columns_for(total) as isize;
        let col = (self.cursor as isize % cols + d_col).clamp(0, cols - 1);
        let row = self.cursor as isize / cols + d_row;
        let target = row * cols + col;
        if row >= 0 && (target as usize) < total {
            self.cursor = target as usize;
        }
    }
}

pub struct App {
    pub config: Config,
    pub vocabulary: VocabularyStore,
    pub state: AppState,
    pub deck: Option<FlashcardDeck>,
    pub board: Option<MatchingBoard>,
    pub timers: TimerQueue,
    /// Screen positions of the tiles as last drawn, for mouse hit testing
    pub tile_rects: Vec<Rect>,
    pub notice: Option<String>,
    rng: StdRng,
    store: Box<dyn ConfigStore>,
}

impl App {
    pub fn new(
        config: Config,
        vocabulary: VocabularyStore,
        rng: StdRng,
        store: Box<dyn ConfigStore>,
    ) -> hanzi_cards::Result<Self> {
        if vocabulary.len() < MIN_WORDS {
            return Err(Error::InsufficientData {
                requested: MIN_WORDS,
                available: vocabulary.len(),
            });
        }
        config.timings.validate()?;
        Ok(Self {
            config,
            vocabulary,
            state: AppState::Menu,
            deck: None,
            board: None,
            timers: TimerQueue::new(),
            tile_rects: Vec::new(),
            notice: None,
            rng,
            store,
        })
    }

    /// Words per session after clamping to the deck
    pub fn word_count(&self) -> usize {
        clamp_word_count(self.config.number_of_words, self.vocabulary.len())
    }

    pub fn max_words(&self) -> usize {
        MAX_WORDS.min(self.vocabulary.len())
    }

    pub fn start_flashcards(&mut self) {
        self.discard_board();
        let n = self.word_count();
        let result = self
            .vocabulary
            .sample(n, &mut self.rng)
            .and_then(|words| FlashcardDeck::new(&words, self.config.mode));
        match result {
            Ok(deck) => {
                self.deck = Some(deck);
                self.notice = None;
                self.state = AppState::Flashcards;
            }
            Err(err) => self.fail_to_menu(err),
        }
    }

    pub fn start_matching(&mut self) {
        self.discard_board();
        let n = self.word_count();
        let result = self.vocabulary.sample(n, &mut self.rng).and_then(|words| {
            GameSession::new(&words, self.config.mode, self.config.timings, &mut self.rng)
        });
        match result {
            Ok(session) => {
                self.board = Some(MatchingBoard::new(session));
                self.tile_rects.clear();
                self.notice = None;
                self.state = AppState::Matching;
            }
            Err(err) => self.fail_to_menu(err),
        }
    }

    fn fail_to_menu(&mut self, err: Error) {
        error!(%err, "could not start session");
        self.notice = Some(err.to_string());
        self.state = AppState::Menu;
    }

    /// Drop the active matching session; its pending timers go with it.
    fn discard_board(&mut self) {
        if let Some(board) = self.board.take() {
            let cancelled = self.timers.cancel_session(board.session.id());
            debug!(session = board.session.id(), cancelled, "matching session discarded");
        }
        self.tile_rects.clear();
    }

    pub fn back_to_menu(&mut self) {
        self.discard_board();
        self.deck = None;
        self.state = AppState::Menu;
    }

    pub fn select_tile(&mut self, index: usize) {
        if self.state != AppState::Matching {
            return;
        }
        if let Some(board) = self.board.as_mut() {
            let events = board.session.select_tile(index, &mut self.timers);
            board.apply(&events);
        }
    }

    pub fn on_click(&mut self, column: u16, row: u16) {
        let hit = self
            .tile_rects
            .iter()
            .position(|r| r.contains(Position::new(column, row)));
        if let Some(index) = hit {
            if let Some(board) = self.board.as_mut() {
                board.cursor = index;
            }
            self.select_tile(index);
        }
    }

    /// Fire due timers and move to the results screen once the board is cleared.
    pub fn on_tick(&mut self, now: Instant) {
        let Some(board) = self.board.as_mut() else {
            return;
        };
        let events = fire_due(&mut self.timers, &mut board.session, now);
        board.apply(&events);
        if board.session.is_complete() && self.state == AppState::Matching {
            self.state = AppState::GameResults;
        }
    }

    fn save_config(&mut self) {
        match self.store.save(&self.config) {
            Ok(()) => self.notice = Some("settings saved".to_string()),
            Err(err) => {
                warn!(%err, "failed to save config");
                self.notice = Some(format!("could not save settings: {err}"));
            }
        }
    }

    /// Handle one key press. Returns true when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return true;
        }

        match self.state {
            AppState::Menu => match key.code {
                KeyCode::Up | KeyCode::Char('k') => self.config.mode = self.config.mode.previous(),
                KeyCode::Down | KeyCode::Char('j') => self.config.mode = self.config.mode.next(),
                KeyCode::Left | KeyCode::Char('h') => {
                    self.config.number_of_words = self.word_count().saturating_sub(1);
                    self.config.number_of_words = self.word_count();
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.config.number_of_words = self.word_count() + 1;
                    self.config.number_of_words = self.word_count();
                }
                KeyCode::Char('f') => self.start_flashcards(),
                KeyCode::Char('g') | KeyCode::Enter => self.start_matching(),
                KeyCode::Char('s') => self.save_config(),
                KeyCode::Char('q') => return true,
                _ => {}
            },
            AppState::Flashcards => {
                let Some(deck) = self.deck.as_mut() else {
                    self.back_to_menu();
                    return false;
                };
                match key.code {
                    KeyCode::Char(' ') | KeyCode::Enter => deck.show_answer(),
                    KeyCode::Char('y') => deck.answer(true),
                    KeyCode::Char('n') => deck.answer(false),
                    KeyCode::Char('b') => self.back_to_menu(),
                    _ => {}
                }
                if self.deck.as_ref().is_some_and(|d| d.is_finished()) {
                    self.state = AppState::FlashcardResults;
                }
            }
            AppState::FlashcardResults => match key.code {
                KeyCode::Char('r') => self.start_flashcards(),
                KeyCode::Char('m') | KeyCode::Char('b') => self.back_to_menu(),
                _ => {}
            },
            AppState::Matching => match key.code {
                KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1, 0),
                KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1, 0),
                KeyCode::Up | KeyCode::Char('k') => self.move_cursor(0, -1),
                KeyCode::Down | KeyCode::Char('j') => self.move_cursor(0, 1),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if let Some(cursor) = self.board.as_ref().map(|b| b.cursor) {
                        self.select_tile(cursor);
                    }
                }
                KeyCode::Char('b') => self.back_to_menu(),
                _ => {}
            },
            AppState::GameResults => match key.code {
                KeyCode::Char('r') => self.start_matching(),
                KeyCode::Char('m') | KeyCode::Char('b') => self.back_to_menu(),
                _ => {}
            },
        }
        false
    }

    fn move_cursor(&mut self, d_col: isize, d_row: isize) {
        if let Some(board) = self.board.as_mut() {
            board.move_cursor(d_col, d_row);
        }
    }
}

fn main() -> Result<(), Box<dyn StdError>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = match AppDirs::log_dir() {
        Some(dir) => match logging::init(&dir) {
            Ok(guard) => Some(guard),
            Err(err) => {
                eprintln!("logging disabled: {err}");
                None
            }
        },
        None => None,
    };

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
    }
    let vocabulary = config.load_vocabulary()?;
    info!(
        deck = vocabulary.name(),
        words = vocabulary.len(),
        mode = config.mode.id(),
        "starting"
    );

    let mut app = App::new(config, vocabulary, cli.rng(), Box::new(store))?;
    match cli.start {
        Some(StartScreen::Flashcards) => app.start_flashcards(),
        Some(StartScreen::Matching) => app.start_matching(),
        None => {}
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn StdError>> {
    let theme = Theme::default();
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| ui::draw(app, f, &theme))?;

        let quit = match runner.step() {
            AppEvent::Key(key) => app.on_key(key),
            AppEvent::Click { column, row } => {
                app.on_click(column, row);
                false
            }
            AppEvent::Resize | AppEvent::Tick => false,
        };
        if quit {
            break;
        }
        // Timers fire on every pass so a burst of input cannot starve them
        app.on_tick(Instant::now());
    }

    Ok(())
}
