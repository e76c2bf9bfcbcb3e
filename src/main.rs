use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use wackamoji::{
    config::{Config, ConfigStore, FileConfigStore},
    controller::{Cadence, SessionController},
    input::{action_for, Action, KeyLayout},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
    session::SessionState,
    ui::GameView,
};

const TICK_RATE_MS: u64 = 250;

/// whack-a-mole in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Emoji pop out of a 3x3 grid of holes. Whack them with the keyboard before they duck back down; the more you hit, the faster and busier it gets. You have 30 seconds."
)]
pub struct Cli {
    /// keys used to whack the grid (defaults to the saved config, then numpad)
    #[clap(short = 'k', long = "keys", value_enum)]
    key_layout: Option<KeyLayout>,

    /// draw moles as ascii faces instead of emoji
    #[clap(long)]
    ascii: bool,

    /// seed the mole spawner for a repeatable game
    #[clap(long)]
    seed: Option<u64>,

    /// remember the given --keys/--ascii as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags win over the stored preferences
    fn merge_config(&self, stored: Config) -> Config {
        Config {
            key_layout: self.key_layout.unwrap_or(stored.key_layout),
            ascii_tokens: self.ascii || stored.ascii_tokens,
        }
    }

    fn seeded_rng(&self) -> Option<StdRng> {
        self.seed.map(StdRng::seed_from_u64)
    }

    fn controller(&self) -> SessionController {
        match self.seeded_rng() {
            Some(rng) => SessionController::with_rng(rng, Cadence::default()),
            None => SessionController::new(),
        }
    }
}

pub struct App {
    pub controller: SessionController,
    /// Latest snapshot received from the controller
    pub state: SessionState,
    pub config: Config,
}

impl App {
    pub fn new(controller: SessionController, config: Config) -> Self {
        let state = controller.snapshot();
        Self {
            controller,
            state,
            config,
        }
    }

    /// Forwards an action to the controller. Returns false on quit.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Hit(idx) => self.controller.hit_cell(idx),
            Action::Restart => self.controller.restart(),
            Action::PauseResume => self.controller.pause_resume(),
            Action::Quit => return false,
        }
        true
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Err(e) = logging::init() {
        eprintln!("wackamoji: logging disabled: {}", e);
    }

    let store = FileConfigStore::new();
    let config = cli.merge_config(store.load());
    if cli.save_config {
        store.save(&config)?;
        log::info!("saved config to {}", store.path().display());
    }

    let mut app = App::new(cli.controller(), config);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new(app.controller.subscribe());
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(TICK_RATE_MS)));

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            GameEvent::Snapshot(state) => app.state = state,
            GameEvent::Key(key) => {
                if let Some(action) = action_for(key, app.config.key_layout) {
                    if !app.apply(action) {
                        break;
                    }
                }
            }
            GameEvent::Resize | GameEvent::Tick => {}
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    let view = GameView::new(&app.state, app.config.key_layout, app.config.ascii_tokens);
    f.render_widget(&view, f.area());
}
