use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::tty::IsTty;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};

use typist::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    logging,
    runtime::{ChannelSource, EventLoop},
    sentences::BuiltinSet,
    session::Controller,
    terminal::{install_panic_hook, TerminalGuard},
    TICK_RATE_MS,
};

/// minimal typing practice: type the sentence, get your chars per minute
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// built-in sentence set to practice with
    #[clap(short = 's', long, value_enum)]
    sentence_set: Option<BuiltinSet>,

    /// custom sentence to practice, repeat for more; replaces the sentence set
    #[clap(short = 'p', long = "prompt")]
    prompts: Vec<String>,

    /// path to a config file
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// log at debug level
    #[clap(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_dir = AppDirs::log_dir().unwrap_or_else(std::env::temp_dir);
    let _log_guard = logging::init(&log_dir, cli.verbose)?;

    let store = cli.config_store();
    let config = store.load()?;
    let sentences = config.resolve(cli.sentence_set, &cli.prompts)?;
    info!(
        config = %store.path().display(),
        set = sentences.name(),
        count = sentences.len(),
        "starting"
    );

    install_panic_hook();
    // dropped last, after the ratatui terminal
    let _guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(Controller::new(sentences));
    let events = EventLoop::new(
        ChannelSource::crossterm(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let result = start_tui(&mut terminal, &mut app, &events);
    if let Err(e) = &result {
        error!(error = %e, "tui loop failed");
    }

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &EventLoop,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match app.handle_event(events.next()?) {
            Flow::Quit => break,
            Flow::Redraw => {
                terminal.draw(|f| f.render_widget(&*app, f.area()))?;
            }
            Flow::Idle => {}
        }
    }

    Ok(())
}
