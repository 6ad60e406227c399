use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use holmes::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    quotes::QuoteSource,
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

/// type a random Sherlock Holmes quote, word by word, against the clock
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// type this quote instead of a random one
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// seed for the quote picker, for reproducible runs
    #[clap(long)]
    seed: Option<u64>,

    /// config file to read instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// where to write logs (filter with HOLMES_LOG)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Merge flags over the config file. `--prompt` wins over any corpus.
    fn quote_source(&self, config: &Config) -> Result<QuoteSource, holmes::quotes::QuoteError> {
        match &self.prompt {
            Some(prompt) => QuoteSource::single(prompt.clone()),
            None => config.quote_source(),
        }
    }

    fn seed(&self, config: &Config) -> Option<u64> {
        self.seed.or(config.seed)
    }
}

fn load_config(cli: &Cli) -> Config {
    let store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    store.load().unwrap_or_else(|err| {
        warn!(%err, "falling back to default config");
        Config::default()
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    // the game still runs without logs
    if let Err(err) = logging::init(&log_path) {
        eprintln!("holmes: logging disabled, cannot open {}: {err}", log_path.display());
    }

    let config = load_config(&cli);
    let source = match cli.quote_source(&config) {
        Ok(source) => source,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };
    info!(corpus = source.name(), quotes = source.len(), "starting");

    let mut app = App::new(source, cli.seed(&config));
    if cli.prompt.is_some() {
        app.new_quote();
    }

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

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn handle_key(app: &mut App, key: KeyEvent) -> Flow {
    match key.code {
        KeyCode::Esc => return Flow::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Flow::Quit
        }
        KeyCode::Enter => app.new_quote(),
        KeyCode::Tab => app.restart(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) => app.type_char(c),
        _ => {}
    }
    Flow::Continue
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            GameEvent::Tick | GameEvent::Resize => {}
            GameEvent::Key(key) => {
                if handle_key(app, key) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use holmes::app::AppState;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn prompt_app(prompt: &str) -> App {
        App::new(QuoteSource::single(prompt).unwrap(), Some(0))
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["holmes"]);

        assert_eq!(cli.prompt, None);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.config, None);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_custom_prompt() {
        let cli = Cli::parse_from(["holmes", "-p", "hello world"]);
        assert_eq!(cli.prompt, Some("hello world".to_string()));

        let cli = Cli::parse_from(["holmes", "--prompt", "custom text"]);
        assert_eq!(cli.prompt, Some("custom text".to_string()));
    }

    #[test]
    fn test_cli_seed_and_paths() {
        let cli = Cli::parse_from([
            "holmes",
            "--seed",
            "221",
            "--config",
            "/tmp/c.json",
            "--log-file",
            "/tmp/h.log",
        ]);

        assert_eq!(cli.seed, Some(221));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.json")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/h.log")));
    }

    #[test]
    fn test_cli_seed_overrides_config() {
        let config = Config {
            quotes: vec![],
            seed: Some(1),
        };

        assert_eq!(Cli::parse_from(["holmes"]).seed(&config), Some(1));
        assert_eq!(
            Cli::parse_from(["holmes", "--seed", "2"]).seed(&config),
            Some(2)
        );
    }

    #[test]
    fn test_cli_prompt_overrides_config_quotes() {
        let config = Config {
            quotes: vec!["from config".into()],
            seed: None,
        };

        let source = Cli::parse_from(["holmes", "-p", "from flag"])
            .quote_source(&config)
            .unwrap();
        assert_eq!(source.quotes(), ["from flag".to_string()]);

        let source = Cli::parse_from(["holmes"]).quote_source(&config).unwrap();
        assert_eq!(source.quotes(), ["from config".to_string()]);
    }

    #[test]
    fn test_cli_invalid_prompt_is_rejected() {
        let cli = Cli::parse_from(["holmes", "-p", "two  spaces"]);
        assert!(cli.quote_source(&Config::default()).is_err());
    }

    #[test]
    fn test_load_config_from_flag_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "quotes": ["The game is afoot."], "seed": 9 }"#).unwrap();

        let cli = Cli::parse_from(["holmes", "--config", path.to_str().unwrap()]);
        let config = load_config(&cli);

        assert_eq!(config.seed, Some(9));
        assert_eq!(config.quotes, ["The game is afoot."]);
    }

    #[test]
    fn test_load_config_malformed_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "][").unwrap();

        let cli = Cli::parse_from(["holmes", "--config", path.to_str().unwrap()]);

        assert_eq!(load_config(&cli), Config::default());
    }

    #[test]
    fn test_handle_key_quit() {
        let mut app = prompt_app("hi");

        assert_eq!(handle_key(&mut app, key(KeyCode::Esc)), Flow::Quit);
        assert_eq!(
            handle_key(
                &mut app,
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
            ),
            Flow::Quit
        );
    }

    #[test]
    fn test_handle_key_plays_a_round() {
        let mut app = prompt_app("hi there");

        assert_eq!(handle_key(&mut app, key(KeyCode::Enter)), Flow::Continue);
        assert_eq!(app.state, AppState::Typing);

        for c in "hitherx".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        assert!(app.error);
        assert_eq!(app.input, "therx");

        handle_key(&mut app, key(KeyCode::Backspace));
        handle_key(&mut app, key(KeyCode::Char('e')));

        assert_eq!(app.state, AppState::Finished);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_handle_key_tab_restarts_same_quote() {
        let mut app = prompt_app("hi there");
        handle_key(&mut app, key(KeyCode::Enter));
        for c in "hi".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }

        handle_key(&mut app, key(KeyCode::Tab));

        assert_eq!(app.quote(), Some("hi there"));
        assert_eq!(app.active_index(), 0);
    }

    #[test]
    fn test_handle_key_lowercase_c_types() {
        let mut app = prompt_app("cat");
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('c'))),
            Flow::Continue
        );
        assert_eq!(app.input, "c");
    }
}
