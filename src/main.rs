use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use heuristic_connect_four::ai::HeuristicAgent;
use heuristic_connect_four::audio::TerminalBell;
use heuristic_connect_four::config::{AppConfig, LogConfig};
use heuristic_connect_four::controller::GameController;
use heuristic_connect_four::stats::{InMemoryStats, JsonFileStats, StatsStore};
use heuristic_connect_four::ui::App;
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play Connect Four against the computer in the terminal.
#[derive(Parser)]
#[command(name = "connect-four", about = "Play Connect Four against the computer")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Override where win/loss statistics are stored
    #[arg(long)]
    stats_file: Option<PathBuf>,

    /// Keep statistics for this session only
    #[arg(long)]
    no_persist: bool,

    /// Start with sound off
    #[arg(long)]
    mute: bool,

    /// Seed for the computer's random tie-break
    #[arg(long)]
    seed: Option<u64>,

    /// Print a configuration file with every default value and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(path) = cli.stats_file {
        config.stats.path = path;
    }
    if cli.no_persist {
        config.stats.persist = false;
    }
    if cli.mute {
        config.audio.enabled = false;
    }
    if cli.seed.is_some() {
        config.heuristic.seed = cli.seed;
    }
    config.validate().context("validating configuration")?;

    init_logging(&config.log)?;
    info!(config = %cli.config.display(), "starting connect four");

    let stats: Box<dyn StatsStore> = if config.stats.persist {
        Box::new(
            JsonFileStats::open(&config.stats.path)
                .with_context(|| format!("opening stats file {}", config.stats.path.display()))?,
        )
    } else {
        Box::new(InMemoryStats::new())
    };
    let controller = GameController::new(
        Box::new(HeuristicAgent::new(config.heuristic.clone())),
        Box::new(TerminalBell::stdout(
            config.audio.enabled,
            config.audio.bell_on_drop,
        )),
        stats,
    );

    run(App::new(controller, &config.ui)).context("running terminal UI")
}

/// Log to a file so output never lands on top of the TUI.
fn init_logging(log: &LogConfig) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log.file)
        .with_context(|| format!("opening log file {}", log.file.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run(mut app: App) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal even if the app failed
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res
}
