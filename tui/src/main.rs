//! LexiGuard TUI Entry Point
//!
//! Usage:
//!   lexiguard-tui [OPTIONS]
//!
//! Options:
//!   -u, --api-url <URL>     Classification service base URL
//!   -c, --config <FILE>     Config file (default: ~/.config/lexiguard/config.toml)
//!   -l, --locale <CODE>     Interface language (en, es)
//!       --no-intro          Skip the intro animation
//!       --log-file <FILE>   Write logs to a file instead of stderr

use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lexiguard_core::{default_config_path, load_config_from_path, ClientConfig, ConfigSource};
use lexiguard_tui::App;

/// Check a message for spam from the terminal
#[derive(Parser, Debug)]
#[command(name = "lexiguard-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Classification service base URL (overrides config and env)
    #[arg(short = 'u', long, value_name = "URL")]
    api_url: Option<String>,

    /// Path to the configuration file
    #[arg(short = 'c', long, env = "LEXIGUARD_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Interface language (en, es)
    #[arg(short = 'l', long, value_name = "CODE")]
    locale: Option<String>,

    /// Skip the intro animation
    #[arg(long)]
    no_intro: bool,

    /// Write logs to this file (the terminal is busy drawing)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.log_file.as_deref())?;

    let config = resolve_config(&args)?;
    tracing::info!(
        base_url = %config.base_url,
        source = %config.source(),
        locale = %config.locale,
        "Starting LexiGuard TUI"
    );

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: lexiguard-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin/stdout are piped or the session has no TTY");
        eprintln!("(CI, containers, or SSH without -t).");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    let result = app.run(terminal).await;
    // Timers must be gone before the terminal is handed back
    app.shutdown();
    result
}

/// File (or default path) + env, then CLI flags on top
fn resolve_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(path).context("failed to load configuration")?;

    if let Some(url) = &args.api_url {
        config.set_base_url(url.clone());
    }
    if let Some(locale) = &args.locale {
        config.locale.clone_from(locale);
        config.set_source(ConfigSource::Cli);
    }
    if args.no_intro {
        config.show_intro = false;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    // Only warnings on stderr by default so log lines don't tear the UI
    let default_level = if log_file.is_some() { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .with(filter)
                .init();
        }
    }
    Ok(())
}
