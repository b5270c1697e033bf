//! faqchat TUI Entry Point
//!
//! Launches the 26ideas FAQ Assistant in the terminal.
//!
//! Usage:
//!   faqchat-tui [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>        Config file (default: ~/.config/faqchat/widget.toml)
//!   --chat-url <URL>           Chat endpoint
//!   --probe-url <URL>          Document probe endpoint
//!   --download-dir <DIR>       Where Ctrl+S saves documents
//!   --typing-delay-ms <MS>     Delay between revealed characters
//!   --log-file <FILE>          Write logs here instead of stderr

use std::fs::File;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use faqchat_core::config::{default_config_path, load_config_from_path};
use faqchat_core::{ChatWidget, ConfigOverrides, HttpBackend, WidgetConfig};
use faqchat_tui::App;

/// Widget messages buffered between the core and the render loop
const CHANNEL_CAPACITY: usize = 100;

/// Terminal chat with the 26ideas FAQ Assistant
#[derive(Parser, Debug)]
#[command(name = "faqchat-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short = 'c', long, env = "FAQCHAT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Chat endpoint URL
    #[arg(long, value_name = "URL")]
    chat_url: Option<String>,

    /// Document probe endpoint URL
    #[arg(long, value_name = "URL")]
    probe_url: Option<String>,

    /// Directory downloaded documents are saved to
    #[arg(long, value_name = "DIR")]
    download_dir: Option<PathBuf>,

    /// Delay between two revealed characters of a reply
    #[arg(long, value_name = "MS")]
    typing_delay_ms: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long, env = "FAQCHAT_LOG_FILE", value_name = "FILE")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(ref url) = self.chat_url {
            overrides = overrides.with_chat_endpoint(url.clone());
        }
        if let Some(ref url) = self.probe_url {
            overrides = overrides.with_probe_endpoint(url.clone());
        }
        if let Some(ref dir) = self.download_dir {
            overrides = overrides.with_download_dir(dir.clone());
        }
        if let Some(ms) = self.typing_delay_ms {
            overrides = overrides.with_typing_delay_ms(ms);
        }
        overrides
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    }
    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<WidgetConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(path)?;
    args.overrides().apply(&mut config)?;
    tracing::info!(
        source = %config.source(),
        chat = %config.chat_endpoint,
        probe = %config.probe_endpoint,
        "Configuration loaded"
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: faqchat-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means:");
        eprintln!("  • Running in a non-interactive environment (CI, container)");
        eprintln!("  • SSH without -t flag");
        eprintln!("  • Piped stdin/stdout");
        std::process::exit(1);
    }

    // Load configuration before touching the terminal so errors stay readable
    let config = build_config(&args)?;
    let backend = HttpBackend::from_config(&config)?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, backend, config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    backend: HttpBackend,
    config: WidgetConfig,
) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let widget = ChatWidget::new(backend, config, tx);
    let mut app = App::new(widget, rx);
    app.run(terminal).await
}
