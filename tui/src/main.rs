//! Skyfetch Entry Point
//!
//! Launches the terminal status dashboard.
//!
//! # Usage
//!
//! ```bash
//! # Procedural rain, default config
//! skyfetch
//!
//! # Play a frame file at 100ms per frame
//! skyfetch frames.txt 100ms
//!
//! # A lone interval is the frame rate, not a file
//! skyfetch 250ms
//!
//! # Render once and exit only on 'q'
//! skyfetch --static
//!
//! # Verbose logging (written to the cache directory, never the terminal)
//! SKYFETCH_LOG=debug skyfetch
//! ```

use std::fs::{self, File};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skyfetch_core::config::parse_interval;
use skyfetch_core::{
    load_config_or_default, CollectorRegistry, ConfigOverrides, Dashboard, FrameSourceChain,
};
use skyfetch_tui::{App, ClientSettings, DashboardClient};

/// Skyfetch - terminal status dashboard with ASCII animation
#[derive(Parser, Debug)]
#[command(name = "skyfetch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Frame file to play (delimited text or an asciicast recording)
    #[arg(value_name = "FRAME_FILE")]
    frame_file: Option<String>,

    /// Interval between frames, e.g. 200ms, 0.5s
    #[arg(value_name = "RATE")]
    rate: Option<String>,

    /// Frames per second (ignored when a rate is given)
    #[arg(long)]
    fps: Option<u32>,

    /// Render once, without animation or refreshes
    #[arg(long = "static")]
    static_mode: bool,

    /// Stop on the last frame instead of looping
    #[arg(long)]
    no_loop: bool,

    /// Show only the metrics, without the animation panel
    #[arg(long)]
    hide_animation: bool,

    /// Show only the standard view, without a tab bar
    #[arg(long)]
    no_tabs: bool,

    /// Configuration file path
    #[arg(short = 'c', long, env = "SKYFETCH_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "SKYFETCH_LOG", default_value = "info")]
    log_level: String,
}

impl Args {
    /// Split positionals into (frame file, rate)
    ///
    /// A single positional that parses as an interval, and is not an existing
    /// file, is the rate.
    fn positionals(&self) -> Result<(Option<PathBuf>, Option<Duration>)> {
        let (file, rate) = match (&self.frame_file, &self.rate) {
            (Some(first), None) if !Path::new(first).exists() && parse_interval(first).is_some() => {
                (None, Some(first.as_str()))
            }
            (file, rate) => (file.as_deref(), rate.as_deref()),
        };

        let rate = rate
            .map(|r| parse_interval(r).with_context(|| format!("invalid frame rate: {r}")))
            .transpose()?;
        Ok((file.map(PathBuf::from), rate))
    }

    fn overrides(&self, rate: Option<Duration>) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(fps) = self.fps {
            overrides = overrides.with_fps(fps);
        }
        if let Some(rate) = rate {
            overrides = overrides.with_rate(rate);
        }
        if self.static_mode {
            overrides = overrides.with_static_mode(true);
        }
        if self.no_loop {
            overrides = overrides.with_loop_animation(false);
        }
        if self.hide_animation {
            overrides = overrides.with_hide_animation(true);
        }
        if self.no_tabs {
            overrides = overrides.with_tabs_enabled(false);
        }
        overrides
    }
}

/// Log to `<cache dir>/skyfetch/skyfetch.log`
///
/// `RUST_LOG` wins over `level` when set. The terminal belongs to the
/// dashboard, so there is no stderr layer; if the file cannot be opened,
/// logging is off.
fn init_logging(level: &str) -> Option<PathBuf> {
    let path = dirs::cache_dir().map(|dir| dir.join("skyfetch").join("skyfetch.log"));
    let file = path.as_ref().and_then(|path| {
        path.parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| File::create(path))
            .ok()
    });
    let opened = file.is_some();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = file.map(|file| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .init();

    path.filter(|_| opened)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (frame_file, rate) = args.positionals()?;

    let log_path = init_logging(&args.log_level);
    if let Some(ref path) = log_path {
        tracing::info!(path = %path.display(), "Logging to file");
    }

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: skyfetch requires a terminal (TTY)");
        eprintln!();
        eprintln!("This usually means stdin or stdout is piped, or an SSH");
        eprintln!("session was started without -t.");
        std::process::exit(1);
    }

    let mut config = load_config_or_default(args.config.as_deref());
    args.overrides(rate).apply(&mut config);
    if let Err(e) = config.validate() {
        bail!("invalid configuration: {e}");
    }
    tracing::info!(source = ?config.source(), "Configuration loaded");

    let sources =
        FrameSourceChain::from_paths(frame_file.as_deref(), config.animation.frame_file.as_deref());
    let registry = CollectorRegistry::host(&config.collectors);
    let settings = ClientSettings::from_config(&config);
    let client = DashboardClient::new(Dashboard::new(config, sources), registry, settings);

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
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = App::new(client).run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Dashboard exited with an error");
    }
    result
}
