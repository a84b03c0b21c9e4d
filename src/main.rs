use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use riffle::app::{build_http_client, App, AppEvent};
use riffle::config::Config;
use riffle::dump::dump_river;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "riffle", version, about = "Terminal viewer for an RSS river")]
struct Args {
    /// Config file (default: ~/.config/riffle/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// River URL; repeat for a source menu. Replaces configured sources.
    #[arg(long = "source", value_name = "URL")]
    sources: Vec<String>,

    /// Seconds between polls
    #[arg(long, value_name = "SECONDS")]
    poll: Option<u64>,

    /// Write logs here instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Fetch the first source once, print the view as JSON, and exit
    #[arg(long)]
    dump: bool,
}

/// Logs go to `--log-file` when given. Otherwise they go to stderr, and while
/// the TUI owns the screen only errors are shown unless `RUST_LOG` says more.
fn init_tracing(args: &Args) -> Result<()> {
    let default_level = if args.log_file.is_some() || args.dump {
        "warn"
    } else {
        "error"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match &args.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load(path)?
        }
        None => match Config::default_path() {
            Some(path) => Config::load(&path)?,
            None => {
                tracing::debug!("HOME not set, using default configuration");
                Config::default()
            }
        },
    };

    if !args.sources.is_empty() {
        config.sources = args.sources.clone();
    }
    if let Some(poll) = args.poll {
        config.poll_seconds = poll;
    }
    Ok(config.validate()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let config = load_config(&args).context("Failed to load configuration")?;

    if args.dump {
        let source = config
            .sources
            .first()
            .context("No source to dump")?;
        let client = build_http_client()?;
        let dump = dump_river(&client, source, Utc::now(), &Local)
            .await
            .with_context(|| format!("Failed to fetch river from {}", source))?;
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    let mut app = App::new(&config, event_tx).context("Failed to create application")?;

    riffle::ui::run(&mut app, event_rx).await?;
    Ok(())
}
