use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use playlist_time::api::{build_router, state::AppState};
use playlist_time::calculate::{self, WatchTimeEstimate};
use playlist_time::config::{AppConfig, API_KEY_ENV};
use playlist_time::fetch::{self, Fetcher};
use playlist_time::format::{format_duration, DisplayFormat};
use playlist_time::models::{BreakSchedule, SpeedMultiplier};
use playlist_time::parse_duration;

#[derive(Parser)]
#[command(name = "playlist-time")]
#[command(about = "Estimate total watch time of a YouTube playlist")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Viewing options shared by `estimate` and `project`.
#[derive(clap::Args)]
struct ViewingArgs {
    /// Playback speed (e.g. 1.5 or 1.5x)
    #[arg(long, default_value = "1")]
    speed: SpeedMultiplier,

    /// Take a break after every N minutes of watching (0 disables)
    #[arg(long, default_value = "30")]
    break_interval: f64,

    /// Length of each break in minutes (0 disables)
    #[arg(long, default_value = "0")]
    break_duration: f64,

    /// Output format: detailed, days, hours, minutes
    #[arg(long, default_value = "detailed")]
    format: DisplayFormat,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl ViewingArgs {
    fn breaks(&self) -> BreakSchedule {
        BreakSchedule::new(self.break_interval, self.break_duration)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a playlist and estimate its watch time
    Estimate {
        /// Playlist URL (any link carrying a list= parameter)
        url: String,

        #[command(flatten)]
        viewing: ViewingArgs,

        /// Request timeout (e.g., "30s", "2m"); overrides the config file
        #[arg(long)]
        timeout: Option<String>,

        /// Also list every video with its duration
        #[arg(long)]
        videos: bool,
    },

    /// Project watch time for a known duration, without fetching
    Project {
        /// Base duration in seconds
        #[arg(long)]
        seconds: f64,

        #[command(flatten)]
        viewing: ViewingArgs,
    },

    /// Start the API server
    Serve {
        /// Bind address; overrides the config file
        #[arg(long)]
        host: Option<String>,

        /// Port number; overrides the config file
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let (json_layer, text_layer) = if cli.json_logs {
        (
            Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
            None,
        )
    } else {
        (
            None,
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::debug!("Starting playlist-time v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Estimate {
            url,
            viewing,
            timeout,
            videos,
        } => {
            let mut fetcher_config = config.fetcher_config();
            if let Some(t) = timeout {
                let deadline = parse_duration(&t).ok_or_else(|| anyhow!("Invalid --timeout: {}", t))?;
                fetcher_config.timeout = Some(deadline);
            }

            let playlist = fetch::fetch_playlist(&url, fetcher_config).await?;
            if playlist.truncated {
                tracing::warn!(
                    "Playlist {} has more than {} videos; only the first page is counted",
                    playlist.playlist_id,
                    playlist.len()
                );
            }

            let est = calculate::estimate(&playlist, viewing.speed, viewing.breaks());

            if viewing.json {
                let out = serde_json::json!({
                    "playlist": playlist,
                    "estimate": est,
                    "total_display": format_duration(est.total_seconds, viewing.format),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
                return Ok(());
            }

            println!("\n=== Playlist {} ===", playlist.playlist_id);
            if videos {
                for (i, item) in playlist.items.iter().enumerate() {
                    println!(
                        "{:>3}. {:<60} {}",
                        i + 1,
                        item.title,
                        format_duration(item.duration_seconds as f64, DisplayFormat::Detailed)
                    );
                }
                println!();
            }
            print_estimate(&est, viewing.format);
            if playlist.truncated {
                println!("\n(only the first {} videos were counted)", playlist.len());
            }
        }
        Commands::Project { seconds, viewing } => {
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(anyhow!("--seconds must be a non-negative number"));
            }

            let est = calculate::estimate_seconds(seconds, viewing.speed, viewing.breaks());

            if viewing.json {
                println!("{}", serde_json::to_string_pretty(&est)?);
            } else {
                print_estimate(&est, viewing.format);
            }
        }
        Commands::Serve { host, port } => {
            let fetcher_config = config.fetcher_config();
            if fetcher_config.api_key.is_none() {
                tracing::warn!(
                    "No YouTube API key configured; set {} or youtube.api_key",
                    API_KEY_ENV
                );
            }

            let state = AppState {
                source: Arc::new(Fetcher::new(fetcher_config)?),
                cors_origin: config.server.cors_origin.clone(),
            };
            let app = build_router(state);

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn print_estimate(est: &WatchTimeEstimate, format: DisplayFormat) {
    if est.video_count > 0 {
        println!("Videos:           {}", est.video_count);
    }
    println!(
        "Base duration:    {}",
        format_duration(est.base_seconds, format)
    );
    println!("Playback speed:   {}", est.speed);
    if est.breaks.is_enabled() {
        println!(
            "Breaks:           {} min every {} min ({} breaks, {})",
            est.breaks.duration_minutes,
            est.breaks.interval_minutes,
            est.break_count,
            format_duration(est.break_seconds, format)
        );
    } else {
        println!("Breaks:           none");
    }
    println!(
        "Total:            {}",
        format_duration(est.total_seconds, format)
    );
}
