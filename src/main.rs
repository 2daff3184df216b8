//! # Auto Timezone Main Entry Point
//!
//! Resolves the local POSIX tz-string and prints it, so a shell profile or
//! init script can do `eval "$(auto-timezone --shell)"`.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use auto_timezone::config::Config;
use auto_timezone::utils::logging::{log_fallback, log_system_event};
use auto_timezone::TimezoneStringResolver;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "auto-timezone", version, about = "Resolve the local POSIX tz-string from the public IP")]
struct Args {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Print an `export TZ='...'` line instead of the bare tz-string
    #[arg(long)]
    shell: bool,

    /// Also print the resolved timezone name to stderr
    #[arg(long)]
    show_name: bool,

    /// Fail instead of printing FALLBACK_TZ_STRING when resolution fails
    #[arg(long)]
    no_fallback: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auto_timezone=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    match &args.env_file {
        Some(path) => {
            dotenvy::from_path(path)
                .map_err(|e| anyhow!("Failed to load {}: {}", path.display(), e))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    let config = Config::from_env()?;

    info!("Starting auto-timezone v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Provider: {}, Geolocation URL: {}, Timeout: {}s",
        config.provider,
        config.geolocation_url,
        config.http_timeout.as_secs()
    );

    let resolver = TimezoneStringResolver::from_config(&config)?;

    let tz_string = match resolver.resolve().await {
        Ok(resolved) => {
            if args.show_name {
                eprintln!("{}", resolved.timezone);
            }
            resolved.tz_string
        }
        Err(e) => {
            error!("Failed to resolve tz-string: {}", e);
            match (&config.fallback_tz_string, args.no_fallback) {
                (Some(fallback), false) => {
                    log_fallback(fallback, &e.to_string());
                    fallback.clone()
                }
                _ => return Err(anyhow!("Failed to resolve tz-string: {}", e)),
            }
        }
    };

    if args.shell {
        println!("export TZ='{}'", tz_string);
    } else {
        println!("{}", tz_string);
    }

    log_system_event("Resolution finished", Some(&tz_string));
    Ok(())
}
