use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use placecast::api::AppState;
use placecast::config::PlacecastConfig;
use placecast::{logging, service, web};

/// Place search with aggregated weather
#[derive(Debug, Parser)]
#[command(name = "placecast", version, about)]
struct Cli {
    /// Configuration file (defaults to the user config dir, then ./config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Weather for a place name or "lat, lng"
    Weather {
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        query: Vec<String>,
    },
    /// Address at a point
    Reverse {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long)]
        lang: Option<String>,
        /// Probe nearby points when the exact point has no address
        #[arg(long)]
        nearby: bool,
    },
    /// Best match for an address
    Forward {
        #[arg(required = true, num_args = 1..)]
        address: Vec<String>,
        #[arg(long)]
        lang: Option<String>,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    println!("{json}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = PlacecastConfig::load_from_path(cli.config.clone())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init(&config.logging)?;
    tracing::debug!("Loaded configuration: {:?}", config.server);

    let (weather, addresses) = service::from_config(&config)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = AppState { weather, addresses };
            web::run(&config.server, state, config.providers.timeout()).await?;
        }
        Command::Weather { query } => {
            let results = weather.lookup(&query.join(" ")).await?;
            print_json(&results)?;
        }
        Command::Reverse {
            lat,
            lng,
            lang,
            nearby,
        } => {
            let result = if nearby {
                addresses.nearby(lat, lng, lang.as_deref()).await?
            } else {
                addresses.reverse(lat, lng, lang.as_deref()).await?
            };
            print_json(&result)?;
        }
        Command::Forward { address, lang } => {
            let result = addresses.forward(&address.join(" "), lang.as_deref()).await?;
            print_json(&result)?;
        }
    }

    Ok(())
}
