use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use pokedex_api::PokeApiClient;
use pokedex_core::config::AppConfig;
use pokedex_core::media::{generate_candidates, CandidateOptions, HttpMediaLoader, Prober};
use pokedex_runtime::view::{self, LOADING, NO_AUDIO};
use pokedex_runtime::{Session, ShowOutcome};

use crate::browse;
use crate::error::CliError;

pub type AppSession = Session<PokeApiClient, HttpMediaLoader>;

#[derive(Debug, Parser)]
#[command(name = "pokedex", version, about = "Browse Pokémon from PokéAPI in the terminal")]
pub struct Cli {
    /// Config file to use instead of the per-user one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the API base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override how long a single audio candidate may take to load.
    #[arg(long, global = true)]
    pub probe_timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the numbered roster.
    List {
        /// Only print the first N entries.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one record by roster number (from 1) or name.
    Show {
        target: String,
        /// Print the view as JSON once the audio lookup finishes.
        #[arg(long)]
        json: bool,
    },
    /// Step through records interactively.
    Browse,
    /// Print the audio candidate URLs for a record without fetching anything.
    Candidates {
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        id: Option<i64>,
        /// Skip the sprite candidate when the id is missing or invalid.
        #[arg(long)]
        gate_image: bool,
    },
    /// Probe URLs in order and report the first playable one.
    Probe {
        #[arg(required = true)]
        urls: Vec<String>,
    },
}

impl Cli {
    /// Resolve the config file, then apply command-line overrides.
    pub fn load_config(&self) -> Result<AppConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load_from(path)?,
            None => AppConfig::load()?,
        };
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(ms) = self.probe_timeout_ms {
            config.audio.probe_timeout_ms = ms;
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn build_session(config: &AppConfig) -> Result<AppSession, CliError> {
    let client = PokeApiClient::new(
        &config.api.base_url,
        config.api.list_limit,
        config.request_timeout(),
    )?;
    let prober = Prober::new(HttpMediaLoader::default(), config.probe_timeout());
    Ok(Session::new(client, prober, config.candidate_options()))
}

pub async fn run(cli: Cli, config: AppConfig) -> Result<(), CliError> {
    match cli.command {
        Command::List { limit } => list(&config, limit).await,
        Command::Show { target, json } => show(&config, &target, json).await,
        Command::Browse => browse::run(Arc::new(build_session(&config)?)).await,
        Command::Candidates {
            name,
            id,
            gate_image,
        } => {
            let options = CandidateOptions {
                gate_image_on_id: gate_image || config.audio.gate_image_candidate,
            };
            for url in &generate_candidates(id, &name, options) {
                println!("{url}");
            }
            Ok(())
        }
        Command::Probe { urls } => {
            let prober = Prober::new(HttpMediaLoader::default(), config.probe_timeout());
            match prober.probe(&urls).await.url() {
                Some(url) => println!("{url}"),
                None => println!("{NO_AUDIO}"),
            }
            Ok(())
        }
    }
}

async fn list(config: &AppConfig, limit: Option<usize>) -> Result<(), CliError> {
    let session = build_session(config)?;
    eprintln!("{LOADING}");
    session.load_roster().await?;

    let state = session.snapshot().await;
    let shown = limit.unwrap_or(state.roster.len());
    for (index, entry) in state.roster.iter().take(shown).enumerate() {
        println!("{}", view::roster_line(index, entry));
    }
    Ok(())
}

async fn show(config: &AppConfig, target: &str, json: bool) -> Result<(), CliError> {
    let session = build_session(config)?;
    eprintln!("{LOADING}");
    session.load_roster().await?;

    let outcome = match parse_position(target) {
        Some(index) => session.show(index).await?,
        None => session.select_by_name(target).await?,
    };
    let ShowOutcome::Displayed(ticket) = outcome else {
        return Ok(());
    };

    if !json {
        if let Some(detail) = session.snapshot().await.detail {
            print!("{detail}");
        }
    }
    let slot = session.resolve_audio(ticket).await;

    if json {
        let state = session.snapshot().await;
        let body = serde_json::json!({ "detail": state.detail, "audio": state.audio });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else if let Some(slot) = slot {
        println!("{slot}");
    }
    Ok(())
}

/// `"3"` → roster index 2. Zero and non-numbers are not positions.
pub fn parse_position(target: &str) -> Option<usize> {
    target.trim().parse::<usize>().ok()?.checked_sub(1)
}
