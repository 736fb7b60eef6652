// src/main.rs
//
// anicatalog CLI - browse the catalog from the terminal
//
// Wiring order: logging → configuration → state → command.

mod cli;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use anicatalog::application::state::AppState;
use anicatalog::config::CatalogConfig;
use anicatalog::events::{EpisodesReconciled, TitleLoaded};

use cli::{Cli, Output};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. LOGGING
    init_logging(cli.verbose);

    // 2. CONFIGURATION (defaults < environment < flags)
    let mut config = CatalogConfig::from_env().context("Invalid catalog configuration")?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.as_str());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    log::debug!("Using catalog at {} (timeout {:?})", config.base_url, config.request_timeout);

    // 3. STATE
    let state = AppState::from_config(config).context("Failed to build catalog client")?;
    subscribe_logging_handlers(&state);

    // 4. COMMAND
    let output = if cli.json { Output::Json } else { Output::Text };
    cli::handle_command(&state, cli.command, output).await
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "anicatalog=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn subscribe_logging_handlers(state: &AppState) {
    state.event_bus.subscribe::<TitleLoaded, _>(|event| {
        log::info!("Loaded title {} ({})", event.anime_id, event.title);
    });

    state.event_bus.subscribe::<EpisodesReconciled, _>(|event| {
        log::info!(
            "Reconciled title {}: player {}, {} episodes across {} dubbing tracks",
            event.anime_id,
            event.selected_player.as_deref().unwrap_or("-"),
            event.episode_count,
            event.dubbing_tracks
        );
    });
}
