mod cli;
mod commands;
mod config;
mod render;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use scout_core::JobRequest;
use scout_engine::{AgentClient, ServiceSettings};
use scout_logging::{scout_debug, LogDestination};

use cli::{Cli, Commands};
use config::{load_file_config, AppConfig};

const LOG_FILENAME: &str = "./scout.log";

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let file_config = load_file_config(cli.config.as_deref())?;
    let config = AppConfig::resolve(file_config, cli.agent_url.clone())?;
    init_logging(&config, cli.verbose);
    scout_debug!("using agent at {}", config.agent_url);

    let settings = ServiceSettings::new(&config.agent_url)
        .with_context(|| format!("invalid agent url {:?}", config.agent_url))?;
    let client = Arc::new(AgentClient::new(settings)?);

    match cli.command {
        Commands::Scrape {
            query,
            city,
            country,
            max_results,
        } => {
            let request = JobRequest::new(query, city, country, max_results);
            commands::scrape(client, &config, request, cli.json).await
        }
        Commands::Leads {
            tab,
            limit,
            details,
        } => commands::leads(&client, tab, limit, details, cli.json).await,
        Commands::Approve { lead_id, by } => {
            let approved_by = by.unwrap_or_else(|| config.approved_by.clone());
            commands::approve(&client, &lead_id, &approved_by, cli.json).await
        }
        Commands::Reject { lead_id } => commands::reject(&client, &lead_id, cli.json).await,
        Commands::Stats => commands::stats(&client, cli.json).await,
    }
}

fn init_logging(config: &AppConfig, verbose: bool) {
    let (destination, level) = match (config.log_to_file, verbose) {
        (true, true) => (LogDestination::Both, LevelFilter::Debug),
        (true, false) => (LogDestination::File, LevelFilter::Info),
        (false, true) => (LogDestination::Terminal, LevelFilter::Debug),
        (false, false) => (LogDestination::Terminal, LevelFilter::Warn),
    };
    scout_logging::initialize(destination, level, Path::new(LOG_FILENAME));
}
