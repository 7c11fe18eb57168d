use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scout_core::MaxResults;
use scout_engine::DEFAULT_LEAD_LIMIT;

#[derive(Parser, Debug)]
#[command(name = "scout", version, about = "Run lead scrapes and work the lead inbox")]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (RON), defaults to ./scout.ron if present")]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "SCOUT_AGENT_URL",
        help = "Base URL of the lead agent service"
    )]
    pub agent_url: Option<String>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(short, long, global = true, help = "Debug logging")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a scrape job and follow it until it settles.
    Scrape {
        #[arg(long)]
        query: String,
        #[arg(long)]
        city: String,
        #[arg(long, default_value = "Pakistan")]
        country: String,
        #[arg(long, default_value_t = MaxResults::Thirty, value_parser = parse_max_results)]
        max_results: MaxResults,
    },
    /// List leads in the inbox.
    Leads {
        #[arg(long, value_enum, default_value_t = LeadTab::Pending)]
        tab: LeadTab,
        #[arg(long, default_value_t = DEFAULT_LEAD_LIMIT)]
        limit: u32,
        #[arg(long, help = "Show enrichment findings for each lead")]
        details: bool,
    },
    /// Approve a qualified lead for outreach.
    Approve {
        lead_id: String,
        #[arg(long, help = "Approver name, overrides the configured one")]
        by: Option<String>,
    },
    /// Reject a qualified lead.
    Reject { lead_id: String },
    /// Show pipeline counters.
    Stats,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LeadTab {
    Pending,
    Approved,
    All,
}

fn parse_max_results(raw: &str) -> Result<MaxResults, String> {
    let value: u32 = raw.trim().parse().map_err(|err| format!("{err}"))?;
    MaxResults::try_from(value).map_err(|err| err.to_string())
}
