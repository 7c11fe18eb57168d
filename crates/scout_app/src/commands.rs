use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use scout_core::{JobRequest, MonitorError, MonitorState};
use scout_engine::{AgentClient, LeadStage, QualifiedLead, ScrapeJobMonitor, DEFAULT_LEAD_LIMIT};
use scout_logging::{scout_info, scout_warn};
use serde::Serialize;
use tokio::sync::watch;

use crate::cli::LeadTab;
use crate::config::AppConfig;
use crate::render::{self, JsonOut, ScrapeSummary};

fn print_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok: true, data })?
    );
    Ok(())
}

/// Runs one scrape job to its end. Ctrl-C resets the session.
pub async fn scrape(
    client: Arc<AgentClient>,
    config: &AppConfig,
    request: JobRequest,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let monitor = ScrapeJobMonitor::spawn(client.clone(), config.monitor.clone());

    let printer = (!json).then(|| tokio::spawn(print_status_lines(monitor.subscribe())));

    let outcome = tokio::select! {
        outcome = follow(&monitor, request) => outcome,
        _ = tokio::signal::ctrl_c() => {
            scout_warn!("interrupted; resetting scrape session");
            monitor.reset().await;
            Ok((monitor.current_phase(), None))
        }
    };
    if let Some(printer) = printer {
        printer.abort();
    }
    let (state, job_id) = outcome?;
    if let Some(err) = state.terminal_error() {
        scout_warn!("scrape ended without results: {}", err);
    }

    let mut summary = ScrapeSummary::new(&state, job_id);
    if summary.completed() {
        // The job result stands even when the inbox cannot be listed.
        match client
            .qualified_leads(LeadStage::Qualified, DEFAULT_LEAD_LIMIT)
            .await
        {
            Ok(leads) => summary.leads = Some(leads),
            Err(err) => scout_warn!("fetching pending leads failed: {}", err),
        }
    }

    if json {
        print_json(&summary)?;
    } else {
        if let Some(status) = &summary.status {
            println!("{status}");
        }
        for error in &summary.errors {
            eprintln!("{error}");
        }
        if let Some(leads) = &summary.leads {
            println!("{}", render::leads_text(leads, false));
        }
    }

    Ok(if summary.completed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn follow(
    monitor: &ScrapeJobMonitor,
    request: JobRequest,
) -> anyhow::Result<(MonitorState, Option<String>)> {
    let job_id = match monitor.start(request).await {
        Ok(handle) => {
            scout_info!("following job {}", handle);
            Some(handle.job_id().to_string())
        }
        // The monitor keeps the failure in its state.
        Err(MonitorError::SubmitFailed(_)) => None,
        Err(err) => return Err(err).context("starting scrape"),
    };
    let state = monitor.finished().await.context("waiting for scrape")?;
    Ok((state, job_id))
}

async fn print_status_lines(mut states: watch::Receiver<MonitorState>) {
    let mut last: Option<String> = None;
    while states.changed().await.is_ok() {
        let view = states.borrow_and_update().view();
        if view.can_start() {
            // The final line is printed with the summary.
            continue;
        }
        let line = view.status_line;
        if line != last {
            if let Some(text) = &line {
                println!("{text}");
            }
            last = line;
        }
    }
}

pub async fn leads(
    client: &AgentClient,
    tab: LeadTab,
    limit: u32,
    details: bool,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let leads: Vec<QualifiedLead> = match tab {
        LeadTab::Pending => client.qualified_leads(LeadStage::Qualified, limit).await?,
        LeadTab::Approved => client.qualified_leads(LeadStage::Approved, limit).await?,
        LeadTab::All => {
            let mut all = client.qualified_leads(LeadStage::Qualified, limit).await?;
            all.extend(client.qualified_leads(LeadStage::Approved, limit).await?);
            all
        }
    };

    if json {
        print_json(&leads)?;
    } else {
        println!("{}", render::leads_text(&leads, details));
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn approve(
    client: &AgentClient,
    lead_id: &str,
    approved_by: &str,
    json: bool,
) -> anyhow::Result<ExitCode> {
    client
        .approve(lead_id, approved_by)
        .await
        .with_context(|| format!("approving lead {lead_id}"))?;
    if json {
        print_json(serde_json::json!({ "lead_id": lead_id, "approved_by": approved_by }))?;
    } else {
        println!("approved {lead_id}");
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn reject(client: &AgentClient, lead_id: &str, json: bool) -> anyhow::Result<ExitCode> {
    client
        .reject(lead_id)
        .await
        .with_context(|| format!("rejecting lead {lead_id}"))?;
    if json {
        print_json(serde_json::json!({ "lead_id": lead_id }))?;
    } else {
        println!("rejected {lead_id}");
    }
    Ok(ExitCode::SUCCESS)
}

pub async fn stats(client: &AgentClient, json: bool) -> anyhow::Result<ExitCode> {
    let stats = client
        .stats()
        .await
        .with_context(|| format!("agent API not reachable at {}", client.base_url()))?;
    if json {
        print_json(&stats)?;
    } else {
        println!("{}", render::stats_text(&stats));
    }
    Ok(ExitCode::SUCCESS)
}
