//! Plain-text and JSON output for the terminal.

use chrono::DateTime;
use scout_core::{JobOutcome, MonitorState, Phase};
use scout_engine::{AgentStats, LeadStage, QualifiedLead, RawLead, ScoreBand};
use serde::Serialize;

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

/// Final report of a `scout scrape` run.
#[derive(Debug, Serialize)]
pub struct ScrapeSummary {
    pub phase: String,
    pub job_id: Option<String>,
    pub leads_qualified: Option<u32>,
    pub attempts: u32,
    pub status: Option<String>,
    pub errors: Vec<String>,
    /// Pending inbox after a completed run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads: Option<Vec<QualifiedLead>>,
}

impl ScrapeSummary {
    pub fn new(state: &MonitorState, job_id: Option<String>) -> Self {
        let leads_qualified = match state.phase() {
            Phase::Settled(JobOutcome::Completed { leads_qualified }) => Some(*leads_qualified),
            _ => None,
        };
        Self {
            phase: phase_name(state.phase()).to_string(),
            job_id,
            leads_qualified,
            attempts: state.attempt_count(),
            status: state.status_line().map(ToOwned::to_owned),
            errors: state.recent_errors().to_vec(),
            leads: None,
        }
    }

    pub fn completed(&self) -> bool {
        self.leads_qualified.is_some()
    }
}

fn phase_name(phase: &Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Starting => "starting",
        Phase::Running(_) => "running",
        Phase::Settled(JobOutcome::Completed { .. }) => "completed",
        Phase::Settled(JobOutcome::Failed { .. }) => "failed",
        Phase::TimedOut => "timed_out",
        Phase::Errored(_) => "errored",
    }
}

fn band_marker(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::High => "+",
        ScoreBand::Medium => "~",
        ScoreBand::Low => " ",
    }
}

fn created_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn rating_text(raw: &RawLead) -> Option<String> {
    let rating = raw.rating.filter(|rating| *rating > 0.0)?;
    Some(match raw.reviews_count {
        Some(reviews) => format!("{rating} ({reviews} reviews)"),
        None => rating.to_string(),
    })
}

/// One summary line plus indented detail lines for a lead. `details` adds
/// the enrichment findings.
pub fn lead_lines(lead: &QualifiedLead, details: bool) -> Vec<String> {
    let mut parts = vec![lead.company_name().unwrap_or("(unnamed)").to_string()];
    if let Some(raw) = &lead.raw_leads {
        if let Some(rating) = rating_text(raw) {
            parts.push(rating);
        }
        if let Some(category) = raw.category.as_deref() {
            parts.push(category.to_string());
        }
        if let Some(city) = raw.city.as_deref() {
            match raw.country.as_deref() {
                Some(country) => parts.push(format!("{city}, {country}")),
                None => parts.push(city.to_string()),
            }
        }
    }
    if let Some(enriched) = &lead.enriched_leads {
        if let Some(name) = enriched.decision_maker_name.as_deref() {
            match enriched.decision_maker_role.as_deref() {
                Some(role) => parts.push(format!("{name} ({role})")),
                None => parts.push(name.to_string()),
            }
        }
        if let Some(email) = enriched.verified_email.as_deref() {
            parts.push(email.to_string());
        }
    }
    parts.push(lead.service_fit.label().to_string());
    if lead.stage == LeadStage::Approved {
        parts.push("approved".to_string());
    }

    let mut lines = vec![format!(
        "{}{:>3}  {}  [{}]",
        band_marker(lead.score_band()),
        lead.score,
        parts.join(" | "),
        lead.id
    )];
    if let Some(reason) = lead.fit_reason.as_deref() {
        lines.push(format!("      fit: {reason}"));
    }
    if let Some(angle) = lead.outreach_angle.as_deref() {
        lines.push(format!("      angle: \"{angle}\""));
    }
    if details {
        lines.extend(detail_lines(lead));
    }
    if let Some(created) = lead.created_at.as_deref() {
        lines.push(format!("      added: {}", created_date(created)));
    }
    lines
}

fn detail_lines(lead: &QualifiedLead) -> Vec<String> {
    let enriched = lead.enriched_leads.clone().unwrap_or_default();
    let mut lines = Vec::new();
    if let Some(summary) = enriched.website_summary.as_deref() {
        lines.push(format!("      summary: {summary}"));
    }
    let digital = if enriched.works_digitally == Some(true) {
        "yes"
    } else {
        "unclear"
    };
    lines.push(format!("      digital business: {digital}"));
    if enriched.uses_ai_tools == Some(true) {
        lines.push(format!(
            "      uses AI: yes ({})",
            enriched.ai_tools_found.join(", ")
        ));
    } else {
        lines.push("      uses AI: not yet".to_string());
    }
    if let Some(website) = lead.raw_leads.as_ref().and_then(|raw| raw.website.as_deref()) {
        lines.push(format!("      website: {website}"));
    }
    if let Some(linkedin) = enriched.decision_maker_linkedin.as_deref() {
        lines.push(format!("      linkedin: {linkedin}"));
    }
    if let Some(confidence) = enriched.email_confidence.filter(|value| *value > 0) {
        lines.push(format!("      email confidence: {confidence}%"));
    }
    lines
}

pub fn leads_text(leads: &[QualifiedLead], details: bool) -> String {
    if leads.is_empty() {
        return "No leads yet. Run a scrape to start filling your inbox.".to_string();
    }
    leads
        .iter()
        .flat_map(|lead| lead_lines(lead, details))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stats_text(stats: &AgentStats) -> String {
    let value = |count: Option<u64>| count.map_or_else(|| "-".to_string(), |n| n.to_string());
    [
        ("Total scraped", stats.total_scraped),
        ("Qualified", stats.total_qualified),
        ("Pending review", stats.pending_approval),
        ("Approved", stats.approved),
    ]
    .iter()
    .map(|(label, count)| format!("{label:<15} {}", value(*count)))
    .collect::<Vec<_>>()
    .join("\n")
}
