use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStage {
    Qualified,
    Approved,
    Disqualified,
    Outreached,
    Converted,
}

impl LeadStage {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStage::Qualified => "qualified",
            LeadStage::Approved => "approved",
            LeadStage::Disqualified => "disqualified",
            LeadStage::Outreached => "outreached",
            LeadStage::Converted => "converted",
        }
    }
}

impl fmt::Display for LeadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which service package a lead was matched to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceFit {
    Audit,
    Training,
    Custom,
    #[default]
    Tbd,
    Other(String),
}

impl ServiceFit {
    pub fn label(&self) -> &str {
        match self {
            ServiceFit::Audit => "AI Audit",
            ServiceFit::Training => "AI Training",
            ServiceFit::Custom => "Custom System",
            ServiceFit::Tbd => "TBD",
            ServiceFit::Other(raw) => raw,
        }
    }
}

impl From<String> for ServiceFit {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "audit" => ServiceFit::Audit,
            "training" => ServiceFit::Training,
            "custom" => ServiceFit::Custom,
            "tbd" => ServiceFit::Tbd,
            _ => ServiceFit::Other(raw),
        }
    }
}

impl From<ServiceFit> for String {
    fn from(fit: ServiceFit) -> Self {
        match fit {
            ServiceFit::Audit => "audit".to_string(),
            ServiceFit::Training => "training".to_string(),
            ServiceFit::Custom => "custom".to_string(),
            ServiceFit::Tbd => "tbd".to_string(),
            ServiceFit::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            ScoreBand::High
        } else if score >= 65 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }
}

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn round_count(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Whole-number counters the service sometimes sends as floats.
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map_or(0, round_count))
}

fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(round_count))
}

/// Business listing as scraped, before qualification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLead {
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub rating: Option<f64>,
    #[serde(deserialize_with = "optional_count")]
    pub reviews_count: Option<u32>,
    pub phone: Option<String>,
    pub scrape_query: Option<String>,
}

/// Contact and web-presence details found by enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichedLead {
    pub decision_maker_name: Option<String>,
    pub decision_maker_role: Option<String>,
    pub decision_maker_linkedin: Option<String>,
    pub verified_email: Option<String>,
    #[serde(deserialize_with = "optional_count")]
    pub email_confidence: Option<u32>,
    pub works_digitally: Option<bool>,
    pub uses_ai_tools: Option<bool>,
    #[serde(deserialize_with = "null_as_default")]
    pub ai_tools_found: Vec<String>,
    pub website_summary: Option<String>,
    pub services_offered: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifiedLead {
    pub id: String,
    #[serde(default, deserialize_with = "count")]
    pub score: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_fit: ServiceFit,
    #[serde(default)]
    pub fit_reason: Option<String>,
    #[serde(default)]
    pub outreach_angle: Option<String>,
    pub stage: LeadStage,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub raw_leads: Option<RawLead>,
    #[serde(default)]
    pub enriched_leads: Option<EnrichedLead>,
}

impl QualifiedLead {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    pub fn company_name(&self) -> Option<&str> {
        self.raw_leads.as_ref()?.company_name.as_deref()
    }

    /// Awaiting approval or rejection.
    pub fn is_pending(&self) -> bool {
        self.stage == LeadStage::Qualified
    }
}

/// Pipeline counters reported by `GET /stats`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentStats {
    pub total_scraped: Option<u64>,
    pub total_qualified: Option<u64>,
    pub pending_approval: Option<u64>,
    pub approved: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_bands_follow_thresholds() {
        assert_eq!(ScoreBand::from_score(80), ScoreBand::High);
        assert_eq!(ScoreBand::from_score(79), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(65), ScoreBand::Medium);
        assert_eq!(ScoreBand::from_score(64), ScoreBand::Low);
    }

    #[test]
    fn unknown_service_fit_is_kept_verbatim() {
        let fit: ServiceFit = serde_json::from_str("\"workshop\"").unwrap();
        assert_eq!(fit, ServiceFit::Other("workshop".to_string()));
        assert_eq!(fit.label(), "workshop");
        assert_eq!(ServiceFit::from("audit".to_string()).label(), "AI Audit");
    }

    #[test]
    fn lead_with_sparse_fields_parses() {
        let lead: QualifiedLead = serde_json::from_str(
            r#"{"id":"l1","score":91,"service_fit":"training","stage":"qualified",
                "raw_leads":{"company_name":"Acme Dental","rating":4.6}}"#,
        )
        .unwrap();
        assert_eq!(lead.company_name(), Some("Acme Dental"));
        assert_eq!(lead.score_band(), ScoreBand::High);
        assert!(lead.is_pending());
        assert!(lead.enriched_leads.is_none());
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let lead: QualifiedLead = serde_json::from_str(
            r#"{"id":"l2","score":72.5,"service_fit":null,"stage":"qualified",
                "raw_leads":{"company_name":"Chai Corner","reviews_count":null},
                "enriched_leads":{"ai_tools_found":null,"email_confidence":87.0}}"#,
        )
        .unwrap();
        assert_eq!(lead.score, 73);
        assert_eq!(lead.score_band(), ScoreBand::Medium);
        assert_eq!(lead.service_fit, ServiceFit::Tbd);
        let enriched = lead.enriched_leads.unwrap();
        assert!(enriched.ai_tools_found.is_empty());
        assert_eq!(enriched.email_confidence, Some(87));
        assert_eq!(lead.raw_leads.unwrap().reviews_count, None);
    }

    #[test]
    fn null_score_counts_as_zero() {
        let lead: QualifiedLead =
            serde_json::from_str(r#"{"id":"l3","score":null,"stage":"approved"}"#).unwrap();
        assert_eq!(lead.score, 0);
        assert_eq!(lead.score_band(), ScoreBand::Low);
    }
}
