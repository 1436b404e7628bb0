use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ============ Inbound ============

/// Lead description posted by the front-end.
///
/// Every field is optional on the wire. Absent or `null` fields fall back to
/// `"Unknown"` (title, company, industry) or the empty string (the rest).
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadInput {
    pub title: Option<String>,
    pub company: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub goals: Option<String>,
    pub challenges: Option<String>,
    pub tools: Option<String>,
}

/// `LeadInput` with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub title: String,
    pub company: String,
    pub industry: String,
    pub website: String,
    pub goals: String,
    pub challenges: String,
    pub tools: String,
}

const UNKNOWN: &str = "Unknown";

impl From<LeadInput> for Lead {
    fn from(input: LeadInput) -> Self {
        Self {
            title: input.title.unwrap_or_else(|| UNKNOWN.to_string()),
            company: input.company.unwrap_or_else(|| UNKNOWN.to_string()),
            industry: input.industry.unwrap_or_else(|| UNKNOWN.to_string()),
            website: input.website.unwrap_or_default(),
            goals: input.goals.unwrap_or_default(),
            challenges: input.challenges.unwrap_or_default(),
            tools: input.tools.unwrap_or_default(),
        }
    }
}

impl Lead {
    /// Whether goals or challenges carry any non-whitespace text.
    pub fn has_goals_or_challenges(&self) -> bool {
        !self.goals.trim().is_empty() || !self.challenges.trim().is_empty()
    }
}

// ============ Results ============

/// Score value used when the provider reply has no `Score:` label.
pub const UNPARSEABLE_SCORE: i64 = -1;

/// Outcome of a successful scoring call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringResult {
    pub score: i64,
    pub reason: String,
    pub goals_summary: String,
    /// Unprocessed provider reply, kept for diagnostics.
    #[serde(rename = "raw")]
    pub raw_model_text: String,
}

impl ScoringResult {
    /// A lead qualifies for persistence only when its score parsed.
    pub fn is_qualifying(&self) -> bool {
        self.score >= 0
    }
}

// ============ Persisted ============

/// Column order of the lead store.
pub const LEAD_RECORD_HEADER: [&str; 8] = [
    "timestamp",
    "title",
    "company",
    "industry",
    "website",
    "score",
    "reason",
    "goals_summary",
];

/// One row of the append-only lead store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub timestamp: String,
    pub title: String,
    pub company: String,
    pub industry: String,
    pub website: String,
    pub score: i64,
    pub reason: String,
    pub goals_summary: String,
}

impl LeadRecord {
    pub fn new(lead: &Lead, result: &ScoringResult, created_at: DateTime<Utc>) -> Self {
        Self {
            timestamp: created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            title: lead.title.clone(),
            company: lead.company.clone(),
            industry: lead.industry.clone(),
            website: lead.website.clone(),
            score: result.score,
            reason: result.reason.clone(),
            goals_summary: result.goals_summary.clone(),
        }
    }
}

// ============ Responses ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_fields_get_defaults() {
        let input: LeadInput = serde_json::from_str(r#"{"company": "Acme"}"#).unwrap();
        let lead = Lead::from(input);
        assert_eq!(lead.company, "Acme");
        assert_eq!(lead.title, "Unknown");
        assert_eq!(lead.industry, "Unknown");
        assert_eq!(lead.website, "");
        assert_eq!(lead.goals, "");
        assert_eq!(lead.challenges, "");
        assert_eq!(lead.tools, "");
    }

    #[test]
    fn test_null_and_unknown_keys() {
        let input: LeadInput =
            serde_json::from_str(r#"{"title": null, "budget": "10k", "tools": "HubSpot"}"#)
                .unwrap();
        let lead = Lead::from(input);
        assert_eq!(lead.title, "Unknown");
        assert_eq!(lead.tools, "HubSpot");
    }

    #[test]
    fn test_empty_strings_are_kept_verbatim() {
        let input: LeadInput = serde_json::from_str(r#"{"company": ""}"#).unwrap();
        assert_eq!(Lead::from(input).company, "");
    }

    #[test]
    fn test_has_goals_or_challenges() {
        let mut lead = Lead::from(LeadInput::default());
        assert!(!lead.has_goals_or_challenges());

        lead.goals = "   \n\t".to_string();
        assert!(!lead.has_goals_or_challenges());

        lead.challenges = "churn".to_string();
        assert!(lead.has_goals_or_challenges());
    }

    #[test]
    fn test_scoring_result_serializes_raw_field() {
        let result = ScoringResult {
            score: 87,
            reason: "Strong fit".to_string(),
            goals_summary: String::new(),
            raw_model_text: "Score: 87\nReason: Strong fit".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["score"], 87);
        assert_eq!(value["goals_summary"], "");
        assert_eq!(value["raw"], "Score: 87\nReason: Strong fit");
        assert!(value.get("raw_model_text").is_none());
    }

    #[test]
    fn test_negative_score_does_not_qualify() {
        let mut result = ScoringResult {
            score: UNPARSEABLE_SCORE,
            reason: "No reason provided".to_string(),
            goals_summary: String::new(),
            raw_model_text: String::new(),
        };
        assert!(!result.is_qualifying());
        result.score = 0;
        assert!(result.is_qualifying());
    }

    #[test]
    fn test_record_timestamp_is_rfc3339() {
        let lead = Lead::from(LeadInput::default());
        let result = ScoringResult {
            score: 42,
            reason: "ok".to_string(),
            goals_summary: "sum".to_string(),
            raw_model_text: String::new(),
        };
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        let record = LeadRecord::new(&lead, &result, at);
        assert_eq!(record.timestamp, "2026-10-16T09:30:00.000000Z");
        assert_eq!(record.score, 42);
        assert_eq!(record.goals_summary, "sum");
    }
}
