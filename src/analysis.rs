/// Lead analysis workflow shared by the HTTP handler and tests.
///
/// 1. Score the lead with the completion provider (failure aborts)
/// 2. Parse score and reason from the reply
/// 3. Summarise goals and challenges (failure absorbed)
/// 4. Append qualifying leads to the store
use crate::errors::AppError;
use crate::lead_store::LeadStore;
use crate::models::{Lead, LeadRecord, ScoringResult};
use crate::prompts::{scoring_prompt, summary_prompt};
use crate::provider::CompletionClient;
use crate::scoring::parse_scoring_reply;
use chrono::Utc;

pub async fn analyze_lead(
    provider: &CompletionClient,
    store: &LeadStore,
    lead: &Lead,
) -> Result<ScoringResult, AppError> {
    let content = provider.complete(&scoring_prompt(lead)).await?;

    let parsed = parse_scoring_reply(&content);
    if parsed.score < 0 {
        tracing::warn!(
            "No score found in provider reply for '{}'; lead will not be stored",
            lead.company
        );
    }

    let goals_summary = summarize_goals(provider, lead).await;

    let result = ScoringResult {
        score: parsed.score,
        reason: parsed.reason,
        goals_summary,
        raw_model_text: content,
    };

    if result.is_qualifying() {
        store
            .append(LeadRecord::new(lead, &result, Utc::now()))
            .await?;
    }

    Ok(result)
}

/// Returns the trimmed one-sentence summary, or an empty string when there
/// is nothing to summarise or the provider call fails.
async fn summarize_goals(provider: &CompletionClient, lead: &Lead) -> String {
    if !lead.has_goals_or_challenges() {
        return String::new();
    }

    match provider
        .complete(&summary_prompt(&lead.goals, &lead.challenges))
        .await
    {
        Ok(summary) => summary.trim().to_string(),
        Err(e) => {
            tracing::warn!("Goals summary skipped: {}", e);
            String::new()
        }
    }
}
