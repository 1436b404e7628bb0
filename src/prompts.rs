//! Prompt templates sent to the completion provider.
//!
//! Lead fields are embedded verbatim; no escaping is applied. Downstream
//! consumers rely on this exact layout, so keep line order and labels stable.

use crate::models::Lead;

/// Prompt asking for a 0-100 score followed by a one-line reason.
pub fn scoring_prompt(lead: &Lead) -> String {
    format!(
        "You are an AI lead scoring assistant for B2B SaaS products.\n\
         Evaluate the following company and return a score from 0 to 100 and a brief reason.\n\
         \n\
         Company: {company}\n\
         Title: {title}\n\
         Industry: {industry}\n\
         Website: {website}\n\
         Growth Goals: {goals}\n\
         Key Challenges: {challenges}\n\
         Current Tools: {tools}\n\
         \n\
         Respond like:\n\
         Score: XX\n\
         Reason: ...",
        company = lead.company,
        title = lead.title,
        industry = lead.industry,
        website = lead.website,
        goals = lead.goals,
        challenges = lead.challenges,
        tools = lead.tools,
    )
}

/// One-sentence summary prompt over goals and challenges.
pub fn summary_prompt(goals: &str, challenges: &str) -> String {
    format!(
        "Summarize the following company's growth goals and challenges in one sentence:\n\n\
         Goals: {}\n\nChallenges: {}",
        goals, challenges
    )
}
