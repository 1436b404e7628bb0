use crate::analysis;
use crate::config::Config;
use crate::errors::AppError;
use crate::lead_store::LeadStore;
use crate::models::{HealthResponse, Lead, LeadInput, ScoringResult};
use crate::provider::CompletionClient;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the completion provider.
    pub provider: CompletionClient,
    /// Append-only store of qualifying leads.
    pub store: LeadStore,
}

impl AppState {
    /// Builds state from `config`, storing leads at `config.leads_csv_path`.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let provider = CompletionClient::new(&config)?;
        let store = LeadStore::new(&config.leads_csv_path);
        Ok(Self {
            config,
            provider,
            store,
        })
    }
}

/// Builds the application router with its middleware stack.
pub fn router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/analyze-lead/", post(analyze_lead))
        .route("/analyze-lead", post(analyze_lead))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            message: "Lead scoring API is alive".to_string(),
        }),
    )
}

/// POST /analyze-lead/
///
/// Scores a lead with the completion provider, summarises its goals and
/// challenges, and stores it when the score could be parsed.
///
/// # Returns
///
/// * `Ok(Json<ScoringResult>)` - `{score, reason, goals_summary, raw}`.
/// * `Err(AppError::Provider)` - `{error, details}` when the scoring call failed.
pub async fn analyze_lead(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LeadInput>, JsonRejection>,
) -> Result<Json<ScoringResult>, AppError> {
    let Json(input) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let lead = Lead::from(input);
    tracing::info!("POST /analyze-lead - company: {}", lead.company);

    let result = analysis::analyze_lead(&state.provider, &state.store, &lead).await?;

    tracing::info!(
        "Lead '{}' scored {} (summary: {})",
        lead.company,
        result.score,
        if result.goals_summary.is_empty() {
            "none"
        } else {
            "yes"
        }
    );

    Ok(Json(result))
}
