use crate::config::Config;
use crate::config_client::ConfigApiClient;
use crate::errors::{AppError, ResultExt};
use crate::models::{LeadScore, ScoreLeadsRequest, ScoreLeadsResponse};
use crate::scoring::score_lead;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the per-client scoring config service.
    pub config_client: ConfigApiClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let config_client = ConfigApiClient::from_config(&config)
            .map_err(|e| AppError::InternalError(e.to_string()))?;
        Ok(Self {
            config,
            config_client,
        })
    }
}

/// Health check endpoint.
///
/// Static liveness payload; touches no dependencies.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "scoring-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /leads
///
/// Scores a batch of leads with the weights configured for the caller.
///
/// Credentials are checked before the lead list, and the config service is
/// called exactly once per batch. Every lead is scored against the same
/// reference instant, and the batch either succeeds as a whole or fails.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `body` - Raw JSON body; decoded here so malformed input maps to a 400.
///
/// # Returns
///
/// * `Result<Json<ScoreLeadsResponse>, AppError>` - Scores in input order, or an error.
pub async fn score_leads(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ScoreLeadsResponse>, AppError> {
    let request: ScoreLeadsRequest = serde_json::from_slice(&body)?;

    if request.api_key.is_empty() || request.email.is_empty() {
        return Err(AppError::Unauthorized(
            "api_key and email required".to_string(),
        ));
    }

    if request.leads.is_empty() {
        return Err(AppError::BadRequest("No leads provided".to_string()));
    }

    let identity = request.config_identity();
    tracing::info!(
        "POST /leads - {} lead(s) for config identity {}",
        request.leads.len(),
        identity
    );

    let scoring_config = state
        .config_client
        .fetch_scoring_config(identity, &request.api_key)
        .await
        .context(format!("Fetching scoring config for {}", identity))?;

    let now = Utc::now();
    let scores: Vec<LeadScore> = request
        .leads
        .iter()
        .map(|lead| score_lead(lead, &scoring_config.weights, now))
        .collect();

    tracing::info!(
        "Scored {} lead(s) for client '{}' using method '{}'",
        scores.len(),
        scoring_config.client_id,
        scoring_config.method
    );

    Ok(Json(ScoreLeadsResponse {
        scores,
        method: scoring_config.method,
        client_id: scoring_config.client_id,
    }))
}

/// Fallback for known routes hit with an unsupported method.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_health_payload() {
        let (status, Json(body)) = health().await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "scoring-service");
    }

    #[tokio::test]
    async fn test_method_not_allowed_status() {
        let response = method_not_allowed().await.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
