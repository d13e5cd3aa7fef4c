//! Axum route handlers for the Matching API.

use std::collections::{BTreeMap, HashSet};

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppJson};
use crate::models::{
    Application, ApplicantMatchResult, Job, MatchResult, Profile, TalentPoolMatchResult,
    TalentSeeker,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobRecommendationsRequest {
    pub profile: Profile,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicantScoresRequest {
    #[serde(default)]
    pub applications: Vec<Application>,
}

#[derive(Debug, Deserialize)]
pub struct TalentPoolRequest {
    #[serde(default)]
    pub seekers: Vec<TalentSeeker>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

#[derive(Debug, Serialize)]
pub struct AiHealthResponse {
    pub available: bool,
    pub model: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommendations/jobs
///
/// Ranks the supplied jobs for a seeker profile, best first.
pub async fn handle_job_recommendations(
    State(state): State<AppState>,
    AppJson(request): AppJson<JobRecommendationsRequest>,
) -> Json<Vec<MatchResult>> {
    Json(
        state
            .matcher
            .get_ai_job_recommendations(&request.profile, &request.jobs)
            .await,
    )
}

/// POST /api/v1/matches/applicants
///
/// Scores each application against its own job. Keyed by application id.
pub async fn handle_applicant_scores(
    State(state): State<AppState>,
    AppJson(request): AppJson<ApplicantScoresRequest>,
) -> Result<Json<BTreeMap<i64, ApplicantMatchResult>>, AppError> {
    ensure_unique_ids("application", request.applications.iter().map(|a| a.id))?;

    Ok(Json(
        state
            .matcher
            .get_applicant_match_scores(&request.applications)
            .await,
    ))
}

/// POST /api/v1/matches/talent-pool
///
/// Scores each seeker against the employer's jobs, keeping the best job per seeker.
pub async fn handle_talent_pool_scores(
    State(state): State<AppState>,
    AppJson(request): AppJson<TalentPoolRequest>,
) -> Result<Json<BTreeMap<i64, TalentPoolMatchResult>>, AppError> {
    ensure_unique_ids("seeker", request.seekers.iter().map(|s| s.id))?;

    Ok(Json(
        state
            .matcher
            .get_talent_pool_match_scores(&request.seekers, &request.jobs)
            .await,
    ))
}

/// DELETE /api/v1/cache/recommendations
pub async fn handle_clear_recommendations(State(state): State<AppState>) -> StatusCode {
    state.matcher.clear_seeker_recommendations_cache().await;
    StatusCode::NO_CONTENT
}

/// DELETE /api/v1/cache/applicants
pub async fn handle_clear_applicants(State(state): State<AppState>) -> StatusCode {
    state.matcher.clear_applicant_scores_cache().await;
    StatusCode::NO_CONTENT
}

/// DELETE /api/v1/cache/talent-pool
pub async fn handle_clear_talent_pool(State(state): State<AppState>) -> StatusCode {
    state.matcher.clear_talent_pool_cache().await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/ai/health
///
/// Lets the UI show a degraded-mode badge when the embedding service is down.
pub async fn handle_ai_health(State(state): State<AppState>) -> Json<AiHealthResponse> {
    Json(AiHealthResponse {
        available: state.matcher.check_ai_service_health().await,
        model: state.config.hf_model.clone(),
    })
}

/// Results are keyed by id, so two inputs sharing one would overwrite each other.
fn ensure_unique_ids(kind: &str, ids: impl Iterator<Item = i64>) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(AppError::Validation(format!("duplicate {kind} id {id}")));
        }
    }
    Ok(())
}
