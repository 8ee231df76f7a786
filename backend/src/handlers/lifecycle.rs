//! Crop lifecycle HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use crate::extract::ApiJson;
use crate::services::lifecycle::{
    BatchLifecycleInput, BatchLifecycleResponse, DeriveLifecycleInput, LifecycleService,
    SummaryInput, TransitionInput, TransitionResponse,
};
use crate::AppState;

/// Get the thresholds this server derives with
pub async fn get_thresholds(State(state): State<AppState>) -> impl IntoResponse {
    let service = LifecycleService::new(state.deriver);
    (StatusCode::OK, Json(service.thresholds()))
}

/// Derive the lifecycle view-model for one crop
pub async fn derive_lifecycle(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<DeriveLifecycleInput>,
) -> impl IntoResponse {
    let service = LifecycleService::new(state.deriver);
    let now = input.now.unwrap_or_else(Utc::now);

    match service.derive(&input.record, now) {
        Ok(lifecycle) => (StatusCode::OK, Json(lifecycle)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Derive lifecycle view-models for a list of crops
pub async fn derive_lifecycle_batch(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BatchLifecycleInput>,
) -> impl IntoResponse {
    let service = LifecycleService::new(state.deriver);
    let now = input.now.unwrap_or_else(Utc::now);

    match service.derive_batch(&input.records, now) {
        Ok(lifecycles) => {
            (StatusCode::OK, Json(BatchLifecycleResponse { lifecycles })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Stat widget summary for a list of crops
pub async fn summarize_lifecycles(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SummaryInput>,
) -> impl IntoResponse {
    let service = LifecycleService::new(state.deriver);
    let now = input.now.unwrap_or_else(Utc::now);
    let horizon_days = input
        .horizon_days
        .unwrap_or(state.config.lifecycle.summary_horizon_days);

    match service.summarize(&input.records, now, horizon_days) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Check whether a crop may move between two statuses
pub async fn check_transition(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TransitionInput>,
) -> impl IntoResponse {
    let service = LifecycleService::new(state.deriver);

    match service.check_transition(input.from, input.to) {
        Ok(()) => (
            StatusCode::OK,
            Json(TransitionResponse {
                allowed: true,
                from: input.from,
                to: input.to,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
