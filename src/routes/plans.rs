// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan routes.

use crate::error::{AppError, Result};
use crate::models::{NewPlan, PlanResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/plans", post(create_plan))
        .route("/api/users/{user_id}/plans", get(get_user_plans))
        .route("/api/users/{user_id}/plans/active", get(get_active_plan))
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CreatePlanResponse {
    pub plan_id: String,
}

/// Store a generated plan, making it the user's only active plan if requested.
async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewPlan>,
) -> Result<(StatusCode, Json<CreatePlanResponse>)> {
    payload.validate()?;

    tracing::info!(
        user_id = %payload.user_id,
        name = %payload.name,
        is_active = payload.is_active,
        "Creating plan"
    );

    let plan_id = state.db.create_plan(payload).await?;

    Ok((StatusCode::CREATED, Json(CreatePlanResponse { plan_id })))
}

/// All plans of a user, most recent first.
async fn get_user_plans(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<PlanResponse>>> {
    let plans = state.db.get_user_plans(&user_id).await?;
    tracing::debug!(user_id = %user_id, count = plans.len(), "Fetched plans");

    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}

async fn get_active_plan(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PlanResponse>> {
    let plan = state
        .db
        .get_active_plan(&user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No active plan for user {}", user_id)))?;

    Ok(Json(plan.into()))
}
