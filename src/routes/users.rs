// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User routes, called by the identity provider sync.

use crate::error::{AppError, Result};
use crate::models::{SyncUser, UpdateUser, User};
use crate::AppState;
use axum::{
    extract::{Path, State},
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
        .route("/api/users/sync", post(sync_user))
        .route("/api/users/{user_id}", get(get_user).put(update_user))
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SyncUserResponse {
    /// Set only when this call created the user.
    pub user_id: Option<String>,
}

/// Create the user on first sign-in; repeated calls are no-ops.
async fn sync_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SyncUser>,
) -> Result<Json<SyncUserResponse>> {
    payload.validate()?;

    let user_id = state.db.sync_user(payload).await?;
    Ok(Json(SyncUserResponse { user_id }))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(clerk_id): Path<String>,
) -> Result<Json<User>> {
    let user = state
        .db
        .get_user(&clerk_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", clerk_id)))?;

    Ok(Json(user))
}

#[derive(Deserialize)]
struct UpdateUserBody {
    name: String,
    email: String,
    image: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UpdateUserResponse {
    pub updated: bool,
}

/// Overwrite the profile of a known user. Unknown users are left alone.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(clerk_id): Path<String>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<UpdateUserResponse>> {
    let update = UpdateUser {
        clerk_id,
        name: body.name,
        email: body.email,
        image: body.image,
    };
    update.validate()?;

    let updated = state.db.update_user(update).await?.is_some();
    Ok(Json(UpdateUserResponse { updated }))
}
