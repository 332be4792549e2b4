// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore, with an in-memory store for local runs).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{NewPlan, Plan, SyncUser, UpdateUser, User};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PLANS: &str = "plans";
    /// Active plan pointer per user (keyed by user_id)
    pub const ACTIVE_PLANS: &str = "active_plans";
}

/// Plan and user storage operations.
///
/// Implementations must keep at most one active plan per user, even when
/// `create_plan` is called concurrently for the same user.
#[async_trait]
pub trait Store: Send + Sync {
    /// Deactivate the user's active plans and insert `plan`, atomically.
    ///
    /// Returns the new plan's ID.
    async fn create_plan(&self, plan: NewPlan) -> Result<String, AppError>;

    /// All plans for a user, most recent first.
    async fn get_user_plans(&self, user_id: &str) -> Result<Vec<Plan>, AppError>;

    async fn get_active_plan(&self, user_id: &str) -> Result<Option<Plan>, AppError> {
        Ok(self
            .get_user_plans(user_id)
            .await?
            .into_iter()
            .find(|plan| plan.is_active))
    }

    async fn get_user(&self, clerk_id: &str) -> Result<Option<User>, AppError>;

    /// Insert the user unless one with the same clerk ID exists.
    ///
    /// Returns the new user's ID, or `None` if the user was already present.
    async fn sync_user(&self, user: SyncUser) -> Result<Option<String>, AppError>;

    /// Overwrite profile fields of an existing user.
    ///
    /// Returns `None` without writing anything if the user does not exist.
    async fn update_user(&self, update: UpdateUser) -> Result<Option<User>, AppError>;
}
