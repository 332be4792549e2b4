// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store for local development and tests.

use crate::db::Store;
use crate::error::AppError;
use crate::models::{next_created_at, NewPlan, Plan, SyncUser, UpdateUser, User};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Process-local store.
///
/// Plans are kept per user in insertion order. Plan creation holds the user's
/// map entry for the whole deactivate-then-insert sequence, which serializes
/// concurrent creations for the same user.
#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, User>>,
    plans: Arc<DashMap<String, Vec<Plan>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl Store for MemoryDb {
    async fn create_plan(&self, new_plan: NewPlan) -> Result<String, AppError> {
        let plan_id = uuid::Uuid::now_v7().to_string();
        let mut user_plans = self.plans.entry(new_plan.user_id.clone()).or_default();

        let created_at = next_created_at(
            user_plans.last().map(|p| p.created_at),
            chrono::Utc::now(),
        );
        let plan = Plan::from_new(new_plan, plan_id.clone(), created_at);

        let mut deactivated = 0;
        for previous in user_plans.iter_mut().filter(|p| p.is_active) {
            previous.is_active = false;
            deactivated += 1;
        }
        user_plans.push(plan);

        tracing::debug!(plan_id = %plan_id, deactivated, "Plan created");
        Ok(plan_id)
    }

    async fn get_user_plans(&self, user_id: &str) -> Result<Vec<Plan>, AppError> {
        Ok(self
            .plans
            .get(user_id)
            .map(|plans| plans.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_user(&self, clerk_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(clerk_id).map(|user| user.value().clone()))
    }

    async fn sync_user(&self, args: SyncUser) -> Result<Option<String>, AppError> {
        match self.users.entry(args.clerk_id.clone()) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                let user = User::from(args);
                let clerk_id = user.clerk_id.clone();
                slot.insert(user);
                Ok(Some(clerk_id))
            }
        }
    }

    async fn update_user(&self, update: UpdateUser) -> Result<Option<User>, AppError> {
        Ok(self.users.get_mut(&update.clerk_id).map(|mut user| {
            user.apply_update(update);
            user.value().clone()
        }))
    }
}
