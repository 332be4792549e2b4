// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles keyed by identity provider ID)
//! - Plans (generated workout and diet plans)
//! - Active plan pointers (one per user, the transaction conflict key)

use crate::db::{collections, Store};
use crate::error::AppError;
use crate::models::{
    next_created_at, ActivePlanPointer, NewPlan, Plan, SyncUser, UpdateUser, User,
};
use async_trait::async_trait;
use firestore::errors::{BackoffError, FirestoreError};
use futures_util::FutureExt;

/// Placeholder bearer token; the emulator accepts any unsigned JWT.
const EMULATOR_TOKEN: &str = "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0.";

/// Firestore-backed [`Store`].
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Connect to Firestore, or to the emulator when FIRESTORE_EMULATOR_HOST
    /// is set.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        let emulated = std::env::var("FIRESTORE_EMULATOR_HOST").is_ok();

        let client = if emulated {
            Self::connect_emulator(project_id).await
        } else {
            firestore::FirestoreDb::new(project_id).await
        }
        .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, emulated, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// The emulator rejects real credentials, so hand it a fixed token.
    async fn connect_emulator(
        project_id: &str,
    ) -> Result<firestore::FirestoreDb, FirestoreError> {
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(EMULATOR_TOKEN.to_string().into()),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        firestore::FirestoreDb::with_options_token_source(
            firestore::FirestoreDbOptions::new(project_id.to_string()),
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
    }

    /// A store with no connection; every operation fails with a database
    /// error. Used to exercise error paths offline.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }
}

#[async_trait]
impl Store for FirestoreDb {
    // ─── Plan Operations ─────────────────────────────────────────

    /// Deactivate-then-insert as a single transaction.
    ///
    /// Reading the user's `active_plans` pointer registers it for conflict
    /// detection, and every creation rewrites it. Two concurrent creations for
    /// the same user therefore cannot both commit against the same snapshot:
    /// Firestore aborts one and `run_transaction` retries it, at which point
    /// it sees (and deactivates) the plan the other one inserted.
    ///
    /// Each attempt stamps `createdAt` after its reads and past the pointer's
    /// timestamp, so the committed plan sorts ahead of everything it
    /// deactivated.
    async fn create_plan(&self, new_plan: NewPlan) -> Result<String, AppError> {
        let client = self.get_client()?;
        let plan = Plan::from_new(
            new_plan,
            uuid::Uuid::now_v7().to_string(),
            chrono::Utc::now(),
        );

        let plan_id = client
            .run_transaction(move |db, transaction| {
                let mut plan = plan.clone();
                async move {
                    let user_id = plan.user_id.clone();

                    let pointer: Option<ActivePlanPointer> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::ACTIVE_PLANS)
                        .obj()
                        .one(&user_id)
                        .await?;

                    let active_plans: Vec<Plan> = db
                        .fluent()
                        .select()
                        .from(collections::PLANS)
                        .filter(|q| {
                            q.for_all([
                                q.field("userId").eq(user_id.as_str()),
                                q.field("isActive").eq(true),
                            ])
                        })
                        .obj()
                        .query()
                        .await?;

                    plan.created_at = next_created_at(
                        pointer.map(|p| p.updated_at),
                        chrono::Utc::now(),
                    );

                    for mut previous in active_plans {
                        previous.is_active = false;
                        db.fluent()
                            .update()
                            .in_col(collections::PLANS)
                            .document_id(&previous.id)
                            .object(&previous)
                            .add_to_transaction(transaction)?;
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::PLANS)
                        .document_id(&plan.id)
                        .object(&plan)
                        .add_to_transaction(transaction)?;

                    let pointer = ActivePlanPointer {
                        user_id: user_id.clone(),
                        plan_id: plan.is_active.then(|| plan.id.clone()),
                        updated_at: plan.created_at,
                    };
                    db.fluent()
                        .update()
                        .in_col(collections::ACTIVE_PLANS)
                        .document_id(&user_id)
                        .object(&pointer)
                        .add_to_transaction(transaction)?;

                    Ok::<String, BackoffError<FirestoreError>>(plan.id)
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Plan creation transaction failed: {}", e)))?;

        tracing::info!(plan_id = %plan_id, "Plan created");

        Ok(plan_id)
    }

    async fn get_user_plans(&self, user_id: &str) -> Result<Vec<Plan>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PLANS)
            .filter(|q| q.for_all([q.field("userId").eq(user_id)]))
            .order_by([("createdAt", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Resolve the active plan through the pointer document (1 read + 1 read).
    async fn get_active_plan(&self, user_id: &str) -> Result<Option<Plan>, AppError> {
        let client = self.get_client()?;

        let pointer: Option<ActivePlanPointer> = client
            .fluent()
            .select()
            .by_id_in(collections::ACTIVE_PLANS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(plan_id) = pointer.and_then(|p| p.plan_id) else {
            return Ok(None);
        };

        client
            .fluent()
            .select()
            .by_id_in(collections::PLANS)
            .obj()
            .one(&plan_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, clerk_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(clerk_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The clerk ID is the document ID and the insert is create-only, so a
    /// racing duplicate sync fails with a conflict instead of adding a second
    /// record.
    async fn sync_user(&self, args: SyncUser) -> Result<Option<String>, AppError> {
        if self.get_user(&args.clerk_id).await?.is_some() {
            tracing::debug!(clerk_id = %args.clerk_id, "User already synced");
            return Ok(None);
        }

        let user = User::from(args);
        let result: Result<User, FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::USERS)
            .document_id(&user.clerk_id)
            .object(&user)
            .execute()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(clerk_id = %user.clerk_id, "User created");
                Ok(Some(user.clerk_id))
            }
            Err(FirestoreError::DataConflictError(_)) => {
                tracing::debug!(clerk_id = %user.clerk_id, "User created concurrently");
                Ok(None)
            }
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    async fn update_user(&self, update: UpdateUser) -> Result<Option<User>, AppError> {
        let Some(mut user) = self.get_user(&update.clerk_id).await? else {
            tracing::debug!(clerk_id = %update.clerk_id, "Update for unknown user ignored");
            return Ok(None);
        };

        user.apply_update(update);

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.clerk_id)
            .object(&user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Some(user))
    }
}
