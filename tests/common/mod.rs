// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::Response;
use muscle_ai::config::Config;
use muscle_ai::db::{FirestoreDb, MemoryDb, Store};
use muscle_ai::models::{DietPlan, ExerciseDay, Meal, NewPlan, Routine, SyncUser, WorkoutPlan};
use muscle_ai::routes::create_router;
use muscle_ai::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by the in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Arc::new(MemoryDb::new()))
}

/// Create a test app whose database is offline; every query fails.
#[allow(dead_code)]
pub fn create_offline_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Arc::new(FirestoreDb::new_mock()))
}

fn create_test_app_with(db: Arc<dyn Store>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db,
    });

    (create_router(state.clone()), state)
}

/// Generate a unique user ID for test isolation.
#[allow(dead_code)]
pub fn unique_user_id() -> String {
    format!("user_{}", uuid::Uuid::now_v7().simple())
}

/// A small but complete plan.
#[allow(dead_code)]
pub fn sample_plan(user_id: &str, name: &str, is_active: bool) -> NewPlan {
    NewPlan {
        user_id: user_id.to_string(),
        name: name.to_string(),
        workout_plan: WorkoutPlan {
            schedule: vec!["Monday".to_string(), "Thursday".to_string()],
            exercises: vec![ExerciseDay {
                day: "Monday".to_string(),
                routines: vec![
                    Routine {
                        name: "Squat".to_string(),
                        sets: 4,
                        reps: 8,
                    },
                    Routine {
                        name: "Push-up".to_string(),
                        sets: 3,
                        reps: 15,
                    },
                ],
            }],
        },
        diet_plan: DietPlan {
            daily_calories: 2200.0,
            meals: vec![Meal {
                name: "Breakfast".to_string(),
                foods: vec!["Oatmeal".to_string(), "Banana".to_string()],
            }],
        },
        is_active,
    }
}

#[allow(dead_code)]
pub fn sample_user(clerk_id: &str) -> SyncUser {
    SyncUser {
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        clerk_id: clerk_id.to_string(),
        image: None,
    }
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
