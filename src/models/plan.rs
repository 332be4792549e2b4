// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout and diet plan model for storage and API.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// A single exercise within a training day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Routine {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
}

/// Exercises for one day label of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExerciseDay {
    pub day: String,
    pub routines: Vec<Routine>,
}

/// Training half of a plan.
///
/// `schedule` and the days in `exercises` are stored as given; they are not
/// required to line up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WorkoutPlan {
    pub schedule: Vec<String>,
    pub exercises: Vec<ExerciseDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Meal {
    pub name: String,
    pub foods: Vec<String>,
}

/// Nutrition half of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DietPlan {
    #[validate(range(min = 0.0))]
    pub daily_calories: f64,
    pub meals: Vec<Meal>,
}

/// Arguments of `createPlan`, as sent by the plan generation workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NewPlan {
    #[validate(length(min = 1, max = 128))]
    pub user_id: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub workout_plan: WorkoutPlan,
    #[validate(nested)]
    pub diet_plan: DietPlan,
    pub is_active: bool,
}

/// Stored plan document.
///
/// Stored at: `plans/{id}`. Field names are camelCase so that queries on
/// `userId`, `isActive` and `createdAt` match the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Time-ordered UUID (also used as document ID)
    pub id: String,
    /// External identity id of the owner
    pub user_id: String,
    pub name: String,
    pub workout_plan: WorkoutPlan,
    pub diet_plan: DietPlan,
    pub is_active: bool,
    /// Insertion time, the recency order key
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Plan {
    /// Build the stored document for a new plan.
    pub fn from_new(new_plan: NewPlan, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: new_plan.user_id,
            name: new_plan.name,
            workout_plan: new_plan.workout_plan,
            diet_plan: new_plan.diet_plan,
            is_active: new_plan.is_active,
            created_at,
        }
    }
}

/// Per-user pointer to the active plan.
///
/// Stored at: `active_plans/{user_id}`. Every plan creation reads and rewrites
/// this document inside its transaction, so two creations for the same user
/// conflict and one of them is retried against the other's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePlanPointer {
    pub user_id: String,
    pub plan_id: Option<String>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Creation time for a plan inserted after `previous`, the newest existing
/// plan's creation time.
///
/// Never earlier than `previous + 1ms`, so ordering by `createdAt` keeps the
/// latest insert first even when clocks of concurrent writers disagree.
pub fn next_created_at(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(previous) if previous >= now => previous + chrono::Duration::milliseconds(1),
        _ => now,
    }
}

/// Plan as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlanResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub workout_plan: WorkoutPlan,
    pub diet_plan: DietPlan,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Plan> for PlanResponse {
    fn from(plan: Plan) -> Self {
        Self {
            id: plan.id,
            user_id: plan.user_id,
            name: plan.name,
            workout_plan: plan.workout_plan,
            diet_plan: plan.diet_plan,
            is_active: plan.is_active,
            created_at: plan
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "userId": "user_123",
            "name": "Strength Block",
            "workoutPlan": {
                "schedule": ["Monday", "Wednesday"],
                "exercises": [{
                    "day": "Friday",
                    "routines": [{ "name": "Squat", "sets": 5, "reps": 5 }]
                }]
            },
            "dietPlan": {
                "dailyCalories": 2400,
                "meals": [{ "name": "Breakfast", "foods": ["Oats", "Eggs"] }]
            },
            "isActive": true
        })
    }

    #[test]
    fn test_new_plan_accepts_camel_case_wire_format() {
        let plan: NewPlan = serde_json::from_value(sample_json()).unwrap();

        assert_eq!(plan.user_id, "user_123");
        assert_eq!(plan.workout_plan.exercises[0].routines[0].sets, 5);
        assert_eq!(plan.diet_plan.daily_calories, 2400.0);
        assert!(plan.is_active);
        // Schedule days and exercise days are not cross-checked
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_new_plan_rejects_fractional_sets() {
        let mut json = sample_json();
        json["workoutPlan"]["exercises"][0]["routines"][0]["sets"] = serde_json::json!(2.5);
        assert!(serde_json::from_value::<NewPlan>(json).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_user_and_negative_calories() {
        let mut plan: NewPlan = serde_json::from_value(sample_json()).unwrap();
        plan.user_id.clear();
        assert!(plan.validate().is_err());

        let mut plan: NewPlan = serde_json::from_value(sample_json()).unwrap();
        plan.diet_plan.daily_calories = -1.0;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_next_created_at_is_strictly_after_previous() {
        let now = DateTime::from_timestamp(1_704_103_200, 0).unwrap();
        let earlier = now - chrono::Duration::seconds(5);
        let later = now + chrono::Duration::seconds(5);

        assert_eq!(next_created_at(None, now), now);
        assert_eq!(next_created_at(Some(earlier), now), now);
        assert_eq!(
            next_created_at(Some(now), now),
            now + chrono::Duration::milliseconds(1)
        );
        // Writer whose clock lags behind the previous insert
        assert!(next_created_at(Some(later), now) > later);
    }

    #[test]
    fn test_plan_response_formats_created_at() {
        let new_plan: NewPlan = serde_json::from_value(sample_json()).unwrap();
        let created_at = DateTime::from_timestamp(1_704_103_200, 0).unwrap();
        let plan = Plan::from_new(new_plan, "plan-1".to_string(), created_at);

        let response = PlanResponse::from(plan);
        assert_eq!(response.created_at, "2024-01-01T10:00:00.000Z");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["dietPlan"]["dailyCalories"], 2400.0);
    }
}
