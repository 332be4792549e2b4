// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod plan;
pub mod user;

pub use plan::{
    next_created_at, ActivePlanPointer, DietPlan, ExerciseDay, Meal, NewPlan, Plan,
    PlanResponse, Routine, WorkoutPlan,
};
pub use user::{SyncUser, UpdateUser, User};
