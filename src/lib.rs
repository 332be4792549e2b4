// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Muscle AI: voice-generated workout and diet plans
//!
//! This crate provides the backend API storing generated plans and user
//! profiles, and the call session controller that drives the voice
//! conversation with the assistant.

pub mod call;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;

use config::Config;
use db::Store;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn Store>,
}
