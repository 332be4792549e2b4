// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Muscle AI API Server
//!
//! Stores workout and diet plans generated during voice sessions with the
//! assistant, and the profiles of the users they belong to.

use muscle_ai::{
    config::{Config, StorageBackend},
    db::{FirestoreDb, MemoryDb, Store},
    logging::{init_logging, BenignErrorFilter},
    AppState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(BenignErrorFilter::default());

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Muscle AI API");

    let db: Arc<dyn Store> = match config.storage_backend {
        StorageBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Arc::new(MemoryDb::new())
        }
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
    });

    let app = muscle_ai::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
