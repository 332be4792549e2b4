// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod plans;
pub mod users;

use crate::error::AppError;
use crate::AppState;
use axum::http::{header, HeaderValue, Method, Uri};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Origins accepted in addition to the configured frontend.
const DEV_ORIGIN_PREFIXES: [&str; 2] = ["http://localhost", "http://127.0.0.1"];

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id: option_env!("BUILD_ID").unwrap_or("unknown").to_string(),
    })
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

fn is_allowed_origin(origin: &HeaderValue, frontend_url: &str) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    origin == frontend_url
        || DEV_ORIGIN_PREFIXES
            .iter()
            .any(|prefix| origin.starts_with(prefix))
}

fn cors_layer(frontend_url: String) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _parts| {
            is_allowed_origin(origin, &frontend_url)
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(plans::routes())
        .merge(users::routes());

    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .fallback(not_found)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors_layer(state.config.frontend_url.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_origins() {
        let frontend = "https://muscle.example.com";
        let allowed = |origin: &'static str| {
            is_allowed_origin(&HeaderValue::from_static(origin), frontend)
        };

        assert!(allowed("https://muscle.example.com"));
        assert!(allowed("http://localhost:3000"));
        assert!(allowed("http://127.0.0.1:5173"));
        assert!(!allowed("https://evil.example.com"));
        assert!(!allowed("https://muscle.example.com.evil.net"));
    }
}
