// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default delay between the end of a call and the redirect to the profile.
pub const DEFAULT_REDIRECT_DELAY_MS: u64 = 1500;
/// Default route shown once a call has produced a plan.
pub const DEFAULT_PROFILE_ROUTE: &str = "/profile";

/// Where plans and users are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Google Cloud Firestore (or its emulator)
    Firestore,
    /// Process-local maps, for local development
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StorageBackend::Firestore),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::Invalid("STORAGE_BACKEND", s.to_string())),
        }
    }
}

/// Settings for the voice call session on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfig {
    /// Voice workflow template started for each call
    pub workflow_id: String,
    /// Delay between call end and navigation to the profile route
    pub redirect_delay: Duration,
    pub profile_route: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            workflow_id: String::new(),
            redirect_delay: Duration::from_millis(DEFAULT_REDIRECT_DELAY_MS),
            profile_route: DEFAULT_PROFILE_ROUTE.to_string(),
        }
    }
}

impl VoiceConfig {
    /// Load voice settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let redirect_delay_ms = match env::var("CALL_REDIRECT_DELAY_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("CALL_REDIRECT_DELAY_MS", raw))?,
            Err(_) => DEFAULT_REDIRECT_DELAY_MS,
        };

        Ok(Self {
            workflow_id: env::var("VAPI_WORKFLOW_ID").unwrap_or_default(),
            redirect_delay: Duration::from_millis(redirect_delay_ms),
            profile_route: env::var("CALL_PROFILE_ROUTE")
                .unwrap_or_else(|_| DEFAULT_PROFILE_ROUTE.to_string()),
        })
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub voice: VoiceConfig,
}

impl Config {
    /// Offline config for tests.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            storage_backend: StorageBackend::Memory,
            voice: VoiceConfig::default(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse()?,
            Err(_) => StorageBackend::Firestore,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            storage_backend,
            voice: VoiceConfig::from_env()?,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("STORAGE_BACKEND", "Memory");
        env::set_var("VAPI_WORKFLOW_ID", "wf_123");
        env::set_var("CALL_REDIRECT_DELAY_MS", "250");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.voice.workflow_id, "wf_123");
        assert_eq!(config.voice.redirect_delay, Duration::from_millis(250));
        assert_eq!(config.voice.profile_route, "/profile");

        env::remove_var("STORAGE_BACKEND");
        env::remove_var("VAPI_WORKFLOW_ID");
        env::remove_var("CALL_REDIRECT_DELAY_MS");
    }

    #[test]
    fn test_storage_backend_rejects_unknown() {
        let err = "postgres".parse::<StorageBackend>().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("STORAGE_BACKEND", _)));
    }

    #[test]
    fn test_voice_defaults() {
        let voice = VoiceConfig::default();
        assert_eq!(voice.redirect_delay, Duration::from_millis(1500));
        assert_eq!(voice.profile_route, DEFAULT_PROFILE_ROUTE);
    }
}
