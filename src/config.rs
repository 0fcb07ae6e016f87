//! Application configuration loaded from environment variables.
//!
//! The core has no CLI surface; the embedding shell decides the deployment
//! target (local file vs Firestore) and passes the relevant fields on.

use std::env;

/// Activity feed cap used when none is configured.
pub const DEFAULT_FEED_CAP: usize = 50;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Identity the persisted state document is keyed by
    pub user_id: String,
    /// Path to the catalog seed file (JSON)
    pub catalog_path: String,
    /// Path for the local-file persistence backend
    pub state_path: String,
    /// GCP project ID (Firestore backend only)
    pub gcp_project_id: String,
    /// Maximum retained activity feed entries
    pub activity_feed_cap: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            user_id: env::var("BREAKATLAS_USER_ID")
                .map_err(|_| ConfigError::Missing("BREAKATLAS_USER_ID"))?,
            catalog_path: env::var("BREAKATLAS_CATALOG_PATH")
                .unwrap_or_else(|_| "data/spots.json".to_string()),
            state_path: env::var("BREAKATLAS_STATE_PATH")
                .unwrap_or_else(|_| "breakatlas_state.json".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            activity_feed_cap: env::var("BREAKATLAS_FEED_CAP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_FEED_CAP),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            user_id: "test-user".to_string(),
            catalog_path: "data/spots.json".to_string(),
            state_path: "test_state.json".to_string(),
            gcp_project_id: "test-project".to_string(),
            activity_feed_cap: DEFAULT_FEED_CAP,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
