// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local-file persistence backend.
//!
//! The on-device analog of browser local storage: one JSON file per user.
//! Writes go through a temp file and rename so a crash mid-write never
//! leaves a truncated document behind.

use std::path::{Path, PathBuf};

use crate::db::StateBackend;
use crate::error::{AppError, Result};
use crate::models::UserStateDoc;

/// JSON-file backed store.
#[derive(Debug, Clone)]
pub struct LocalStateBackend {
    path: PathBuf,
}

impl LocalStateBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateBackend for LocalStateBackend {
    async fn load(&self) -> Result<Option<UserStateDoc>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Persistence(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let doc = serde_json::from_str(&raw).map_err(|e| {
            AppError::Persistence(format!("Corrupt state file {}: {}", self.path.display(), e))
        })?;
        Ok(Some(doc))
    }

    async fn save(&self, doc: &UserStateDoc) -> Result<()> {
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| AppError::Persistence(format!("Failed to serialize state: {}", e)))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(|e| {
            AppError::Persistence(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::Persistence(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.path.display(), "State written");
        Ok(())
    }
}
