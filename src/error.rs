// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with stable error codes for the UI layer.

/// Core error type for commands and persistence.
///
/// Every variant is recoverable at the boundary that detects it: a failed
/// command leaves no partial mutation behind, and a failed persistence
/// write leaves the in-memory state intact.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("A collection named \"{0}\" already exists")]
    DuplicateName(String),

    #[error("No collection named \"{0}\"")]
    CollectionNotFound(String),

    #[error("Unknown spot: {0}")]
    SpotNotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code for notices and logging.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::DuplicateName(_) => "duplicate_name",
            AppError::CollectionNotFound(_) => "collection_not_found",
            AppError::SpotNotFound(_) => "spot_not_found",
            AppError::Persistence(_) => "persistence",
            AppError::Internal(_) => "internal",
        }
    }

    /// True when the session can continue on the optimistic in-memory state.
    pub fn is_persistence(&self) -> bool {
        matches!(self, AppError::Persistence(_))
    }
}

/// Result type alias for store commands.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AppError::Validation("x".into()).code(), "validation");
        assert_eq!(AppError::DuplicateName("x".into()).code(), "duplicate_name");
        assert_eq!(
            AppError::CollectionNotFound("x".into()).code(),
            "collection_not_found"
        );
        assert_eq!(AppError::Persistence("x".into()).code(), "persistence");
    }

    #[test]
    fn test_only_persistence_is_degraded_mode() {
        assert!(AppError::Persistence("disk full".into()).is_persistence());
        assert!(!AppError::Validation("empty name".into()).is_persistence());
    }
}
