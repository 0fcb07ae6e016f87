// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! BreakAtlas core: the state-sync layer behind the spot directory.
//!
//! This crate owns how per-user UI state (favorites, collections, the
//! activity feed, achievements, preferences) stays consistent with a
//! persisted backing store and drives re-rendering. The flow is
//! unidirectional: a UI action calls a `UserStore` command, the store
//! persists the change and notifies subscribers, and the render functions
//! re-derive what the card grid, map markers, chart, and profile panels
//! should show. Map tiles, DOM, and canvas are external collaborators that
//! consume the view models produced here.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

use std::sync::Arc;

use config::Config;
use services::Catalog;

pub use error::{AppError, Result};

/// Shared application state the embedding shell composes the store next
/// to. The catalog is read-only for the entire session.
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<Catalog>,
}
