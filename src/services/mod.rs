// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - core logic layer.

pub mod catalog;
pub mod render;
pub mod store;
pub mod view;

pub use catalog::{Catalog, CatalogError};
pub use store::UserStore;
pub use view::{ChartMode, NavView, StoryMode, ViewState};
