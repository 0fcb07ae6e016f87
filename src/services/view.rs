// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ephemeral view state and filtering.
//!
//! Nothing here is persisted: the visible subset of spots, the active
//! chart mode, and the current navigation view are recomputed from the
//! catalog and the user state whenever either changes.

use std::collections::BTreeMap;

use crate::models::{FollowKind, Spot, UserStateDoc};
use crate::services::catalog::Catalog;

/// Navigation views. Transitions are unconditional: any view can be
/// entered from any other, and entering re-derives that view's section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavView {
    #[default]
    Dashboard,
    Profile,
    Leaderboard,
    Story,
}

/// Chart rendering mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartMode {
    #[default]
    Bar,
    Pie,
}

impl ChartMode {
    pub fn toggled(self) -> Self {
        match self {
            ChartMode::Bar => ChartMode::Pie,
            ChartMode::Pie => ChartMode::Bar,
        }
    }
}

/// Session-scoped view state.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub query: String,
    pub nav: NavView,
    pub chart_mode: ChartMode,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
    }

    pub fn go_to(&mut self, nav: NavView) {
        self.nav = nav;
    }

    pub fn toggle_chart_mode(&mut self) {
        self.chart_mode = self.chart_mode.toggled();
    }

    /// The currently visible spots.
    pub fn visible_spots<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Spot> {
        filter_spots(catalog, &self.query)
    }
}

/// Case-insensitive substring filter over name, city, country, crew, and
/// type. An empty query returns the full catalog; order is always catalog
/// order, never relevance-sorted.
pub fn filter_spots<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a Spot> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return catalog.get_all().iter().collect();
    }
    catalog
        .get_all()
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&q)
                || s.city.to_lowercase().contains(&q)
                || s.country.to_lowercase().contains(&q)
                || s.crew.to_lowercase().contains(&q)
                || s.spot_type.to_lowercase().contains(&q)
        })
        .collect()
}

/// Spots whose country/city/crew is in the corresponding followed set.
/// An empty result is a valid "no spots match" state, not an error.
pub fn filter_by_followed<'a>(
    catalog: &'a Catalog,
    state: &UserStateDoc,
    kind: FollowKind,
) -> Vec<&'a Spot> {
    let followed = state.follows.set(kind);
    catalog
        .get_all()
        .iter()
        .filter(|s| {
            let field = match kind {
                FollowKind::Country => &s.country,
                FollowKind::City => &s.city,
                FollowKind::Crew => &s.crew,
            };
            followed.iter().any(|f| f == field)
        })
        .collect()
}

/// Count spots by the literal `type` string. Buckets are not normalized:
/// "Jam" and "Cypher Jam" are distinct keys, and the counts always sum to
/// the catalog length.
pub fn group_counts_by_type(catalog: &Catalog) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for spot in catalog.get_all() {
        *counts.entry(spot.spot_type.clone()).or_insert(0) += 1;
    }
    counts
}

/// Summary line shown while a filter is active.
pub fn filter_summary(shown: usize, total: usize, query: &str) -> String {
    format!("Filtered: {shown} of {total} for \"{query}\"")
}

// ─── Story mode ──────────────────────────────────────────────────

/// One story slide.
pub struct StorySlide {
    pub title: &'static str,
    pub text: &'static str,
}

const STORY_SLIDES: &[StorySlide] = &[
    StorySlide {
        title: "Welcome to BreakAtlas",
        text: "Explore jams, cyphers, and training spots across Europe.",
    },
    StorySlide {
        title: "Favorites & Collections",
        text: "Save your favorite spots and curate custom collections.",
    },
    StorySlide {
        title: "Community",
        text: "See the leaderboard and the hall of fame of iconic events and crews.",
    },
];

/// Slideshow engine: fixed slides, prev/next wrap around.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoryMode {
    index: usize,
}

impl StoryMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &'static StorySlide {
        &STORY_SLIDES[self.index]
    }

    pub fn next(&mut self) -> &'static StorySlide {
        self.index = (self.index + 1) % STORY_SLIDES.len();
        self.current()
    }

    pub fn prev(&mut self) -> &'static StorySlide {
        self.index = (self.index + STORY_SLIDES.len() - 1) % STORY_SLIDES.len();
        self.current()
    }

    pub fn slide_count(&self) -> usize {
        STORY_SLIDES.len()
    }
}
