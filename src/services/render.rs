// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Render-ready view models.
//!
//! Pure data shaping: functions here take the catalog, the view state, and
//! the user state and produce descriptions of what the card grid, map
//! markers, charts, and profile panels should show. The external
//! collaborators (map widget, DOM, canvas) consume these; nothing here
//! touches a UI surface. Dangling spot references from persisted state are
//! skipped, never a panic.

use std::f64::consts::TAU;

use crate::models::{Spot, UserStateDoc};
use crate::services::catalog::Catalog;
use crate::services::view::ChartMode;

// ─── Cards ───────────────────────────────────────────────────────

/// Everything a spot card needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CardViewModel {
    pub id: String,
    pub name: String,
    /// "City, Country"
    pub location: String,
    pub crew: String,
    pub spot_type: String,
    pub about: String,
    pub image: Option<String>,
    pub is_favorite: bool,
    /// `None` means "no reviews yet", distinct from a zero rating
    pub average_rating: Option<f64>,
}

pub fn card_view_model(spot: &Spot, state: &UserStateDoc) -> CardViewModel {
    CardViewModel {
        id: spot.id.clone(),
        name: spot.name.clone(),
        location: format!("{}, {}", spot.city, spot.country),
        crew: spot.crew.clone(),
        spot_type: spot.spot_type.clone(),
        about: spot.about.clone(),
        image: spot.image.clone(),
        is_favorite: state.is_favorite(&spot.id),
        average_rating: spot.average_rating(),
    }
}

/// Cards for a filtered spot list.
pub fn card_grid(spots: &[&Spot], state: &UserStateDoc) -> Vec<CardViewModel> {
    spots.iter().map(|s| card_view_model(s, state)).collect()
}

/// Cards for the profile favorites panel. Ids no longer in the catalog are
/// omitted.
pub fn favorite_cards(catalog: &Catalog, state: &UserStateDoc) -> Vec<CardViewModel> {
    state
        .favorites
        .iter()
        .filter_map(|id| catalog.find_by_id(id))
        .map(|s| card_view_model(s, state))
        .collect()
}

/// One collection panel entry. `spot_count` counts stored references;
/// `spots` lists only the ones still resolvable in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionViewModel {
    pub name: String,
    pub spot_count: usize,
    pub spots: Vec<String>,
}

pub fn collection_panels(catalog: &Catalog, state: &UserStateDoc) -> Vec<CollectionViewModel> {
    state
        .collections
        .iter()
        .map(|(name, members)| CollectionViewModel {
            name: name.clone(),
            spot_count: members.len(),
            spots: members
                .iter()
                .filter_map(|id| catalog.find_by_id(id))
                .map(|s| format!("{} ({}, {})", s.name, s.city, s.country))
                .collect(),
        })
        .collect()
}

// ─── Chart ───────────────────────────────────────────────────────

/// Fixed chart categories: (label, type needle, color key). The order is
/// stable across re-renders so legend entries map to the same slice.
pub const CHART_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Jams", "jam", "#ff9f1c"),
    ("Cyphers", "cypher", "#2ec4b6"),
    ("Training", "training", "#e71d36"),
];

/// Counts per fixed chart category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub label: &'static str,
    pub value: usize,
    pub color_key: &'static str,
}

pub fn category_counts(catalog: &Catalog) -> Vec<CategoryCount> {
    CHART_CATEGORIES
        .iter()
        .map(|&(label, needle, color_key)| CategoryCount {
            label,
            value: catalog.count_type_matches(needle),
            color_key,
        })
        .collect()
}

/// Geometry for one chart segment.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartGeometry {
    /// Height as a fraction of the tallest bar
    Bar { height_frac: f64 },
    /// Accumulated slice angles in radians
    Pie { start_angle: f64, end_angle: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSegment {
    pub label: &'static str,
    pub value: usize,
    pub color_key: &'static str,
    pub geometry: ChartGeometry,
}

/// Chart description, or the explicit empty state when there is nothing to
/// draw (no division by zero).
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Empty,
    Segments(Vec<ChartSegment>),
}

pub fn chart_view_model(counts: &[CategoryCount], mode: ChartMode) -> ChartView {
    let total: usize = counts.iter().map(|c| c.value).sum();
    if total == 0 {
        return ChartView::Empty;
    }

    let segments = match mode {
        ChartMode::Bar => {
            let max = counts.iter().map(|c| c.value).max().unwrap_or(0).max(1);
            counts
                .iter()
                .map(|c| ChartSegment {
                    label: c.label,
                    value: c.value,
                    color_key: c.color_key,
                    geometry: ChartGeometry::Bar {
                        height_frac: c.value as f64 / max as f64,
                    },
                })
                .collect()
        }
        ChartMode::Pie => {
            let mut start = 0.0;
            counts
                .iter()
                .map(|c| {
                    let sweep = c.value as f64 / total as f64 * TAU;
                    let segment = ChartSegment {
                        label: c.label,
                        value: c.value,
                        color_key: c.color_key,
                        geometry: ChartGeometry::Pie {
                            start_angle: start,
                            end_angle: start + sweep,
                        },
                    };
                    start += sweep;
                    segment
                })
                .collect()
        }
    };
    ChartView::Segments(segments)
}

// ─── Leaderboard / hall of fame ──────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub label: String,
    pub score: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub rank: usize,
    pub label: String,
    pub score: usize,
}

/// Stable descending sort by score; ties keep input order, so the result
/// is deterministic regardless of sort implementation.
pub fn leaderboard_view_model(entries: Vec<LeaderboardEntry>) -> Vec<RankedEntry> {
    let mut entries = entries;
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| RankedEntry {
            rank: i + 1,
            label: e.label,
            score: e.score,
        })
        .collect()
}

/// Favorite counts grouped by country, in the order countries first appear
/// in the favorites list. Dangling ids are skipped.
pub fn favorites_by_country(catalog: &Catalog, state: &UserStateDoc) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = Vec::new();
    for spot in state
        .favorites
        .iter()
        .filter_map(|id| catalog.find_by_id(id))
    {
        match entries.iter_mut().find(|e| e.label == spot.country) {
            Some(entry) => entry.score += 1,
            None => entries.push(LeaderboardEntry {
                label: spot.country.clone(),
                score: 1,
            }),
        }
    }
    entries
}

/// Hall of fame entry: a reviewed jam.
#[derive(Debug, Clone, PartialEq)]
pub struct FameEntry {
    pub name: String,
    pub location: String,
    pub average_rating: f64,
}

/// Top jams by average review rating. Spots without reviews are excluded
/// rather than ranked as zero stars.
pub fn hall_of_fame(catalog: &Catalog, limit: usize) -> Vec<FameEntry> {
    let mut entries: Vec<FameEntry> = catalog
        .get_all()
        .iter()
        .filter(|s| s.type_matches("jam"))
        .filter_map(|s| {
            s.average_rating().map(|avg| FameEntry {
                name: s.name.clone(),
                location: format!("{}, {}", s.city, s.country),
                average_rating: avg,
            })
        })
        .collect();
    entries.sort_by(|a, b| {
        b.average_rating
            .partial_cmp(&a.average_rating)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(limit);
    entries
}

// ─── Stats and challenges ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: usize,
}

pub fn global_stats(catalog: &Catalog) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Total spots",
            value: catalog.len(),
        },
        StatCard {
            title: "Jams",
            value: catalog.count_type_matches("jam"),
        },
        StatCard {
            title: "Cyphers",
            value: catalog.count_type_matches("cypher"),
        },
        StatCard {
            title: "Training spots",
            value: catalog.count_type_matches("training"),
        },
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeCard {
    pub title: &'static str,
    pub progress: String,
}

pub fn challenges(catalog: &Catalog, state: &UserStateDoc) -> Vec<ChallengeCard> {
    vec![
        ChallengeCard {
            title: "Visit 3 jams this month",
            progress: format!("{}/3", catalog.count_type_matches("jam")),
        },
        ChallengeCard {
            title: "Add 5 favorites",
            progress: format!("{}/5", state.favorites.len()),
        },
        ChallengeCard {
            title: "Create 2 collections",
            progress: format!("{}/2", state.collections.len()),
        },
    ]
}

// ─── Map widget interface ────────────────────────────────────────

/// What the external map widget consumes per spot.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub popup_html: String,
}

pub fn map_markers(spots: &[&Spot]) -> Vec<MapMarker> {
    spots
        .iter()
        .map(|s| MapMarker {
            id: s.id.clone(),
            lat: s.lat,
            lng: s.lng,
            popup_html: format!("<strong>{}</strong><br>{}, {}", s.name, s.city, s.country),
        })
        .collect()
}

/// "Center on coordinate at zoom level" command for the map widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCenter {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
}

/// Spot detail zoom level, matching the map widget defaults.
const SPOT_ZOOM: u8 = 13;

pub fn zoom_command(spot: &Spot) -> MapCenter {
    MapCenter {
        lat: spot.lat,
        lng: spot.lng,
        zoom: SPOT_ZOOM,
    }
}

// ─── Sharing ─────────────────────────────────────────────────────

/// One pre-formatted share link for the no-platform-share fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareLink {
    pub network: &'static str,
    pub url: String,
}

/// The share text for a spot.
pub fn share_text(spot: &Spot) -> String {
    format!(
        "Check this out on BreakAtlas: {} — {}, {} ({}).",
        spot.name, spot.city, spot.country, spot.spot_type
    )
}

/// Pre-formatted share links. The platform share capability, when present,
/// takes precedence; the UI chrome around these is not our concern.
pub fn share_links(text: &str, url: &str) -> Vec<ShareLink> {
    let text_enc = urlencoding::encode(text);
    let url_enc = urlencoding::encode(url);
    vec![
        ShareLink {
            network: "Twitter",
            url: format!("https://twitter.com/intent/tweet?text={text_enc}&url={url_enc}"),
        },
        ShareLink {
            network: "Facebook",
            url: format!("https://www.facebook.com/sharer/sharer.php?u={url_enc}"),
        },
        ShareLink {
            network: "WhatsApp",
            url: format!("https://api.whatsapp.com/send?text={text_enc}%20{url_enc}"),
        },
        ShareLink {
            network: "Telegram",
            url: format!("https://t.me/share/url?url={url_enc}&text={text_enc}"),
        },
    ]
}
