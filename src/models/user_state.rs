//! Persisted per-user state document.
//!
//! This is the unit of persistence: favorites, collections, the activity
//! feed, earned achievements, and preference scalars. Every field carries
//! `#[serde(default)]` so legacy or partially-shaped stored blobs still
//! deserialize; `normalize()` repairs them once at load instead of every
//! read site guarding defensively.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AppError;

/// Current persisted schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// One activity feed entry, most-recent-first in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub message: String,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
}

/// Followed categories (countries, cities, crews).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follows {
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub crews: Vec<String>,
}

/// Which followed set a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowKind {
    Country,
    City,
    Crew,
}

impl Follows {
    fn set_mut(&mut self, kind: FollowKind) -> &mut Vec<String> {
        match kind {
            FollowKind::Country => &mut self.countries,
            FollowKind::City => &mut self.cities,
            FollowKind::Crew => &mut self.crews,
        }
    }

    /// The followed values for one kind.
    pub fn set(&self, kind: FollowKind) -> &[String] {
        match kind {
            FollowKind::Country => &self.countries,
            FollowKind::City => &self.cities,
            FollowKind::Crew => &self.crews,
        }
    }
}

/// Per-user persisted state.
///
/// Stored as one document per user (Firestore) or one JSON file (local).
/// All mutation goes through the `UserStore` commands; the methods here are
/// the pure state transitions those commands apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStateDoc {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    /// Favorite spot ids, insertion order, no duplicates
    #[serde(default)]
    pub favorites: Vec<String>,
    /// Collection name (case-sensitive, unique) to ordered-unique spot ids
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<String>>,
    /// Most-recent-first, bounded by the feed cap
    #[serde(default)]
    pub activity_feed: Vec<ActivityEntry>,
    /// Earned achievement ids, monotonically growing
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
    #[serde(default)]
    pub avatar_ref: Option<String>,
    #[serde(default)]
    pub follows: Follows,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

fn default_theme_color() -> String {
    "#ff9f1c".to_string()
}

impl Default for UserStateDoc {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            favorites: Vec::new(),
            collections: BTreeMap::new(),
            activity_feed: Vec::new(),
            achievements: Vec::new(),
            theme_color: default_theme_color(),
            avatar_ref: None,
            follows: Follows::default(),
        }
    }
}

impl UserStateDoc {
    /// Repair a freshly-loaded document in place.
    ///
    /// Idempotent: removes duplicate favorites, collection members and
    /// achievements (first occurrence wins), truncates the activity feed to
    /// `feed_cap`, and stamps the current schema version.
    pub fn normalize(&mut self, feed_cap: usize) {
        self.schema_version = SCHEMA_VERSION;
        dedup_preserving_order(&mut self.favorites);
        dedup_preserving_order(&mut self.achievements);
        for members in self.collections.values_mut() {
            dedup_preserving_order(members);
        }
        self.activity_feed.truncate(feed_cap);
    }

    /// True when `spot_id` is currently a favorite.
    pub fn is_favorite(&self, spot_id: &str) -> bool {
        self.favorites.iter().any(|id| id == spot_id)
    }

    /// Toggle favorite membership. Returns `true` when the spot is now a
    /// favorite, `false` when it was just removed.
    pub fn toggle_favorite(&mut self, spot_id: &str) -> bool {
        if let Some(pos) = self.favorites.iter().position(|id| id == spot_id) {
            self.favorites.remove(pos);
            false
        } else {
            self.favorites.push(spot_id.to_string());
            true
        }
    }

    /// Create an empty collection. Names collide case-sensitively.
    pub fn create_collection(&mut self, name: &str) -> Result<(), AppError> {
        if self.collections.contains_key(name) {
            return Err(AppError::DuplicateName(name.to_string()));
        }
        self.collections.insert(name.to_string(), Vec::new());
        Ok(())
    }

    /// Add a spot to an existing collection.
    ///
    /// Returns `Ok(true)` when membership actually changed, `Ok(false)` for
    /// the idempotent repeat.
    pub fn add_spot_to_collection(&mut self, name: &str, spot_id: &str) -> Result<bool, AppError> {
        let members = self
            .collections
            .get_mut(name)
            .ok_or_else(|| AppError::CollectionNotFound(name.to_string()))?;
        if members.iter().any(|id| id == spot_id) {
            return Ok(false);
        }
        members.push(spot_id.to_string());
        Ok(true)
    }

    /// Remove a spot from an existing collection.
    ///
    /// Returns `Ok(true)` when the spot was present and removed.
    pub fn remove_spot_from_collection(
        &mut self,
        name: &str,
        spot_id: &str,
    ) -> Result<bool, AppError> {
        let members = self
            .collections
            .get_mut(name)
            .ok_or_else(|| AppError::CollectionNotFound(name.to_string()))?;
        match members.iter().position(|id| id == spot_id) {
            Some(pos) => {
                members.remove(pos);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Atomically move a collection entry to a new name.
    ///
    /// Renaming to the current name is a no-op, not a collision.
    pub fn rename_collection(&mut self, old_name: &str, new_name: &str) -> Result<(), AppError> {
        if old_name == new_name {
            return if self.collections.contains_key(old_name) {
                Ok(())
            } else {
                Err(AppError::CollectionNotFound(old_name.to_string()))
            };
        }
        if self.collections.contains_key(new_name) {
            return Err(AppError::DuplicateName(new_name.to_string()));
        }
        let members = self
            .collections
            .remove(old_name)
            .ok_or_else(|| AppError::CollectionNotFound(old_name.to_string()))?;
        self.collections.insert(new_name.to_string(), members);
        Ok(())
    }

    /// Remove a collection. Returns `true` when one was removed; a missing
    /// name is a no-op, not an error.
    pub fn delete_collection(&mut self, name: &str) -> bool {
        self.collections.remove(name).is_some()
    }

    /// Prepend a timestamped entry, dropping the oldest past `feed_cap`.
    pub fn push_activity(&mut self, message: String, timestamp: String, feed_cap: usize) {
        self.activity_feed.insert(0, ActivityEntry { message, timestamp });
        self.activity_feed.truncate(feed_cap);
    }

    /// Toggle followed-set membership. Returns `true` when now followed.
    pub fn toggle_follow(&mut self, kind: FollowKind, value: &str) -> bool {
        let set = self.follows.set_mut(kind);
        if let Some(pos) = set.iter().position(|v| v == value) {
            set.remove(pos);
            false
        } else {
            set.push(value.to_string());
            true
        }
    }
}

fn dedup_preserving_order(values: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    values.retain(|v| seen.insert(v.clone()));
}
