// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The user state store: single owner of mutable per-user state.
//!
//! All mutation goes through the commands here. Each command validates its
//! input, applies the state transition in memory, notifies subscribers, and
//! then writes the full document to the backing store. The local update is
//! optimistic: a failed write is reported once as `Persistence` and the
//! in-memory state is retained so the session stays usable. No automatic
//! retry; the next successful mutation persists the full state anyway.
//!
//! Remote listener payloads (another device writing the same document) come
//! back in through `apply_remote_snapshot`, which treats the remote store
//! as the eventual source of truth (last writer wins) and re-notifies
//! subscribers unconditionally.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{AppError, Result};
use crate::models::achievement::{AchievementInputs, ACHIEVEMENTS};
use crate::models::{FollowKind, UserStateDoc};
use crate::services::catalog::Catalog;
use crate::db::StateBackend;

/// Owner of the persisted user state. Generic over the backing store so
/// local-file, Firestore, and in-memory deployments share one command
/// layer.
pub struct UserStore<B: StateBackend> {
    backend: B,
    catalog: Arc<Catalog>,
    tx: watch::Sender<UserStateDoc>,
    feed_cap: usize,
}

impl<B: StateBackend> UserStore<B> {
    /// Read the persisted document (creating the default exactly once on
    /// first run), normalize it, and detect any achievements earned under
    /// older rules.
    pub async fn load(backend: B, catalog: Arc<Catalog>, feed_cap: usize) -> Result<Self> {
        let mut doc = match backend.load().await? {
            Some(mut doc) => {
                doc.normalize(feed_cap);
                doc
            }
            None => {
                let doc = UserStateDoc::default();
                backend.create_if_absent(&doc).await?;
                tracing::info!("Created default user state");
                doc
            }
        };

        // Achievements may be newly satisfied by normalized legacy data.
        // A failed write here is not fatal: the next successful mutation
        // persists the full document again.
        let unlocked = unlock_new_achievements(&mut doc, &catalog, feed_cap, &now_rfc3339());
        if !unlocked.is_empty() {
            if let Err(e) = backend.save(&doc).await {
                tracing::warn!(error = %e, "Could not persist achievements detected at load");
            }
        }

        let (tx, _rx) = watch::channel(doc);
        Ok(Self {
            backend,
            catalog,
            tx,
            feed_cap,
        })
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UserStateDoc {
        self.tx.borrow().clone()
    }

    /// Register for state change notifications. Dropping the receiver
    /// unsubscribes; multiple subscribers are allowed.
    pub fn subscribe(&self) -> watch::Receiver<UserStateDoc> {
        self.tx.subscribe()
    }

    // ─── Commands ────────────────────────────────────────────────

    /// Toggle favorite membership for a catalog spot.
    ///
    /// The toggle pair is idempotent on the favorites set, but each call
    /// deliberately appends its own activity entry.
    pub async fn toggle_favorite(&self, spot_id: &str) -> Result<bool> {
        let spot_id = non_empty(spot_id, "spot id")?;
        let label = self
            .catalog
            .find_by_id(spot_id)
            .map(|s| s.name.clone())
            .ok_or_else(|| AppError::SpotNotFound(spot_id.to_string()))?;

        let now = now_rfc3339();
        let mut now_favorite = false;
        self.tx.send_if_modified(|state| {
            now_favorite = state.toggle_favorite(spot_id);
            let message = if now_favorite {
                format!("Added favorite: {label}")
            } else {
                format!("Removed favorite: {label}")
            };
            state.push_activity(message, now.clone(), self.feed_cap);
            unlock_new_achievements(state, &self.catalog, self.feed_cap, &now);
            true
        });

        tracing::info!(spot_id, now_favorite, "Toggled favorite");
        self.persist().await?;
        Ok(now_favorite)
    }

    /// Create an empty collection. `DuplicateName` if the name is taken
    /// (case-sensitive comparison).
    pub async fn create_collection(&self, name: &str) -> Result<()> {
        let name = non_empty(name, "collection name")?;

        let now = now_rfc3339();
        let mut outcome = Ok(());
        self.tx.send_if_modified(|state| {
            if let Err(e) = state.create_collection(name) {
                outcome = Err(e);
                return false;
            }
            state.push_activity(
                format!("Created collection \"{name}\""),
                now.clone(),
                self.feed_cap,
            );
            unlock_new_achievements(state, &self.catalog, self.feed_cap, &now);
            true
        });
        outcome?;

        tracing::info!(collection = name, "Created collection");
        self.persist().await
    }

    /// Add a catalog spot to an existing collection. Idempotent: a repeat
    /// add changes nothing and logs nothing.
    pub async fn add_spot_to_collection(&self, name: &str, spot_id: &str) -> Result<bool> {
        let name = non_empty(name, "collection name")?;
        let spot_id = non_empty(spot_id, "spot id")?;
        let label = self
            .catalog
            .find_by_id(spot_id)
            .map(|s| s.name.clone())
            .ok_or_else(|| AppError::SpotNotFound(spot_id.to_string()))?;

        let now = now_rfc3339();
        let mut outcome = Ok(false);
        self.tx.send_if_modified(|state| {
            match state.add_spot_to_collection(name, spot_id) {
                Ok(true) => {
                    state.push_activity(
                        format!("Added {label} to collection \"{name}\""),
                        now.clone(),
                        self.feed_cap,
                    );
                    unlock_new_achievements(state, &self.catalog, self.feed_cap, &now);
                    outcome = Ok(true);
                    true
                }
                Ok(false) => false,
                Err(e) => {
                    outcome = Err(e);
                    false
                }
            }
        });
        let changed = outcome?;

        if changed {
            tracing::info!(collection = name, spot_id, "Added spot to collection");
            self.persist().await?;
        }
        Ok(changed)
    }

    /// Remove a spot from an existing collection. Logs only on actual
    /// change.
    pub async fn remove_spot_from_collection(&self, name: &str, spot_id: &str) -> Result<bool> {
        let name = non_empty(name, "collection name")?;
        let spot_id = non_empty(spot_id, "spot id")?;
        let label = self
            .catalog
            .find_by_id(spot_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| spot_id.to_string());

        let now = now_rfc3339();
        let mut outcome = Ok(false);
        self.tx.send_if_modified(|state| {
            match state.remove_spot_from_collection(name, spot_id) {
                Ok(true) => {
                    state.push_activity(
                        format!("Removed {label} from collection \"{name}\""),
                        now.clone(),
                        self.feed_cap,
                    );
                    unlock_new_achievements(state, &self.catalog, self.feed_cap, &now);
                    outcome = Ok(true);
                    true
                }
                Ok(false) => false,
                Err(e) => {
                    outcome = Err(e);
                    false
                }
            }
        });
        let changed = outcome?;

        if changed {
            tracing::info!(collection = name, spot_id, "Removed spot from collection");
            self.persist().await?;
        }
        Ok(changed)
    }

    /// Atomically move a collection to a new name.
    pub async fn rename_collection(&self, old_name: &str, new_name: &str) -> Result<()> {
        let old_name = non_empty(old_name, "collection name")?;
        let new_name = non_empty(new_name, "collection name")?;
        if old_name == new_name {
            return Ok(());
        }

        let now = now_rfc3339();
        let mut outcome = Ok(());
        self.tx.send_if_modified(|state| {
            if let Err(e) = state.rename_collection(old_name, new_name) {
                outcome = Err(e);
                return false;
            }
            state.push_activity(
                format!("Renamed collection \"{old_name}\" to \"{new_name}\""),
                now.clone(),
                self.feed_cap,
            );
            unlock_new_achievements(state, &self.catalog, self.feed_cap, &now);
            true
        });
        outcome?;

        tracing::info!(old = old_name, new = new_name, "Renamed collection");
        self.persist().await
    }

    /// Remove a collection. Missing name is a no-op, not an error.
    pub async fn delete_collection(&self, name: &str) -> Result<bool> {
        let name = non_empty(name, "collection name")?;

        let now = now_rfc3339();
        let mut removed = false;
        self.tx.send_if_modified(|state| {
            removed = state.delete_collection(name);
            if removed {
                state.push_activity(
                    format!("Deleted collection \"{name}\""),
                    now.clone(),
                    self.feed_cap,
                );
                unlock_new_achievements(state, &self.catalog, self.feed_cap, &now);
            }
            removed
        });

        if removed {
            tracing::info!(collection = name, "Deleted collection");
            self.persist().await?;
        }
        Ok(removed)
    }

    /// Prepend a timestamped entry to the activity feed.
    pub async fn log_activity(&self, message: &str) -> Result<()> {
        let message = non_empty(message, "activity message")?;

        let now = now_rfc3339();
        self.tx.send_if_modified(|state| {
            state.push_activity(message.to_string(), now.clone(), self.feed_cap);
            true
        });
        self.persist().await
    }

    /// Re-evaluate the achievement table against the current state.
    ///
    /// Monotone: any predicate newly satisfied adds its id and one activity
    /// entry exactly once; nothing is ever removed. Runs implicitly after
    /// every mutating command, so calling this explicitly is only needed
    /// when the catalog itself changed underneath.
    pub async fn recompute_achievements(&self) -> Result<Vec<&'static str>> {
        let now = now_rfc3339();
        let mut unlocked = Vec::new();
        self.tx.send_if_modified(|state| {
            unlocked = unlock_new_achievements(state, &self.catalog, self.feed_cap, &now);
            !unlocked.is_empty()
        });

        if !unlocked.is_empty() {
            tracing::info!(?unlocked, "Achievements unlocked");
            self.persist().await?;
        }
        Ok(unlocked)
    }

    /// Set the theme accent color (hex, e.g. "#ff9f1c").
    pub async fn set_theme_color(&self, color: &str) -> Result<()> {
        let color = non_empty(color, "theme color")?;
        let digits = color.strip_prefix('#').ok_or_else(bad_color)?;
        if !(digits.len() == 3 || digits.len() == 6)
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(bad_color());
        }

        let now = now_rfc3339();
        self.tx.send_if_modified(|state| {
            state.theme_color = color.to_string();
            state.push_activity(
                format!("Changed theme color to {color}"),
                now.clone(),
                self.feed_cap,
            );
            true
        });
        self.persist().await
    }

    /// Set the avatar reference (URL or data URI).
    pub async fn set_avatar(&self, avatar_ref: &str) -> Result<()> {
        let avatar_ref = non_empty(avatar_ref, "avatar reference")?;

        let now = now_rfc3339();
        self.tx.send_if_modified(|state| {
            state.avatar_ref = Some(avatar_ref.to_string());
            state.push_activity(
                "Updated profile avatar".to_string(),
                now.clone(),
                self.feed_cap,
            );
            true
        });
        self.persist().await
    }

    /// Toggle a followed country/city/crew. Returns `true` when now
    /// followed.
    pub async fn toggle_follow(&self, kind: FollowKind, value: &str) -> Result<bool> {
        let value = non_empty(value, "follow target")?;

        let now = now_rfc3339();
        let mut following = false;
        self.tx.send_if_modified(|state| {
            following = state.toggle_follow(kind, value);
            let message = if following {
                format!("Now following {value}")
            } else {
                format!("Unfollowed {value}")
            };
            state.push_activity(message, now.clone(), self.feed_cap);
            true
        });

        self.persist().await?;
        Ok(following)
    }

    // ─── Remote notifications ────────────────────────────────────

    /// Apply a snapshot pushed by the remote store's listener.
    ///
    /// The remote document wins wholesale (last writer wins at the store;
    /// this is the documented weak-consistency policy). Subscribers are
    /// notified even when the payload equals the local state, so the UI
    /// re-renders on every notification regardless of origin.
    pub fn apply_remote_snapshot(&self, mut doc: UserStateDoc) {
        doc.normalize(self.feed_cap);
        tracing::debug!("Applying remote state snapshot");
        self.tx.send_replace(doc);
    }

    async fn persist(&self) -> Result<()> {
        let snapshot = self.tx.borrow().clone();
        if let Err(e) = self.backend.save(&snapshot).await {
            tracing::warn!(error = %e, "State write failed; keeping optimistic local state");
            return Err(e);
        }
        Ok(())
    }
}

/// Evaluate the achievement table, appending newly earned ids and their
/// activity entries. Returns the newly unlocked ids.
fn unlock_new_achievements(
    state: &mut UserStateDoc,
    catalog: &Catalog,
    feed_cap: usize,
    now: &str,
) -> Vec<&'static str> {
    let inputs = AchievementInputs {
        favorite_count: state.favorites.len(),
        collection_count: state.collections.len(),
        favorite_jam_count: state
            .favorites
            .iter()
            .filter_map(|id| catalog.find_by_id(id))
            .filter(|s| s.type_matches("jam"))
            .count(),
    };

    let mut unlocked = Vec::new();
    for def in ACHIEVEMENTS {
        if def.earned(&inputs) && !state.achievements.iter().any(|a| a == def.id) {
            state.achievements.push(def.id.to_string());
            state.push_activity(
                format!("Unlocked achievement: {}", def.title),
                now.to_string(),
                feed_cap,
            );
            unlocked.push(def.id);
        }
    }
    unlocked
}

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("Empty {what}")));
    }
    Ok(trimmed)
}

fn bad_color() -> AppError {
    AppError::Validation("Theme color must be a hex color like #ff9f1c".to_string())
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
