// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end store behavior over the in-memory backend.

mod common;

use breakatlas_core::config::DEFAULT_FEED_CAP;
use breakatlas_core::db::{MemoryBackend, StateBackend};
use breakatlas_core::error::AppError;
use breakatlas_core::models::UserStateDoc;
use breakatlas_core::services::UserStore;

use common::{test_catalog, test_store};

#[tokio::test]
async fn test_favorite_toggle_is_idempotent_pair() {
    let (store, _backend) = test_store().await;

    store.toggle_favorite("spot_a").await.unwrap();
    assert_eq!(store.state().favorites, vec!["spot_a"]);

    store.toggle_favorite("spot_a").await.unwrap();
    assert!(store.state().favorites.is_empty());

    // The toggle pair is a set no-op, but each call logged its action.
    let feed = store.state().activity_feed;
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0].message, "Removed favorite: Jam A");
    assert_eq!(feed[1].message, "Added favorite: Jam A");
}

#[tokio::test]
async fn test_toggle_unknown_spot_rejected() {
    let (store, _backend) = test_store().await;
    let err = store.toggle_favorite("spot_ghost").await.unwrap_err();
    assert!(matches!(err, AppError::SpotNotFound(_)));
    assert!(store.state().favorites.is_empty());
}

#[tokio::test]
async fn test_activity_feed_bounded_most_recent_first() {
    let catalog = test_catalog();
    let cap = 5;
    let store = UserStore::load(MemoryBackend::new(), catalog, cap)
        .await
        .unwrap();

    for i in 0..8 {
        store.log_activity(&format!("entry {i}")).await.unwrap();
    }

    let feed = store.state().activity_feed;
    assert_eq!(feed.len(), cap);
    let messages: Vec<_> = feed.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["entry 7", "entry 6", "entry 5", "entry 4", "entry 3"]
    );
}

#[tokio::test]
async fn test_duplicate_collection_name_rejected() {
    let (store, _backend) = test_store().await;

    store.create_collection("Euro Trip").await.unwrap();
    let err = store.create_collection("Euro Trip").await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateName(_)));
    assert_eq!(store.state().collections.len(), 1);
}

#[tokio::test]
async fn test_collection_membership_idempotent() {
    let (store, _backend) = test_store().await;

    store.create_collection("Trip").await.unwrap();
    assert!(store.add_spot_to_collection("Trip", "spot_a").await.unwrap());
    assert!(!store.add_spot_to_collection("Trip", "spot_a").await.unwrap());

    assert_eq!(store.state().collections["Trip"], vec!["spot_a"]);
}

#[tokio::test]
async fn test_add_to_missing_collection_fails_without_mutation() {
    let (store, _backend) = test_store().await;

    let err = store
        .add_spot_to_collection("Ghost", "spot_a")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CollectionNotFound(_)));
    assert!(store.state().collections.is_empty());
}

#[tokio::test]
async fn test_rename_and_delete_collections() {
    let (store, _backend) = test_store().await;

    store.create_collection("Old").await.unwrap();
    store.add_spot_to_collection("Old", "spot_a").await.unwrap();

    store.rename_collection("Old", "New").await.unwrap();
    let state = store.state();
    assert!(!state.collections.contains_key("Old"));
    assert_eq!(state.collections["New"], vec!["spot_a"]);

    assert!(store.delete_collection("New").await.unwrap());
    // Missing name is a no-op, not an error
    assert!(!store.delete_collection("New").await.unwrap());
}

#[tokio::test]
async fn test_empty_names_rejected_before_mutation() {
    let (store, _backend) = test_store().await;

    assert!(matches!(
        store.create_collection("   ").await.unwrap_err(),
        AppError::Validation(_)
    ));
    assert!(matches!(
        store.log_activity("").await.unwrap_err(),
        AppError::Validation(_)
    ));
    assert!(matches!(
        store.set_theme_color("ff9f1c").await.unwrap_err(),
        AppError::Validation(_)
    ));

    let state = store.state();
    assert!(state.collections.is_empty());
    assert!(state.activity_feed.is_empty());
    assert_eq!(state.theme_color, "#ff9f1c");
}

#[tokio::test]
async fn test_super_fan_unlocks_once_at_five_favorites() {
    let (store, _backend) = test_store().await;

    for id in ["spot_a", "spot_b", "spot_c", "spot_d"] {
        store.toggle_favorite(id).await.unwrap();
    }
    assert!(!store
        .state()
        .achievements
        .contains(&"super_fan".to_string()));

    store.toggle_favorite("spot_e").await.unwrap();
    let achievements = store.state().achievements;
    assert!(achievements.contains(&"super_fan".to_string()));

    // Re-running at the same or higher count adds nothing
    let unlocked = store.recompute_achievements().await.unwrap();
    assert!(unlocked.is_empty());
    store.toggle_favorite("spot_f").await.unwrap();
    let count = store
        .state()
        .achievements
        .iter()
        .filter(|a| a.as_str() == "super_fan")
        .count();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_achievements_are_monotone() {
    let (store, _backend) = test_store().await;

    // Three jam favorites unlock both favorite-count and jam achievements
    for id in ["spot_a", "spot_b", "spot_c"] {
        store.toggle_favorite(id).await.unwrap();
    }
    let earned = store.state().achievements;
    assert!(earned.contains(&"collector_i".to_string()));
    assert!(earned.contains(&"cypher_hunter".to_string()));

    // Dropping back below the thresholds removes nothing
    for id in ["spot_a", "spot_b", "spot_c"] {
        store.toggle_favorite(id).await.unwrap();
    }
    assert!(store.state().favorites.is_empty());
    let still_earned = store.state().achievements;
    assert!(still_earned.contains(&"collector_i".to_string()));
    assert!(still_earned.contains(&"cypher_hunter".to_string()));
}

#[tokio::test]
async fn test_unlock_logged_exactly_once() {
    let (store, _backend) = test_store().await;

    store.create_collection("A").await.unwrap();
    store.create_collection("B").await.unwrap();
    store.create_collection("C").await.unwrap();

    let feed = store.state().activity_feed;
    let unlock_entries = feed
        .iter()
        .filter(|e| e.message == "Unlocked achievement: Curator I")
        .count();
    assert_eq!(unlock_entries, 1);
}

#[tokio::test]
async fn test_persistence_failure_keeps_optimistic_state() {
    let (store, backend) = test_store().await;

    backend.set_offline(true);
    let err = store.toggle_favorite("spot_a").await.unwrap_err();
    assert!(err.is_persistence());

    // In-memory state retained, nothing rolled back
    assert_eq!(store.state().favorites, vec!["spot_a"]);

    // Next successful mutation persists the full state again
    backend.set_offline(false);
    store.toggle_favorite("spot_b").await.unwrap();
    let persisted = backend.persisted().unwrap();
    assert_eq!(persisted.favorites, vec!["spot_a", "spot_b"]);
}

#[tokio::test]
async fn test_subscribers_notified_on_commands_and_remote_snapshots() {
    let (store, _backend) = test_store().await;
    let mut rx = store.subscribe();

    store.toggle_favorite("spot_a").await.unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().favorites, vec!["spot_a"]);

    // A remote snapshot equal to local state still notifies: the UI
    // re-renders on every notification regardless of origin.
    let snapshot = store.state();
    store.apply_remote_snapshot(snapshot);
    assert!(rx.has_changed().unwrap());

    // A diverging remote snapshot wins wholesale (last writer wins)
    let mut remote = UserStateDoc::default();
    remote.favorites.push("spot_f".to_string());
    store.apply_remote_snapshot(remote);
    assert_eq!(rx.borrow_and_update().favorites, vec!["spot_f"]);
    assert_eq!(store.state().favorites, vec!["spot_f"]);
}

#[tokio::test]
async fn test_returning_user_state_is_normalized_at_load() {
    let mut legacy = UserStateDoc::default();
    legacy.favorites = vec!["spot_a".into(), "spot_a".into(), "spot_b".into()];
    let backend = MemoryBackend::with_doc(legacy);

    let store = UserStore::load(backend, test_catalog(), DEFAULT_FEED_CAP)
        .await
        .unwrap();
    assert_eq!(store.state().favorites, vec!["spot_a", "spot_b"]);
}

#[tokio::test]
async fn test_first_run_creates_default_document_once() {
    let backend = MemoryBackend::new();
    assert!(backend.persisted().is_none());

    let store = UserStore::load(backend.clone(), test_catalog(), DEFAULT_FEED_CAP)
        .await
        .unwrap();
    assert!(backend.persisted().is_some());
    assert!(store.state().favorites.is_empty());

    // A concurrent first session must not clobber data written meanwhile
    let mut other_device = backend.persisted().unwrap();
    other_device.favorites.push("spot_a".to_string());
    backend.save(&other_device).await.unwrap();

    let store2 = UserStore::load(backend.clone(), test_catalog(), DEFAULT_FEED_CAP)
        .await
        .unwrap();
    assert_eq!(store2.state().favorites, vec!["spot_a"]);
}

#[tokio::test]
async fn test_theme_avatar_and_follow_commands() {
    let (store, backend) = test_store().await;

    store.set_theme_color("#2ec4b6").await.unwrap();
    store.set_avatar("https://example.com/me.png").await.unwrap();
    assert!(store
        .toggle_follow(breakatlas_core::models::FollowKind::Crew, "The Ruggeds")
        .await
        .unwrap());

    let persisted = backend.persisted().unwrap();
    assert_eq!(persisted.theme_color, "#2ec4b6");
    assert_eq!(
        persisted.avatar_ref.as_deref(),
        Some("https://example.com/me.png")
    );
    assert_eq!(persisted.follows.crews, vec!["The Ruggeds"]);
}
