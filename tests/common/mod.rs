// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::Arc;

use breakatlas_core::config::DEFAULT_FEED_CAP;
use breakatlas_core::db::MemoryBackend;
use breakatlas_core::models::{Review, Spot};
use breakatlas_core::services::{Catalog, UserStore};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Install a test subscriber so RUST_LOG shows store command logs.
#[allow(dead_code)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Build a test spot with sensible defaults.
#[allow(dead_code)]
pub fn make_spot(id: &str, name: &str, country: &str, spot_type: &str) -> Spot {
    Spot {
        id: id.to_string(),
        name: name.to_string(),
        city: "Testville".to_string(),
        country: country.to_string(),
        crew: "Test Crew".to_string(),
        spot_type: spot_type.to_string(),
        lat: 48.86,
        lng: 2.35,
        about: String::new(),
        image: None,
        reviews: vec![Review {
            rating: 5,
            text: "Solid.".to_string(),
        }],
    }
}

/// A catalog with three jams, two training spots, and a cypher jam.
#[allow(dead_code)]
pub fn test_catalog() -> Arc<Catalog> {
    let spots = vec![
        make_spot("spot_a", "Jam A", "France", "Jam"),
        make_spot("spot_b", "Jam B", "Netherlands", "Jam"),
        make_spot("spot_c", "Jam C", "Slovakia", "Jam"),
        make_spot("spot_d", "Hub D", "France", "Training Spot"),
        make_spot("spot_e", "Hub E", "Germany", "Training Spot"),
        make_spot("spot_f", "Cypher F", "Italy", "Cypher Jam"),
    ];
    Arc::new(Catalog::new(spots).expect("test catalog should be valid"))
}

/// A store over a fresh in-memory backend. Returns the backend too so
/// tests can inspect what was persisted.
#[allow(dead_code)]
pub async fn test_store() -> (UserStore<MemoryBackend>, MemoryBackend) {
    init_test_tracing();
    let backend = MemoryBackend::new();
    let store = UserStore::load(backend.clone(), test_catalog(), DEFAULT_FEED_CAP)
        .await
        .expect("store should load");
    (store, backend)
}
