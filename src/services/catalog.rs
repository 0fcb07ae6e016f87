// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Catalog loading and lookups.
//!
//! The catalog is loaded once at startup and is read-only for the entire
//! session. Persisted references into it (favorites, collection members)
//! may be stale, so lookups fail softly with `None`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use validator::Validate;

use crate::models::Spot;

/// The static list of spots plus derived lookups.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    spots: Vec<Spot>,
}

impl Catalog {
    /// Build a catalog from already-constructed spots, validating each one.
    pub fn new(spots: Vec<Spot>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for spot in &spots {
            spot.validate()
                .map_err(|e| CatalogError::Invalid(format!("Spot \"{}\": {}", spot.id, e)))?;
            if !seen.insert(spot.id.clone()) {
                return Err(CatalogError::DuplicateId(spot.id.clone()));
            }
        }
        Ok(Self { spots })
    }

    /// Load the catalog from a JSON seed file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| CatalogError::Io(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load the catalog from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, CatalogError> {
        let spots: Vec<Spot> =
            serde_json::from_str(json_data).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let catalog = Self::new(spots)?;
        tracing::info!(count = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// The full list, stable order.
    pub fn get_all(&self) -> &[Spot] {
        &self.spots
    }

    /// Look up a spot by id. Stale ids from persisted references are
    /// expected, so a miss is `None`, never an error.
    pub fn find_by_id(&self, id: &str) -> Option<&Spot> {
        self.spots.iter().find(|s| s.id == id)
    }

    /// Count spots whose category tag matches `needle` (case-insensitive
    /// substring).
    pub fn count_type_matches(&self, needle: &str) -> usize {
        self.spots.iter().filter(|s| s.type_matches(needle)).count()
    }

    /// Distinct countries in first-seen order, for filter dropdowns.
    pub fn countries(&self) -> Vec<String> {
        distinct(self.spots.iter().map(|s| s.country.as_str()))
    }

    /// Distinct cities in first-seen order, for filter dropdowns.
    pub fn cities(&self) -> Vec<String> {
        distinct(self.spots.iter().map(|s| s.city.as_str()))
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(String::from)
        .collect()
}

/// Catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid spot: {0}")]
    Invalid(String),

    #[error("Duplicate spot id: {0}")]
    DuplicateId(String),
}
