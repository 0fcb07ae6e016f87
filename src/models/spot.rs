// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spot model: a breaking location in the catalog.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A review left on a spot. Ratings are 1 to 5 stars.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Review {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[serde(default)]
    pub text: String,
}

/// A point of interest: jam, cypher, or training spot.
///
/// Catalog entries are immutable for the session. `favorites` and
/// collections reference spots by `id`, so ids must never be reused.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Spot {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub country: String,
    #[validate(length(min = 1))]
    pub crew: String,
    /// Free-text category tag ("Jam", "Cypher Jam", "Training Spot", ...)
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub spot_type: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub image: Option<String>,
    #[validate(nested)]
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Spot {
    /// Case-insensitive substring match against the category tag.
    ///
    /// Category tags are free text ("Cypher Jam" matches both "cypher" and
    /// "jam"), so counters and filters match by substring rather than
    /// comparing for equality.
    pub fn type_matches(&self, needle: &str) -> bool {
        self.spot_type
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    /// Arithmetic mean of review ratings, `None` when there are no reviews.
    ///
    /// The `None` sentinel keeps a review-less spot from rendering as
    /// "0 stars".
    pub fn average_rating(&self) -> Option<f64> {
        if self.reviews.is_empty() {
            return None;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        Some(f64::from(sum) / self.reviews.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn make_spot(spot_type: &str, ratings: &[u8]) -> Spot {
        Spot {
            id: "spot_test".to_string(),
            name: "Test Spot".to_string(),
            city: "Paris".to_string(),
            country: "France".to_string(),
            crew: "Test Crew".to_string(),
            spot_type: spot_type.to_string(),
            lat: 48.86,
            lng: 2.35,
            about: String::new(),
            image: None,
            reviews: ratings
                .iter()
                .map(|&rating| Review {
                    rating,
                    text: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_type_matches_is_case_insensitive_substring() {
        let spot = make_spot("Cypher Jam", &[]);
        assert!(spot.type_matches("jam"));
        assert!(spot.type_matches("Cypher"));
        assert!(!spot.type_matches("training"));
    }

    #[test]
    fn test_average_rating_mean() {
        let spot = make_spot("Jam", &[4, 5]);
        assert_eq!(spot.average_rating(), Some(4.5));
    }

    #[test]
    fn test_average_rating_none_without_reviews() {
        let spot = make_spot("Jam", &[]);
        assert_eq!(spot.average_rating(), None);
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let mut spot = make_spot("Jam", &[]);
        spot.lat = 91.0;
        assert!(spot.validate().is_err());
    }

    #[test]
    fn test_out_of_range_rating_rejected() {
        let spot = make_spot("Jam", &[6]);
        assert!(spot.validate().is_err());
    }

    #[test]
    fn test_empty_display_field_rejected() {
        let mut spot = make_spot("Jam", &[5]);
        spot.name = String::new();
        assert!(spot.validate().is_err());
    }
}
