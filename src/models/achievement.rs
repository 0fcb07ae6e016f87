// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fixed achievement table.
//!
//! Achievements are monotone: once an id is in the persisted set it is
//! never removed, even if the triggering condition later becomes false.
//! The store re-evaluates the table after every mutating command.

/// Inputs the achievement predicates are evaluated against.
#[derive(Debug, Clone, Copy, Default)]
pub struct AchievementInputs {
    pub favorite_count: usize,
    pub collection_count: usize,
    /// Favorites whose spot type matches the "jam" category
    pub favorite_jam_count: usize,
}

/// One achievement definition.
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    predicate: fn(&AchievementInputs) -> bool,
}

impl AchievementDef {
    /// Whether the predicate is satisfied by the current inputs.
    pub fn earned(&self, inputs: &AchievementInputs) -> bool {
        (self.predicate)(inputs)
    }
}

/// The full table, in unlock-check order.
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: "collector_i",
        title: "Collector I",
        description: "Add 3 favorites",
        predicate: |i| i.favorite_count >= 3,
    },
    AchievementDef {
        id: "super_fan",
        title: "Super Fan",
        description: "Add 5 favorites",
        predicate: |i| i.favorite_count >= 5,
    },
    AchievementDef {
        id: "curator_i",
        title: "Curator I",
        description: "Create 2 collections",
        predicate: |i| i.collection_count >= 2,
    },
    AchievementDef {
        id: "cypher_hunter",
        title: "Cypher Hunter",
        description: "Favorite 3 jams",
        predicate: |i| i.favorite_jam_count >= 3,
    },
];

/// Look up a definition by id.
pub fn find(id: &str) -> Option<&'static AchievementDef> {
    ACHIEVEMENTS.iter().find(|def| def.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_fan_threshold() {
        let def = find("super_fan").unwrap();
        assert!(!def.earned(&AchievementInputs {
            favorite_count: 4,
            ..Default::default()
        }));
        assert!(def.earned(&AchievementInputs {
            favorite_count: 5,
            ..Default::default()
        }));
    }

    #[test]
    fn test_cypher_hunter_counts_jam_favorites_only() {
        let def = find("cypher_hunter").unwrap();
        assert!(!def.earned(&AchievementInputs {
            favorite_count: 10,
            favorite_jam_count: 2,
            ..Default::default()
        }));
        assert!(def.earned(&AchievementInputs {
            favorite_jam_count: 3,
            ..Default::default()
        }));
    }

    #[test]
    fn test_table_ids_are_unique() {
        let mut ids: Vec<_> = ACHIEVEMENTS.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ACHIEVEMENTS.len());
    }
}
