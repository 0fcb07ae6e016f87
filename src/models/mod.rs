// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod achievement;
pub mod spot;
pub mod user_state;

pub use achievement::{AchievementDef, AchievementInputs, ACHIEVEMENTS};
pub use spot::{Review, Spot};
pub use user_state::{ActivityEntry, FollowKind, Follows, UserStateDoc};
