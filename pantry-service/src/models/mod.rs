//! Domain models for the pantry service.

pub mod item;
pub mod recipe;

pub use item::Item;
pub use recipe::{Recipe, RecipeCandidate};

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at BSON datetime precision, so a freshly built document
/// equals what a later read returns.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
