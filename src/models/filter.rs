use serde::{Deserialize, Serialize};

use crate::models::space::{SpaceCategory, StudySpace};

/// Current user-selected predicate over the catalog. Ephemeral, never
/// persisted.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct FilterState {
    pub category: SpaceCategory,
    pub quiet_only: bool,
    pub food_only: bool,
}

impl FilterState {
    /// All three predicates must hold at once (conjunction).
    pub fn matches(&self, space: &StudySpace) -> bool {
        (self.category == SpaceCategory::Any || space.category == self.category)
            && (!self.quiet_only || space.is_quiet)
            && (!self.food_only || space.has_food)
    }
}
