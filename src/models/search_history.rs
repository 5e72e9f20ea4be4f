use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::space::Coordinate;

/// One past location search. `name` is the unique key; re-searching the
/// same name refreshes `timestamp` instead of inserting a second row.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SearchHistoryEntry {
    pub name: String,
    pub coordinate: Coordinate,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}
