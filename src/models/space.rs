use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct StudySpace {
    pub space_id: String,
    pub name: String,
    pub location: String,
    pub rating: f64,
    pub is_open: bool,
    pub reviews: u32,
    pub category: SpaceCategory,
    pub coordinate: Coordinate,
    pub is_quiet: bool,
    pub has_food: bool,
}

/// `Any` is only meaningful as a filter wildcard; catalog entities carry
/// `Campus` or `Offsite`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpaceCategory {
    #[default]
    Any,
    Campus,
    Offsite,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}
