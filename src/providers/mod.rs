pub mod directions;
pub mod geocoding;
pub mod space_provider;
