use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::space::Coordinate;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PlaceSuggestion {
    pub name: String,
    pub coordinate: Coordinate,
}

/// Search-completion and geocoding backend. `suggest` completes a typed
/// fragment into an ordered list of named places; `resolve` turns a
/// completed selection into a single coordinate.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    async fn suggest(&self, fragment: &str) -> Result<Vec<PlaceSuggestion>, StoreError>;

    async fn resolve(&self, name: &str) -> Result<Option<Coordinate>, StoreError>;
}

pub struct HttpGeocodingProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGeocodingProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    async fn query(&self, path: &str, text: &str) -> anyhow::Result<Vec<PlaceSuggestion>> {
        let url = format!("{}/{}", self.base_url, path);
        let suggestions = self
            .client
            .get(&url)
            .query(&[("q", text)])
            .send()
            .await
            .context("Failed to reach the geocoding service")?
            .error_for_status()
            .context("Geocoding service returned an error status")?
            .json::<Vec<PlaceSuggestion>>()
            .await
            .context("Failed to decode the geocoding payload")?;

        Ok(suggestions)
    }
}

#[async_trait]
impl GeocodingProvider for HttpGeocodingProvider {
    async fn suggest(&self, fragment: &str) -> Result<Vec<PlaceSuggestion>, StoreError> {
        self.query("complete", fragment)
            .await
            .map_err(StoreError::ProviderUnavailable)
    }

    async fn resolve(&self, name: &str) -> Result<Option<Coordinate>, StoreError> {
        let matches = self
            .query("search", name)
            .await
            .map_err(StoreError::ProviderUnavailable)?;

        Ok(matches.into_iter().next().map(|s| s.coordinate))
    }
}

/// Canned suggestions for local runs and tests. Matching is a simple
/// case-insensitive prefix check over the fixture names.
pub struct FixtureGeocodingProvider {
    places: Vec<PlaceSuggestion>,
}

impl FixtureGeocodingProvider {
    pub fn new(places: Vec<PlaceSuggestion>) -> Self {
        Self { places }
    }
}

#[async_trait]
impl GeocodingProvider for FixtureGeocodingProvider {
    async fn suggest(&self, fragment: &str) -> Result<Vec<PlaceSuggestion>, StoreError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .places
            .iter()
            .filter(|p| p.name.to_lowercase().starts_with(&needle))
            .cloned()
            .collect())
    }

    async fn resolve(&self, name: &str) -> Result<Option<Coordinate>, StoreError> {
        Ok(self
            .places
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.coordinate))
    }
}

/// Stand-in for a configured-but-unreachable backend, used to exercise the
/// empty-suggestions failure path.
pub struct UnavailableGeocodingProvider;

#[async_trait]
impl GeocodingProvider for UnavailableGeocodingProvider {
    async fn suggest(&self, _fragment: &str) -> Result<Vec<PlaceSuggestion>, StoreError> {
        Err(StoreError::ProviderUnavailable(anyhow!(
            "no geocoding backend configured"
        )))
    }

    async fn resolve(&self, _name: &str) -> Result<Option<Coordinate>, StoreError> {
        Err(StoreError::ProviderUnavailable(anyhow!(
            "no geocoding backend configured"
        )))
    }
}
