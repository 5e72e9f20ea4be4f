use anyhow::Context;
use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::space::Coordinate;

/// Directions backend: origin + destination in, ordered polyline out.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, StoreError>;
}

pub struct HttpDirectionsProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDirectionsProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl DirectionsProvider for HttpDirectionsProvider {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, StoreError> {
        let url = format!("{}/route", self.base_url);
        let polyline = self
            .client
            .get(&url)
            .query(&[
                ("from_lat", origin.lat),
                ("from_lng", origin.lng),
                ("to_lat", destination.lat),
                ("to_lng", destination.lng),
            ])
            .send()
            .await
            .context("Failed to reach the directions service")
            .map_err(StoreError::ProviderUnavailable)?
            .error_for_status()
            .context("Directions service returned an error status")
            .map_err(StoreError::ProviderUnavailable)?
            .json::<Vec<Coordinate>>()
            .await
            .context("Failed to decode the directions payload")
            .map_err(StoreError::ProviderUnavailable)?;

        Ok(polyline)
    }
}

/// Straight-line stand-in for local runs without a routing backend.
pub struct FixtureDirectionsProvider;

#[async_trait]
impl DirectionsProvider for FixtureDirectionsProvider {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Vec<Coordinate>, StoreError> {
        Ok(vec![origin, destination])
    }
}
