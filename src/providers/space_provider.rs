use anyhow::Context;
use async_trait::async_trait;
use tokio::time::Duration;

use crate::models::space::{Coordinate, SpaceCategory, StudySpace};

/// Source of the study-space catalog. The store never cares whether the
/// list came off the network or out of a fixture.
#[async_trait]
pub trait SpaceProvider: Send + Sync {
    async fn fetch_spaces(&self) -> anyhow::Result<Vec<StudySpace>>;
}

/// Canned catalog with an artificial delay, standing in for the network
/// fetch until a real spaces service exists.
pub struct FixtureSpaceProvider {
    delay: Duration,
}

impl FixtureSpaceProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl SpaceProvider for FixtureSpaceProvider {
    async fn fetch_spaces(&self) -> anyhow::Result<Vec<StudySpace>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(seed_spaces())
    }
}

/// Catalog fetched from a spaces service over HTTP.
pub struct HttpSpaceProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSpaceProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl SpaceProvider for HttpSpaceProvider {
    async fn fetch_spaces(&self) -> anyhow::Result<Vec<StudySpace>> {
        let url = format!("{}/spaces", self.base_url);
        let spaces = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach the spaces service")?
            .error_for_status()
            .context("Spaces service returned an error status")?
            .json::<Vec<StudySpace>>()
            .await
            .context("Failed to decode the spaces payload")?;

        Ok(spaces)
    }
}

pub fn seed_spaces() -> Vec<StudySpace> {
    vec![
        StudySpace {
            space_id: "snell-library".to_string(),
            name: "Snell Library".to_string(),
            location: "1st Floor".to_string(),
            rating: 4.5,
            is_open: true,
            reviews: 120,
            category: SpaceCategory::Campus,
            coordinate: Coordinate { lat: 42.3389, lng: -71.0887 },
            is_quiet: true,
            has_food: false,
        },
        StudySpace {
            space_id: "curry-student-center".to_string(),
            name: "Curry Student Center".to_string(),
            location: "3rd Floor".to_string(),
            rating: 4.0,
            is_open: false,
            reviews: 85,
            category: SpaceCategory::Campus,
            coordinate: Coordinate { lat: 42.3395, lng: -71.0883 },
            is_quiet: false,
            has_food: true,
        },
        StudySpace {
            space_id: "boston-public-library".to_string(),
            name: "Boston Public Library".to_string(),
            location: "Copley Square".to_string(),
            rating: 4.7,
            is_open: true,
            reviews: 230,
            category: SpaceCategory::Offsite,
            coordinate: Coordinate { lat: 42.3493, lng: -71.0785 },
            is_quiet: true,
            has_food: false,
        },
    ]
}
