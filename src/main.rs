use std::sync::Arc;

use bb8_postgres::bb8::Pool;
use bb8_postgres::tokio_postgres::NoTls;
use bb8_postgres::PostgresConnectionManager;
use clap::Parser;
use dotenv::dotenv;
use tokio::time::Duration;
use tracing::warn;

use crate::config::Config;
use crate::controller::AppState;
use crate::providers::directions::{
    DirectionsProvider, FixtureDirectionsProvider, HttpDirectionsProvider,
};
use crate::providers::geocoding::{
    FixtureGeocodingProvider, GeocodingProvider, HttpGeocodingProvider, PlaceSuggestion,
};
use crate::providers::space_provider::{
    seed_spaces, FixtureSpaceProvider, HttpSpaceProvider, SpaceProvider,
};
use crate::repositories::postgres_repo::PostgresHistoryRepo;
use crate::stores::catalog::CatalogStore;
use crate::stores::history::SearchHistoryStore;

pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod models;
pub mod providers;
pub mod repositories;
pub mod stores;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();

    let manager = PostgresConnectionManager::new_from_stringlike(&config.database_url, NoTls)?;
    let postgres_connection = Pool::builder().build(manager).await?;

    let space_provider: Arc<dyn SpaceProvider> = match &config.places_base_url {
        Some(base_url) => Arc::new(HttpSpaceProvider::new(base_url.clone())),
        None => Arc::new(FixtureSpaceProvider::new(Duration::from_secs(
            config.fixture_load_delay_secs,
        ))),
    };
    let geocoder: Arc<dyn GeocodingProvider> = match &config.geocoder_base_url {
        Some(base_url) => Arc::new(HttpGeocodingProvider::new(base_url.clone())),
        None => Arc::new(FixtureGeocodingProvider::new(fixture_suggestions())),
    };
    let directions: Arc<dyn DirectionsProvider> = match &config.directions_base_url {
        Some(base_url) => Arc::new(HttpDirectionsProvider::new(base_url.clone())),
        None => Arc::new(FixtureDirectionsProvider),
    };

    let catalog = Arc::new(CatalogStore::new(
        space_provider,
        Duration::from_secs(config.catalog_load_timeout_secs),
    ));
    let history = Arc::new(SearchHistoryStore::new(Arc::new(PostgresHistoryRepo::new(
        postgres_connection,
    ))));

    if let Err(e) = history.hydrate().await {
        warn!("Starting with an empty search history due to: {}", e);
    }
    if let Err(e) = catalog.load().await {
        warn!("Initial catalog load failed, spaces will appear once a refresh succeeds: {}", e);
    }

    let app_state = AppState {
        catalog,
        history,
        geocoder,
        directions,
    };

    controller::serve(app_state, &config).await
}

/// The fixture completer suggests the seeded study spaces themselves.
fn fixture_suggestions() -> Vec<PlaceSuggestion> {
    seed_spaces()
        .into_iter()
        .map(|space| PlaceSuggestion {
            name: space.name,
            coordinate: space.coordinate,
        })
        .collect()
}
