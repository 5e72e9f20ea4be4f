use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::providers::directions::DirectionsProvider;
use crate::providers::geocoding::GeocodingProvider;
use crate::stores::catalog::CatalogStore;
use crate::stores::history::SearchHistoryStore;

pub mod directions_controller;
pub mod health_check;
pub mod search_controller;
pub mod spaces_controller;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub history: Arc<SearchHistoryStore>,
    pub geocoder: Arc<dyn GeocodingProvider>,
    pub directions: Arc<dyn DirectionsProvider>,
}

pub async fn serve(app_state: AppState, config: &Config) -> anyhow::Result<()> {
    let origins: Vec<HeaderValue> = config
        .origin_urls
        .split(',')
        .filter_map(|s| s.parse().ok())
        .collect::<Vec<HeaderValue>>();

    let application = router_endpoints(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    CorsLayer::new()
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS
                        ])
                        .allow_origin(origins)
                        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                )
        )
        .fallback(page_not_found_handler);

    let port = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("API server listening on port: {}", port);
    axum::Server::bind(&port)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    Router::new()
        .merge(health_check::router())
        .nest("/spaces", spaces_controller::router(app_state.clone()))
        .nest("/search", search_controller::router(app_state.clone()))
        .nest("/directions", directions_controller::router(app_state))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio::time::Duration;
    use tower::ServiceExt;

    use super::*;
    use crate::models::search_history::SearchHistoryEntry;
    use crate::providers::directions::FixtureDirectionsProvider;
    use crate::providers::geocoding::{
        FixtureGeocodingProvider, PlaceSuggestion, UnavailableGeocodingProvider,
    };
    use crate::providers::space_provider::{seed_spaces, FixtureSpaceProvider};
    use crate::repositories::HistoryRepository;

    /// Write-discarding repository; the in-memory store is what matters
    /// in these tests.
    struct NullRepo;

    #[async_trait]
    impl HistoryRepository for NullRepo {
        async fn upsert_search(&self, _entry: &SearchHistoryEntry) -> anyhow::Result<()> {
            Ok(())
        }

        async fn load_history(&self) -> anyhow::Result<Vec<SearchHistoryEntry>> {
            Ok(Vec::new())
        }
    }

    async fn loaded_state(geocoder: Arc<dyn GeocodingProvider>) -> AppState {
        let catalog = Arc::new(CatalogStore::new(
            Arc::new(FixtureSpaceProvider::new(Duration::ZERO)),
            Duration::from_secs(10),
        ));
        catalog.load().await.unwrap();

        AppState {
            catalog,
            history: Arc::new(SearchHistoryStore::new(Arc::new(NullRepo))),
            geocoder,
            directions: Arc::new(FixtureDirectionsProvider),
        }
    }

    fn fixture_geocoder() -> Arc<dyn GeocodingProvider> {
        Arc::new(FixtureGeocodingProvider::new(
            seed_spaces()
                .into_iter()
                .map(|space| PlaceSuggestion {
                    name: space.name,
                    coordinate: space.coordinate,
                })
                .collect(),
        ))
    }

    #[tokio::test]
    async fn health_check_responds_ok() {
        let app = router_endpoints(loaded_state(fixture_geocoder()).await);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn spaces_endpoint_accepts_filter_params() {
        let app = router_endpoints(loaded_state(fixture_geocoder()).await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/spaces?category=campus&quiet_only=true")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn recording_a_search_then_listing_history_succeeds() {
        let app = router_endpoints(loaded_state(fixture_geocoder()).await);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/search")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"Snell Library"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/search/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn suggest_degrades_to_ok_when_geocoder_is_down() {
        let app = router_endpoints(loaded_state(Arc::new(UnavailableGeocodingProvider)).await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/search/suggest?fragment=snell")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_endpoint_is_a_teapot() {
        let app = router_endpoints(loaded_state(fixture_geocoder()).await)
            .fallback(page_not_found_handler);

        let response = app
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
