use std::sync::Arc;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::controller::AppState;
use crate::models::space::Coordinate;
use crate::providers::geocoding::GeocodingProvider;
use crate::stores::history::SearchHistoryStore;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", post(record_search))
        .route("/suggest", get(suggest_places))
        .route("/history", get(retrieve_search_history))
        .route_layer(Extension(app_state.history))
        .route_layer(Extension(app_state.geocoder))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SuggestParams {
    pub fragment: String,
}

/// Search-completion suggestions for a typed fragment. A dead geocoding
/// backend degrades to an empty list rather than an error page.
pub async fn suggest_places(
    Extension(geocoder): Extension<Arc<dyn GeocodingProvider>>,
    Query(query): Query<SuggestParams>,
) -> impl IntoResponse {
    return match geocoder.suggest(&query.fragment).await {
        Ok(suggestions) => {
            (StatusCode::OK, json!(&suggestions).to_string()).into_response()
        }
        Err(e) => {
            warn!("Something went wrong completing the search fragment due to: {}", e);
            (StatusCode::OK, "[]".to_string()).into_response()
        }
    };
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RecordSearch {
    pub name: String,
    pub coordinate: Option<Coordinate>,
}

/// Records a completed search into the history, resolving the coordinate
/// through the geocoder when the caller did not supply one.
pub async fn record_search(
    Extension(history): Extension<Arc<SearchHistoryStore>>,
    Extension(geocoder): Extension<Arc<dyn GeocodingProvider>>,
    Json(body): Json<RecordSearch>,
) -> impl IntoResponse {
    let coordinate = match body.coordinate {
        Some(coordinate) => coordinate,
        None => match geocoder.resolve(&body.name).await {
            Ok(Some(coordinate)) => coordinate,
            Ok(None) => {
                return (StatusCode::NOT_FOUND, "No place found for that name").into_response();
            }
            Err(e) => {
                warn!("Something went wrong resolving the search due to: {}", e);
                return (StatusCode::BAD_GATEWAY, "Search backend unavailable, please try again").into_response();
            }
        },
    };

    // A failed durability write is logged but does not fail the request;
    // the in-memory history already has the entry for this session.
    if let Err(e) = history.record_search(&body.name, coordinate).await {
        warn!("Something went wrong persisting the search for '{}' due to: {}", body.name, e);
    }

    (StatusCode::OK, json!(&coordinate).to_string()).into_response()
}

pub async fn retrieve_search_history(
    Extension(history): Extension<Arc<SearchHistoryStore>>,
) -> impl IntoResponse {
    let entries = history.list();

    (StatusCode::OK, json!(&entries).to_string()).into_response()
}
