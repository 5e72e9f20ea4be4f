use std::sync::Arc;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::controller::AppState;
use crate::models::space::Coordinate;
use crate::providers::directions::DirectionsProvider;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/route", get(fetch_route))
        .route_layer(Extension(app_state.directions))
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct RouteParams {
    pub from_lat: f64,
    pub from_lng: f64,
    pub to_lat: f64,
    pub to_lng: f64,
}

pub async fn fetch_route(
    Extension(directions): Extension<Arc<dyn DirectionsProvider>>,
    Query(query): Query<RouteParams>,
) -> impl IntoResponse {
    let origin = Coordinate { lat: query.from_lat, lng: query.from_lng };
    let destination = Coordinate { lat: query.to_lat, lng: query.to_lng };

    return match directions.route(origin, destination).await {
        Ok(polyline) => {
            (StatusCode::OK, json!(&polyline).to_string()).into_response()
        }
        Err(e) => {
            warn!("Something went wrong fetching the route due to: {}", e);
            (StatusCode::BAD_GATEWAY, "Failed to fetch directions, please try again").into_response()
        }
    };
}
