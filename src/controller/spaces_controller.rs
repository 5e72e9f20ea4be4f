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
use crate::models::filter::FilterState;
use crate::models::space::SpaceCategory;
use crate::stores::catalog::CatalogStore;

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(list_spaces))
        .route("/refresh", post(refresh_catalog))
        .route("/filter", post(set_filter))
        .route_layer(Extension(app_state.catalog))
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct SpaceFilterParams {
    pub category: Option<SpaceCategory>,
    pub quiet_only: Option<bool>,
    pub food_only: Option<bool>,
}

/// Filtered catalog. Query params are evaluated per request and do not
/// touch the store's held filter.
pub async fn list_spaces(
    Extension(catalog): Extension<Arc<CatalogStore>>,
    Query(query): Query<SpaceFilterParams>,
) -> impl IntoResponse {
    let filter = FilterState {
        category: query.category.unwrap_or_default(),
        quiet_only: query.quiet_only.unwrap_or(false),
        food_only: query.food_only.unwrap_or(false),
    };
    let spaces = catalog.filtered_with(&filter);

    (StatusCode::OK, json!(&spaces).to_string()).into_response()
}

pub async fn set_filter(
    Extension(catalog): Extension<Arc<CatalogStore>>,
    Json(body): Json<SpaceFilterParams>,
) -> impl IntoResponse {
    catalog.set_filter(body.category, body.quiet_only, body.food_only);

    (StatusCode::OK, json!(&catalog.filter()).to_string()).into_response()
}

/// Re-pulls the catalog from the provider. A failed refresh keeps serving
/// whatever was loaded before.
pub async fn refresh_catalog(
    Extension(catalog): Extension<Arc<CatalogStore>>,
) -> impl IntoResponse {
    return match catalog.load().await {
        Ok(_) => {
            (StatusCode::OK, "Successfully refreshed study spaces").into_response()
        }
        Err(e) => {
            warn!("Something went wrong refreshing study spaces due to: {}", e);
            (StatusCode::BAD_GATEWAY, "Failed to refresh study spaces, please try again").into_response()
        }
    };
}
