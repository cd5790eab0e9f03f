//! Restaurant endpoints.
//!
//! The list returns the default restaurant shape; a single restaurant is
//! returned expanded with its restaurant pizzas.

use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use tracing::{debug, instrument};

use crate::{
    api::error::{ApiError, ErrorResponse},
    model::views::{ExpandedRestaurantView, RestaurantView},
    store::{Store, RESTAURANT_NOT_FOUND},
};

#[utoipa::path(
    get,
    path = "/restaurants",
    responses(
        (status = 200, description = "List restaurants.", body = [RestaurantView]),
    ),
    tag = "restaurants"
)]
/// Lists every restaurant with the pizzas it serves, in flat shape.
#[instrument(skip(store))]
pub async fn list_restaurants(
    store: Extension<Store>,
) -> Result<Json<Vec<RestaurantView>>, ApiError> {
    let restaurants = store.list_restaurants().await?;
    Ok(Json(restaurants))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    params(("id" = i64, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "Restaurant with its restaurant pizzas.", body = ExpandedRestaurantView),
        (status = 404, description = "Restaurant not found.", body = ErrorResponse),
    ),
    tag = "restaurants"
)]
/// Returns one restaurant in the expanded shape.
/// A non-numeric id can never match a restaurant, so it is reported as `404` too.
#[instrument(skip(store))]
pub async fn get_restaurant(
    id: Result<Path<i64>, PathRejection>,
    store: Extension<Store>,
) -> Result<Json<ExpandedRestaurantView>, ApiError> {
    let Ok(Path(id)) = id else {
        return Err(ApiError::NotFound(RESTAURANT_NOT_FOUND));
    };

    let restaurant = store.get_restaurant(id).await?;
    Ok(Json(restaurant))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    params(("id" = i64, Path, description = "Restaurant id")),
    responses(
        (status = 204, description = "Restaurant and its restaurant pizzas deleted."),
        (status = 404, description = "Restaurant not found.", body = ErrorResponse),
    ),
    tag = "restaurants"
)]
/// Deletes a restaurant; its restaurant pizzas go with it.
#[instrument(skip(store))]
pub async fn delete_restaurant(
    id: Result<Path<i64>, PathRejection>,
    store: Extension<Store>,
) -> Result<StatusCode, ApiError> {
    let Ok(Path(id)) = id else {
        return Err(ApiError::NotFound(RESTAURANT_NOT_FOUND));
    };

    store.delete_restaurant(id).await?;

    debug!("Restaurant {id} deleted");

    Ok(StatusCode::NO_CONTENT)
}
