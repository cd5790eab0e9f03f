//! Restaurant pizza creation.
//!
//! Every rejected request answers `400 {"errors": ["validation errors"]}`:
//! an unreadable body, a missing field, an out-of-range price, or a
//! restaurant/pizza that does not exist. The cause is only logged.

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{instrument, warn};
use utoipa::ToSchema;

use crate::{
    api::error::{ApiError, ValidationErrorResponse},
    model::{views::RestaurantPizzaView, NewRestaurantPizza, ValidationError},
    store::Store,
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateRestaurantPizzaRequest {
    pub price: Option<i64>,
    pub pizza_id: Option<i64>,
    pub restaurant_id: Option<i64>,
}

impl CreateRestaurantPizzaRequest {
    /// Checks that every field is present, then that the price is in range.
    ///
    /// # Errors
    /// Returns `ValidationError::MissingField` for the first absent field, or
    /// `ValidationError::PriceOutOfRange`.
    pub fn validate(&self) -> Result<NewRestaurantPizza, ValidationError> {
        let price = self.price.ok_or(ValidationError::MissingField("price"))?;
        let pizza_id = self
            .pizza_id
            .ok_or(ValidationError::MissingField("pizza_id"))?;
        let restaurant_id = self
            .restaurant_id
            .ok_or(ValidationError::MissingField("restaurant_id"))?;

        NewRestaurantPizza::new(price, restaurant_id, pizza_id)
    }
}

#[utoipa::path(
    post,
    path = "/restaurant_pizzas",
    request_body = CreateRestaurantPizzaRequest,
    responses(
        (status = 201, description = "Restaurant pizza created.", body = RestaurantPizzaView),
        (status = 400, description = "Missing field, price outside 1..=30, or unknown restaurant/pizza.", body = ValidationErrorResponse),
    ),
    tag = "restaurant_pizzas"
)]
/// Creates a restaurant pizza and returns it with its pizza and restaurant nested.
#[instrument(skip(store, payload))]
pub async fn create_restaurant_pizza(
    store: Extension<Store>,
    payload: Result<Json<CreateRestaurantPizzaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RestaurantPizzaView>), ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected restaurant pizza payload: {rejection}");
            return Err(ApiError::Validation);
        }
    };

    let new = request.validate().map_err(|err| {
        warn!("Invalid restaurant pizza: {err}");
        ApiError::Validation
    })?;

    match store.create_restaurant_pizza(new).await {
        Ok(view) => Ok((StatusCode::CREATED, Json(view))),
        Err(err) => {
            warn!("Failed to create restaurant pizza: {err}");
            Err(ApiError::Validation)
        }
    }
}
