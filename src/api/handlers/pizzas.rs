use axum::{extract::Extension, Json};
use tracing::instrument;

use crate::{api::error::ApiError, model::views::FullPizza, store::Store};

#[utoipa::path(
    get,
    path = "/pizzas",
    responses(
        (status = 200, description = "List pizzas with the restaurants serving them.", body = [FullPizza]),
    ),
    tag = "pizzas"
)]
/// Lists every pizza in full shape: restaurants appear by name only.
#[instrument(skip(store))]
pub async fn list_pizzas(store: Extension<Store>) -> Result<Json<Vec<FullPizza>>, ApiError> {
    let pizzas = store.list_pizzas().await?;
    Ok(Json(pizzas))
}
