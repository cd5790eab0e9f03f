use super::handlers::{health, pizzas, restaurant_pizzas, restaurants};
use utoipa::openapi::{InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

const TAGS: [(&str, &str); 4] = [
    ("health", "Service and database health"),
    ("restaurants", "Restaurants and the pizzas they serve"),
    ("pizzas", "Pizzas and the restaurants serving them"),
    ("restaurant_pizzas", "Prices of pizzas at restaurants"),
];

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_router, doc) = api_router().split_for_parts();
    doc
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Routes added outside (like `/` or `OPTIONS /health`) are not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    // Handlers sharing a path must be registered in the same `routes!` call.
    OpenApiRouter::with_openapi(base_openapi())
        .routes(routes!(health::health))
        .routes(routes!(restaurants::list_restaurants))
        .routes(routes!(
            restaurants::get_restaurant,
            restaurants::delete_restaurant
        ))
        .routes(routes!(pizzas::list_pizzas))
        .routes(routes!(restaurant_pizzas::create_restaurant_pizza))
}

/// Info and tags; paths and schemas are filled in by the router.
fn base_openapi() -> utoipa::openapi::OpenApi {
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();
    info.license = Some(License::new(env!("CARGO_PKG_LICENSE")));

    let tags = TAGS.map(|(name, description)| {
        let mut tag = Tag::new(name);
        tag.description = Some(description.to_string());
        tag
    });

    OpenApiBuilder::new().info(info).tags(Some(tags)).build()
}
