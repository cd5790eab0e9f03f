//! Handler tests for the restaurant, pizza and restaurant pizza API.
//!
//! Each test builds the real application router over a private in-memory
//! store and drives it with `oneshot`.

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{api::app, model::NewRestaurantPizza, store::Store};

struct TestApp {
    store: Store,
    router: Router,
}

impl TestApp {
    async fn new() -> Result<Self> {
        let store = Store::in_memory().await?;
        let router = app(store.clone());
        Ok(Self { store, router })
    }

    async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Result<Response> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };
        Ok(self.router.clone().oneshot(request).await?)
    }
}

async fn json_body(response: Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .context("read response body")?;
    serde_json::from_slice(&bytes).context("response body is not JSON")
}

/// One restaurant (id 1) and one pizza (id 1) on a fresh store.
async fn seeded() -> Result<TestApp> {
    let test_app = TestApp::new().await?;
    let restaurant = test_app
        .store
        .create_restaurant("Karen's Pizza Shack", "address1")
        .await?;
    let pizza = test_app
        .store
        .create_pizza("Emma", "Dough, Tomato Sauce, Cheese")
        .await?;
    assert_eq!((restaurant.id, pizza.id), (1, 1));
    Ok(test_app)
}

#[tokio::test]
async fn root_serves_html_heading() -> Result<()> {
    let test_app = TestApp::new().await?;
    let response = test_app.request("GET", "/", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(String::from_utf8_lossy(&bytes).starts_with("<h1>"));
    Ok(())
}

#[tokio::test]
async fn list_restaurants_on_empty_store() -> Result<()> {
    let test_app = TestApp::new().await?;
    let response = test_app.request("GET", "/restaurants", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await?, json!([]));
    Ok(())
}

#[tokio::test]
async fn list_restaurants_default_shape() -> Result<()> {
    let test_app = seeded().await?;
    test_app
        .store
        .create_restaurant_pizza(NewRestaurantPizza::new(5, 1, 1)?)
        .await?;

    let response = test_app.request("GET", "/restaurants", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await?,
        json!([{
            "id": 1,
            "name": "Karen's Pizza Shack",
            "address": "address1",
            "pizzas": [{"id": 1, "name": "Emma", "ingredients": "Dough, Tomato Sauce, Cheese"}],
        }])
    );
    Ok(())
}

#[tokio::test]
async fn get_restaurant_expanded_shape() -> Result<()> {
    let test_app = seeded().await?;
    test_app
        .store
        .create_restaurant_pizza(NewRestaurantPizza::new(7, 1, 1)?)
        .await?;

    let response = test_app.request("GET", "/restaurants/1", None).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await?;
    assert_eq!(body["id"], json!(1));
    assert_eq!(body["pizzas"].as_array().map(Vec::len), Some(1));

    let restaurant_pizzas = body["restaurant_pizzas"]
        .as_array()
        .context("restaurant_pizzas should be an array")?;
    assert_eq!(restaurant_pizzas.len(), 1);
    let rp = &restaurant_pizzas[0];
    assert_eq!(rp["price"], json!(7));
    assert_eq!(rp["pizza"]["name"], json!("Emma"));
    assert!(rp["pizza"].get("restaurants").is_none());
    assert_eq!(rp["restaurant"]["name"], json!("Karen's Pizza Shack"));
    assert!(rp["restaurant"].get("restaurant_pizzas").is_none());
    Ok(())
}

#[tokio::test]
async fn get_missing_restaurant_is_404() -> Result<()> {
    let test_app = TestApp::new().await?;
    let response = test_app.request("GET", "/restaurants/999999", None).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(response).await?,
        json!({"error": "Restaurant not found"})
    );
    Ok(())
}

#[tokio::test]
async fn non_numeric_restaurant_id_is_404() -> Result<()> {
    let test_app = TestApp::new().await?;
    let response = test_app.request("GET", "/restaurants/abc", None).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_restaurant_twice() -> Result<()> {
    let test_app = seeded().await?;
    test_app
        .store
        .create_restaurant_pizza(NewRestaurantPizza::new(5, 1, 1)?)
        .await?;

    let first = test_app.request("DELETE", "/restaurants/1", None).await?;
    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    let bytes = to_bytes(first.into_body(), usize::MAX).await?;
    assert!(bytes.is_empty());

    assert_eq!(test_app.store.count_restaurant_pizzas().await?, 0);

    let second = test_app.request("DELETE", "/restaurants/1", None).await?;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(second).await?,
        json!({"error": "Restaurant not found"})
    );

    // the pizza itself survives
    let pizzas = test_app.request("GET", "/pizzas", None).await?;
    assert_eq!(
        json_body(pizzas).await?,
        json!([{
            "id": 1,
            "name": "Emma",
            "ingredients": "Dough, Tomato Sauce, Cheese",
            "restaurants": [],
        }])
    );
    Ok(())
}

#[tokio::test]
async fn list_pizzas_full_shape() -> Result<()> {
    let test_app = seeded().await?;
    test_app
        .store
        .create_restaurant_pizza(NewRestaurantPizza::new(5, 1, 1)?)
        .await?;

    let response = test_app.request("GET", "/pizzas", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await?,
        json!([{
            "id": 1,
            "name": "Emma",
            "ingredients": "Dough, Tomato Sauce, Cheese",
            "restaurants": ["Karen's Pizza Shack"],
        }])
    );
    Ok(())
}

#[tokio::test]
async fn create_restaurant_pizza_returns_201() -> Result<()> {
    let test_app = seeded().await?;
    let response = test_app
        .request(
            "POST",
            "/restaurant_pizzas",
            Some(json!({"price": 5, "pizza_id": 1, "restaurant_id": 1})),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await?;
    assert_eq!(body["price"], json!(5));
    assert_eq!(body["pizza_id"], json!(1));
    assert_eq!(body["restaurant_id"], json!(1));
    assert_eq!(
        body["pizza"],
        json!({"id": 1, "name": "Emma", "ingredients": "Dough, Tomato Sauce, Cheese"})
    );
    assert_eq!(body["restaurant"]["id"], json!(1));
    assert_eq!(body["restaurant"]["address"], json!("address1"));
    assert_eq!(
        body["restaurant"]["pizzas"].as_array().map(Vec::len),
        Some(1)
    );

    assert_eq!(test_app.store.count_restaurant_pizzas().await?, 1);
    Ok(())
}

#[tokio::test]
async fn create_restaurant_pizza_rejects_out_of_range_price() -> Result<()> {
    let test_app = seeded().await?;
    for price in [0, 31, 50, -3] {
        let response = test_app
            .request(
                "POST",
                "/restaurant_pizzas",
                Some(json!({"price": price, "pizza_id": 1, "restaurant_id": 1})),
            )
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await?,
            json!({"errors": ["validation errors"]})
        );
    }
    assert_eq!(test_app.store.count_restaurant_pizzas().await?, 0);
    Ok(())
}

#[tokio::test]
async fn create_restaurant_pizza_rejects_missing_fields() -> Result<()> {
    let test_app = seeded().await?;
    for body in [
        json!({"pizza_id": 1, "restaurant_id": 1}),
        json!({"price": 5, "restaurant_id": 1}),
        json!({"price": 5, "pizza_id": 1}),
        json!({}),
    ] {
        let response = test_app
            .request("POST", "/restaurant_pizzas", Some(body))
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await?,
            json!({"errors": ["validation errors"]})
        );
    }
    assert_eq!(test_app.store.count_restaurant_pizzas().await?, 0);
    Ok(())
}

#[tokio::test]
async fn create_restaurant_pizza_rejects_unknown_references() -> Result<()> {
    let test_app = seeded().await?;
    for body in [
        json!({"price": 5, "pizza_id": 404, "restaurant_id": 1}),
        json!({"price": 5, "pizza_id": 1, "restaurant_id": 404}),
    ] {
        let response = test_app
            .request("POST", "/restaurant_pizzas", Some(body))
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await?,
            json!({"errors": ["validation errors"]})
        );
    }
    assert_eq!(test_app.store.count_restaurant_pizzas().await?, 0);
    Ok(())
}

#[tokio::test]
async fn create_restaurant_pizza_rejects_malformed_body() -> Result<()> {
    let test_app = seeded().await?;
    let request = Request::builder()
        .method("POST")
        .uri("/restaurant_pizzas")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let response = test_app.router.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await?,
        json!({"errors": ["validation errors"]})
    );
    Ok(())
}

#[tokio::test]
async fn health_reports_database_ok() -> Result<()> {
    let test_app = TestApp::new().await?;
    let response = test_app.request("GET", "/health", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let expected_app = format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        crate::short_commit(crate::GIT_COMMIT_HASH)
    );
    assert_eq!(
        response
            .headers()
            .get("x-app")
            .and_then(|v| v.to_str().ok()),
        Some(expected_app.as_str())
    );
    let body = json_body(response).await?;
    assert_eq!(body["database"], json!("ok"));
    assert_eq!(body["name"], json!(env!("CARGO_PKG_NAME")));

    let preflight = test_app.request("OPTIONS", "/health", None).await?;
    assert_eq!(preflight.status(), StatusCode::OK);
    let bytes = to_bytes(preflight.into_body(), usize::MAX).await?;
    assert!(bytes.is_empty());
    Ok(())
}

#[tokio::test]
async fn request_id_is_propagated() -> Result<()> {
    let test_app = TestApp::new().await?;
    let request = Request::builder()
        .uri("/restaurants")
        .header("x-request-id", "test-request")
        .body(Body::empty())?;
    let response = test_app.router.clone().oneshot(request).await?;
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("test-request")
    );
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> Result<()> {
    let test_app = TestApp::new().await?;
    let response = test_app.request("GET", "/openapi.json", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert!(body["paths"].get("/restaurant_pizzas").is_some());
    assert_eq!(body["tags"].as_array().map(Vec::len), Some(4));
    Ok(())
}
