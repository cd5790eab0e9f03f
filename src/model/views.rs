//! JSON shapes returned by the API.
//!
//! Restaurants, pizzas and restaurant pizzas reference each other, so every
//! shape here is a separate type and nests only shapes further down:
//!
//! - `FlatPizza` has no relationships.
//! - `FullPizza` lists restaurant names only.
//! - `RestaurantView` nests `FlatPizza`.
//! - `RestaurantPizzaView` nests `FlatPizza` and `RestaurantView`.
//! - `ExpandedRestaurantView` nests `RestaurantPizzaView`.

use serde::Serialize;
use utoipa::ToSchema;

use super::{Pizza, Price, Restaurant, RestaurantPizza};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FlatPizza {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
}

impl From<Pizza> for FlatPizza {
    fn from(pizza: Pizza) -> Self {
        Self {
            id: pizza.id,
            name: pizza.name,
            ingredients: pizza.ingredients,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FullPizza {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
    /// Names of the restaurants serving this pizza.
    pub restaurants: Vec<String>,
}

impl FullPizza {
    #[must_use]
    pub fn new(pizza: Pizza, restaurants: Vec<String>) -> Self {
        Self {
            id: pizza.id,
            name: pizza.name,
            ingredients: pizza.ingredients,
            restaurants,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RestaurantView {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub pizzas: Vec<FlatPizza>,
}

impl RestaurantView {
    #[must_use]
    pub fn new(restaurant: Restaurant, pizzas: Vec<FlatPizza>) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
            address: restaurant.address,
            pizzas,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ExpandedRestaurantView {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub pizzas: Vec<FlatPizza>,
    pub restaurant_pizzas: Vec<RestaurantPizzaView>,
}

impl ExpandedRestaurantView {
    #[must_use]
    pub fn new(restaurant: RestaurantView, restaurant_pizzas: Vec<RestaurantPizzaView>) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
            address: restaurant.address,
            pizzas: restaurant.pizzas,
            restaurant_pizzas,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RestaurantPizzaView {
    pub id: i64,
    #[schema(value_type = i64, minimum = 1, maximum = 30)]
    pub price: Price,
    pub pizza_id: i64,
    pub restaurant_id: i64,
    pub pizza: Option<FlatPizza>,
    pub restaurant: Option<RestaurantView>,
}

impl RestaurantPizzaView {
    #[must_use]
    pub fn new(
        restaurant_pizza: &RestaurantPizza,
        pizza: Option<FlatPizza>,
        restaurant: Option<RestaurantView>,
    ) -> Self {
        Self {
            id: restaurant_pizza.id,
            price: restaurant_pizza.price(),
            pizza_id: restaurant_pizza.pizza_id,
            restaurant_id: restaurant_pizza.restaurant_id,
            pizza,
            restaurant,
        }
    }
}
