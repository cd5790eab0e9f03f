//! Restaurant queries and the restaurant-shaped views.

use std::collections::HashMap;

use sqlx::{sqlite::SqliteRow, FromRow, Row, SqlitePool};
use tracing::{debug, instrument};

use super::{Store, StoreError, RESTAURANT_NOT_FOUND};
use crate::model::{
    views::{ExpandedRestaurantView, FlatPizza, RestaurantPizzaView, RestaurantView},
    Pizza, Restaurant, RestaurantPizza,
};

impl Store {
    /// # Errors
    /// Returns an error if the insert fails.
    #[instrument(skip(self))]
    pub async fn create_restaurant(
        &self,
        name: &str,
        address: &str,
    ) -> Result<Restaurant, StoreError> {
        let id = sqlx::query("INSERT INTO restaurants (name, address) VALUES (?, ?)")
            .bind(name)
            .bind(address)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Restaurant {
            id,
            name: name.to_string(),
            address: address.to_string(),
        })
    }

    /// Every restaurant in the default shape, with the pizzas it serves.
    ///
    /// # Errors
    /// Returns an error if a query fails.
    #[instrument(skip(self))]
    pub async fn list_restaurants(&self) -> Result<Vec<RestaurantView>, StoreError> {
        let restaurants = sqlx::query_as::<_, Restaurant>(
            "SELECT id, name, address FROM restaurants ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut menus = pizzas_by_restaurant(&self.pool).await?;

        debug!("Loaded {} restaurants", restaurants.len());

        Ok(restaurants
            .into_iter()
            .map(|restaurant| {
                let pizzas = menus.remove(&restaurant.id).unwrap_or_default();
                RestaurantView::new(restaurant, pizzas)
            })
            .collect())
    }

    /// A single restaurant in the expanded shape.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no restaurant has this id.
    #[instrument(skip(self))]
    pub async fn get_restaurant(&self, id: i64) -> Result<ExpandedRestaurantView, StoreError> {
        let restaurant = restaurant_view(&self.pool, id).await?;

        let rows = sqlx::query(
            r"
            SELECT rp.id, rp.price, rp.restaurant_id, rp.pizza_id,
                p.name AS pizza_name, p.ingredients AS pizza_ingredients
            FROM restaurant_pizzas rp
            JOIN pizzas p ON p.id = rp.pizza_id
            WHERE rp.restaurant_id = ?
            ORDER BY rp.id
            ",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let restaurant_pizzas = rows
            .iter()
            .map(|row| {
                let restaurant_pizza = RestaurantPizza::from_row(row)?;
                let pizza = flat_pizza_from_row(row, restaurant_pizza.pizza_id)?;
                Ok(RestaurantPizzaView::new(
                    &restaurant_pizza,
                    Some(pizza),
                    Some(restaurant.clone()),
                ))
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(ExpandedRestaurantView::new(restaurant, restaurant_pizzas))
    }

    /// Deletes a restaurant and, through the cascading foreign key, its
    /// restaurant pizzas.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no restaurant has this id.
    #[instrument(skip(self))]
    pub async fn delete_restaurant(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM restaurants WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            let _ = tx.rollback().await;
            return Err(StoreError::NotFound(RESTAURANT_NOT_FOUND));
        }

        tx.commit().await?;

        debug!("Deleted restaurant {id}");

        Ok(())
    }
}

/// Loads one restaurant in the default shape.
pub(super) async fn restaurant_view(
    pool: &SqlitePool,
    id: i64,
) -> Result<RestaurantView, StoreError> {
    let restaurant = sqlx::query_as::<_, Restaurant>(
        "SELECT id, name, address FROM restaurants WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(StoreError::NotFound(RESTAURANT_NOT_FOUND))?;

    let pizzas = sqlx::query_as::<_, Pizza>(
        r"
        SELECT DISTINCT p.id, p.name, p.ingredients
        FROM pizzas p
        JOIN restaurant_pizzas rp ON rp.pizza_id = p.id
        WHERE rp.restaurant_id = ?
        ORDER BY p.id
        ",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(RestaurantView::new(
        restaurant,
        pizzas.into_iter().map(FlatPizza::from).collect(),
    ))
}

/// Distinct pizzas served by each restaurant, keyed by restaurant id.
async fn pizzas_by_restaurant(
    pool: &SqlitePool,
) -> Result<HashMap<i64, Vec<FlatPizza>>, StoreError> {
    let rows = sqlx::query(
        r"
        SELECT DISTINCT rp.restaurant_id, p.id, p.name, p.ingredients
        FROM restaurant_pizzas rp
        JOIN pizzas p ON p.id = rp.pizza_id
        ORDER BY rp.restaurant_id, p.id
        ",
    )
    .fetch_all(pool)
    .await?;

    let mut menus: HashMap<i64, Vec<FlatPizza>> = HashMap::new();
    for row in rows {
        let restaurant_id: i64 = row.try_get("restaurant_id")?;
        let pizza = Pizza::from_row(&row)?;
        menus.entry(restaurant_id).or_default().push(pizza.into());
    }

    Ok(menus)
}

fn flat_pizza_from_row(row: &SqliteRow, pizza_id: i64) -> Result<FlatPizza, sqlx::Error> {
    Ok(FlatPizza {
        id: pizza_id,
        name: row.try_get("pizza_name")?,
        ingredients: row.try_get("pizza_ingredients")?,
    })
}
