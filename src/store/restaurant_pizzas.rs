//! Restaurant pizza writes.
//!
//! Each write starts with the statement that takes SQLite's write lock, so
//! concurrent writers queue on the busy timeout instead of failing to upgrade
//! a read lock. Referenced rows are checked by the foreign keys on insert.

use sqlx::{sqlite::SqliteRow, Row};
use tracing::{debug, instrument};

use super::{
    restaurants::restaurant_view, Store, StoreError, PIZZA_NOT_FOUND, RESTAURANT_NOT_FOUND,
    RESTAURANT_PIZZA_NOT_FOUND,
};
use crate::model::{
    views::{FlatPizza, RestaurantPizzaView},
    NewRestaurantPizza, Pizza, RestaurantPizza,
};

impl Store {
    /// Inserts a restaurant pizza and returns it in the full shape.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if the restaurant or pizza does not
    /// exist, or `StoreError::Database` if the insert fails.
    #[instrument(skip(self))]
    pub async fn create_restaurant_pizza(
        &self,
        new: NewRestaurantPizza,
    ) -> Result<RestaurantPizzaView, StoreError> {
        let inserted = sqlx::query(
            "INSERT INTO restaurant_pizzas (price, restaurant_id, pizza_id) VALUES (?, ?, ?)",
        )
        .bind(new.price.get())
        .bind(new.restaurant_id)
        .bind(new.pizza_id)
        .execute(&self.pool)
        .await;

        let id = match inserted {
            Ok(result) => result.last_insert_rowid(),
            Err(sqlx::Error::Database(err)) if err.is_foreign_key_violation() => {
                return Err(self.missing_reference(&new).await);
            }
            Err(err) => return Err(err.into()),
        };

        debug!("Created restaurant pizza {id}");

        let pizza = sqlx::query_as::<_, Pizza>(
            "SELECT id, name, ingredients FROM pizzas WHERE id = ?",
        )
        .bind(new.pizza_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(PIZZA_NOT_FOUND))?;
        let restaurant = restaurant_view(&self.pool, new.restaurant_id).await?;

        let restaurant_pizza =
            RestaurantPizza::new(id, new.price, new.restaurant_id, new.pizza_id);

        Ok(RestaurantPizzaView::new(
            &restaurant_pizza,
            Some(FlatPizza::from(pizza)),
            Some(restaurant),
        ))
    }

    /// Names the reference that made an insert fail its foreign key check.
    async fn missing_reference(&self, new: &NewRestaurantPizza) -> StoreError {
        let restaurant: Result<Option<SqliteRow>, sqlx::Error> =
            sqlx::query("SELECT 1 FROM restaurants WHERE id = ?")
                .bind(new.restaurant_id)
                .fetch_optional(&self.pool)
                .await;

        match restaurant {
            Ok(Some(_)) => StoreError::NotFound(PIZZA_NOT_FOUND),
            Ok(None) => StoreError::NotFound(RESTAURANT_NOT_FOUND),
            Err(err) => err.into(),
        }
    }

    /// Changes the price of an existing restaurant pizza. The new value goes
    /// through the same check as on creation before anything is written.
    ///
    /// # Errors
    /// Returns `StoreError::Validation` for an out-of-range price,
    /// `StoreError::NotFound` if the row does not exist.
    #[instrument(skip(self))]
    pub async fn update_restaurant_pizza_price(
        &self,
        id: i64,
        price: i64,
    ) -> Result<RestaurantPizza, StoreError> {
        let mut restaurant_pizza = sqlx::query_as::<_, RestaurantPizza>(
            "SELECT id, price, restaurant_id, pizza_id FROM restaurant_pizzas WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(RESTAURANT_PIZZA_NOT_FOUND))?;

        restaurant_pizza.set_price(price)?;

        // single statement; a row deleted since the read shows up as 0 rows
        let updated = sqlx::query("UPDATE restaurant_pizzas SET price = ? WHERE id = ?")
            .bind(restaurant_pizza.price().get())
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if updated == 0 {
            return Err(StoreError::NotFound(RESTAURANT_PIZZA_NOT_FOUND));
        }

        Ok(restaurant_pizza)
    }

    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count_restaurant_pizzas(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM restaurant_pizzas")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("total")?)
    }
}
