//! Pizza queries.

use std::collections::HashMap;

use sqlx::Row;
use tracing::{debug, instrument};

use super::{Store, StoreError, PIZZA_NOT_FOUND};
use crate::model::{views::FullPizza, Pizza};

impl Store {
    /// # Errors
    /// Returns an error if the insert fails.
    #[instrument(skip(self))]
    pub async fn create_pizza(&self, name: &str, ingredients: &str) -> Result<Pizza, StoreError> {
        let id = sqlx::query("INSERT INTO pizzas (name, ingredients) VALUES (?, ?)")
            .bind(name)
            .bind(ingredients)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(Pizza {
            id,
            name: name.to_string(),
            ingredients: ingredients.to_string(),
        })
    }

    /// Every pizza in the full shape, with the names of the restaurants serving it.
    ///
    /// # Errors
    /// Returns an error if a query fails.
    #[instrument(skip(self))]
    pub async fn list_pizzas(&self) -> Result<Vec<FullPizza>, StoreError> {
        let pizzas =
            sqlx::query_as::<_, Pizza>("SELECT id, name, ingredients FROM pizzas ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        let rows = sqlx::query(
            r"
            SELECT DISTINCT rp.pizza_id, r.id AS restaurant_id, r.name AS restaurant_name
            FROM restaurant_pizzas rp
            JOIN restaurants r ON r.id = rp.restaurant_id
            ORDER BY rp.pizza_id, r.id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut served_at: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            let pizza_id: i64 = row.try_get("pizza_id")?;
            let name: String = row.try_get("restaurant_name")?;
            served_at.entry(pizza_id).or_default().push(name);
        }

        debug!("Loaded {} pizzas", pizzas.len());

        Ok(pizzas
            .into_iter()
            .map(|pizza| {
                let restaurants = served_at.remove(&pizza.id).unwrap_or_default();
                FullPizza::new(pizza, restaurants)
            })
            .collect())
    }

    /// Deletes a pizza and, through the cascading foreign key, its restaurant pizzas.
    ///
    /// # Errors
    /// Returns `StoreError::NotFound` if no pizza has this id.
    #[instrument(skip(self))]
    pub async fn delete_pizza(&self, id: i64) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM pizzas WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            let _ = tx.rollback().await;
            return Err(StoreError::NotFound(PIZZA_NOT_FOUND));
        }

        tx.commit().await?;

        debug!("Deleted pizza {id}");

        Ok(())
    }
}
