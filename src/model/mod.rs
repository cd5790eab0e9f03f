//! Entities persisted by the store.
//!
//! `RestaurantPizza` is the only entity with a write-time rule: its price is a
//! [`Price`], which cannot hold a value outside `1..=30`. The rule is checked by
//! [`Price::new`], which both [`NewRestaurantPizza::new`] and
//! [`RestaurantPizza::set_price`] go through.

pub mod views;

use serde::Serialize;
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Price must be between 1 and 30.")]
    PriceOutOfRange(i64),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Price a restaurant charges for a pizza, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 30;

    /// # Errors
    /// Returns `ValidationError::PriceOutOfRange` unless `MIN <= value <= MAX`.
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::PriceOutOfRange(value))
        }
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Pizza {
    pub id: i64,
    pub name: String,
    pub ingredients: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantPizza {
    pub id: i64,
    price: Price,
    pub restaurant_id: i64,
    pub pizza_id: i64,
}

impl RestaurantPizza {
    #[must_use]
    pub fn new(id: i64, price: Price, restaurant_id: i64, pizza_id: i64) -> Self {
        Self {
            id,
            price,
            restaurant_id,
            pizza_id,
        }
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Re-validates on every assignment; the previous price is kept on error.
    ///
    /// # Errors
    /// Returns `ValidationError::PriceOutOfRange` for values outside `1..=30`.
    pub fn set_price(&mut self, value: i64) -> Result<(), ValidationError> {
        self.price = Price::new(value)?;
        Ok(())
    }
}

impl<'r> FromRow<'r, SqliteRow> for RestaurantPizza {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let price: i64 = row.try_get("price")?;
        let price = Price::new(price).map_err(|err| sqlx::Error::ColumnDecode {
            index: "price".to_string(),
            source: Box::new(err),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            price,
            restaurant_id: row.try_get("restaurant_id")?,
            pizza_id: row.try_get("pizza_id")?,
        })
    }
}

/// A validated, not yet persisted `RestaurantPizza`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRestaurantPizza {
    pub price: Price,
    pub restaurant_id: i64,
    pub pizza_id: i64,
}

impl NewRestaurantPizza {
    /// # Errors
    /// Returns `ValidationError::PriceOutOfRange` for prices outside `1..=30`.
    pub fn new(price: i64, restaurant_id: i64, pizza_id: i64) -> Result<Self, ValidationError> {
        Ok(Self {
            price: Price::new(price)?,
            restaurant_id,
            pizza_id,
        })
    }
}
