//! SQLite-backed store for restaurants, pizzas and their prices.
//!
//! `Store` is a cheap, cloneable handle over a connection pool. It is built once
//! at startup (or per test) and passed to handlers explicitly; nothing here is
//! process-global. Handlers never see SQL: every query lives in the
//! submodules, which also assemble the response views.

mod pizzas;
mod restaurant_pizzas;
mod restaurants;


use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Connection, SqlitePool,
};
use std::{str::FromStr, time::Duration};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::model::ValidationError;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

pub const RESTAURANT_NOT_FOUND: &str = "Restaurant not found";
pub const PIZZA_NOT_FOUND: &str = "Pizza not found";
pub const RESTAURANT_PIZZA_NOT_FOUND: &str = "RestaurantPizza not found";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Connects to `dsn` and applies the schema.
    ///
    /// Foreign keys are always enabled on every pooled connection, since
    /// cascading deletes and referential checks depend on them.
    ///
    /// # Errors
    /// Returns an error if the DSN is invalid, the database cannot be opened,
    /// or the schema cannot be applied.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(dsn)
            .with_context(|| format!("Invalid database connection string: {dsn}"))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.apply_schema().await?;

        info!("Connected to database");

        Ok(store)
    }

    /// Private in-memory database, used by tests and throwaway runs.
    ///
    /// A single connection that never expires keeps the database alive for as
    /// long as the store is.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the schema cannot be applied.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("Invalid in-memory connection string")?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let store = Self { pool };
        store.apply_schema().await?;

        Ok(store)
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies `sql/schema.sql` one statement at a time. Every statement is
    /// idempotent, so this runs on each startup.
    async fn apply_schema(&self) -> Result<()> {
        for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
        }

        debug!("Schema applied");

        Ok(())
    }

    /// Acquires a connection and pings it.
    ///
    /// # Errors
    /// Returns an error if no connection can be acquired or the ping fails.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }

    /// Deletes every row in every table.
    ///
    /// # Errors
    /// Returns an error if any delete fails; nothing is removed in that case.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for statement in [
            "DELETE FROM restaurant_pizzas",
            "DELETE FROM pizzas",
            "DELETE FROM restaurants",
        ] {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        Ok(())
    }
}

/// Splits a schema file into individual statements, dropping `--` comment lines.
/// Assumes each statement ends with `;` at the end of a line.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}
