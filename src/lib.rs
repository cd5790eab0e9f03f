//! # Pizzeria
//!
//! `pizzeria` serves restaurants, pizzas and the price a restaurant charges for
//! a pizza over a small JSON API backed by SQLite.
//!
//! ## Data Model
//!
//! - **Restaurant** and **Pizza** are plain entities.
//! - **`RestaurantPizza`** is the join entity between them and carries the price.
//!   Deleting either side deletes the rows that reference it.
//! - **Price** is always within `1..=30`; the check runs on construction and on
//!   every later assignment.
//!
//! ## Serialization
//!
//! The restaurant/pizza graph is cyclic. Each JSON shape is its own type in
//! [`model::views`] and only nests shapes that do not point back, so rendering a
//! response never recurses.

pub mod api;
pub mod cli;
pub mod model;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

/// First seven characters of a commit hash, as shown in logs and `X-App`.
#[must_use]
pub fn short_commit(hash: &str) -> String {
    hash.trim().chars().take(7).collect()
}
