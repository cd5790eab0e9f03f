//! API handlers for pizzeria.
//!
//! Handlers only translate HTTP into `Store` calls and pick status codes; the
//! store owns queries and assembles the response views.

pub mod health;
pub mod pizzas;
pub mod restaurant_pizzas;
pub mod restaurants;
pub mod root;

#[cfg(test)]
mod tests;
