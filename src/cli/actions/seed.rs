use crate::{model::NewRestaurantPizza, store::Store};
use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub dsn: String,
}

const RESTAURANTS: [(&str, &str); 3] = [
    ("Karen's Pizza Shack", "address1"),
    ("Sanjay's Pizza", "address2"),
    ("Kiki's Pizza", "address3"),
];

const PIZZAS: [(&str, &str); 3] = [
    ("Emma", "Dough, Tomato Sauce, Cheese"),
    ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
    ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
];

/// `(restaurant index, pizza index, price)` into the tables above.
const PRICES: [(usize, usize, i64); 3] = [(0, 0, 10), (1, 1, 12), (2, 2, 8)];

/// Execute the seed action.
/// # Errors
/// Returns an error if the database cannot be opened or any insert fails.
pub async fn execute(args: Args) -> Result<()> {
    let store = Store::connect(&args.dsn)
        .await
        .with_context(|| format!("Could not open database {}", args.dsn))?;

    seed(&store).await?;

    println!(
        "Seeded {} restaurants, {} pizzas and {} restaurant pizzas",
        RESTAURANTS.len(),
        PIZZAS.len(),
        PRICES.len()
    );

    Ok(())
}

/// Replace the store contents with the sample data set.
///
/// # Errors
/// Returns an error if the reset or any insert fails.
pub async fn seed(store: &Store) -> Result<()> {
    store.reset().await.context("Could not clear the database")?;

    let mut restaurant_ids = Vec::with_capacity(RESTAURANTS.len());
    for (name, address) in RESTAURANTS {
        let restaurant = store.create_restaurant(name, address).await?;
        info!("Created restaurant {} ({})", restaurant.name, restaurant.id);
        restaurant_ids.push(restaurant.id);
    }

    let mut pizza_ids = Vec::with_capacity(PIZZAS.len());
    for (name, ingredients) in PIZZAS {
        let pizza = store.create_pizza(name, ingredients).await?;
        info!("Created pizza {} ({})", pizza.name, pizza.id);
        pizza_ids.push(pizza.id);
    }

    for (restaurant, pizza, price) in PRICES {
        let new = NewRestaurantPizza::new(price, restaurant_ids[restaurant], pizza_ids[pizza])?;
        store.create_restaurant_pizza(new).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seed_loads_sample_data() -> Result<()> {
        let store = Store::in_memory().await?;
        seed(&store).await?;

        let restaurants = store.list_restaurants().await?;
        assert_eq!(restaurants.len(), 3);
        assert!(restaurants.iter().all(|r| r.pizzas.len() == 1));

        let pizzas = store.list_pizzas().await?;
        assert_eq!(pizzas.len(), 3);
        assert_eq!(pizzas[0].restaurants, vec!["Karen's Pizza Shack".to_string()]);

        assert_eq!(store.count_restaurant_pizzas().await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn seed_twice_replaces_data() -> Result<()> {
        let store = Store::in_memory().await?;
        seed(&store).await?;
        seed(&store).await?;

        assert_eq!(store.list_restaurants().await?.len(), 3);
        assert_eq!(store.list_pizzas().await?.len(), 3);
        assert_eq!(store.count_restaurant_pizzas().await?, 3);
        Ok(())
    }

    #[test]
    fn sample_prices_are_valid() {
        for (restaurant, pizza, price) in PRICES {
            assert!(restaurant < RESTAURANTS.len());
            assert!(pizza < PIZZAS.len());
            assert!(NewRestaurantPizza::new(price, 1, 1).is_ok());
        }
    }
}
