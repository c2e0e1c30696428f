//! Demo catalogue seeding.
//!
//! Gives an existing seller a handful of products so the marketplace, cart
//! and checkout can be tried straight after setup. A YAML file can replace
//! the built-in catalogue:
//!
//! ```yaml
//! - title: Chocolate Truffle Cake
//!   price: "650.00"
//!   description: Dark chocolate sponge with ganache
//!   image_url: https://images.example/truffle.jpg
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use bakehouse_core::{Email, Price, Role};
use bakehouse_storefront::db::{ProductRepository, UserRepository};
use bakehouse_storefront::models::NewProduct;

/// One catalogue entry.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
}

const BUILTIN_CATALOGUE: &str = r#"
- title: Chocolate Truffle Cake
  price: "650.00"
  description: Dark chocolate sponge layered with ganache
- title: Sourdough Loaf
  price: "180.00"
  description: Slow-fermented country loaf with a crackling crust
- title: Butter Croissant
  price: "90.00"
  description: Laminated all-butter pastry, baked every morning
- title: Red Velvet Cupcakes (6)
  price: "360.00"
  description: Cream cheese frosting, box of six
- title: Almond Biscotti
  price: "220.00"
  description: Twice-baked almond cookies, 250 g jar
"#;

/// Parse a YAML catalogue.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a price is negative.
pub fn parse_catalogue(yaml: &str) -> Result<Vec<SeedProduct>, Box<dyn std::error::Error>> {
    let products: Vec<SeedProduct> = serde_yaml::from_str(yaml)?;
    for product in &products {
        Price::new(product.price).map_err(|e| format!("{}: {e}", product.title))?;
    }
    Ok(products)
}

/// Insert the catalogue for the seller with `seller_email`.
///
/// # Errors
///
/// Returns an error if the seller does not exist or is not a seller, the
/// catalogue is invalid, or the database is unreachable.
pub async fn catalogue(
    seller_email: &str,
    file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let yaml = match file {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => BUILTIN_CATALOGUE.to_string(),
    };
    let entries = parse_catalogue(&yaml)?;
    info!(products = entries.len(), "Catalogue parsed");

    let email = Email::parse(seller_email)?;
    let database_url = super::database_url()?;
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let seller = UserRepository::new(&pool)
        .get_by_email(&email)
        .await?
        .ok_or_else(|| format!("No account for {email}"))?;
    if seller.role != Role::Seller {
        return Err(format!("{email} is a {}, not a seller", seller.role).into());
    }

    let products = ProductRepository::new(&pool);
    for entry in entries {
        let product = products
            .create(&NewProduct {
                title: entry.title,
                price: Price::new(entry.price)?,
                description: entry.description,
                image_url: entry.image_url,
                seller_id: seller.id,
                seller_name: seller.public_name(),
            })
            .await?;
        info!(product_id = %product.id, title = %product.title, "Product created");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogue_parses() {
        let products = parse_catalogue(BUILTIN_CATALOGUE).unwrap();
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].title, "Chocolate Truffle Cake");
        assert_eq!(products[0].price, Decimal::new(65000, 2));
        assert!(products.iter().all(|p| p.image_url.is_none()));
    }

    #[test]
    fn test_negative_price_rejected() {
        let yaml = "- title: Free money\n  price: \"-1\"\n";
        assert!(parse_catalogue(yaml).is_err());
    }
}
