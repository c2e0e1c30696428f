//! Checkout flow against a running storefront.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (bh-cli migrate)
//! - The storefront running (cargo run -p bakehouse-storefront)
//! - The relay running (checkout fails when it cannot be reached)
//!
//! Run with: cargo test -p bakehouse-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use bakehouse_integration_tests::{session_client, storefront_url, unique_email};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

const PASSWORD: &str = "correct horse battery";

async fn signup_and_login(client: &Client, role: &str, name: &str) -> Value {
    let base = storefront_url();
    let email = unique_email(role);

    let resp = client
        .post(format!("{base}/api/auth/signup"))
        .json(&json!({
            "email": email,
            "password": PASSWORD,
            "role": role,
            "display_name": name,
        }))
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Invalid login body")
}

async fn upload_product(client: &Client, title: &str, price: &str) -> Value {
    let resp = client
        .post(format!("{}/api/products", storefront_url()))
        .json(&json!({
            "title": title,
            "price": price,
            "description": "Baked for the integration suite",
        }))
        .send()
        .await
        .expect("Failed to upload product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Invalid product body")
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_health() {
    let resp = reqwest::get(format!("{}/health", storefront_url()))
        .await
        .expect("Failed to reach storefront");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_customer_cannot_upload_products() {
    let client = session_client();
    signup_and_login(&client, "customer", "Browsing Buyer").await;

    let resp = client
        .post(format!("{}/api/products", storefront_url()))
        .json(&json!({ "title": "Contraband Cake", "price": "10" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_admin_signup_rejected() {
    let resp = session_client()
        .post(format!("{}/api/auth/signup", storefront_url()))
        .json(&json!({
            "email": unique_email("admin"),
            "password": PASSWORD,
            "role": "admin",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_checkout_places_one_order_per_line() {
    let base = storefront_url();

    let seller = session_client();
    let login = signup_and_login(&seller, "seller", "Oven Street").await;
    assert_eq!(login["redirect"], "/seller/dashboard");
    let cake = upload_product(&seller, "Integration Cake", "450.00").await;
    let bread = upload_product(&seller, "Integration Loaf", "120.50").await;

    let buyer = session_client();
    signup_and_login(&buyer, "customer", "Test Buyer").await;

    for (product, color, quantity) in [(&cake, "pink", 2), (&bread, "", 1)] {
        let resp = buyer
            .post(format!("{base}/api/cart/add"))
            .json(&json!({
                "product_id": product["id"],
                "quantity": quantity,
                "color": color,
            }))
            .send()
            .await
            .unwrap();
        assert!(resp.status().is_success());
    }

    let count: Value = buyer
        .get(format!("{base}/api/cart/count"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count["count"], 3);

    // Blank reference is refused and the cart survives.
    let resp = buyer
        .post(format!("{base}/api/checkout"))
        .json(&json!({ "txn_id": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = buyer
        .post(format!("{base}/api/checkout"))
        .json(&json!({ "txn_id": "UPI-INTEGRATION-1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let receipt: Value = resp.json().await.unwrap();
    let orders = receipt["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o["status"] == "Paid"));
    assert!(orders.iter().all(|o| o["buyer_name"] == "Test Buyer"));

    let cart: Value = buyer
        .get(format!("{base}/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);

    let dashboard: Value = seller
        .get(format!("{base}/api/seller/dashboard"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dashboard["orders"].as_array().unwrap().len(), 2);
    assert_eq!(dashboard["best_seller"]["title"], "Integration Cake");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_checkout_with_empty_cart_is_rejected() {
    let client = session_client();
    signup_and_login(&client, "customer", "Empty Handed").await;

    let resp = client
        .post(format!("{}/api/checkout", storefront_url()))
        .json(&json!({ "txn_id": "UPI-NOTHING" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_checkout_requires_login() {
    let resp = session_client()
        .post(format!("{}/api/checkout", storefront_url()))
        .json(&json!({ "txn_id": "UPI-ANON" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
