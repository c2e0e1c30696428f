//! Seller dashboard figures.
//!
//! Orders record the product title rather than a price, so revenue is priced
//! by looking up the seller's product with the same title. Orders whose title
//! no longer matches a listing contribute nothing.

use serde::Serialize;

use bakehouse_core::{Order, Price};

use crate::models::Product;

/// Title shown for the best seller when nothing has sold.
pub const NO_SALES_TITLE: &str = "N/A";

/// Units sold per product title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesEntry {
    pub title: String,
    pub sales: u64,
}

/// Everything the seller dashboard shows.
#[derive(Debug, Clone, Serialize)]
pub struct SellerDashboard {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    /// In order of first appearance among `orders`.
    pub chart: Vec<SalesEntry>,
    pub total_revenue: Price,
    pub best_seller: SalesEntry,
}

impl SellerDashboard {
    #[must_use]
    pub fn build(products: Vec<Product>, orders: Vec<Order>) -> Self {
        let chart = sales_by_title(&orders);
        let total_revenue = revenue(&products, &orders);
        let best_seller = best_seller(&chart);

        Self {
            products,
            orders,
            chart,
            total_revenue,
            best_seller,
        }
    }
}

fn sales_by_title(orders: &[Order]) -> Vec<SalesEntry> {
    let mut chart: Vec<SalesEntry> = Vec::new();
    for order in orders {
        let quantity = u64::from(order.quantity);
        match chart.iter_mut().find(|e| e.title == order.product_title) {
            Some(entry) => entry.sales = entry.sales.saturating_add(quantity),
            None => chart.push(SalesEntry {
                title: order.product_title.clone(),
                sales: quantity,
            }),
        }
    }
    chart
}

fn revenue(products: &[Product], orders: &[Order]) -> Price {
    orders
        .iter()
        .filter_map(|order| {
            products
                .iter()
                .find(|p| p.title == order.product_title)
                .map(|p| p.price.times(order.quantity))
        })
        .sum()
}

/// The highest-selling entry; the earliest one wins a tie.
fn best_seller(chart: &[SalesEntry]) -> SalesEntry {
    chart
        .iter()
        .fold(None::<&SalesEntry>, |top, entry| match top {
            Some(top) if top.sales >= entry.sales => Some(top),
            _ => Some(entry),
        })
        .cloned()
        .unwrap_or_else(|| SalesEntry {
            title: NO_SALES_TITLE.to_string(),
            sales: 0,
        })
}
