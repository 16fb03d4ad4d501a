use super::Economics;
use crate::models::{Dataset, Order, OrderItem};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Delivered orders, their items, and the reputation cost of each reviewed order.
#[derive(Debug, Clone)]
pub struct BaseFrames<'a> {
    pub delivered_orders: Vec<&'a Order>,
    pub delivered_items: Vec<&'a OrderItem>,
    pub order_cost: HashMap<&'a str, f64>, // order_id -> worst review cost
}

impl BaseFrames<'_> {
    /// Reputation cost of an order, 0 when it has no costed review.
    pub fn cost_of(&self, order_id: &str) -> f64 {
        self.order_cost.get(order_id).copied().unwrap_or(0.0)
    }
}

pub fn prepare_base_frames<'a>(dataset: &'a Dataset, economics: &Economics) -> BaseFrames<'a> {
    let delivered_orders: Vec<&Order> = dataset.orders.iter().filter(|o| o.is_delivered()).collect();
    let delivered_ids: HashSet<&str> = delivered_orders.iter().map(|o| o.order_id.as_str()).collect();

    let delivered_items: Vec<&OrderItem> = dataset
        .order_items
        .iter()
        .filter(|item| delivered_ids.contains(item.order_id.as_str()))
        .collect();

    // An order with several reviews is charged its worst one
    let mut order_cost: HashMap<&str, f64> = HashMap::new();
    for review in &dataset.reviews {
        let Some(cost) = review.review_score.and_then(|s| economics.reputation_cost(s)) else {
            continue;
        };
        order_cost
            .entry(review.order_id.as_str())
            .and_modify(|current| *current = current.max(cost))
            .or_insert(cost);
    }

    debug!(
        delivered_orders = delivered_orders.len(),
        delivered_items = delivered_items.len(),
        costed_orders = order_cost.len(),
        "prepared base frames"
    );

    BaseFrames {
        delivered_orders,
        delivered_items,
        order_cost,
    }
}
