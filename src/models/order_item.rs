// src/models/order_item.rs
use super::de_shipping_limit_date;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One line of an order. An order with three units of a product has three items.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub order_id: String,
    pub order_item_id: i64, // position of the item inside its order, starting at 1
    pub product_id: String,
    pub seller_id: String,
    #[serde(default, deserialize_with = "de_shipping_limit_date")]
    pub shipping_limit_date: Option<NaiveDateTime>,
    pub price: f64,
    pub freight_value: f64,
}
