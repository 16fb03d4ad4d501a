// src/models/order.rs
use super::{
    de_order_approved_at, de_order_delivered_carrier_date, de_order_delivered_customer_date,
    de_order_estimated_delivery_date, de_order_purchase_timestamp,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Status value marking an order as handed over to the customer.
pub const DELIVERED: &str = "delivered";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: String,
    pub customer_id: String,
    pub order_status: String, // delivered, shipped, canceled, ...
    #[serde(deserialize_with = "de_order_purchase_timestamp")]
    pub order_purchase_timestamp: NaiveDateTime,
    #[serde(default, deserialize_with = "de_order_approved_at")]
    pub order_approved_at: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_order_delivered_carrier_date")]
    pub order_delivered_carrier_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_order_delivered_customer_date")]
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_order_estimated_delivery_date")]
    pub order_estimated_delivery_date: Option<NaiveDateTime>,
}

impl Order {
    pub fn is_delivered(&self) -> bool {
        self.order_status == DELIVERED
    }
}
