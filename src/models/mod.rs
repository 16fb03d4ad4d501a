//! Raw marketplace records as they come out of the dataset provider.
pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;
pub mod review;
pub mod seller;

pub use customer::Customer;
pub use order::Order;
pub use order_item::OrderItem;
pub use product::{CategoryTranslation, Product};
pub use review::Review;
pub use seller::Seller;

use crate::error::{DataError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a dataset timestamp. Empty text means the value is missing.
pub fn parse_timestamp(column: &'static str, value: &str) -> Result<Option<NaiveDateTime>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Some(ts));
        }
    }
    // Some exports carry bare dates
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Some)
        .ok_or_else(|| DataError::Timestamp {
            column,
            value: value.to_string(),
        })
}

/// Same as [`parse_timestamp`] for a column that may be NULL in SQLite.
pub fn parse_optional_timestamp(
    column: &'static str,
    value: Option<String>,
) -> Result<Option<NaiveDateTime>> {
    match value {
        Some(value) => parse_timestamp(column, &value),
        None => Ok(None),
    }
}

/// The dataset as a set of in-memory tables.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub reviews: Vec<Review>,
    pub products: Vec<Product>,
    pub category_translations: Vec<CategoryTranslation>,
    pub customers: Vec<Customer>,
    pub sellers: Vec<Seller>,
}

/// Serde adapters for optional timestamp columns. Errors name the column.
macro_rules! optional_timestamp_columns {
    ($($name:ident => $column:literal),* $(,)?) => {
        $(
            pub(crate) fn $name<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDateTime>, D::Error>
            where
                D: Deserializer<'de>,
            {
                let raw: Option<String> = Option::deserialize(deserializer)?;
                match raw {
                    Some(raw) => parse_timestamp($column, &raw).map_err(serde::de::Error::custom),
                    None => Ok(None),
                }
            }
        )*
    };
}

optional_timestamp_columns! {
    de_order_approved_at => "order_approved_at",
    de_order_delivered_carrier_date => "order_delivered_carrier_date",
    de_order_delivered_customer_date => "order_delivered_customer_date",
    de_order_estimated_delivery_date => "order_estimated_delivery_date",
    de_shipping_limit_date => "shipping_limit_date",
}

pub(crate) fn de_order_purchase_timestamp<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    const COLUMN: &str = "order_purchase_timestamp";
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(COLUMN, &raw)
        .map_err(serde::de::Error::custom)?
        .ok_or_else(|| {
            serde::de::Error::custom(DataError::Timestamp {
                column: COLUMN,
                value: raw.clone(),
            })
        })
}
