#[cfg(feature = "ssr")]
mod db_impl {
    use crate::error::Result;
    use crate::models::{
        parse_optional_timestamp, parse_timestamp, CategoryTranslation, Customer, Dataset, Order, OrderItem, Product,
        Review, Seller,
    };
    use rusqlite::{Connection, OpenFlags, Row};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tracing::{debug, info};


    pub struct Database {
        conn: Arc<Mutex<Connection>>,
    }

    impl Database {
        // Open a database connection
        pub fn new(db_path: &str) -> std::result::Result<Self, rusqlite::Error> {
            let conn = Connection::open(db_path)?;
            info!(path = db_path, "database connection established");
            Ok(Database {
                conn: Arc::new(Mutex::new(conn)),
            })
        }

        // Open an existing database file without ever writing to or creating it
        pub fn open_read_only(db_path: &str) -> std::result::Result<Self, rusqlite::Error> {
            let conn = Connection::open_with_flags(
                db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            info!(path = db_path, "read-only database connection established");
            Ok(Database {
                conn: Arc::new(Mutex::new(conn)),
            })
        }

        /// Read the seven marketplace tables.
        pub async fn load_dataset(&self) -> Result<Dataset> {
            let conn = self.conn.lock().await;
            Ok(Dataset {
                orders: load_orders(&conn)?,
                order_items: load_order_items(&conn)?,
                reviews: query_table(
                    &conn,
                    "order_reviews",
                    "SELECT CAST(review_id AS TEXT), CAST(order_id AS TEXT), CAST(review_score AS INTEGER)
                     FROM order_reviews",
                    |row| {
                        Ok(Review {
                            review_id: row.get(0)?,
                            order_id: row.get(1)?,
                            review_score: row.get(2)?,
                        })
                    },
                )?,
                products: query_table(
                    &conn,
                    "products",
                    "SELECT CAST(product_id AS TEXT), NULLIF(CAST(product_category_name AS TEXT), '')
                     FROM products",
                    |row| {
                        Ok(Product {
                            product_id: row.get(0)?,
                            product_category_name: row.get(1)?,
                        })
                    },
                )?,
                category_translations: query_table(
                    &conn,
                    "product_category_name_translation",
                    "SELECT CAST(product_category_name AS TEXT), CAST(product_category_name_english AS TEXT)
                     FROM product_category_name_translation",
                    |row| {
                        Ok(CategoryTranslation {
                            product_category_name: row.get(0)?,
                            product_category_name_english: row.get(1)?,
                        })
                    },
                )?,
                customers: query_table(
                    &conn,
                    "customers",
                    "SELECT CAST(customer_id AS TEXT), CAST(customer_unique_id AS TEXT),
                            CAST(customer_zip_code_prefix AS TEXT), CAST(customer_city AS TEXT),
                            CAST(customer_state AS TEXT)
                     FROM customers",
                    |row| {
                        Ok(Customer {
                            customer_id: row.get(0)?,
                            customer_unique_id: row.get(1)?,
                            customer_zip_code_prefix: row.get(2)?,
                            customer_city: row.get(3)?,
                            customer_state: row.get(4)?,
                        })
                    },
                )?,
                sellers: query_table(
                    &conn,
                    "sellers",
                    "SELECT CAST(seller_id AS TEXT), CAST(seller_zip_code_prefix AS TEXT),
                            CAST(seller_city AS TEXT), CAST(seller_state AS TEXT)
                     FROM sellers",
                    |row| {
                        Ok(Seller {
                            seller_id: row.get(0)?,
                            seller_zip_code_prefix: row.get(1)?,
                            seller_city: row.get(2)?,
                            seller_state: row.get(3)?,
                        })
                    },
                )?,
            })
        }
    }

    fn query_table<T, F>(conn: &Connection, table: &str, sql: &str, map: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        debug!(table, "querying table");
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map([], map)?
            .collect::<std::result::Result<Vec<T>, rusqlite::Error>>()?;
        info!(table, rows = rows.len(), "table loaded");
        Ok(rows)
    }

    // Timestamps are stored as text and parsed after the query
    type RawOrder = (String, String, String, String, [Option<String>; 4]);

    fn load_orders(conn: &Connection) -> Result<Vec<Order>> {
        let raw: Vec<RawOrder> = query_table(
            conn,
            "orders",
            "SELECT CAST(order_id AS TEXT), CAST(customer_id AS TEXT), CAST(order_status AS TEXT),
                    CAST(order_purchase_timestamp AS TEXT), CAST(order_approved_at AS TEXT),
                    CAST(order_delivered_carrier_date AS TEXT), CAST(order_delivered_customer_date AS TEXT),
                    CAST(order_estimated_delivery_date AS TEXT)
             FROM orders",
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    [row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?],
                ))
            },
        )?;

        raw.into_iter()
            .map(|(order_id, customer_id, order_status, purchased, [approved, carrier, delivered, estimated])| -> Result<Order> {
                let order_purchase_timestamp = parse_timestamp("order_purchase_timestamp", &purchased)?
                    .ok_or_else(|| crate::error::DataError::Timestamp {
                        column: "order_purchase_timestamp",
                        value: purchased.clone(),
                    })?;
                Ok(Order {
                    order_id,
                    customer_id,
                    order_status,
                    order_purchase_timestamp,
                    order_approved_at: parse_optional_timestamp("order_approved_at", approved)?,
                    order_delivered_carrier_date: parse_optional_timestamp("order_delivered_carrier_date", carrier)?,
                    order_delivered_customer_date: parse_optional_timestamp(
                        "order_delivered_customer_date",
                        delivered,
                    )?,
                    order_estimated_delivery_date: parse_optional_timestamp(
                        "order_estimated_delivery_date",
                        estimated,
                    )?,
                })
            })
            .collect()
    }

    fn load_order_items(conn: &Connection) -> Result<Vec<OrderItem>> {
        let raw: Vec<(OrderItem, Option<String>)> = query_table(
            conn,
            "order_items",
            "SELECT CAST(order_id AS TEXT), CAST(order_item_id AS INTEGER), CAST(product_id AS TEXT),
                    CAST(seller_id AS TEXT), CAST(shipping_limit_date AS TEXT),
                    CAST(price AS REAL), CAST(freight_value AS REAL)
             FROM order_items",
            |row| {
                let item = OrderItem {
                    order_id: row.get(0)?,
                    order_item_id: row.get(1)?,
                    product_id: row.get(2)?,
                    seller_id: row.get(3)?,
                    shipping_limit_date: None,
                    price: row.get(5)?,
                    freight_value: row.get(6)?,
                };
                Ok((item, row.get(4)?))
            },
        )?;

        raw.into_iter()
            .map(|(mut item, limit)| -> Result<OrderItem> {
                item.shipping_limit_date = parse_optional_timestamp("shipping_limit_date", limit)?;
                Ok(item)
            })
            .collect()
    }
}

#[cfg(feature = "ssr")]
pub use db_impl::Database;
