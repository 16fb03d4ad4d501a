// src/models/customer.rs
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Customer {
    pub customer_id: String,        // one per order
    pub customer_unique_id: String, // one per person
    pub customer_zip_code_prefix: String,
    pub customer_city: String,
    pub customer_state: String, // two-letter Brazilian state code
}
