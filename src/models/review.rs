// src/models/review.rs
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub review_id: String,
    pub order_id: String,        // ID of the order the review is associated with
    pub review_score: Option<i64>, // 1 to 5 stars, missing on malformed rows
}
