// src/models/product.rs
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub product_category_name: Option<String>, // Portuguese category slug
}

/// Maps a Portuguese category slug to its English name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CategoryTranslation {
    #[serde(alias = "\u{feff}product_category_name")]
    pub product_category_name: String,
    pub product_category_name_english: String,
}
