//! Reads the marketplace tables from a directory of CSV exports or a SQLite file.

use crate::error::{DataError, Result};
use crate::models::Dataset;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ORDERS_FILE: &str = "olist_orders_dataset.csv";
pub const ORDER_ITEMS_FILE: &str = "olist_order_items_dataset.csv";
pub const REVIEWS_FILE: &str = "olist_order_reviews_dataset.csv";
pub const PRODUCTS_FILE: &str = "olist_products_dataset.csv";
pub const TRANSLATIONS_FILE: &str = "product_category_name_translation.csv";
pub const CUSTOMERS_FILE: &str = "olist_customers_dataset.csv";
pub const SELLERS_FILE: &str = "olist_sellers_dataset.csv";

/// Where the dataset lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    CsvDirectory(PathBuf),
    #[cfg(feature = "ssr")]
    Sqlite(PathBuf),
}

/// Load every table the pipeline needs from `source`.
pub async fn load_dataset(source: &DataSource) -> Result<Dataset> {
    match source {
        DataSource::CsvDirectory(dir) => load_csv_dir(dir),
        #[cfg(feature = "ssr")]
        DataSource::Sqlite(path) => {
            if !path.is_file() {
                return Err(DataError::MissingFile(path.clone()));
            }
            let db = crate::db::Database::open_read_only(&path.to_string_lossy())?;
            db.load_dataset().await
        }
    }
}

/// Load the seven CSV exports found in `dir`.
pub fn load_csv_dir(dir: &Path) -> Result<Dataset> {
    let meta = fs::metadata(dir).map_err(|source| DataError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(DataError::MissingFile(dir.to_path_buf()));
    }
    info!(dir = %dir.display(), "loading CSV dataset");

    Ok(Dataset {
        orders: read_table(dir, ORDERS_FILE)?,
        order_items: read_table(dir, ORDER_ITEMS_FILE)?,
        reviews: read_table(dir, REVIEWS_FILE)?,
        products: read_table(dir, PRODUCTS_FILE)?,
        category_translations: read_table(dir, TRANSLATIONS_FILE)?,
        customers: read_table(dir, CUSTOMERS_FILE)?,
        sellers: read_table(dir, SELLERS_FILE)?,
    })
}

fn read_table<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(DataError::MissingFile(path));
    }
    debug!(path = %path.display(), "reading table");

    let mut reader = csv::Reader::from_path(&path).map_err(|source| DataError::Csv {
        path: path.clone(),
        source,
    })?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|source| DataError::Csv {
            path: path.clone(),
            source,
        })?;

    info!(table = file, rows = rows.len(), "table loaded");
    Ok(rows)
}
