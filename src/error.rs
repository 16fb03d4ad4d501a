use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while reading the marketplace dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[cfg(feature = "ssr")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid timestamp in column `{column}`: {value:?}")]
    Timestamp { column: &'static str, value: String },

    #[error("no dataset source configured (use --csv-dir or --sqlite)")]
    MissingSource,

    #[error("dataset file not found: {0}")]
    MissingFile(PathBuf),
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
