use thiserror::Error;

/// Failures while reading enrollment rows from the spreadsheet export
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open enrollment file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse enrollment CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("no enrollment rows found")]
    NoRows,
}

/// Rejected selection changes
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("slot {0} is out of range (expected 0, 1 or 2)")]
    SlotOutOfRange(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid port {0:?}")]
    InvalidPort(String),
    #[error("invalid upload limit {0:?} (expected a size in bytes)")]
    InvalidUploadLimit(String),
    #[error("unknown conflict policy {0:?} (expected \"reference\" or \"all-selected\")")]
    UnknownPolicy(String),
}
