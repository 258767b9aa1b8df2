use std::path::PathBuf;

use frontier_core::DataError;
use thiserror::Error;

/// Errors from the price and parameter collaborators
#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("price file {} has no price columns", path.display())]
    NoPriceColumns { path: PathBuf },

    #[error("row {row}: could not parse date '{value}': {source}")]
    Date {
        row: usize,
        value: String,
        #[source]
        source: jiff::Error,
    },

    #[error("row {row}, column {column}: could not parse price '{value}'")]
    Price {
        row: usize,
        column: String,
        value: String,
    },

    #[error("could not load any price data; check the ticker symbols")]
    Empty,

    #[error("no tickers entered")]
    NoTickers,

    #[error("input ended before a value was entered")]
    EndOfInput,

    #[error("at least two valid tickers are required for portfolio optimization, found {found}")]
    InsufficientAssets { found: usize },

    #[error(transparent)]
    Data(#[from] DataError),
}

/// Errors from the output sinks
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV writing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("simulation produced no portfolios")]
    EmptyResult,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to serialize config: {0}")]
    Serialize(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
