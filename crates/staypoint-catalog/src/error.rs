use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Row {row}: missing value for column '{column}'")]
    MissingField { row: usize, column: &'static str },
    #[error("Row {row}: property name is empty")]
    EmptyName { row: usize },
}
