//! Data module - CSV loading, normalization and filtering

mod filter;
mod loader;

pub use filter::{FilterOptions, FilterSelection};
pub use loader::{ChurnDataset, LoaderError};
