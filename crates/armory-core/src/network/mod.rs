//! Remote catalog access.

mod client;
mod retrying;

pub use client::{CatalogClient, MirrorRow, in_filter};
pub use retrying::RetryingSource;
