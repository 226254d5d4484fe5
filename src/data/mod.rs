//! Data acquisition.
//!
//! - `api`: HTTP client for the backend endpoints
//! - `wire`: response shapes and their normalization into domain types

use crate::domain::{ChangePoint, PriceRecord};
use crate::error::FetchError;

pub mod api;
pub mod wire;

pub use api::ApiClient;

/// Read-only source of the two dashboard resources.
///
/// `Sync` because both resources are requested concurrently.
pub trait DataSource: Sync {
    fn fetch_prices(&self) -> Result<Vec<PriceRecord>, FetchError>;
    fn fetch_change_point(&self) -> Result<Option<ChangePoint>, FetchError>;
}

/// Outcome of one startup fetch. Each endpoint succeeds or fails on its own.
#[derive(Debug)]
pub struct Fetched {
    pub prices: Result<Vec<PriceRecord>, FetchError>,
    pub change_point: Result<Option<ChangePoint>, FetchError>,
}

/// Request both resources concurrently.
pub fn fetch_all<S: DataSource + ?Sized>(source: &S) -> Fetched {
    let (prices, change_point) = rayon::join(|| source.fetch_prices(), || source.fetch_change_point());
    Fetched { prices, change_point }
}
