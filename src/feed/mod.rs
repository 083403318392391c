//! Remote data source: the public earthquake feed.
//!
//! [`QuakeFeed`] is the seam between the render pipeline and the network.
//! [`BmkgFeed`] is the production implementation backed by `reqwest`.

pub mod bmkg;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{EarthquakeEvent, EarthquakeList};
use crate::error::GempaError;

pub use bmkg::BmkgFeed;

/// Source of earthquake bulletins.
#[async_trait]
pub trait QuakeFeed: Send + Sync + fmt::Debug {
    /// Fetches the latest single event.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::Network`] if the request fails and
    /// [`GempaError::Decode`] if the payload is not a bulletin.
    async fn latest(&self) -> Result<EarthquakeEvent, GempaError>;

    /// Fetches the recent-events list in feed order.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::Network`] if the request fails and
    /// [`GempaError::Decode`] if the payload is not a bulletin.
    async fn recent(&self) -> Result<EarthquakeList, GempaError>;

    /// Base URL shakemap paths are resolved against.
    fn shakemap_base(&self) -> &str;
}
