//! Domain layer: bulletin types, the page model, and mirror records.
//!
//! This module contains the feed's earthquake types, the server-held
//! [`Document`] whose containers the render pipeline fills, and the
//! [`SnapshotRecord`] the mirror store persists.

pub mod document;
pub mod earthquake;
pub mod snapshot;

pub use document::{Container, Document};
pub use earthquake::{Bulletin, EarthquakeEvent, EarthquakeList};
pub use snapshot::SnapshotRecord;
