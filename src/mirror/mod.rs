//! Local mirror store: one snapshot row per page load.
//!
//! The mirror is opportunistic. Every failure (unsupported platform, open
//! failure, transaction failure) is logged and swallowed so the page load
//! that triggered it is never affected.

pub mod sqlite;

pub use sqlite::{MirrorStore, MirrorSupport};
