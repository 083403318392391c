//! Render pipeline: bulletin fetch, HTML templating, container assignment.
//!
//! [`templates`] holds the pure fragment builders; [`RenderPipeline`] drives
//! the two fetch-and-render steps against a [`crate::domain::Document`].

pub mod pipeline;
pub mod templates;

pub use pipeline::{RenderOutcome, RenderPipeline};
