//! Service layer: page-load orchestration.
//!
//! [`PageService`] runs the render pipeline and then the mirror store
//! against the shared [`crate::domain::Document`], and renders the page
//! shell the containers live in.

pub mod page_service;
pub mod shell;

pub use page_service::{PageLoad, PageService};
