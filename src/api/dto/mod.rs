//! Data Transfer Objects for REST request/response serialization.

pub mod install_dto;

pub use install_dto::*;
