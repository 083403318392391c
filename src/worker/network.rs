//! The worker's view of the network.

use std::fmt;

use async_trait::async_trait;
use reqwest::Url;

use super::request::{FetchRequest, FetchResponse, ResponseKind};
use crate::error::GempaError;

/// Performs requests the cache could not answer.
#[async_trait]
pub trait Network: Send + Sync + fmt::Debug {
    /// Sends `request` and buffers the full response.
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::Network`] if no response was received.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, GempaError>;
}

/// `reqwest`-backed [`Network`] that classifies responses against a fixed
/// origin.
///
/// A response whose final URL (after redirects) shares the origin's scheme,
/// host and port is [`ResponseKind::Basic`]; anything else is
/// [`ResponseKind::Cors`].
#[derive(Debug, Clone)]
pub struct OriginNetwork {
    client: reqwest::Client,
    origin: Url,
}

impl OriginNetwork {
    /// Creates a network client for `origin` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns [`GempaError::InvalidRequest`] if `origin` is not a valid URL.
    pub fn new(client: reqwest::Client, origin: &str) -> Result<Self, GempaError> {
        let origin = Url::parse(origin)
            .map_err(|e| GempaError::InvalidRequest(format!("origin {origin}: {e}")))?;
        Ok(Self { client, origin })
    }

    fn classify(&self, url: &Url) -> ResponseKind {
        if url.origin() == self.origin.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        }
    }
}

#[async_trait]
impl Network for OriginNetwork {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, GempaError> {
        let response = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .send()
            .await?;

        let kind = self.classify(response.url());
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(FetchResponse {
            status,
            headers,
            body,
            kind,
        })
    }
}
