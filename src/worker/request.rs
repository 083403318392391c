//! Request and response values exchanged with the worker.
//!
//! Both are cheap to clone (`Bytes` bodies), which is how the worker keeps
//! one copy for the cache and hands the other to the caller.

use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;

/// Cache key: request method plus absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: String,
}

/// An intercepted request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Headers forwarded to the network on a cache miss.
    pub headers: HeaderMap,
}

impl FetchRequest {
    /// Creates a header-less `GET` for `url`.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Returns the cache identity of this request.
    #[must_use]
    pub fn key(&self) -> RequestKey {
        RequestKey {
            method: self.method.clone(),
            url: self.url.clone(),
        }
    }
}

/// How a response relates to the worker's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    /// Same-origin response; status and body are fully visible.
    Basic,
    /// Cross-origin response with readable status and body.
    Cors,
    /// Cross-origin response whose contents cannot be inspected.
    Opaque,
}

/// A response as seen by the worker.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Full response body.
    pub body: Bytes,
    /// Origin classification.
    pub kind: ResponseKind,
}

impl FetchResponse {
    /// Returns `true` if the worker may store this response: status `200`
    /// and a same-origin (basic) response.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        self.status == StatusCode::OK && self.kind == ResponseKind::Basic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, kind: ResponseKind) -> FetchResponse {
        FetchResponse {
            status,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"body"),
            kind,
        }
    }

    #[test]
    fn only_basic_200_is_cacheable() {
        assert!(response(StatusCode::OK, ResponseKind::Basic).is_cacheable());
        assert!(!response(StatusCode::NOT_FOUND, ResponseKind::Basic).is_cacheable());
        assert!(!response(StatusCode::NO_CONTENT, ResponseKind::Basic).is_cacheable());
        assert!(!response(StatusCode::OK, ResponseKind::Cors).is_cacheable());
        assert!(!response(StatusCode::OK, ResponseKind::Opaque).is_cacheable());
    }

    #[test]
    fn key_is_method_and_url() {
        let get = FetchRequest::get("http://127.0.0.1:3000/app.js");
        let mut post = get.clone();
        post.method = Method::POST;
        assert_ne!(get.key(), post.key());
        assert_eq!(get.key(), FetchRequest::get("http://127.0.0.1:3000/app.js").key());
    }
}
