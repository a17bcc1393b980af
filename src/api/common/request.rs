//
//  gh-actions-client
//  api/common/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Request and response descriptions shared by every root.
//!
//! A [`Request`] collects the optional parts of one logical call (body,
//! method, previews, query, content type, accept type and byte range). Nodes
//! pass it unchanged up the tree, and the dispatcher turns it into an HTTP
//! request. What comes back is a [`RawResponse`], which the node interprets.
//!
//! # Example
//!
//! ```rust
//! use gh_actions_client::api::common::{MediaType, Request};
//! use serde_json::json;
//!
//! let request = Request::new()
//!     .method("patch")
//!     .json(json!({"state": "closed"}))
//!     .accept(MediaType::Full);
//! # let _ = request;
//! ```

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{has_next_page, ApiError};

/// Request body variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Sent as UTF-8 bytes
    Text(String),
    /// Sent verbatim, may carry a byte range
    Bytes(Vec<u8>),
    /// Serialised for non-GET methods, merged into the query for GET
    Json(Value),
}

/// Half-open byte range `[start, stop)` of an upload, with the optional total
/// length of the resource it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset
    pub start: u64,
    /// One past the last byte offset
    pub stop: u64,
    /// Full resource length, `None` when unknown
    pub total: Option<u64>,
}

impl ByteRange {
    /// Creates a range with an unknown total.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Format`] when `stop <= start`; a `Content-Range`
    /// cannot describe an empty span.
    pub fn new(start: u64, stop: u64) -> Result<Self, ApiError> {
        if stop <= start {
            return Err(ApiError::Format(format!(
                "byte range {}..{} is empty",
                start, stop
            )));
        }
        Ok(Self {
            start,
            stop,
            total: None,
        })
    }

    /// The range covering a whole payload of `len` bytes.
    pub fn whole(len: u64) -> Result<Self, ApiError> {
        Ok(Self::new(0, len)?.with_total(len))
    }

    /// Sets the total resource length.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Renders the `Content-Range` header value.
    ///
    /// ```rust
    /// use gh_actions_client::api::common::ByteRange;
    ///
    /// let range = ByteRange::new(0, 5).unwrap();
    /// assert_eq!(range.header_value(), "bytes 0-4/*");
    /// assert_eq!(range.with_total(10).header_value(), "bytes 0-4/10");
    /// ```
    pub fn header_value(&self) -> String {
        let total = match self.total {
            Some(total) => total.to_string(),
            None => "*".to_string(),
        };
        format!("bytes {}-{}/{}", self.start, self.stop - 1, total)
    }
}

/// Description of one logical request, relative to whichever node sends it.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub(crate) body: Option<Body>,
    pub(crate) method: Option<String>,
    pub(crate) previews: Vec<String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) content_type: Option<String>,
    pub(crate) accept: Option<String>,
    pub(crate) byte_range: Option<ByteRange>,
}

impl Request {
    /// An empty request: GET with no body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for an explicit `GET`.
    pub fn get() -> Self {
        Self::new().method("GET")
    }

    /// Shorthand for an explicit `DELETE`.
    pub fn delete() -> Self {
        Self::new().method("DELETE")
    }

    /// Sets the HTTP method. Case does not matter.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets a structured JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(Body::Json(body));
        self
    }

    /// Sets a text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Text(body.into()));
        self
    }

    /// Sets a binary body.
    pub fn bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(Body::Bytes(body.into()));
        self
    }

    /// Enables an API preview feature.
    pub fn preview(mut self, feature: impl Into<String>) -> Self {
        self.previews.push(feature.into());
        self
    }

    /// Appends a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Overrides the `Content-Type` header.
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Overrides the `Accept` header. Takes precedence over previews.
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Attaches a `Content-Range` to a binary body.
    pub fn byte_range(mut self, range: ByteRange) -> Self {
        self.byte_range = Some(range);
        self
    }

    /// The previews requested so far.
    pub fn previews(&self) -> &[String] {
        &self.previews
    }

    /// Resolves the method: explicit ones are upper-cased, otherwise `GET`
    /// without a body and `POST` with one.
    pub(crate) fn resolved_method(&self) -> Result<Method, ApiError> {
        match &self.method {
            Some(name) => Method::from_bytes(name.to_uppercase().as_bytes())
                .map_err(|_| ApiError::Format(format!("invalid HTTP method: {}", name))),
            None if self.body.is_some() => Ok(Method::POST),
            None => Ok(Method::GET),
        }
    }

    /// Splits the request into what goes on the wire.
    pub(crate) fn into_payload(self, method: &Method) -> Result<Payload, ApiError> {
        let mut query = self.query;
        let mut content_range = None;

        let body = match self.body {
            None => None,
            Some(Body::Text(text)) => Some(text.into_bytes()),
            Some(Body::Bytes(bytes)) => {
                content_range = self.byte_range.map(|range| range.header_value());
                Some(bytes)
            }
            Some(Body::Json(value)) if *method == Method::GET => {
                merge_into_query(&mut query, value)?;
                None
            }
            Some(Body::Json(value)) => Some(serde_json::to_vec(&value)?),
        };

        Ok(Payload {
            query,
            body,
            content_range,
        })
    }
}

/// The wire-level parts of a prepared request.
#[derive(Debug, Clone)]
pub(crate) struct Payload {
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub content_range: Option<String>,
}

fn merge_into_query(query: &mut Vec<(String, String)>, value: Value) -> Result<(), ApiError> {
    let Value::Object(map) = value else {
        return Err(ApiError::Format(
            "a GET body must be a JSON object to become query parameters".to_string(),
        ));
    };

    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::String(s) => query.push((key, s)),
            other => query.push((key, other.to_string())),
        }
    }
    Ok(())
}

/// A successful response, fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Response status (always 2xx)
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Parses the body as JSON, treating an empty body as `null`.
    pub fn json_or_null(&self) -> Result<Value, ApiError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        self.json()
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The raw body bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Whether the `Link` header advertises another page.
    pub fn has_next_page(&self) -> bool {
        has_next_page(&self.headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_method_depends_on_body() {
        assert_eq!(Request::new().resolved_method().unwrap(), Method::GET);
        assert_eq!(
            Request::new().json(json!({})).resolved_method().unwrap(),
            Method::POST
        );
        assert_eq!(
            Request::new().method("patch").resolved_method().unwrap(),
            Method::PATCH
        );
    }

    #[test]
    fn test_invalid_method_is_format_error() {
        let err = Request::new().method("GE T").resolved_method().unwrap_err();
        assert!(matches!(err, ApiError::Format(_)));
    }

    #[test]
    fn test_get_json_body_becomes_query() {
        let payload = Request::new()
            .query("a", 1)
            .json(json!({"state": "open", "per": 3, "skip": null}))
            .into_payload(&Method::GET)
            .unwrap();

        assert!(payload.body.is_none());
        assert_eq!(
            payload.query,
            vec![
                ("a".to_string(), "1".to_string()),
                ("per".to_string(), "3".to_string()),
                ("state".to_string(), "open".to_string()),
            ]
        );
    }

    #[test]
    fn test_get_non_object_body_rejected() {
        let err = Request::new()
            .json(json!([1, 2]))
            .into_payload(&Method::GET)
            .unwrap_err();
        assert!(matches!(err, ApiError::Format(_)));
    }

    #[test]
    fn test_post_json_body_serialised() {
        let payload = Request::new()
            .json(json!({"body": "hi"}))
            .into_payload(&Method::POST)
            .unwrap();
        assert_eq!(payload.body.unwrap(), br#"{"body":"hi"}"#.to_vec());
    }

    #[test]
    fn test_byte_range_only_applies_to_bytes() {
        let range = ByteRange::new(0, 5).unwrap().with_total(10);

        let payload = Request::new()
            .bytes(b"hello".to_vec())
            .byte_range(range)
            .into_payload(&Method::PUT)
            .unwrap();
        assert_eq!(payload.content_range.as_deref(), Some("bytes 0-4/10"));

        let payload = Request::new()
            .text("hello")
            .byte_range(range)
            .into_payload(&Method::PUT)
            .unwrap();
        assert!(payload.content_range.is_none());
        assert_eq!(payload.body.unwrap(), b"hello".to_vec());
    }

    #[test]
    fn test_empty_byte_range_rejected() {
        assert!(ByteRange::new(3, 3).is_err());
        assert!(ByteRange::whole(0).is_err());
        assert_eq!(ByteRange::whole(5).unwrap().header_value(), "bytes 0-4/5");
    }
}
