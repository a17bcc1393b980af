//
//  gh-actions-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the REST, GraphQL and runner-service roots
//!
//! This module provides the shared vocabulary used by every root and resource
//! node: the error taxonomy, the request description, media types, page ranges
//! and the opaque node identifier codec.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`Request`], [`Body`], [`ByteRange`] - Description of one logical request
//! - [`MediaType`] - The `application/vnd.github.*` content-negotiation taxonomy
//! - [`PageRange`], [`PageCursor`] - Page-number sequences driving pagination
//! - [`encode_node_id`], [`decode_node_id`] - Database id ⇄ node id conversion
//!
//! # Example
//!
//! ```rust
//! use gh_actions_client::api::common::{decode_node_id, ApiError};
//!
//! fn describe(node_id: &str) -> String {
//!     match decode_node_id(node_id) {
//!         Ok((id, kind)) => format!("{} #{}", kind, id),
//!         Err(ApiError::Format(reason)) => format!("not a node id: {}", reason),
//!         Err(e) => format!("error: {}", e),
//!     }
//! }
//!
//! assert_eq!(describe("MDQ6VXNlcjU4MzIzMQ=="), "User #583231");
//! ```

use reqwest::StatusCode;
use thiserror::Error;

mod media;
mod node_id;
mod pagination;
mod request;

pub use media::*;
pub use node_id::*;
pub use pagination::*;
pub use request::*;

/// Unified error type for all API operations.
///
/// The client performs no local recovery: every failure is surfaced to the
/// immediate caller as one of these variants.
///
/// # Variants
///
/// | Variant | Description |
/// |---------|-------------|
/// | `Transport` | Connection, TLS or body-read failure, never retried |
/// | `Http` | Non-2xx response, carries status and body |
/// | `Format` | Malformed identifier, forbidden preview, bad range or header |
/// | `TypeMismatch` | Node id decoded to a different resource type |
/// | `Configuration` | Required environment value absent or unparsable |
/// | `Decode` | Response body is not the expected JSON |
/// | `Unsupported` | Operation not available for this resource kind |
/// | `Io` | Local file access failed |
#[derive(Error, Debug)]
pub enum ApiError {
    /// A network-level error occurred during the request.
    ///
    /// Covers connection failures, DNS resolution errors, TLS problems and
    /// failures while reading a response body.
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a 4xx/5xx status.
    ///
    /// `message` is the human readable part of the body when the server sent
    /// a JSON error document, otherwise the raw body.
    #[error("API error ({status}): {message}")]
    Http {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        body: String,
        /// Extracted error message
        message: String,
    },

    /// Malformed input or a request the root cannot express.
    #[error("Invalid format: {0}")]
    Format(String),

    /// A decoded node id belongs to another resource type.
    #[error("Node id belongs to {found}, expected {expected}")]
    TypeMismatch {
        /// Type name the caller asked for
        expected: String,
        /// Type name found in the identifier
        found: String,
    },

    /// A value that must come from the runner environment is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A response body could not be decoded.
    #[error("Unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The operation has no meaning for this resource kind.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Local I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Builds an [`ApiError::Http`] from a failed response.
    ///
    /// GitHub returns errors as `{"message": "...", "documentation_url": "..."}`;
    /// the runner services use `{"$id": "1", "message": "...", "typeName": ...}`.
    /// Both carry a top-level `message`, which becomes the display text. When
    /// the body is not JSON the raw body is used instead.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|json| {
                json.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.clone());

        Self::Http {
            status,
            body,
            message,
        }
    }

    /// Returns the HTTP status for [`ApiError::Http`], `None` otherwise.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience alias used across the library.
pub type ApiResult<T> = Result<T, ApiError>;
