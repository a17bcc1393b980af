//
//  gh-actions-client
//  api/common/node_id.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Conversion between numeric database ids and opaque node ids.
//!
//! Every resource has two identities: the numeric database id used by the
//! REST API and the opaque global node id used by GraphQL. A node id is the
//! base64 encoding of
//!
//! ```text
//! "0" + <decimal length of type name> + ":" + <type name> + <decimal database id>
//! ```
//!
//! so user `583231` becomes `04:User583231`, i.e. `MDQ6VXNlcjU4MzIzMQ==`.
//! The text format is externally visible and must stay byte-stable.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::ApiError;

/// Encodes a `(database_id, type_name)` pair as an opaque node id.
///
/// # Errors
///
/// Returns [`ApiError::Format`] when `type_name` is empty or contains `:`.
///
/// # Example
///
/// ```rust
/// use gh_actions_client::api::common::encode_node_id;
///
/// assert_eq!(encode_node_id(583231, "User").unwrap(), "MDQ6VXNlcjU4MzIzMQ==");
/// ```
pub fn encode_node_id(database_id: u64, type_name: &str) -> Result<String, ApiError> {
    if type_name.is_empty() {
        return Err(ApiError::Format("type name must not be empty".to_string()));
    }
    if type_name.contains(':') {
        return Err(ApiError::Format(format!(
            "type name must not contain ':': {}",
            type_name
        )));
    }

    let interior = format!("0{}:{}{}", type_name.len(), type_name, database_id);
    Ok(STANDARD.encode(interior.as_bytes()))
}

/// Decodes an opaque node id into its `(database_id, type_name)` pair.
///
/// # Errors
///
/// Returns [`ApiError::Format`] when:
/// - the text is not valid base64 or not ASCII
/// - the interior does not contain exactly one `:`
/// - the length prefix does not start with `0`
/// - the declared type length is not a positive integer or exceeds the remainder
/// - the trailing database id is not a decimal number
pub fn decode_node_id(node_id: &str) -> Result<(u64, String), ApiError> {
    let raw = STANDARD
        .decode(node_id.trim())
        .map_err(|e| ApiError::Format(format!("node id is not base64: {}", e)))?;
    if !raw.is_ascii() {
        return Err(ApiError::Format("node id is not ASCII".to_string()));
    }
    // ASCII was checked above, so this cannot fail
    let interior = String::from_utf8(raw)
        .map_err(|e| ApiError::Format(format!("node id is not ASCII: {}", e)))?;

    let mut parts = interior.split(':');
    let (length_part, rest) = match (parts.next(), parts.next(), parts.next()) {
        (Some(length_part), Some(rest), None) => (length_part, rest),
        _ => {
            return Err(ApiError::Format(format!(
                "node id must contain exactly one ':': {}",
                interior
            )))
        }
    };

    let digits = length_part
        .strip_prefix('0')
        .ok_or_else(|| ApiError::Format("node id must start from 0".to_string()))?;
    let type_len: usize = digits
        .parse()
        .map_err(|_| ApiError::Format(format!("invalid type length: {:?}", digits)))?;
    if type_len == 0 {
        return Err(ApiError::Format("type length must be natural".to_string()));
    }
    if type_len > rest.len() {
        return Err(ApiError::Format(format!(
            "type length {} exceeds remaining {} characters",
            type_len,
            rest.len()
        )));
    }

    let (type_name, id_part) = rest.split_at(type_len);
    let database_id: u64 = id_part
        .parse()
        .map_err(|_| ApiError::Format(format!("invalid database id: {:?}", id_part)))?;

    Ok((database_id, type_name.to_string()))
}

/// Decodes a node id and checks that it belongs to `expected_type`.
///
/// # Errors
///
/// Returns [`ApiError::TypeMismatch`] when the decoded type differs, or any
/// error [`decode_node_id`] returns.
pub fn decode_node_id_as(node_id: &str, expected_type: &str) -> Result<u64, ApiError> {
    let (database_id, type_name) = decode_node_id(node_id)?;
    if type_name != expected_type {
        return Err(ApiError::TypeMismatch {
            expected: expected_type.to_string(),
            found: type_name,
        });
    }
    Ok(database_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids() {
        assert_eq!(encode_node_id(583231, "User").unwrap(), "MDQ6VXNlcjU4MzIzMQ==");
        assert_eq!(
            decode_node_id("MDQ6VXNlcjU4MzIzMQ==").unwrap(),
            (583231, "User".to_string())
        );
        assert_eq!(
            decode_node_id("MDEyOk9yZ2FuaXphdGlvbjE=").unwrap(),
            (1, "Organization".to_string())
        );
    }

    #[test]
    fn test_round_trip_single_digit_lengths() {
        let names = [
            "A", "Ab", "Bot", "User", "Issue", "Commit", "Release", "Workflow", "Container",
        ];
        for (i, name) in names.iter().enumerate() {
            assert_eq!(name.len(), i + 1);
            for id in [0u64, 7, 1_234_567, u64::MAX] {
                let encoded = encode_node_id(id, name).unwrap();
                assert_eq!(decode_node_id(&encoded).unwrap(), (id, name.to_string()));
            }
        }
    }

    #[test]
    fn test_rejects_missing_zero_prefix() {
        let encoded = STANDARD.encode("14:User42");
        assert!(matches!(decode_node_id(&encoded), Err(ApiError::Format(_))));

        let encoded = STANDARD.encode(":User42");
        assert!(matches!(decode_node_id(&encoded), Err(ApiError::Format(_))));
    }

    #[test]
    fn test_rejects_bad_lengths_and_ids() {
        for interior in ["00:User42", "0:User42", "0x:User42", "09:User42", "04:User", "04:Userabc"] {
            let encoded = STANDARD.encode(interior);
            assert!(
                matches!(decode_node_id(&encoded), Err(ApiError::Format(_))),
                "{interior} should be rejected"
            );
        }
        assert!(matches!(decode_node_id("not base64!"), Err(ApiError::Format(_))));
    }

    #[test]
    fn test_encode_validates_type_name() {
        assert!(matches!(encode_node_id(1, ""), Err(ApiError::Format(_))));
        assert!(matches!(encode_node_id(1, "a:b"), Err(ApiError::Format(_))));
    }

    #[test]
    fn test_decode_as_checks_type() {
        let encoded = encode_node_id(7, "Issue").unwrap();
        assert_eq!(decode_node_id_as(&encoded, "Issue").unwrap(), 7);
        match decode_node_id_as(&encoded, "Repository") {
            Err(ApiError::TypeMismatch { expected, found }) => {
                assert_eq!(expected, "Repository");
                assert_eq!(found, "Issue");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
