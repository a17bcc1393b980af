//
//  gh-actions-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials for the public API and the internal runner services.
//!
//! Every root authenticates with a bearer token. The token comes from one of
//! three places, in order:
//!
//! 1. An explicit token passed by the caller
//! 2. The runner environment (`GITHUB_TOKEN`/`INPUT_GITHUB_TOKEN` for the
//!    public API, `ACTIONS_RUNTIME_TOKEN` for the internal services)
//! 3. Nothing: the public API falls back to anonymous access, the internal
//!    services fail with a configuration error
//!
//! Acquiring tokens (OAuth flows, app installations) is out of scope.
//!
//! ## Example
//!
//! ```rust
//! use gh_actions_client::auth::{public_credential, AuthCredential};
//! use gh_actions_client::config::RunnerEnv;
//!
//! let env = RunnerEnv::from_vars([("GITHUB_TOKEN", "ghs_example")]);
//! let credential = public_credential(None, &env).unwrap();
//! assert_eq!(credential.header_value().as_deref(), Some("Bearer ghs_example"));
//! ```

use crate::api::common::{ApiError, ApiResult};
use crate::config::RunnerEnv;

/// Authentication attached to every request of a root.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum AuthCredential {
    /// `Authorization: Bearer <token>`
    Bearer {
        /// The token string.
        token: String,
    },
    /// No `Authorization` header.
    #[default]
    Anonymous,
}

impl AuthCredential {
    /// Creates a bearer credential.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// The `Authorization` header value, `None` when anonymous.
    pub fn header_value(&self) -> Option<String> {
        match self {
            Self::Bearer { token } => Some(format!("Bearer {}", token)),
            Self::Anonymous => None,
        }
    }

    /// Returns `true` if a token is present.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Bearer { .. })
    }
}

impl std::fmt::Debug for AuthCredential {
    // Tokens never end up in logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer { .. } => f.write_str("Bearer(***)"),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Checks that a token can be sent in a header.
///
/// # Errors
///
/// Returns [`ApiError::Format`] for an empty token or one containing
/// whitespace or control characters.
pub fn validate_token(token: &str) -> ApiResult<()> {
    if token.is_empty() {
        return Err(ApiError::Format("token must not be empty".to_string()));
    }
    if token
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(ApiError::Format(
            "token must not contain whitespace".to_string(),
        ));
    }
    Ok(())
}

/// Resolves the credential for the public API.
///
/// An explicit token wins, then the environment. Without either the
/// credential is anonymous.
pub fn public_credential(explicit: Option<&str>, env: &RunnerEnv) -> ApiResult<AuthCredential> {
    match explicit.or_else(|| env.public_token()) {
        Some(token) => {
            validate_token(token)?;
            Ok(AuthCredential::bearer(token))
        }
        None => Ok(AuthCredential::Anonymous),
    }
}

/// Resolves the credential for an internal runner service.
///
/// # Errors
///
/// Returns [`ApiError::Configuration`] when no token is given and
/// `ACTIONS_RUNTIME_TOKEN` is not set.
pub fn runtime_credential(explicit: Option<&str>, env: &RunnerEnv) -> ApiResult<AuthCredential> {
    let token = match explicit {
        Some(token) => token,
        None => env.runtime_token()?,
    };
    validate_token(token)?;
    Ok(AuthCredential::bearer(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_token() {
        assert!(validate_token("ghp_abc123").is_ok());
        assert!(validate_token("").is_err());
        assert!(validate_token("abc def").is_err());
        assert!(validate_token("abc\n").is_err());
    }

    #[test]
    fn test_explicit_token_wins() {
        let env = RunnerEnv::from_vars([("GITHUB_TOKEN", "from-env")]);
        let credential = public_credential(Some("explicit"), &env).unwrap();
        assert_eq!(credential, AuthCredential::bearer("explicit"));
    }

    #[test]
    fn test_public_without_token_is_anonymous() {
        let credential = public_credential(None, &RunnerEnv::default()).unwrap();
        assert_eq!(credential, AuthCredential::Anonymous);
        assert!(credential.header_value().is_none());
    }

    #[test]
    fn test_runtime_requires_token() {
        let err = runtime_credential(None, &RunnerEnv::default()).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));

        let env = RunnerEnv::from_vars([("ACTIONS_RUNTIME_TOKEN", "rt")]);
        assert!(runtime_credential(None, &env).unwrap().is_authenticated());
    }

    #[test]
    fn test_debug_hides_token() {
        let credential = AuthCredential::bearer("secret");
        assert_eq!(format!("{:?}", credential), "Bearer(***)");
    }
}
