//
//  gh-actions-client
//  api/common/media.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! GitHub media types used for content negotiation.
//!
//! See <https://docs.github.com/en/rest/overview/media-types>.

use std::fmt;
use std::str::FromStr;

use super::ApiError;

/// Vendor prefix shared by every custom media type.
pub const GITHUB_MEDIA_PREFIX: &str = "application/vnd.github";

/// Builds the media type that enables an API preview feature.
///
/// ```rust
/// use gh_actions_client::api::common::preview_media_type;
///
/// assert_eq!(preview_media_type("starfox"), "application/vnd.github.starfox-preview");
/// ```
pub fn preview_media_type(feature: &str) -> String {
    format!("{}.{}-preview", GITHUB_MEDIA_PREFIX, feature)
}

/// The content-negotiation taxonomy of the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// `application/vnd.github+json`
    Json,
    /// `application/vnd.github.raw+json`
    Raw,
    /// `application/vnd.github.raw`
    RawBase64,
    /// `application/vnd.github.base64`
    Base64,
    /// `application/vnd.github.text+json`
    Text,
    /// `application/vnd.github.html+json`
    Html,
    /// `application/vnd.github.full+json`
    Full,
    /// `application/vnd.github.diff`
    Diff,
    /// `application/vnd.github.patch`
    Patch,
    /// `application/vnd.github.sha`
    Sha,
}

impl MediaType {
    /// All media types, in declaration order.
    pub const ALL: [MediaType; 10] = [
        MediaType::Json,
        MediaType::Raw,
        MediaType::RawBase64,
        MediaType::Base64,
        MediaType::Text,
        MediaType::Html,
        MediaType::Full,
        MediaType::Diff,
        MediaType::Patch,
        MediaType::Sha,
    ];

    /// Returns the full media type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/vnd.github+json",
            Self::Raw => "application/vnd.github.raw+json",
            Self::RawBase64 => "application/vnd.github.raw",
            Self::Base64 => "application/vnd.github.base64",
            Self::Text => "application/vnd.github.text+json",
            Self::Html => "application/vnd.github.html+json",
            Self::Full => "application/vnd.github.full+json",
            Self::Diff => "application/vnd.github.diff",
            Self::Patch => "application/vnd.github.patch",
            Self::Sha => "application/vnd.github.sha",
        }
    }

    /// Short name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Raw => "raw",
            Self::RawBase64 => "raw-base64",
            Self::Base64 => "base64",
            Self::Text => "text",
            Self::Html => "html",
            Self::Full => "full",
            Self::Diff => "diff",
            Self::Patch => "patch",
            Self::Sha => "sha",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<MediaType> for String {
    fn from(media: MediaType) -> Self {
        media.as_str().to_string()
    }
}

impl FromStr for MediaType {
    type Err = ApiError;

    /// Accepts either the short name (`raw`) or the full media type string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s || m.as_str() == s)
            .ok_or_else(|| ApiError::Format(format!("unknown media type: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_full_names() {
        assert_eq!("raw".parse::<MediaType>().unwrap(), MediaType::Raw);
        assert_eq!(
            "application/vnd.github.raw".parse::<MediaType>().unwrap(),
            MediaType::RawBase64
        );
        assert!("yaml".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_preview_media_type() {
        assert_eq!(
            preview_media_type("foo"),
            "application/vnd.github.foo-preview"
        );
    }
}
