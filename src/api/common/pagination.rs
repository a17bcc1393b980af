//
//  gh-actions-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for REST API Responses
//!
//! The REST API paginates list endpoints with `page` and `per_page` query
//! parameters and advertises further pages through the `Link` response header.
//! This module provides the pieces the dispatcher uses to walk such endpoints:
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`PageRange`] | The caller's description of which pages to visit |
//! | [`PageCursor`] | Lazy page-number sequence derived from a range |
//! | [`has_next_page`] | Reads the `rel="next"` entry of a `Link` header |
//! | [`collect_items`] | Flattens a page sequence of JSON arrays |
//!
//! # Page Ranges
//!
//! A range mirrors a half-open `(start, stop, step)` slice:
//!
//! - `start` defaults to `1`
//! - `step` defaults to `+1` when `stop` is absent or `stop >= start`, `-1` otherwise
//! - `stop` is exclusive; without it the sequence is unbounded and ends only
//!   when the server stops advertising a next page
//!
//! # Example
//!
//! ```rust
//! use gh_actions_client::api::common::PageRange;
//!
//! let pages: Vec<i64> = PageRange::bounded(1, 4).cursor().unwrap().collect();
//! assert_eq!(pages, vec![1, 2, 3]);
//!
//! let first: Vec<i64> = PageRange::all().cursor().unwrap().take(3).collect();
//! assert_eq!(first, vec![1, 2, 3]);
//! ```

use std::ops::{Range, RangeFrom};

use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;

use super::{ApiError, RawResponse};

/// Fixed page size requested on every paginated call.
pub const PER_PAGE: u32 = 100;

/// Page number the API starts counting from.
pub const FIRST_PAGE: i64 = 1;

/// A description of the pages to visit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRange {
    /// First page, defaults to [`FIRST_PAGE`]
    pub start: Option<i64>,
    /// Exclusive upper (or lower, when descending) bound
    pub stop: Option<i64>,
    /// Increment between pages
    pub step: Option<i64>,
}

impl PageRange {
    /// Every page from the first until the server runs out.
    pub fn all() -> Self {
        Self::default()
    }

    /// Pages `start..stop`.
    pub fn bounded(start: i64, stop: i64) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step: None,
        }
    }

    /// Sets an explicit step.
    pub fn with_step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }

    /// Builds the lazy page-number sequence for this range.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Format`] for a zero step.
    pub fn cursor(&self) -> Result<PageCursor, ApiError> {
        let start = self.start.unwrap_or(FIRST_PAGE);
        let ascending = match self.stop {
            Some(stop) => start <= stop,
            None => true,
        };
        let step = match self.step {
            Some(0) => return Err(ApiError::Format("page step must not be zero".to_string())),
            Some(step) => step,
            None if ascending => 1,
            None => -1,
        };

        Ok(PageCursor {
            next: Some(start),
            stop: self.stop,
            step,
        })
    }
}

impl From<Range<i64>> for PageRange {
    fn from(range: Range<i64>) -> Self {
        Self::bounded(range.start, range.end)
    }
}

impl From<RangeFrom<i64>> for PageRange {
    fn from(range: RangeFrom<i64>) -> Self {
        Self {
            start: Some(range.start),
            stop: None,
            step: None,
        }
    }
}

/// Lazy sequence of page numbers.
///
/// Behaves like a half-open numeric range with a step. An explicit step whose
/// sign points away from `stop` yields nothing.
#[derive(Debug, Clone)]
pub struct PageCursor {
    next: Option<i64>,
    stop: Option<i64>,
    step: i64,
}

impl Iterator for PageCursor {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let current = self.next?;
        if let Some(stop) = self.stop {
            let exhausted = if self.step > 0 {
                current >= stop
            } else {
                current <= stop
            };
            if exhausted {
                self.next = None;
                return None;
            }
        }
        self.next = current.checked_add(self.step);
        Some(current)
    }
}

/// Returns `true` when the `Link` header advertises a `rel="next"` page.
pub fn has_next_page(headers: &HeaderMap) -> bool {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| parse_link_header::parse(value).ok())
        .any(|links| links.contains_key(&Some("next".to_string())))
}

/// Drains a page sequence whose bodies are JSON arrays into one vector.
///
/// Stops at the first failed page and returns its error.
pub fn collect_items<T, I>(pages: I) -> Result<Vec<T>, ApiError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = Result<RawResponse, ApiError>>,
{
    let mut items = Vec::new();
    for page in pages {
        let mut chunk: Vec<T> = page?.json()?;
        items.append(&mut chunk);
    }
    Ok(items)
}
