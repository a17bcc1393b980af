//
//  gh-actions-client
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Utility Module
//!
//! Formatting helpers for CLI output.
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use gh_actions_client::util::{format_duration, format_size};
//!
//! assert_eq!(format_size(1536), "1.5 KB");
//! assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
//! ```

use std::time::Duration;

/// Formats a duration into a compact string using the two largest units.
///
/// Sub-second precision is dropped.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use gh_actions_client::util::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(3665)), "1h 1m");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Formats a byte count with binary units (`B`, `KB`, `MB`, `GB`).
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
