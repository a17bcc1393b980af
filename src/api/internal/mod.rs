//
//  gh-actions-client
//  api/internal/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Undocumented services reachable from inside a workflow run.
//!
//! Both authenticate with `ACTIONS_RUNTIME_TOKEN` and sit under
//! `https://<service>.actions.githubusercontent.com/<run instance>/_apis/`,
//! or under the run-specific URL the runner exports. They do not accept
//! preview media types and do not serve GraphQL.

pub mod cache;
pub mod pipelines;

pub use cache::*;
pub use pipelines::*;
