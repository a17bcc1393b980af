//
//  gh-actions-client
//  api/public/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Users, organizations and their keys.
//!
//! Both account kinds own repositories. Listings are fetched page by page
//! and cached on the node; pass `fresh = true` to refetch.

use serde::Deserialize;
use serde_json::Value;

use super::actions::Actions;
use super::repositories::Repository;
use crate::api::client::ApiClient;
use crate::api::common::ApiResult;
use crate::api::node::{resource_view, ApiNode, ResourceKind};

resource_view!(
    /// `users/<name>/`
    User
);

resource_view!(
    /// `orgs/<name>/`
    Organization
);

resource_view!(
    /// SSH and GPG keys of a user.
    Keys
);

/// The subset of a listed repository needed to address it.
#[derive(Debug, Deserialize)]
struct RepositoryEntry {
    id: u64,
    name: String,
    owner: AccountEntry,
}

/// The subset of a listed account needed to address it.
#[derive(Debug, Deserialize)]
struct AccountEntry {
    login: String,
}

fn repositories_from_listing(root: &ApiClient, items: Vec<Value>) -> ApiResult<Vec<Repository<'_>>> {
    items
        .into_iter()
        .map(|item| {
            let entry: RepositoryEntry = serde_json::from_value(item.clone())?;
            Ok(Repository::attached(root, &entry.owner.login, &entry.name)
                .seeded(Some(entry.id), Some(item)))
        })
        .collect()
}

fn account_node<'a>(root: &'a ApiClient, kind: ResourceKind, item: Value, seed_info: bool) -> ApiNode<'a> {
    let id = item.get("id").and_then(Value::as_u64);
    let node = ApiNode::new(root, kind).with_database_id(id);
    if seed_info {
        node.with_info(Some(item))
    } else {
        node
    }
}

fn entry_login(item: &Value) -> ApiResult<String> {
    let entry: AccountEntry = serde_json::from_value(item.clone())?;
    Ok(entry.login)
}

impl<'a> User<'a> {
    /// The user's login.
    pub fn login(&self) -> &str {
        self.kind().login().unwrap_or_default()
    }

    /// Every repository of the user, cached after the first call.
    pub fn repos(&self, fresh: bool) -> ApiResult<Vec<Repository<'a>>> {
        repositories_from_listing(self.root(), self.cached_listing("repos", fresh)?)
    }

    /// A repository owned by this user. No request is made.
    pub fn repo(&self, name: &str) -> Repository<'a> {
        Repository::attached(self.root(), self.login(), name)
    }

    /// Every organization the user belongs to, cached after the first call.
    pub fn orgs(&self, fresh: bool) -> ApiResult<Vec<Organization<'a>>> {
        self.cached_listing("orgs", fresh)?
            .into_iter()
            .map(|item| {
                let name = entry_login(&item)?;
                Ok(Organization(account_node(
                    self.root(),
                    ResourceKind::Organization { name },
                    item,
                    true,
                )))
            })
            .collect()
    }

    /// The user's public keys.
    pub fn keys(&self) -> Keys<'_> {
        Keys(self.child(ResourceKind::Keys))
    }
}

impl<'a> Organization<'a> {
    /// The organization's login.
    pub fn login(&self) -> &str {
        self.kind().login().unwrap_or_default()
    }

    /// Every repository of the organization, cached after the first call.
    pub fn repos(&self, fresh: bool) -> ApiResult<Vec<Repository<'a>>> {
        repositories_from_listing(self.root(), self.cached_listing("repos", fresh)?)
    }

    /// A repository owned by this organization. No request is made.
    pub fn repo(&self, name: &str) -> Repository<'a> {
        Repository::attached(self.root(), self.login(), name)
    }

    /// Every member, cached after the first call.
    ///
    /// Member entries are abbreviated, so only the id is seeded; the full
    /// profile is fetched on demand.
    pub fn members(&self, fresh: bool) -> ApiResult<Vec<User<'a>>> {
        self.cached_listing("members", fresh)?
            .into_iter()
            .map(|item| {
                let name = entry_login(&item)?;
                Ok(User(account_node(
                    self.root(),
                    ResourceKind::User { name },
                    item,
                    false,
                )))
            })
            .collect()
    }

    /// Organization-level Actions settings and secrets.
    pub fn actions(&self) -> Actions<'_> {
        Actions(self.child(ResourceKind::Actions))
    }
}

/// Public key listings served from the web front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    /// `https://github.com/<user>.keys`
    Ssh,
    /// `https://github.com/<user>.gpg`
    Gpg,
}

impl KeyFormat {
    fn extension(&self) -> &'static str {
        match self {
            Self::Ssh => "keys",
            Self::Gpg => "gpg",
        }
    }
}

impl Keys<'_> {
    fn owner_login(&self) -> &str {
        self.parent()
            .and_then(|parent| parent.kind().login())
            .unwrap_or_default()
    }

    /// GPG keys, all pages.
    pub fn gpg_keys(&self) -> ApiResult<Vec<Value>> {
        self.list_all("gpg_keys")
    }

    /// SSH authentication keys, all pages.
    pub fn ssh_keys(&self) -> ApiResult<Vec<Value>> {
        self.list_all("keys")
    }

    /// SSH signing keys, all pages.
    pub fn ssh_signing_keys(&self) -> ApiResult<Vec<Value>> {
        self.list_all("ssh_signing_keys")
    }

    /// The unauthenticated, unpaginated key listing on the web front-end.
    pub fn keys_url(&self, format: KeyFormat) -> String {
        format!(
            "{}/{}.{}",
            self.root().env().server_url(),
            self.owner_login(),
            format.extension()
        )
    }
}
