//
//  gh-actions-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Dispatcher
//!
//! [`ApiClient`] is the root every resource node delegates to. It owns the
//! transport, the base URL, the session headers and the runner environment,
//! and turns a relative path plus a [`Request`] into one HTTP call.
//!
//! ## Request shapes
//!
//! - [`ApiClient::request`]: one call, one [`RawResponse`]
//! - [`ApiClient::request_pages`]: a lazy [`Pages`] iterator over `page=N`
//! - [`ApiClient::graphql`]: a POST to `<base>graphql`, parsed as JSON
//!
//! ## Header composition
//!
//! 1. Session headers: `Authorization`, `Content-Type: application/json`,
//!    the root's default `Accept`, and `User-Agent` when configured
//! 2. Previews replace `Accept` with `", application/vnd.github.<p>-preview, ..."`
//! 3. An explicit content type replaces `Content-Type`
//! 4. An explicit accept replaces `Accept`, winning over previews
//!
//! Internal roots reject previews and negotiate the service API version
//! through `Accept: application/json;api-version=6.0-preview`.
//!
//! ## Errors
//!
//! Any 4xx/5xx becomes [`ApiError::Http`] at once. Nothing is retried and no
//! timeout is applied unless the caller supplies its own transport.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE,
    USER_AGENT,
};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use super::common::{
    preview_media_type, ApiError, ApiResult, MediaType, PageCursor, PageRange, Payload,
    RawResponse, Request, PER_PAGE,
};
use crate::auth::{public_credential, runtime_credential, AuthCredential};
use crate::config::{
    internal_service_url, normalize_base_url, runtime_service_url, InternalService, RunnerEnv,
};

/// API version negotiated with the internal services.
pub const INTERNAL_API_VERSION: &str = "6.0-preview";

/// Which family of endpoints a root talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    /// The documented REST/GraphQL API
    Public,
    /// One of the undocumented runner services
    Internal(InternalService),
}

/// The request dispatcher at the root of every node tree.
///
/// Immutable once built and shared read-only by all nodes.
///
/// # Example
///
/// ```rust,no_run
/// use gh_actions_client::api::ApiClient;
/// use gh_actions_client::api::common::Request;
/// use gh_actions_client::auth::AuthCredential;
///
/// let client = ApiClient::new("https://api.github.com")?
///     .with_auth(AuthCredential::bearer("ghp_example"));
/// let response = client.request("rate_limit", Request::new())?;
/// println!("{}", response.text());
/// # Ok::<(), gh_actions_client::api::common::ApiError>(())
/// ```
pub struct ApiClient {
    http: Client,
    base_url: String,
    auth: AuthCredential,
    user_agent: Option<String>,
    default_accept: String,
    flavor: Flavor,
    env: RunnerEnv,
}

fn default_transport() -> ApiResult<Client> {
    Ok(Client::builder()
        .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
        .timeout(None::<Duration>)
        .build()?)
}

impl ApiClient {
    /// Creates an anonymous public client for an explicit base URL.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Ok(Self {
            http: default_transport()?,
            base_url: normalize_base_url(base_url),
            auth: AuthCredential::Anonymous,
            user_agent: None,
            default_accept: MediaType::Raw.as_str().to_string(),
            flavor: Flavor::Public,
            env: RunnerEnv::default(),
        })
    }

    /// Creates a public client from a runner environment.
    ///
    /// The base URL comes from `GITHUB_API_URL` (default
    /// `https://api.github.com/`). The token is `token`, then
    /// `GITHUB_TOKEN`, then `INPUT_GITHUB_TOKEN`, otherwise anonymous.
    pub fn github(token: Option<&str>, env: RunnerEnv) -> ApiResult<Self> {
        let auth = public_credential(token, &env)?;
        let mut client = Self::new(&env.api_url())?.with_auth(auth);
        client.env = env;
        Ok(client)
    }

    /// Shorthand for [`ApiClient::github`] over the process environment.
    pub fn from_env(token: Option<&str>) -> ApiResult<Self> {
        Self::github(token, RunnerEnv::from_process())
    }

    /// Creates a client for one of the internal runner services.
    ///
    /// Without `run_instance_id` the base URL is the service's run-specific
    /// URL from the environment plus `_apis/`. With it, the base is
    /// `https://<subdomain>.actions.githubusercontent.com/<id>/_apis/`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Configuration`] when the URL or the token is missing.
    pub fn internal(
        service: InternalService,
        token: Option<&str>,
        run_instance_id: Option<&str>,
        env: RunnerEnv,
    ) -> ApiResult<Self> {
        let auth = runtime_credential(token, &env)?;
        let base_url = match run_instance_id {
            Some(id) => internal_service_url(service.subdomain(), id),
            None => runtime_service_url(env.service_url(service)?),
        };

        Ok(Self {
            http: default_transport()?,
            base_url,
            auth,
            user_agent: None,
            default_accept: format!("application/json;api-version={}", INTERNAL_API_VERSION),
            flavor: Flavor::Internal(service),
            env,
        })
    }

    /// Sets the credential.
    pub fn with_auth(mut self, auth: AuthCredential) -> Self {
        self.auth = auth;
        self
    }

    /// Sends an explicit `User-Agent` with every request.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replaces the transport, e.g. to add a timeout or a proxy.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Replaces the runner environment.
    pub fn with_env(mut self, env: RunnerEnv) -> Self {
        self.env = env;
        self
    }

    /// The base URL, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The runner environment captured at construction.
    pub fn env(&self) -> &RunnerEnv {
        &self.env
    }

    /// The endpoint family this root talks to.
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Returns `true` for the internal runner services.
    pub fn is_internal(&self) -> bool {
        matches!(self.flavor, Flavor::Internal(_))
    }

    /// Resolves a relative path against the base URL, dropping one trailing `/`.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.strip_suffix('/').unwrap_or(path);
        format!("{}{}", self.base_url, path)
    }

    /// Composes the headers of one request.
    ///
    /// # Errors
    ///
    /// [`ApiError::Format`] when previews are given to an internal root or
    /// a header value is not representable.
    pub fn compose_headers(
        &self,
        previews: &[String],
        content_type: Option<&str>,
        accept: Option<&str>,
    ) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(value) = self.auth.header_value() {
            let mut value = header_value(&value)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, header_value(&self.default_accept)?);
        if let Some(user_agent) = &self.user_agent {
            headers.insert(USER_AGENT, header_value(user_agent)?);
        }

        if !previews.is_empty() {
            if let Flavor::Internal(service) = self.flavor {
                return Err(ApiError::Format(format!(
                    "previews are not allowed on the {} service",
                    service
                )));
            }
            let joined = previews
                .iter()
                .map(|p| preview_media_type(p))
                .collect::<Vec<_>>()
                .join(", ");
            headers.insert(ACCEPT, header_value(&format!(", {}", joined))?);
        }

        if let Some(content_type) = content_type {
            headers.insert(CONTENT_TYPE, header_value(content_type)?);
        }
        if let Some(accept) = accept {
            headers.insert(ACCEPT, header_value(accept)?);
        }

        Ok(headers)
    }

    fn prepare(&self, path: &str, request: Request) -> ApiResult<Prepared> {
        let method = request.resolved_method()?;
        let mut headers = self.compose_headers(
            &request.previews,
            request.content_type.as_deref(),
            request.accept.as_deref(),
        )?;
        let payload = request.into_payload(&method)?;
        if let Some(range) = &payload.content_range {
            headers.insert(CONTENT_RANGE, header_value(range)?);
        }

        Ok(Prepared {
            method,
            url: self.url_for(path),
            headers,
            payload,
        })
    }

    /// Issues one request relative to the base URL.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Format`] for a request the root cannot express
    /// - [`ApiError::Transport`] for network failures
    /// - [`ApiError::Http`] for any 4xx/5xx status
    pub fn request(&self, path: &str, request: Request) -> ApiResult<RawResponse> {
        let prepared = self.prepare(path, request)?;
        self.send(
            prepared.method,
            &prepared.url,
            prepared.headers,
            &prepared.payload.query,
            prepared.payload.body,
        )
    }

    /// Walks a paginated endpoint lazily.
    ///
    /// Every page carries `per_page=100` and `page=N`. The sequence ends
    /// when a response has no `Link: <...>; rel="next"`, when `pages` is
    /// exhausted, or after yielding the first error.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gh_actions_client::api::ApiClient;
    /// use gh_actions_client::api::common::{PageRange, Request};
    ///
    /// let client = ApiClient::from_env(None)?;
    /// for page in client.request_pages("users/octocat/repos", Request::new(), PageRange::all())? {
    ///     let repos: Vec<serde_json::Value> = page?.json()?;
    ///     println!("{} repositories", repos.len());
    /// }
    /// # Ok::<(), gh_actions_client::api::common::ApiError>(())
    /// ```
    pub fn request_pages(
        &self,
        path: &str,
        request: Request,
        pages: impl Into<PageRange>,
    ) -> ApiResult<Pages<'_>> {
        let cursor = pages.into().cursor()?;
        let prepared = self.prepare(path, request)?;
        Ok(Pages {
            client: self,
            prepared,
            cursor,
            done: false,
        })
    }

    /// Sends a GraphQL document with variables and returns the parsed reply.
    ///
    /// The schema is not validated locally; GraphQL-level `errors` are
    /// returned as part of the document.
    pub fn graphql(&self, query: &str, variables: Value, previews: &[&str]) -> ApiResult<Value> {
        if self.is_internal() {
            return Err(ApiError::Unsupported(
                "GraphQL is only served by the public API".to_string(),
            ));
        }
        let previews: Vec<String> = previews.iter().map(|p| p.to_string()).collect();
        let headers = self.compose_headers(&previews, None, None)?;
        let body = serde_json::to_vec(&json!({"query": query, "variables": variables}))?;
        let response = self.send(Method::POST, &self.url_for("graphql"), headers, &[], Some(body))?;
        response.json()
    }

    fn send(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        query: &[(String, String)],
        body: Option<Vec<u8>>,
    ) -> ApiResult<RawResponse> {
        debug!(%method, url, ?query, "dispatching request");

        let mut builder = self.http.request(method, url).headers(headers);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send()?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            debug!(%status, "request failed");
            return Err(ApiError::from_status(status, text));
        }

        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("flavor", &self.flavor)
            .field("auth", &self.auth)
            .finish()
    }
}

fn header_value(value: &str) -> ApiResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| ApiError::Format(format!("invalid header value: {:?}", value)))
}

/// A request resolved down to wire parts, reusable across pages.
struct Prepared {
    method: Method,
    url: String,
    headers: HeaderMap,
    payload: Payload,
}

/// Lazy iterator over the pages of a paginated endpoint.
///
/// Each call to `next` performs one blocking round trip.
pub struct Pages<'a> {
    client: &'a ApiClient,
    prepared: Prepared,
    cursor: PageCursor,
    done: bool,
}

impl Iterator for Pages<'_> {
    type Item = ApiResult<RawResponse>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(page) = self.cursor.next() else {
            debug!(url = %self.prepared.url, "page range exhausted");
            self.done = true;
            return None;
        };

        let mut query = self.prepared.payload.query.clone();
        query.push(("per_page".to_string(), PER_PAGE.to_string()));
        query.push(("page".to_string(), page.to_string()));

        debug!(url = %self.prepared.url, page, "fetching page");
        let result = self.client.send(
            self.prepared.method.clone(),
            &self.prepared.url,
            self.prepared.headers.clone(),
            &query,
            self.prepared.payload.body.clone(),
        );

        match &result {
            Ok(response) if !response.has_next_page() => {
                debug!(page, "no next page advertised, stopping");
                self.done = true;
            }
            Ok(_) => {}
            Err(_) => self.done = true,
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("https://api.example.com")
            .unwrap()
            .with_auth(AuthCredential::bearer("tok"))
    }

    #[test]
    fn test_url_for_strips_one_trailing_slash() {
        let client = client();
        assert_eq!(client.base_url(), "https://api.example.com/");
        assert_eq!(client.url_for("repos/o/r/"), "https://api.example.com/repos/o/r");
        assert_eq!(client.url_for("a//"), "https://api.example.com/a/");
    }

    #[test]
    fn test_session_headers() {
        let headers = client().compose_headers(&[], None, None).unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer tok");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[ACCEPT], "application/vnd.github.raw+json");
        assert!(headers.get(USER_AGENT).is_none());
    }

    #[test]
    fn test_previews_replace_accept() {
        let headers = client()
            .compose_headers(&["foo".to_string(), "bar".to_string()], None, None)
            .unwrap();
        assert_eq!(
            headers[ACCEPT],
            ", application/vnd.github.foo-preview, application/vnd.github.bar-preview"
        );
    }

    #[test]
    fn test_explicit_accept_wins_over_previews() {
        let headers = client()
            .compose_headers(&["foo".to_string()], Some("text/plain"), Some("application/x"))
            .unwrap();
        assert_eq!(headers[ACCEPT], "application/x");
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_internal_root_rejects_previews() {
        let env = RunnerEnv::from_vars([
            ("ACTIONS_RUNTIME_URL", "https://pipelines.example.com/abc/"),
            ("ACTIONS_RUNTIME_TOKEN", "rt"),
        ]);
        let client = ApiClient::internal(InternalService::Pipelines, None, None, env).unwrap();
        assert_eq!(client.base_url(), "https://pipelines.example.com/abc/_apis/");

        let headers = client.compose_headers(&[], None, None).unwrap();
        assert_eq!(headers[ACCEPT], "application/json;api-version=6.0-preview");

        let err = client
            .compose_headers(&["foo".to_string()], None, None)
            .unwrap_err();
        assert!(matches!(err, ApiError::Format(_)));
    }

    #[test]
    fn test_internal_root_by_instance_id() {
        let env = RunnerEnv::from_vars([("ACTIONS_RUNTIME_TOKEN", "rt")]);
        let client =
            ApiClient::internal(InternalService::ArtifactCache, None, Some("Inst1"), env).unwrap();
        assert_eq!(
            client.base_url(),
            "https://artifactcache.actions.githubusercontent.com/Inst1/_apis/"
        );
    }

    #[test]
    fn test_internal_root_requires_url() {
        let env = RunnerEnv::from_vars([("ACTIONS_RUNTIME_TOKEN", "rt")]);
        let err = ApiClient::internal(InternalService::ArtifactCache, None, None, env).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn test_user_agent_header() {
        let headers = client()
            .with_user_agent("my-bot/1.0")
            .compose_headers(&[], None, None)
            .unwrap();
        assert_eq!(headers[USER_AGENT], "my-bot/1.0");
    }
}
