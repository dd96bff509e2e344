//
//  gitlab3
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the GitLab v3 API
//!
//! [`GitlabClient`] turns an [`Endpoint`] descriptor, its [`PathArgs`] and
//! optional [`Params`] into an HTTP request, dispatches it through a
//! [`Transport`], and interprets the response.
//!
//! ## Response Handling
//!
//! | Response | Result |
//! |----------|--------|
//! | 2xx with a JSON body | `Ok(Some(value))` |
//! | 2xx with an empty body | `Ok(None)` |
//! | 404 to a GET | `Ok(None)` (absent value) |
//! | Any other status | `Err(Error::Api(..))` |
//!
//! ## Features
//!
//! - Private token authentication, as a header or a query parameter
//! - Optional `SUDO` impersonation for admin tokens
//! - Rails-style form encoding for query strings and bodies
//! - Contract checks (path args, params) before any network I/O
//! - `tracing` events for every dispatched request

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::form_urlencoded;

use crate::api::common::pagination::{EndpointPages, EndpointPaginator, Paginator};
use crate::api::common::{ApiError, Error, Result};
use crate::api::endpoint::{resolve_path, Endpoint, PathArgs, Verb};
use crate::api::params::Params;
use crate::api::transport::{RawResponse, ReqwestTransport, Transport, TransportRequest};
use crate::config::{normalize_base_url, ClientConfig, DEFAULT_TIMEOUT_SECS};

/// Header carrying the private token.
pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Query parameter carrying the private token.
pub const PRIVATE_TOKEN_PARAM: &str = "private_token";

/// Header naming the user to act as.
pub const SUDO_HEADER: &str = "SUDO";

/// How the private token is attached to requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// `PRIVATE-TOKEN: <token>` header.
    #[default]
    Header,
    /// `private_token=<token>` query parameter.
    Query,
}

/// The request mediator for the GitLab v3 API.
///
/// A client is immutable after construction. Cloning is cheap (the
/// transport is shared), and one client may be used by many tasks at once.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use gitlab3::api::{AuthMode, GitlabClient};
///
/// let client = GitlabClient::new("https://gitlab.example.com", "my-private-token")?
///     .with_auth_mode(AuthMode::Query)
///     .with_sudo("deploy-bot");
/// # Ok::<(), gitlab3::api::common::Error>(())
/// ```
///
/// # Calling Endpoints
///
/// Every endpoint has a typed wrapper (see [`crate::api::v3`]). The generic
/// entry points are [`call`](Self::call), [`call_unit`](Self::call_unit)
/// and [`request`](Self::request):
///
/// ```rust,no_run
/// use gitlab3::api::{GitlabClient, PathArgs};
/// use gitlab3::api::v3::{Project, GET_PROJECT};
///
/// # async fn example(client: GitlabClient) -> gitlab3::api::common::Result<()> {
/// let args = PathArgs::new().arg("project_id", "group/project");
/// let project: Option<Project> = client.call(&GET_PROJECT, &args, None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GitlabClient {
    base_url: String,
    token: Option<String>,
    auth_mode: AuthMode,
    sudo: Option<String>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for GitlabClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitlabClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("auth_mode", &self.auth_mode)
            .field("sudo", &self.sudo)
            .finish_non_exhaustive()
    }
}

impl GitlabClient {
    /// Creates a client for `base_url` authenticating with `token`.
    ///
    /// `base_url` may be a bare host, an instance URL, or the API root;
    /// see [`normalize_base_url`].
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        Self::from_config(&ClientConfig::new(base_url, token))
    }

    /// Creates a client that sends no credential.
    pub fn anonymous(base_url: &str) -> Result<Self> {
        Self::from_config(&ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    /// Creates a client from resolved settings.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("gitlab3/{}", crate::VERSION));
        let timeout = if config.timeout_secs == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            config.timeout_secs
        };
        let transport = ReqwestTransport::new(
            Duration::from_secs(timeout),
            &user_agent,
            config.accept_invalid_certs,
        )?;

        Ok(Self {
            base_url: normalize_base_url(&config.base_url)?,
            token: config.token.clone().filter(|t| !t.is_empty()),
            auth_mode: config.auth_mode,
            sudo: config.sudo.clone(),
            transport: Arc::new(transport),
        })
    }

    pub fn with_auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    /// Acts as another user on every request. Needs an admin token.
    pub fn with_sudo(mut self, user: impl Into<String>) -> Self {
        self.sudo = Some(user.into());
        self
    }

    /// Replaces the HTTP transport.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// The API root, e.g. `https://gitlab.example.com/api/v3`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Calls a declared endpoint and decodes its response.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` for a 2xx response with a body
    /// - `Ok(None)` for a 2xx response with an empty body, for a GET
    ///   answered with 404, and for endpoints declared with
    ///   `returns_value == false`
    ///
    /// # Errors
    ///
    /// - [`Error::MissingPathArg`] / [`Error::UnusedPathArg`] on bad path args
    /// - [`Error::InvalidParams`] when params are given to an endpoint that
    ///   accepts none
    /// - [`Error::Api`] for any other non-2xx status
    /// - [`Error::Network`] when the transport fails
    /// - [`Error::Decode`] when the body is not the expected JSON
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        args: &PathArgs,
        params: Option<&Params>,
    ) -> Result<Option<T>> {
        if let Some(params) = params {
            if !endpoint.accepts_params && !params.is_empty() {
                return Err(Error::InvalidParams(format!(
                    "{} does not accept params",
                    endpoint.name
                )));
            }
        }

        let path = endpoint.resolve(args)?;
        let Some(response) = self.dispatch(endpoint.verb, &path, params).await? else {
            return Ok(None);
        };

        if !endpoint.returns_value {
            return Ok(None);
        }
        decode(endpoint.verb, &path, response)
    }

    /// Calls a declared endpoint and discards any response body.
    pub async fn call_unit(
        &self,
        endpoint: &Endpoint,
        args: &PathArgs,
        params: Option<&Params>,
    ) -> Result<()> {
        self.call::<serde_json::Value>(&endpoint.no_value(), args, params)
            .await
            .map(|_| ())
    }

    /// Issues an ad-hoc request for a path not in the endpoint table.
    ///
    /// Same contract as [`call`](Self::call), with params always allowed.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab3::api::{GitlabClient, Params, PathArgs, Verb};
    ///
    /// # async fn example(client: GitlabClient) -> gitlab3::api::common::Result<()> {
    /// let readme: Option<serde_json::Value> = client
    ///     .request(
    ///         Verb::Get,
    ///         "/projects/:project_id/repository/files",
    ///         &PathArgs::new().arg("project_id", 7),
    ///         Some(&Params::new().set("file_path", "README.md").set("ref", "master")),
    ///     )
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn request<T: DeserializeOwned>(
        &self,
        verb: Verb,
        path_template: &str,
        args: &PathArgs,
        params: Option<&Params>,
    ) -> Result<Option<T>> {
        let path = resolve_path(path_template, args)?;
        match self.dispatch(verb, &path, params).await? {
            Some(response) => decode(verb, &path, response),
            None => Ok(None),
        }
    }

    /// Binds a paged endpoint into a [`Paginator`].
    ///
    /// Path args and the paged flag are checked here, so a bad binding
    /// fails before the first fetch.
    pub fn paginate<T>(
        &self,
        endpoint: &'static Endpoint,
        args: PathArgs,
        params: Params,
    ) -> Result<EndpointPaginator<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if !endpoint.paged {
            return Err(Error::InvalidParams(format!(
                "{} is not a paged endpoint",
                endpoint.name
            )));
        }
        endpoint.resolve(&args)?;

        let source = EndpointPages::new(self.clone(), endpoint, args);
        Ok(Paginator::new(source, params))
    }

    /// Sends the request and classifies the status. `Ok(None)` is the
    /// 404-on-GET absent value.
    async fn dispatch(
        &self,
        verb: Verb,
        path: &str,
        params: Option<&Params>,
    ) -> Result<Option<RawResponse>> {
        let request = self.build_request(verb, path, params);

        info!(verb = %verb, path = %path, "GitLab API request");
        if let Some(params) = params {
            debug!(verb = %verb, path = %path, params = ?params, "request params");
        }

        let response = self.transport.execute(request).await?;
        debug!(status = response.status, bytes = response.body.len(), "GitLab API response");

        if response.is_success() {
            return Ok(Some(response));
        }
        if verb == Verb::Get && response.status == 404 {
            debug!(path = %path, "resource not found, returning absent value");
            return Ok(None);
        }

        warn!(verb = %verb, path = %path, status = response.status, "GitLab API error");
        Err(ApiError::new(response.status, verb, path, response.body).into())
    }

    fn build_request(&self, verb: Verb, path: &str, params: Option<&Params>) -> TransportRequest {
        let mut query: Vec<(String, String)> = Vec::new();
        let mut body = None;

        if let Some(params) = params {
            if verb.has_body() {
                body = Some(params.to_form());
            } else {
                query = params.to_pairs();
            }
        }

        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            match self.auth_mode {
                AuthMode::Header => {
                    headers.push((PRIVATE_TOKEN_HEADER.to_string(), token.clone()))
                }
                AuthMode::Query => query.push((PRIVATE_TOKEN_PARAM.to_string(), token.clone())),
            }
        }
        if let Some(sudo) = &self.sudo {
            headers.push((SUDO_HEADER.to_string(), sudo.clone()));
        }

        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&query)
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }

        TransportRequest {
            verb,
            url,
            headers,
            body,
        }
    }
}

/// Decodes a successful response; an empty body is `None`.
fn decode<T: DeserializeOwned>(verb: Verb, path: &str, response: RawResponse) -> Result<Option<T>> {
    if response.body.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&response.body)
        .map(Some)
        .map_err(|source| Error::Decode {
            status: response.status,
            verb,
            path: path.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Records requests and answers with a fixed response.
    struct RecordingTransport {
        status: u16,
        body: String,
        requests: Mutex<Vec<TransportRequest>>,
    }

    impl RecordingTransport {
        fn new(status: u16, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<TransportRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, request: TransportRequest) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(RawResponse {
                status: self.status,
                body: self.body.clone(),
            })
        }
    }

    fn client_with(transport: Arc<RecordingTransport>) -> GitlabClient {
        GitlabClient::new("gitlab.example.com", "tok")
            .unwrap()
            .with_transport(transport)
    }

    const LIST: Endpoint = Endpoint::new("list_things", Verb::Get, "/things").paged();
    const CREATE: Endpoint = Endpoint::new("create_thing", Verb::Post, "/groups/:group_id/things").with_params();
    const SHOW: Endpoint = Endpoint::new("get_thing", Verb::Get, "/things/:thing_id");

    #[tokio::test]
    async fn test_header_auth_and_query_params() {
        let transport = RecordingTransport::new(200, "[]");
        let client = client_with(transport.clone()).with_sudo("alice");

        let params = Params::new().set("state", "opened").set("labels", serde_json::json!(["a", "b"]));
        let _: Option<Vec<serde_json::Value>> =
            client.call(&LIST, &PathArgs::new(), Some(&params)).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(
            sent.url,
            "https://gitlab.example.com/api/v3/things?labels%5B%5D=a&labels%5B%5D=b&state=opened"
        );
        assert!(sent.headers.contains(&("PRIVATE-TOKEN".to_string(), "tok".to_string())));
        assert!(sent.headers.contains(&("SUDO".to_string(), "alice".to_string())));
        assert_eq!(sent.body, None);
    }

    #[tokio::test]
    async fn test_query_auth_and_form_body() {
        let transport = RecordingTransport::new(201, r#"{"id": 1}"#);
        let client = client_with(transport.clone()).with_auth_mode(AuthMode::Query);

        let params = Params::new().set("name", "x y");
        let args = PathArgs::new().arg("group_id", "a/b");
        let created: Option<serde_json::Value> =
            client.call(&CREATE, &args, Some(&params)).await.unwrap();
        assert_eq!(created, Some(serde_json::json!({"id": 1})));

        let sent = &transport.requests()[0];
        assert_eq!(
            sent.url,
            "https://gitlab.example.com/api/v3/groups/a%2Fb/things?private_token=tok"
        );
        assert_eq!(sent.body.as_deref(), Some("name=x+y"));
        assert!(sent.headers.iter().all(|(name, _)| name != PRIVATE_TOKEN_HEADER));
    }

    #[tokio::test]
    async fn test_contract_errors_skip_network() {
        let transport = RecordingTransport::new(200, "{}");
        let client = client_with(transport.clone());

        let missing = client.call::<serde_json::Value>(&SHOW, &PathArgs::new(), None).await;
        assert!(matches!(missing, Err(Error::MissingPathArg { .. })));

        let params = Params::new().set("x", 1);
        let args = PathArgs::new().arg("thing_id", 1);
        let rejected = client.call::<serde_json::Value>(&SHOW, &args, Some(&params)).await;
        assert!(matches!(rejected, Err(Error::InvalidParams(_))));

        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_returns_value_false_discards_body() {
        let transport = RecordingTransport::new(200, r#"{"id": 3}"#);
        let client = client_with(transport);
        let args = PathArgs::new().arg("thing_id", 3);

        let value: Option<serde_json::Value> =
            client.call(&SHOW.no_value(), &args, None).await.unwrap();
        assert_eq!(value, None);
        client.call_unit(&SHOW, &args, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_decode_failure_is_reported() {
        let transport = RecordingTransport::new(200, "<html>");
        let client = client_with(transport);
        let args = PathArgs::new().arg("thing_id", 3);

        let err = client.call::<serde_json::Value>(&SHOW, &args, None).await.unwrap_err();
        assert!(matches!(err, Error::Decode { status: 200, .. }));
    }

    #[test]
    fn test_paginate_rejects_unpaged_endpoint() {
        static UNPAGED: Endpoint = Endpoint::new("get_thing", Verb::Get, "/things/:thing_id");
        let client = client_with(RecordingTransport::new(200, "[]"));
        let args = PathArgs::new().arg("thing_id", 1);

        let err = client
            .paginate::<serde_json::Value>(&UNPAGED, args, Params::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParams(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = client_with(RecordingTransport::new(200, ""));
        let shown = format!("{client:?}");
        assert!(shown.contains("<redacted>"));
        assert!(!shown.contains("tok\""));
    }
}
