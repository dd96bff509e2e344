//
//  gitlab3
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! HTTP Transport Boundary
//!
//! The client never talks to `reqwest` directly; it hands a fully built
//! [`TransportRequest`] to a [`Transport`] and gets back a [`RawResponse`].
//! [`ReqwestTransport`] is the default implementation. Alternative
//! transports (recording proxies, in-memory stubs) only need to implement
//! the one trait method.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::api::common::Result;
use crate::api::endpoint::Verb;

/// A request ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub verb: Verb,
    /// Absolute URL, query string included.
    pub url: String,
    /// Extra headers as `(name, value)` pairs.
    pub headers: Vec<(String, String)>,
    /// Form-encoded body for POST/PUT.
    pub body: Option<String>,
}

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The HTTP capability the client depends on.
///
/// Implementations must be reentrant: one transport is shared by every
/// clone of a [`GitlabClient`](crate::api::GitlabClient).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues the request and returns the response, whatever its status.
    ///
    /// Only transport failures (DNS, refused connection, timeout, TLS)
    /// are errors here; HTTP error statuses are returned as responses.
    async fn execute(&self, request: TransportRequest) -> Result<RawResponse>;
}

/// [`Transport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Builds a transport with the given timeout and user agent.
    ///
    /// When `accept_invalid_certs` is set, TLS certificate validation is
    /// disabled. Intended for self-hosted instances with self-signed
    /// certificates only.
    pub fn new(timeout: Duration, user_agent: &str, accept_invalid_certs: bool) -> Result<Self> {
        let mut defaults = HeaderMap::new();
        defaults.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .default_headers(defaults)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self { http })
    }

    /// Wraps an already configured `reqwest::Client`.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<RawResponse> {
        let mut builder = self.http.request(request.verb.into(), &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
