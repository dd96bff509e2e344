//
//  gitlab3
//  api/blocking.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Blocking Client
//!
//! Synchronous call-and-return access to the same mediator and paginator.
//! Every method blocks the calling thread until the HTTP round trip
//! completes or fails, then returns exactly what the async method would.
//!
//! ```rust,no_run
//! use gitlab3::api::blocking::BlockingClient;
//! use gitlab3::api::Params;
//!
//! let client = BlockingClient::new("https://gitlab.example.com", "my-private-token")?;
//!
//! let project = client.block_on(client.inner().get_project("group/app"))?;
//!
//! let issues = client.inner().issues_paginator(42, Params::new().set("per_page", 50))?;
//! let mut issues = client.wrap(issues);
//! while let Some(issue) = issues.next()? {
//!     println!("#{} {}", issue.iid, issue.title);
//! }
//! # Ok::<(), gitlab3::api::common::Error>(())
//! ```
//!
//! # Notes
//!
//! - Backed by a private one-worker `tokio` runtime that drives the
//!   transport's I/O and timers; nothing else runs on it
//! - Must not be called, or dropped, from inside an async runtime. Use
//!   [`GitlabClient`] there
//! - A [`BlockingClient`] may be shared across threads; each
//!   [`BlockingPaginator`] belongs to one caller

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::runtime::{Builder, Runtime};

use crate::api::client::GitlabClient;
use crate::api::common::pagination::{EndpointPages, PageSource, Paginator};
use crate::api::common::{Error, Result};
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;
use crate::config::ClientConfig;

/// A [`GitlabClient`] whose calls block the current thread.
#[derive(Debug, Clone)]
pub struct BlockingClient {
    client: GitlabClient,
    runtime: Arc<Runtime>,
}

impl BlockingClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self> {
        Self::from_client(GitlabClient::new(base_url, token)?)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::from_client(GitlabClient::from_config(config)?)
    }

    /// Wraps an existing client, keeping its auth, sudo and transport.
    pub fn from_client(client: GitlabClient) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("gitlab3-blocking")
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        Ok(Self {
            client,
            runtime: Arc::new(runtime),
        })
    }

    /// The underlying async client, for building calls to pass to
    /// [`block_on`](Self::block_on).
    pub fn inner(&self) -> &GitlabClient {
        &self.client
    }

    /// Runs any client future (typically a typed wrapper such as
    /// `inner().get_issue(..)`) to completion on this thread.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Blocking [`GitlabClient::call`].
    pub fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        args: &PathArgs,
        params: Option<&Params>,
    ) -> Result<Option<T>> {
        self.block_on(self.client.call(endpoint, args, params))
    }

    /// Blocking [`GitlabClient::call_unit`].
    pub fn call_unit(
        &self,
        endpoint: &Endpoint,
        args: &PathArgs,
        params: Option<&Params>,
    ) -> Result<()> {
        self.block_on(self.client.call_unit(endpoint, args, params))
    }

    /// Blocking [`GitlabClient::request`].
    pub fn request<T: DeserializeOwned>(
        &self,
        verb: Verb,
        path_template: &str,
        args: &PathArgs,
        params: Option<&Params>,
    ) -> Result<Option<T>> {
        self.block_on(self.client.request(verb, path_template, args, params))
    }

    /// Blocking [`GitlabClient::paginate`].
    pub fn paginate<T>(
        &self,
        endpoint: &'static Endpoint,
        args: PathArgs,
        params: Params,
    ) -> Result<BlockingPaginator<EndpointPages<T>, T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let paginator = self.client.paginate(endpoint, args, params)?;
        Ok(self.wrap(paginator))
    }

    /// Drives an existing paginator, such as one returned by a
    /// `*_paginator` wrapper, from this thread.
    pub fn wrap<S, T>(&self, paginator: Paginator<S, T>) -> BlockingPaginator<S, T>
    where
        S: PageSource<T>,
    {
        BlockingPaginator {
            inner: paginator,
            runtime: Arc::clone(&self.runtime),
        }
    }
}

/// A [`Paginator`] whose methods block the current thread.
///
/// Same rules as the async paginator: single pass, one iteration mode per
/// instance, and a failed fetch can be retried by calling again.
#[derive(Debug)]
pub struct BlockingPaginator<S, T> {
    inner: Paginator<S, T>,
    runtime: Arc<Runtime>,
}

impl<S, T> BlockingPaginator<S, T>
where
    S: PageSource<T>,
{
    pub fn next(&mut self) -> Result<Option<T>> {
        self.runtime.block_on(self.inner.next())
    }

    pub fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        self.runtime.block_on(self.inner.next_page())
    }

    /// Drains every remaining record. See [`Paginator::all`] for the cost
    /// on large collections.
    pub fn all(&mut self) -> Result<Vec<T>> {
        self.runtime.block_on(self.inner.all())
    }

    pub fn current_page(&self) -> u32 {
        self.inner.current_page()
    }

    pub fn is_exhausted(&self) -> bool {
        self.inner.is_exhausted()
    }

    pub fn into_inner(self) -> Paginator<S, T> {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::api::v3::{Project, GET_PROJECT, LIST_PROJECTS};

    fn project(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("app{id}"),
            "path": format!("app{id}"),
            "path_with_namespace": format!("group/app{id}")
        })
    }

    #[test]
    fn test_blocking_call_returns_value_and_absent() {
        let mut server = Server::new();
        let _found = server
            .mock("GET", "/api/v3/projects/group%2Fapp1")
            .match_header("PRIVATE-TOKEN", "tok")
            .with_status(200)
            .with_body(project(1).to_string())
            .create();
        let _missing = server
            .mock("GET", "/api/v3/projects/group%2Fgone")
            .with_status(404)
            .with_body(r#"{"message":"404 Project Not Found"}"#)
            .create();

        let client = BlockingClient::new(&server.url(), "tok").unwrap();

        let args = PathArgs::new().arg("project_id", "group/app1");
        let found: Option<Project> = client.call(&GET_PROJECT, &args, None).unwrap();
        assert_eq!(found.map(|p| p.id), Some(1));

        let gone = client
            .block_on(client.inner().get_project("group/gone"))
            .unwrap();
        assert!(gone.is_none());
    }

    #[test]
    fn test_blocking_call_preserves_api_error() {
        let mut server = Server::new();
        let _forbidden = server
            .mock("GET", "/api/v3/projects/7")
            .with_status(403)
            .with_body(r#"{"message":"403 Forbidden"}"#)
            .create();

        let client = BlockingClient::new(&server.url(), "tok").unwrap();
        let args = PathArgs::new().arg("project_id", 7);
        let err = client
            .call::<Project>(&GET_PROJECT, &args, None)
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_blocking_paginator_walks_pages() {
        let mut server = Server::new();
        let first = server
            .mock("GET", "/api/v3/projects")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("per_page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(json!([project(1), project(2)]).to_string())
            .expect(1)
            .create();
        let second = server
            .mock("GET", "/api/v3/projects")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("per_page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(json!([project(3)]).to_string())
            .expect(1)
            .create();

        let client = BlockingClient::new(&server.url(), "tok").unwrap();
        let mut projects = client
            .paginate::<Project>(&LIST_PROJECTS, PathArgs::new(), Params::new().set("per_page", 2))
            .unwrap();

        let mut ids = Vec::new();
        while let Some(project) = projects.next().unwrap() {
            ids.push(project.id);
        }
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(projects.next().unwrap().is_none());
        assert!(projects.is_exhausted());

        first.assert();
        second.assert();
    }
}
