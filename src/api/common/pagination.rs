//
//  gitlab3
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Page-Number Pagination for GitLab Collections
//!
//! GitLab v3 list endpoints accept `page` (1-indexed) and `per_page` query
//! parameters and return a plain JSON array. There is no "next" link or
//! total count to follow, so the only end-of-collection signal is a page
//! that comes back shorter than `per_page`, or empty.
//!
//! # Overview
//!
//! | Type | Role |
//! |------|------|
//! | [`PageSource`] | Anything that can fetch one page given params |
//! | [`EndpointPages`] | A [`PageSource`] bound to a paged [`Endpoint`] |
//! | [`Paginator`] | Single-pass traversal over records or pages |
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab3::api::{GitlabClient, Params};
//! use gitlab3::api::v3::Issue;
//!
//! # async fn example() -> gitlab3::api::common::Result<()> {
//! let client = GitlabClient::new("https://gitlab.example.com", "token")?;
//! let mut issues = client.issues_paginator(42, Params::new().set("per_page", 50))?;
//!
//! while let Some(issue) = issues.next().await? {
//!     println!("#{} {}", issue.iid, issue.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Notes
//!
//! - A paginator is single-pass; build a new one to traverse again
//! - Iterate either by record ([`Paginator::next`]) or by page
//!   ([`Paginator::next_page`]) on one instance, never both
//! - Fetch errors propagate unchanged and leave the paginator where it was,
//!   so calling again retries the same page

use std::collections::VecDeque;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::trace;

use super::{Error, Result};
use crate::api::client::GitlabClient;
use crate::api::endpoint::{Endpoint, PathArgs};
use crate::api::params::Params;

/// Fetches one page of a collection.
///
/// The params passed in always carry the `page` to fetch; `per_page` and
/// any filters come from the paginator's initial params.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, params: &Params) -> Result<Vec<T>>;
}

/// A [`PageSource`] bound to a paged endpoint and its path arguments.
///
/// A 404 on the list call is treated as an empty page.
#[derive(Debug, Clone)]
pub struct EndpointPages<T> {
    client: GitlabClient,
    endpoint: &'static Endpoint,
    args: PathArgs,
    _record: PhantomData<fn() -> T>,
}

impl<T> EndpointPages<T> {
    pub fn new(client: GitlabClient, endpoint: &'static Endpoint, args: PathArgs) -> Self {
        Self {
            client,
            endpoint,
            args,
            _record: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &'static Endpoint {
        self.endpoint
    }
}

#[async_trait]
impl<T> PageSource<T> for EndpointPages<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, params: &Params) -> Result<Vec<T>> {
        let page: Option<Vec<T>> = self
            .client
            .call(self.endpoint, &self.args, Some(params))
            .await?;
        Ok(page.unwrap_or_default())
    }
}

/// Paginator over a paged GitLab endpoint.
pub type EndpointPaginator<T> = Paginator<EndpointPages<T>, T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Unset,
    Records,
    Pages,
}

impl Mode {
    fn label(self) -> &'static str {
        match self {
            Self::Unset => "nothing",
            Self::Records => "record (next)",
            Self::Pages => "page (next_page)",
        }
    }
}

#[derive(Debug)]
enum State<T> {
    /// The next page may be fetched.
    Ready,
    /// Records from the last fetch not yet handed out. `last` is set when
    /// that fetch was short or empty.
    Buffered { records: VecDeque<T>, last: bool },
    /// End of collection; nothing more is fetched.
    Exhausted,
}

/// Lazy, single-pass traversal over a page-numbered collection.
///
/// # Iteration Modes
///
/// | Method | Yields | Mode |
/// |--------|--------|------|
/// | [`next()`](Self::next) | One record at a time | record |
/// | [`next_page()`](Self::next_page) | One whole page at a time | page |
/// | [`all()`](Self::all) | Everything that remains | either |
///
/// The first call to `next` or `next_page` fixes the mode. Calling the
/// other one afterwards fails with [`Error::PaginatorMode`] instead of
/// silently skipping or repeating records.
///
/// # End of Collection
///
/// A fetched page that is empty, or shorter than `per_page` when the
/// initial params set one, ends the traversal. Without `per_page` the
/// server default applies and only an empty page ends it.
///
/// # Notes
///
/// - `page` in the initial params sets the first page fetched (default 1)
/// - The page number only advances after a successful fetch
/// - Methods take `&mut self`; one instance is never shared between callers
#[derive(Debug)]
pub struct Paginator<S, T> {
    source: S,
    params: Params,
    page: u32,
    per_page: Option<u32>,
    mode: Mode,
    state: State<T>,
}

impl<S, T> Paginator<S, T>
where
    S: PageSource<T>,
{
    /// Creates a paginator over `source`, starting from `params`.
    pub fn new(source: S, params: Params) -> Self {
        let page = params.get_u32("page").unwrap_or(1).max(1);
        let per_page = params.get_u32("per_page").filter(|n| *n > 0);

        Self {
            source,
            params,
            page,
            per_page,
            mode: Mode::Unset,
            state: State::Ready,
        }
    }

    /// The page number the next fetch will request.
    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> Option<u32> {
        self.per_page
    }

    /// Returns `true` once the end of the collection has been reached and
    /// every record handed out.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, State::Exhausted)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the next record, fetching the next page when the buffered
    /// one is used up. `Ok(None)` marks the end and is returned again on
    /// every later call without touching the server.
    pub async fn next(&mut self) -> Result<Option<T>> {
        self.enter(Mode::Records)?;

        loop {
            match &mut self.state {
                State::Exhausted => return Ok(None),
                State::Buffered { records, last } => {
                    if let Some(record) = records.pop_front() {
                        return Ok(Some(record));
                    }
                    let done = *last;
                    self.state = if done { State::Exhausted } else { State::Ready };
                }
                State::Ready => {
                    let (records, last) = self.fetch().await?;
                    self.state = State::Buffered {
                        records: records.into(),
                        last,
                    };
                }
            }
        }
    }

    /// Returns the next whole page. An empty page is reported as
    /// `Ok(None)`; a short page is returned and ends the traversal.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        self.enter(Mode::Pages)?;

        match std::mem::replace(&mut self.state, State::Ready) {
            State::Exhausted => {
                self.state = State::Exhausted;
                return Ok(None);
            }
            // Left behind by an interrupted `all()`.
            State::Buffered { records, last } => {
                if last {
                    self.state = State::Exhausted;
                }
                if !records.is_empty() {
                    return Ok(Some(records.into()));
                }
                if last {
                    return Ok(None);
                }
            }
            State::Ready => {}
        }

        let (records, last) = self.fetch().await?;
        if last {
            self.state = State::Exhausted;
        }
        Ok((!records.is_empty()).then_some(records))
    }

    /// Drains every remaining record, fetching page after page until the
    /// end of the collection.
    ///
    /// This holds the whole remaining collection in memory and issues one
    /// request per page. On a large or unbounded collection it can take
    /// arbitrarily long and use arbitrarily much memory.
    ///
    /// Records are gathered in the paginator's own buffer, and the state
    /// only changes once a fetch has completed. If a fetch fails, or the
    /// returned future is dropped mid-fetch, calling again resumes with
    /// the page that did not complete and nothing gathered is lost.
    pub async fn all(&mut self) -> Result<Vec<T>> {
        loop {
            match &self.state {
                State::Exhausted => return Ok(Vec::new()),
                State::Buffered { last: true, .. } => {
                    return match std::mem::replace(&mut self.state, State::Exhausted) {
                        State::Buffered { records, .. } => Ok(records.into()),
                        _ => Ok(Vec::new()),
                    };
                }
                State::Buffered { last: false, .. } | State::Ready => {
                    let (records, last) = self.fetch().await?;
                    match &mut self.state {
                        State::Buffered { records: gathered, last: done } => {
                            gathered.extend(records);
                            *done = last;
                        }
                        _ => {
                            self.state = State::Buffered {
                                records: records.into(),
                                last,
                            };
                        }
                    }
                }
            }
        }
    }

    fn enter(&mut self, mode: Mode) -> Result<()> {
        match self.mode {
            Mode::Unset => {
                self.mode = mode;
                Ok(())
            }
            active if active == mode => Ok(()),
            active => Err(Error::PaginatorMode {
                active: active.label(),
                attempted: mode.label(),
            }),
        }
    }

    /// Fetches the current page. Returns the records and whether this page
    /// ends the collection. State is untouched on error.
    ///
    /// A page numbered `u32::MAX` is always the last one fetched.
    async fn fetch(&mut self) -> Result<(Vec<T>, bool)> {
        let page = self.page;
        let params = self.params.merged("page", page);
        trace!(page, per_page = ?self.per_page, "fetching page");

        let records = self.source.fetch_page(&params).await?;
        let next = page.checked_add(1);
        if let Some(next) = next {
            self.page = next;
        }

        let last = next.is_none()
            || records.is_empty()
            || self
                .per_page
                .is_some_and(|per_page| records.len() < per_page as usize);
        if last {
            trace!(page, count = records.len(), "reached last page");
        }

        Ok((records, last))
    }
}
