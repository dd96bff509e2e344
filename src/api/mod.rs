//
//  gitlab3
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! GitLab v3 API client.
//!
//! - [`client`]: the request mediator, [`GitlabClient`]
//! - [`blocking`]: the same calls and paginator, blocking the caller
//! - [`endpoint`]: endpoint descriptors and path templating
//! - [`params`]: request parameters and form encoding
//! - [`transport`]: the HTTP seam and its `reqwest` implementation
//! - [`common`]: errors and pagination
//! - [`v3`]: the endpoint table, resource types and typed wrappers

pub mod blocking;

pub mod client;

pub mod common;

pub mod endpoint;

pub mod params;

pub mod transport;

pub mod v3;

pub use blocking::{BlockingClient, BlockingPaginator};

pub use client::{AuthMode, GitlabClient};

pub use common::{ApiError, EndpointPaginator, Error, PageSource, Paginator, Result};

pub use endpoint::{Endpoint, PathArgs, Verb};

pub use params::Params;

pub use transport::{RawResponse, ReqwestTransport, Transport, TransportRequest};
