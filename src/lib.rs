//
//  gitlab3
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # GitLab v3 API Client Library
//!
//! A one-to-one async binding for the GitLab v3 REST API. Every endpoint is
//! declared once as a static descriptor and exposed as a typed method on
//! [`GitlabClient`].
//!
//! ## Overview
//!
//! The library is built around two pieces:
//!
//! - **Request mediator** ([`GitlabClient`]): builds a request from an
//!   endpoint descriptor, path arguments and params, attaches the private
//!   token, dispatches it and interprets the response
//! - **Paginator** ([`api::Paginator`]): walks a paged list endpoint one
//!   record or one page at a time, or drains it completely
//!
//! Both are async. [`api::BlockingClient`] offers the same calls and
//! paginator as plain blocking call-and-return methods.
//!
//! ## Module Structure
//!
//! - [`api`]: the client, endpoint table, params encoding, errors and
//!   pagination
//! - [`config`]: client settings, the TOML config file and environment
//!   overrides
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gitlab3::api::{GitlabClient, Params};
//!
//! # async fn example() -> gitlab3::api::common::Result<()> {
//! let client = GitlabClient::new("https://gitlab.example.com", "my-private-token")?;
//!
//! let mut projects = client.projects_paginator(Params::new().set("per_page", 50))?;
//! while let Some(project) = projects.next().await? {
//!     println!("{}", project.path_with_namespace);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Results
//!
//! | Outcome | Value |
//! |---------|-------|
//! | Success with a body | `Ok(Some(value))` |
//! | Success without a body, or GET answered 404 | `Ok(None)` |
//! | Any other failure | `Err(api::Error)` |
//!
//! ## Logging
//!
//! The library emits [`tracing`] events and never installs a subscriber.
//! Install one in the application to see requests:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("gitlab3=debug")
//!     .init();
//! ```

/// GitLab v3 API client.
///
/// Contains the request mediator, the static endpoint table with typed
/// wrappers, Rails-style params encoding, the error types and the
/// paginator.
pub mod api;

/// Client configuration.
///
/// Settings are stored in platform-specific locations:
/// - Linux: `~/.config/gitlab3/config.toml`
/// - macOS: `~/Library/Application Support/gitlab3/config.toml`
/// - Windows: `%APPDATA%\gitlab3\config.toml`
pub mod config;

/// Re-export of the request mediator.
pub use api::{BlockingClient, GitlabClient};

/// Re-export of the configuration structs.
///
/// # Example
///
/// ```rust,no_run
/// use gitlab3::{Config, GitlabClient};
///
/// let settings = Config::load()?.client_config(None)?.apply_env();
/// let client = GitlabClient::from_config(&settings)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub use config::{ClientConfig, Config, APP_NAME};

/// Library version, derived from Cargo.toml at compile time.
///
/// Sent as part of the default `User-Agent` (`gitlab3/<version>`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
