//
//  gitlab3
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the GitLab v3 Client
//!
//! This module provides the error types shared by every part of the client
//! and re-exports the pagination machinery.
//!
//! # Overview
//!
//! - [`Error`] - Unified error type for all client operations
//! - [`ApiError`] - A non-success HTTP response, with its status and body
//! - Pagination types (re-exported from [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use gitlab3::api::common::{ApiError, Error};
//!
//! fn describe(result: Result<(), Error>) -> String {
//!     match result {
//!         Ok(()) => "ok".to_string(),
//!         Err(Error::Api(e)) if e.is_forbidden() => "permission denied".to_string(),
//!         Err(Error::Api(e)) if e.is_validation_error() => format!("rejected: {}", e.message()),
//!         Err(e) => format!("error: {e}"),
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! - A GET answered with 404 is not an error; the client returns `Ok(None)`
//! - Contract errors (bad path args, bad params) fail before any network I/O

use std::fmt;

use thiserror::Error;

use crate::api::endpoint::Verb;

pub mod pagination;

pub use pagination::*;

/// Result alias used throughout the client.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for all GitLab client operations.
///
/// # Variants
///
/// | Variant | Raised when | Network I/O happened |
/// |---------|-------------|----------------------|
/// | `Api` | Non-2xx status (except 404 on GET) | Yes |
/// | `Network` | Connection, DNS, TLS or timeout failure | Attempted |
/// | `Decode` | 2xx body is not the expected JSON | Yes |
/// | `MissingPathArg` | A `:name` placeholder has no value | No |
/// | `UnusedPathArg` | A path arg matches no placeholder | No |
/// | `InvalidParams` | Params are malformed or not accepted | No |
/// | `PaginatorMode` | `next` and `next_page` mixed on one paginator | No |
/// | `Config` | Invalid base URL or configuration | No |
///
/// # Notes
///
/// - Nothing is retried internally; retry policy belongs to the caller
/// - The `Network` variant automatically converts from `reqwest::Error`
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a non-success status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A transport-level failure, carried unchanged from `reqwest`.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A successful response whose body could not be decoded.
    #[error("Failed to decode {verb} {path} response (status {status}): {source}")]
    Decode {
        status: u16,
        verb: Verb,
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A path template placeholder was left unfilled.
    #[error("Missing value for `:{name}` in path template {template}")]
    MissingPathArg { template: String, name: String },

    /// A path argument was supplied that the template does not use.
    #[error("Path argument `{name}` is not used by path template {template}")]
    UnusedPathArg { template: String, name: String },

    /// Params were malformed or passed to an endpoint that takes none.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// `next` and `next_page` were mixed on one paginator.
    #[error("Paginator is already iterating by {active}; {attempted} is not allowed")]
    PaginatorMode {
        active: &'static str,
        attempted: &'static str,
    },

    /// The client configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The runtime behind [`BlockingClient`](crate::api::blocking::BlockingClient)
    /// could not be started.
    #[error("Failed to start the blocking runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl Error {
    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => Some(e.status),
            Self::Decode { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns the [`ApiError`] when this is an API failure.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// A non-success response from the GitLab API.
///
/// Carries everything needed to decide between retrying and aborting: the
/// exact status code, the request verb and resolved path, and the raw
/// response body.
///
/// # Example
///
/// ```rust
/// use gitlab3::api::common::ApiError;
/// use gitlab3::api::endpoint::Verb;
///
/// let err = ApiError::new(403, Verb::Delete, "/projects/5", r#"{"message":"403 Forbidden"}"#);
///
/// assert!(err.is_forbidden());
/// assert_eq!(err.message(), "403 Forbidden");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code, preserved exactly.
    pub status: u16,
    /// Verb of the failed request.
    pub verb: Verb,
    /// Resolved request path, relative to the API root.
    pub path: String,
    /// Raw response body, kept for diagnostics.
    pub body: String,
}

impl ApiError {
    pub fn new(status: u16, verb: Verb, path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            verb,
            path: path.into(),
            body: body.into(),
        }
    }

    /// Extracts a human-readable message from the response body.
    ///
    /// GitLab reports errors as `{"message": ...}` where the message is
    /// either a string or a map of field names to lists of validation
    /// messages. Some endpoints use `{"error": "..."}` instead. If neither
    /// shape parses, the raw body is returned.
    pub fn message(&self) -> String {
        let Ok(json) = serde_json::from_str::<serde_json::Value>(&self.body) else {
            return self.body.trim().to_string();
        };

        match json.get("message") {
            Some(serde_json::Value::String(message)) => return message.clone(),
            Some(serde_json::Value::Object(fields)) => {
                let mut parts = Vec::new();
                for (field, problems) in fields {
                    match problems {
                        serde_json::Value::Array(list) => {
                            for problem in list.iter().filter_map(|p| p.as_str()) {
                                parts.push(format!("{field} {problem}"));
                            }
                        }
                        serde_json::Value::String(problem) => {
                            parts.push(format!("{field} {problem}"))
                        }
                        _ => {}
                    }
                }
                if !parts.is_empty() {
                    return parts.join(", ");
                }
            }
            _ => {}
        }

        if let Some(error) = json.get("error").and_then(|e| e.as_str()) {
            return error.to_string();
        }

        self.body.trim().to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    pub fn is_forbidden(&self) -> bool {
        self.status == 403
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_conflict(&self) -> bool {
        self.status == 409
    }

    /// 400 and 422, the statuses GitLab uses for rejected input.
    pub fn is_validation_error(&self) -> bool {
        matches!(self.status, 400 | 422)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GitLab API error {} on {} {}: {}",
            self.status,
            self.verb,
            self.path,
            self.message()
        )
    }
}

impl std::error::Error for ApiError {}
