//
//  gitlab3
//  api/endpoint.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Endpoint Descriptors and Path Templating
//!
//! Every GitLab v3 operation is declared once as a constant [`Endpoint`]. A
//! descriptor is pure data: the HTTP verb, the path template with `:name`
//! placeholders, and the shape of what goes in and comes out. The
//! [`GitlabClient`](crate::api::GitlabClient) turns a descriptor plus
//! [`PathArgs`] into a concrete request.
//!
//! # Example
//!
//! ```rust
//! use gitlab3::api::endpoint::{resolve_path, PathArgs};
//!
//! let args = PathArgs::new()
//!     .arg("project_id", "group/project")
//!     .arg("issue_id", 42);
//!
//! let path = resolve_path("/projects/:project_id/issues/:issue_id", &args).unwrap();
//! assert_eq!(path, "/projects/group%2Fproject/issues/42");
//! ```
//!
//! # Notes
//!
//! - Substituted values are percent-encoded as a single path segment
//! - Resolution fails before any network I/O when a placeholder is unfilled

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Method;

use crate::api::common::{Error, Result};

/// Matches `:name` placeholders inside a path template.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// HTTP verbs used by the GitLab v3 API.
///
/// `Get` and `Delete` send their params as a query string, `Post` and `Put`
/// send them as a form-encoded body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// Returns `true` when params travel in the request body.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// The uppercase wire name of the verb.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        match verb {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
        }
    }
}

/// Static declaration of one REST operation.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `name` | Stable identifier, matches the typed wrapper method name |
/// | `verb` | HTTP verb |
/// | `path` | Path template relative to the API root, with `:name` placeholders |
/// | `accepts_params` | Whether the endpoint takes query/body params |
/// | `returns_value` | Whether the decoded response is handed back to the caller |
/// | `paged` | Whether the endpoint honours `page`/`per_page` |
///
/// # Example
///
/// ```rust
/// use gitlab3::api::endpoint::{Endpoint, Verb};
///
/// const GET_ISSUE: Endpoint = Endpoint::new("get_issue", Verb::Get, "/projects/:project_id/issues/:issue_id");
///
/// assert_eq!(GET_ISSUE.placeholders(), vec!["project_id", "issue_id"]);
/// assert!(GET_ISSUE.returns_value);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub name: &'static str,
    pub verb: Verb,
    pub path: &'static str,
    pub accepts_params: bool,
    pub returns_value: bool,
    pub paged: bool,
}

impl Endpoint {
    /// Declares an endpoint that returns a value and takes no params.
    pub const fn new(name: &'static str, verb: Verb, path: &'static str) -> Self {
        Self {
            name,
            verb,
            path,
            accepts_params: false,
            returns_value: true,
            paged: false,
        }
    }

    /// Marks the endpoint as accepting params.
    pub const fn with_params(mut self) -> Self {
        self.accepts_params = true;
        self
    }

    /// Marks the endpoint as a paged collection. Paged endpoints always
    /// accept params since `page`/`per_page` travel as params.
    pub const fn paged(mut self) -> Self {
        self.accepts_params = true;
        self.paged = true;
        self
    }

    /// Marks the endpoint as returning nothing to the caller.
    pub const fn no_value(mut self) -> Self {
        self.returns_value = false;
        self
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> Vec<&'static str> {
        PLACEHOLDER
            .captures_iter(self.path)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect()
    }

    /// Resolves this endpoint's path template with the given arguments.
    pub fn resolve(&self, args: &PathArgs) -> Result<String> {
        resolve_path(self.path, args)
    }
}

/// Ordered values for the placeholders of a path template.
///
/// Values are captured through `Display`, so numeric ids, strings and
/// `namespace/project` paths can all be passed as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs {
    args: Vec<(&'static str, String)>,
}

impl PathArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value for the `:name` placeholder.
    pub fn arg(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.args.push((name, value.to_string()));
        self
    }

    /// Looks up the value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.args.iter().map(|(name, _)| *name)
    }
}

/// Substitutes every `:name` placeholder in `template` with its
/// percent-encoded value from `args`.
///
/// # Errors
///
/// - [`Error::MissingPathArg`] when a placeholder has no value
/// - [`Error::UnusedPathArg`] when an argument matches no placeholder
pub fn resolve_path(template: &str, args: &PathArgs) -> Result<String> {
    let mut resolved = String::with_capacity(template.len());
    let mut last = 0;
    let mut used = Vec::new();

    for caps in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = args.get(name.as_str()).ok_or_else(|| Error::MissingPathArg {
            template: template.to_string(),
            name: name.as_str().to_string(),
        })?;

        resolved.push_str(&template[last..whole.start()]);
        resolved.push_str(&urlencoding::encode(value));
        last = whole.end();
        used.push(name.as_str());
    }
    resolved.push_str(&template[last..]);

    if let Some(stray) = args.names().find(|name| !used.contains(name)) {
        return Err(Error::UnusedPathArg {
            template: template.to_string(),
            name: stray.to_string(),
        });
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_simple_template() {
        let args = PathArgs::new().arg("user_id", 7);
        assert_eq!(resolve_path("/users/:user_id", &args).unwrap(), "/users/7");
    }

    #[test]
    fn test_resolve_encodes_segments() {
        let args = PathArgs::new()
            .arg("project_id", "my group/my project")
            .arg("branch", "feature/x");
        let path = resolve_path(
            "/projects/:project_id/repository/branches/:branch",
            &args,
        )
        .unwrap();
        assert_eq!(
            path,
            "/projects/my%20group%2Fmy%20project/repository/branches/feature%2Fx"
        );
    }

    #[test]
    fn test_resolve_without_placeholders() {
        assert_eq!(resolve_path("/user", &PathArgs::new()).unwrap(), "/user");
    }

    #[test]
    fn test_missing_arg_is_contract_error() {
        let args = PathArgs::new().arg("project_id", 1);
        let err = resolve_path("/projects/:project_id/issues/:issue_id", &args).unwrap_err();
        match err {
            Error::MissingPathArg { name, .. } => assert_eq!(name, "issue_id"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unused_arg_is_contract_error() {
        let args = PathArgs::new().arg("user_id", 1).arg("key_id", 2);
        let err = resolve_path("/users/:user_id", &args).unwrap_err();
        assert!(matches!(err, Error::UnusedPathArg { ref name, .. } if name == "key_id"));
    }

    #[test]
    fn test_value_with_colon_is_not_rescanned() {
        let args = PathArgs::new().arg("query", ":user_id");
        let path = resolve_path("/projects/search/:query", &args).unwrap();
        assert_eq!(path, "/projects/search/%3Auser_id");
    }

    #[test]
    fn test_endpoint_builders() {
        const LIST: Endpoint = Endpoint::new("list", Verb::Get, "/projects").paged();
        const DELETE: Endpoint = Endpoint::new("delete", Verb::Delete, "/projects/:project_id").no_value();

        assert!(LIST.paged && LIST.accepts_params && LIST.returns_value);
        assert!(!DELETE.returns_value && !DELETE.accepts_params);
        assert_eq!(DELETE.placeholders(), vec!["project_id"]);
    }

    #[test]
    fn test_verb_body_placement() {
        assert!(Verb::Post.has_body());
        assert!(Verb::Put.has_body());
        assert!(!Verb::Get.has_body());
        assert!(!Verb::Delete.has_body());
        assert_eq!(Method::from(Verb::Delete), Method::DELETE);
        assert_eq!(Verb::Put.to_string(), "PUT");
    }
}
