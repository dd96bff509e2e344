//
//  gitlab3
//  config/hosts.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Host and Base URL Utilities
//!
//! Helpers for turning whatever a user typed (`gitlab.example.com`,
//! `https://gitlab.example.com/`, `https://gitlab.example.com/api/v3`) into
//! the canonical API root the client talks to.
//!
//! # Example
//!
//! ```rust
//! use gitlab3::config::{normalize_base_url, normalize_host};
//!
//! assert_eq!(
//!     normalize_base_url("gitlab.example.com/").unwrap(),
//!     "https://gitlab.example.com/api/v3"
//! );
//! assert_eq!(normalize_host("HTTPS://GitLab.com/"), "gitlab.com");
//! ```

use url::Url;

use crate::api::common::{Error, Result};

/// Hostname of the public GitLab instance.
pub const GITLAB_COM: &str = "gitlab.com";

/// Path prefix of the v3 REST API on every GitLab instance.
pub const API_V3_PREFIX: &str = "/api/v3";

/// Normalizes a host URL to a bare lowercase hostname.
///
/// Removes the protocol prefix, any trailing slash and surrounding
/// whitespace. Used for keys in the `[hosts]` table of the config file.
///
/// # Notes
///
/// - Does not validate that the result is a valid hostname
/// - Port numbers are kept
pub fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let host = host.strip_prefix("https://").unwrap_or(host);
    let host = host.strip_prefix("http://").unwrap_or(host);
    let host = host.trim_end_matches('/');
    host.to_lowercase()
}

/// Normalizes a user-supplied instance URL to the v3 API root.
///
/// - A missing scheme defaults to `https://`
/// - Trailing slashes are removed
/// - `/api/v3` is appended unless already present
///
/// # Errors
///
/// Returns [`Error::Config`] if the input is empty or does not parse as an
/// `http`/`https` URL.
///
/// # Examples
///
/// ```rust
/// use gitlab3::config::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("http://localhost:8080/gitlab/api/v3/").unwrap(),
///     "http://localhost:8080/gitlab/api/v3"
/// );
/// assert!(normalize_base_url("   ").is_err());
/// ```
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Config("GitLab base URL is empty".to_string()));
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let without_slash = with_scheme.trim_end_matches('/');
    let base = if without_slash.ends_with(API_V3_PREFIX) {
        without_slash.to_string()
    } else {
        format!("{without_slash}{API_V3_PREFIX}")
    };

    let parsed =
        Url::parse(&base).map_err(|e| Error::Config(format!("invalid base URL {raw:?}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(Error::Config(format!(
            "base URL {raw:?} must be an http(s) URL with a host"
        )));
    }

    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("https://gitlab.com"), "gitlab.com");
        assert_eq!(normalize_host("  HTTP://Git.Example.COM:8443/ "), "git.example.com:8443");
    }

    #[test]
    fn test_normalize_base_url_variants() {
        for input in [
            "gitlab.example.com",
            "https://gitlab.example.com",
            "https://gitlab.example.com/",
            "https://gitlab.example.com/api/v3",
            "https://gitlab.example.com/api/v3///",
        ] {
            assert_eq!(
                normalize_base_url(input).unwrap(),
                "https://gitlab.example.com/api/v3",
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_normalize_base_url_rejects_bad_input() {
        assert!(matches!(normalize_base_url(""), Err(Error::Config(_))));
        assert!(matches!(
            normalize_base_url("ftp://gitlab.example.com"),
            Err(Error::Config(_))
        ));
    }
}
