//
//  gitlab3
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loading, saving and resolving client settings from TOML files stored in
//! platform-specific directories, with environment variable overrides.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/gitlab3/config.toml`
//! - **macOS**: `~/Library/Application Support/gitlab3/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\gitlab3\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! default_host = "gitlab.example.com"
//!
//! [hosts."gitlab.example.com"]
//! base_url = "https://gitlab.example.com"
//! auth_mode = "header"
//! timeout_secs = 60
//!
//! [hosts."gitlab.com"]
//! base_url = "https://gitlab.com"
//! auth_mode = "query"
//! sudo = "ci-bot"
//! ```
//!
//! ## Environment Overrides
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `GITLAB_URL` | `base_url` |
//! | `GITLAB_TOKEN` | `token` |
//! | `GITLAB_SUDO` | `sudo` |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gitlab3::api::GitlabClient;
//! use gitlab3::config::Config;
//!
//! let config = Config::load()?;
//! let settings = config.client_config(None)?.apply_env();
//! let client = GitlabClient::from_config(&settings)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations
//! - [`hosts`]: Host name and base URL normalization

mod file;
mod hosts;

pub use file::*;
pub use hosts::*;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::client::AuthMode;

/// Application name used for the platform config directory.
pub const APP_NAME: &str = "gitlab3";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for one GitLab instance, everything a client is built from.
///
/// # Fields
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `base_url` | `https://<host key>` | Instance URL; `/api/v3` is appended when missing |
/// | `token` | `None` | Private token |
/// | `auth_mode` | `header` | `header` sends `PRIVATE-TOKEN`, `query` sends `private_token=` |
/// | `sudo` | `None` | Username or id to act as (admin tokens only) |
/// | `timeout_secs` | `30` | Per-request timeout passed to the transport |
/// | `accept_invalid_certs` | `false` | Skip TLS certificate validation |
/// | `user_agent` | `None` | Overrides `gitlab3/<version>` |
///
/// # Notes
///
/// - Prefer `GITLAB_TOKEN` over writing tokens to disk
/// - A host entry without `base_url` talks to the host it is keyed by;
///   [`Config::client_config`] fills it in
/// - `Debug` output never shows the token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default)]
    pub auth_mode: AuthMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sudo: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub accept_invalid_certs: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    format!("https://{GITLAB_COM}")
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            auth_mode: AuthMode::default(),
            sudo: None,
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
            user_agent: None,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("auth_mode", &self.auth_mode)
            .field("sudo", &self.sudo)
            .field("timeout_secs", &self.timeout_secs)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Settings for the given instance URL and token, other fields default.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Overlays `GITLAB_URL`, `GITLAB_TOKEN` and `GITLAB_SUDO` from the
    /// process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlays environment values read through `lookup`. Empty values are
    /// ignored.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = read("GITLAB_URL") {
            self.base_url = url;
        }
        if let Some(token) = read("GITLAB_TOKEN") {
            self.token = Some(token);
        }
        if let Some(sudo) = read("GITLAB_SUDO") {
            self.sudo = Some(sudo);
        }
        self
    }
}

/// Configuration file contents: a table of instances and a default.
///
/// # Examples
///
/// ```rust
/// use gitlab3::config::Config;
///
/// let config = Config::default();
/// let settings = config.client_config(None).unwrap();
/// assert_eq!(settings.base_url, "https://gitlab.com");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Host used when none is requested explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_host: Option<String>,

    /// Per-host settings, keyed by normalized hostname.
    #[serde(default)]
    pub hosts: HashMap<String, ClientConfig>,
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing configuration file is not an error; defaults are used.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = read_config_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Saves configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Returns the platform-specific path of `config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Looks up the stored entry for a hostname, normalizing the key first.
    ///
    /// The entry is returned as written; use
    /// [`client_config`](Self::client_config) for the resolved settings.
    pub fn host(&self, host: &str) -> Option<&ClientConfig> {
        self.hosts.get(&normalize_host(host))
    }

    /// Adds or replaces the settings for `host`.
    pub fn set_host(&mut self, host: &str, settings: ClientConfig) {
        self.hosts.insert(normalize_host(host), settings);
    }

    /// Resolves the settings for `host`, or for the default host when
    /// `None`.
    ///
    /// With no host requested and no `default_host`, a single configured
    /// host is used; with none configured, gitlab.com defaults apply. An
    /// entry without a `base_url` resolves to `https://<host key>`.
    ///
    /// # Errors
    ///
    /// Fails if the requested (or default) host is not configured, or if
    /// several hosts are configured and none is the default.
    pub fn client_config(&self, host: Option<&str>) -> Result<ClientConfig> {
        let wanted = host.or(self.default_host.as_deref());

        if let Some(wanted) = wanted {
            let key = normalize_host(wanted);
            return self
                .hosts
                .get(&key)
                .map(|settings| resolve_entry(&key, settings))
                .ok_or_else(|| anyhow::anyhow!("No configuration for host {wanted}"));
        }

        let mut entries = self.hosts.iter();
        match (entries.next(), entries.next()) {
            (None, _) => Ok(ClientConfig::default()),
            (Some((key, settings)), None) => Ok(resolve_entry(key, settings)),
            _ => anyhow::bail!(
                "Several hosts are configured; set default_host or pick one explicitly"
            ),
        }
    }
}

/// Fills in the base URL of a host entry from its key when it has none.
fn resolve_entry(key: &str, settings: &ClientConfig) -> ClientConfig {
    let mut settings = settings.clone();
    if settings.base_url.trim().is_empty() {
        settings.base_url = format!("https://{key}");
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_file() {
        let toml = r#"
            default_host = "gitlab.example.com"

            [hosts."gitlab.example.com"]
            base_url = "https://gitlab.example.com"
            timeout_secs = 60

            [hosts."gitlab.com"]
            auth_mode = "query"
            sudo = "ci-bot"
        "#;
        let config: Config = toml::from_str(toml).unwrap();

        let example = config.client_config(None).unwrap();
        assert_eq!(example.base_url, "https://gitlab.example.com");
        assert_eq!(example.timeout_secs, 60);
        assert_eq!(example.auth_mode, AuthMode::Header);

        let public = config.client_config(Some("https://GitLab.com/")).unwrap();
        assert_eq!(public.base_url, "https://gitlab.com");
        assert_eq!(public.auth_mode, AuthMode::Query);
        assert_eq!(public.sudo.as_deref(), Some("ci-bot"));
        assert_eq!(public.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_host_without_base_url_uses_its_key() {
        let toml = r#"
            default_host = "gitlab.example.com"

            [hosts."gitlab.example.com"]
            token = "example-secret"
        "#;
        let config: Config = toml::from_str(toml).unwrap();

        let settings = config.client_config(None).unwrap();
        assert_eq!(settings.base_url, "https://gitlab.example.com");
        assert_eq!(settings.token.as_deref(), Some("example-secret"));

        let explicit = config.client_config(Some("GitLab.Example.com")).unwrap();
        assert_eq!(explicit.base_url, "https://gitlab.example.com");
    }

    #[test]
    fn test_single_host_without_default_uses_its_key() {
        let toml = r#"
            [hosts."git.internal:8443"]
            token = "t"
        "#;
        let config: Config = toml::from_str(toml).unwrap();

        let settings = config.client_config(None).unwrap();
        assert_eq!(settings.base_url, "https://git.internal:8443");
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = ClientConfig::new("https://gitlab.example.com", "s3cret-token");
        let shown = format!("{settings:?}");
        assert!(shown.contains("<redacted>"));
        assert!(!shown.contains("s3cret-token"));

        let mut config = Config::default();
        config.set_host("gitlab.example.com", settings);
        assert!(!format!("{config:?}").contains("s3cret-token"));
    }

    #[test]
    fn test_unknown_host_is_error() {
        let config = Config::default();
        assert!(config.client_config(Some("gitlab.nowhere.dev")).is_err());
    }

    #[test]
    fn test_ambiguous_default_is_error() {
        let mut config = Config::default();
        config.set_host("a.example.com", ClientConfig::default());
        config.set_host("b.example.com", ClientConfig::default());
        assert!(config.client_config(None).is_err());
    }

    #[test]
    fn test_apply_env_with_overrides() {
        let env = |key: &str| match key {
            "GITLAB_URL" => Some("https://git.internal".to_string()),
            "GITLAB_TOKEN" => Some("s3cret".to_string()),
            "GITLAB_SUDO" => Some("  ".to_string()),
            _ => None,
        };
        let settings = ClientConfig::default().apply_env_with(env);
        assert_eq!(settings.base_url, "https://git.internal");
        assert_eq!(settings.token.as_deref(), Some("s3cret"));
        assert_eq!(settings.sudo, None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config {
            default_host: Some("gitlab.example.com".to_string()),
            ..Config::default()
        };
        config.set_host(
            "https://gitlab.example.com",
            ClientConfig {
                auth_mode: AuthMode::Query,
                ..ClientConfig::new("https://gitlab.example.com", "tok")
            },
        );

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "hosts = 5").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}
