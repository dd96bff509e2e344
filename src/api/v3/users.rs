//
//  gitlab3
//  api/v3/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Users, SSH keys and sessions.
//!
//! Creating, editing, blocking and deleting users needs an admin token.
//! Every other call works for the authenticated user.
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab3::api::{GitlabClient, Params};
//!
//! # async fn example(client: GitlabClient) -> gitlab3::api::common::Result<()> {
//! if let Some(me) = client.current_user().await? {
//!     println!("Logged in as {}", me.username);
//! }
//!
//! let mut users = client.users_paginator(Params::new().set("per_page", 100))?;
//! while let Some(user) = users.next().await? {
//!     println!("{} <{}>", user.username, user.email.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::GitlabClient;
use crate::api::common::{EndpointPaginator, Result};
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

/// A GitLab user account.
///
/// Which fields are present depends on who asks: admins see everything,
/// other users see the public profile. `private_token` only comes back from
/// [`GitlabClient::session`] and [`GitlabClient::current_user`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// `active` or `blocked`.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skype: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub extern_uid: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub theme_id: Option<u32>,
    #[serde(default)]
    pub color_scheme_id: Option<u32>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    pub can_create_group: Option<bool>,
    #[serde(default)]
    pub can_create_project: Option<bool>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub private_token: Option<String>,
}

/// Abbreviated user embedded in other resources (authors, assignees).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBasic {
    pub id: u64,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// A public SSH key attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshKey {
    pub id: u64,
    pub title: String,
    pub key: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

pub const LIST_USERS: Endpoint = Endpoint::new("list_users", Verb::Get, "/users").paged();
pub const GET_USER: Endpoint = Endpoint::new("get_user", Verb::Get, "/users/:user_id");
pub const CREATE_USER: Endpoint = Endpoint::new("create_user", Verb::Post, "/users").with_params();
pub const EDIT_USER: Endpoint = Endpoint::new("edit_user", Verb::Put, "/users/:user_id").with_params();
pub const DELETE_USER: Endpoint = Endpoint::new("delete_user", Verb::Delete, "/users/:user_id").no_value();
pub const BLOCK_USER: Endpoint = Endpoint::new("block_user", Verb::Put, "/users/:user_id/block").no_value();
pub const UNBLOCK_USER: Endpoint = Endpoint::new("unblock_user", Verb::Put, "/users/:user_id/unblock").no_value();
pub const CURRENT_USER: Endpoint = Endpoint::new("current_user", Verb::Get, "/user");
pub const LIST_SSH_KEYS: Endpoint = Endpoint::new("list_ssh_keys", Verb::Get, "/user/keys");
pub const LIST_USER_SSH_KEYS: Endpoint = Endpoint::new("list_user_ssh_keys", Verb::Get, "/users/:user_id/keys");
pub const GET_SSH_KEY: Endpoint = Endpoint::new("get_ssh_key", Verb::Get, "/user/keys/:key_id");
pub const ADD_SSH_KEY: Endpoint = Endpoint::new("add_ssh_key", Verb::Post, "/user/keys").with_params();
pub const ADD_SSH_KEY_FOR_USER: Endpoint =
    Endpoint::new("add_ssh_key_for_user", Verb::Post, "/users/:user_id/keys").with_params();
pub const DELETE_SSH_KEY: Endpoint = Endpoint::new("delete_ssh_key", Verb::Delete, "/user/keys/:key_id").no_value();
pub const DELETE_SSH_KEY_FOR_USER: Endpoint =
    Endpoint::new("delete_ssh_key_for_user", Verb::Delete, "/users/:user_id/keys/:key_id").no_value();
pub const SESSION: Endpoint = Endpoint::new("session", Verb::Post, "/session").with_params();

impl GitlabClient {
    /// Lists users. Filters: `search`, `username`, `active`, `blocked`.
    pub async fn list_users(&self, params: Option<&Params>) -> Result<Option<Vec<User>>> {
        self.call(&LIST_USERS, &PathArgs::new(), params).await
    }

    pub fn users_paginator(&self, params: Params) -> Result<EndpointPaginator<User>> {
        self.paginate(&LIST_USERS, PathArgs::new(), params)
    }

    pub async fn get_user(&self, user_id: u64) -> Result<Option<User>> {
        let args = PathArgs::new().arg("user_id", user_id);
        self.call(&GET_USER, &args, None).await
    }

    /// Creates a user. Requires `email`, `password`, `username` and `name`.
    pub async fn create_user(&self, params: &Params) -> Result<Option<User>> {
        self.call(&CREATE_USER, &PathArgs::new(), Some(params)).await
    }

    pub async fn edit_user(&self, user_id: u64, params: &Params) -> Result<Option<User>> {
        let args = PathArgs::new().arg("user_id", user_id);
        self.call(&EDIT_USER, &args, Some(params)).await
    }

    pub async fn delete_user(&self, user_id: u64) -> Result<()> {
        let args = PathArgs::new().arg("user_id", user_id);
        self.call_unit(&DELETE_USER, &args, None).await
    }

    pub async fn block_user(&self, user_id: u64) -> Result<()> {
        let args = PathArgs::new().arg("user_id", user_id);
        self.call_unit(&BLOCK_USER, &args, None).await
    }

    pub async fn unblock_user(&self, user_id: u64) -> Result<()> {
        let args = PathArgs::new().arg("user_id", user_id);
        self.call_unit(&UNBLOCK_USER, &args, None).await
    }

    /// The user the token belongs to.
    pub async fn current_user(&self) -> Result<Option<User>> {
        self.call(&CURRENT_USER, &PathArgs::new(), None).await
    }

    pub async fn list_ssh_keys(&self) -> Result<Option<Vec<SshKey>>> {
        self.call(&LIST_SSH_KEYS, &PathArgs::new(), None).await
    }

    pub async fn list_user_ssh_keys(&self, user_id: u64) -> Result<Option<Vec<SshKey>>> {
        let args = PathArgs::new().arg("user_id", user_id);
        self.call(&LIST_USER_SSH_KEYS, &args, None).await
    }

    pub async fn get_ssh_key(&self, key_id: u64) -> Result<Option<SshKey>> {
        let args = PathArgs::new().arg("key_id", key_id);
        self.call(&GET_SSH_KEY, &args, None).await
    }

    /// Adds a key for the current user. Requires `title` and `key`.
    pub async fn add_ssh_key(&self, params: &Params) -> Result<Option<SshKey>> {
        self.call(&ADD_SSH_KEY, &PathArgs::new(), Some(params)).await
    }

    pub async fn add_ssh_key_for_user(&self, user_id: u64, params: &Params) -> Result<Option<SshKey>> {
        let args = PathArgs::new().arg("user_id", user_id);
        self.call(&ADD_SSH_KEY_FOR_USER, &args, Some(params)).await
    }

    pub async fn delete_ssh_key(&self, key_id: u64) -> Result<()> {
        let args = PathArgs::new().arg("key_id", key_id);
        self.call_unit(&DELETE_SSH_KEY, &args, None).await
    }

    pub async fn delete_ssh_key_for_user(&self, user_id: u64, key_id: u64) -> Result<()> {
        let args = PathArgs::new().arg("user_id", user_id).arg("key_id", key_id);
        self.call_unit(&DELETE_SSH_KEY_FOR_USER, &args, None).await
    }

    /// Exchanges credentials for the user record, including its
    /// `private_token`.
    ///
    /// `login` may be a username or an email address.
    pub async fn session(&self, login: &str, password: &str) -> Result<Option<User>> {
        let params = Params::new().set("login", login).set("password", password);
        self.call(&SESSION, &PathArgs::new(), Some(&params)).await
    }
}
