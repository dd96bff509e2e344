//
//  gitlab3
//  api/v3/projects.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Projects, project members, project hooks, events, forks and namespaces.
//!
//! Projects are addressed either by numeric id or by the URL-encoded
//! `namespace/name` path. Both forms are accepted wherever a `project_id`
//! is taken; the slash is encoded as `%2F` when the path is built.
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab3::api::GitlabClient;
//!
//! # async fn example(client: GitlabClient) -> gitlab3::api::common::Result<()> {
//! match client.get_project("gitlab-org/gitlab-ce").await? {
//!     Some(project) => println!("{} ({})", project.path_with_namespace, project.id),
//!     None => println!("no such project"),
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::users::UserBasic;
use crate::api::client::GitlabClient;
use crate::api::common::{EndpointPaginator, Result};
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

/// Visibility levels as GitLab v3 encodes them.
pub const VISIBILITY_PRIVATE: u8 = 0;
pub const VISIBILITY_INTERNAL: u8 = 10;
pub const VISIBILITY_PUBLIC: u8 = 20;

/// Member access levels.
pub const ACCESS_GUEST: u8 = 10;
pub const ACCESS_REPORTER: u8 = 20;
pub const ACCESS_DEVELOPER: u8 = 30;
pub const ACCESS_MASTER: u8 = 40;
pub const ACCESS_OWNER: u8 = 50;

/// A user or group namespace that owns projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub id: u64,
    pub name: String,
    pub path: String,
    /// `user` or `group`.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub path_with_namespace: String,
    #[serde(default)]
    pub name_with_namespace: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub visibility_level: Option<u8>,
    #[serde(default)]
    pub ssh_url_to_repo: Option<String>,
    #[serde(default)]
    pub http_url_to_repo: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub owner: Option<UserBasic>,
    #[serde(default)]
    pub namespace: Option<Namespace>,
    #[serde(default)]
    pub issues_enabled: Option<bool>,
    #[serde(default)]
    pub merge_requests_enabled: Option<bool>,
    #[serde(default)]
    pub wiki_enabled: Option<bool>,
    #[serde(default)]
    pub snippets_enabled: Option<bool>,
    #[serde(default)]
    pub archived: Option<bool>,
    #[serde(default)]
    pub star_count: Option<u64>,
    #[serde(default)]
    pub forks_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// A project member: a user plus their access level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: u64,
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    pub access_level: u8,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// A project web hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectHook {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub push_events: bool,
    #[serde(default)]
    pub issues_events: bool,
    #[serde(default)]
    pub merge_requests_events: bool,
    #[serde(default)]
    pub tag_push_events: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An entry of a project's activity feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub title: Option<String>,
    pub project_id: u64,
    pub action_name: String,
    #[serde(default)]
    pub target_id: Option<u64>,
    #[serde(default)]
    pub target_type: Option<String>,
    #[serde(default)]
    pub author_id: Option<u64>,
    #[serde(default)]
    pub author_username: Option<String>,
    /// Push details; shape varies by event type.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub target_title: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of [`GitlabClient::create_project`].
///
/// # Example
///
/// ```rust
/// use gitlab3::api::v3::{CreateProjectRequest, VISIBILITY_INTERNAL};
///
/// let request = CreateProjectRequest {
///     visibility_level: Some(VISIBILITY_INTERNAL),
///     ..CreateProjectRequest::new("tooling")
/// };
/// assert_eq!(request.name, "tooling");
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_requests_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippets_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_url: Option<String>,
}

impl CreateProjectRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

pub const LIST_PROJECTS: Endpoint = Endpoint::new("list_projects", Verb::Get, "/projects").paged();
pub const LIST_OWNED_PROJECTS: Endpoint =
    Endpoint::new("list_owned_projects", Verb::Get, "/projects/owned").paged();
pub const LIST_ALL_PROJECTS: Endpoint =
    Endpoint::new("list_all_projects", Verb::Get, "/projects/all").paged();
pub const SEARCH_PROJECTS: Endpoint =
    Endpoint::new("search_projects", Verb::Get, "/projects/search/:query").paged();
pub const GET_PROJECT: Endpoint = Endpoint::new("get_project", Verb::Get, "/projects/:project_id");
pub const LIST_PROJECT_EVENTS: Endpoint =
    Endpoint::new("list_project_events", Verb::Get, "/projects/:project_id/events").paged();
pub const CREATE_PROJECT: Endpoint =
    Endpoint::new("create_project", Verb::Post, "/projects").with_params();
pub const CREATE_PROJECT_FOR_USER: Endpoint =
    Endpoint::new("create_project_for_user", Verb::Post, "/projects/user/:user_id").with_params();
pub const EDIT_PROJECT: Endpoint =
    Endpoint::new("edit_project", Verb::Put, "/projects/:project_id").with_params();
pub const FORK_PROJECT: Endpoint =
    Endpoint::new("fork_project", Verb::Post, "/projects/fork/:project_id");
pub const DELETE_PROJECT: Endpoint =
    Endpoint::new("delete_project", Verb::Delete, "/projects/:project_id").no_value();
pub const SHARE_PROJECT: Endpoint =
    Endpoint::new("share_project", Verb::Post, "/projects/:project_id/share").with_params();

pub const LIST_PROJECT_MEMBERS: Endpoint =
    Endpoint::new("list_project_members", Verb::Get, "/projects/:project_id/members").paged();
pub const GET_PROJECT_MEMBER: Endpoint =
    Endpoint::new("get_project_member", Verb::Get, "/projects/:project_id/members/:user_id");
pub const ADD_PROJECT_MEMBER: Endpoint =
    Endpoint::new("add_project_member", Verb::Post, "/projects/:project_id/members").with_params();
pub const EDIT_PROJECT_MEMBER: Endpoint = Endpoint::new(
    "edit_project_member",
    Verb::Put,
    "/projects/:project_id/members/:user_id",
)
.with_params();
pub const REMOVE_PROJECT_MEMBER: Endpoint = Endpoint::new(
    "remove_project_member",
    Verb::Delete,
    "/projects/:project_id/members/:user_id",
)
.no_value();

pub const LIST_PROJECT_HOOKS: Endpoint =
    Endpoint::new("list_project_hooks", Verb::Get, "/projects/:project_id/hooks").paged();
pub const GET_PROJECT_HOOK: Endpoint =
    Endpoint::new("get_project_hook", Verb::Get, "/projects/:project_id/hooks/:hook_id");
pub const ADD_PROJECT_HOOK: Endpoint =
    Endpoint::new("add_project_hook", Verb::Post, "/projects/:project_id/hooks").with_params();
pub const EDIT_PROJECT_HOOK: Endpoint =
    Endpoint::new("edit_project_hook", Verb::Put, "/projects/:project_id/hooks/:hook_id")
        .with_params();
pub const DELETE_PROJECT_HOOK: Endpoint =
    Endpoint::new("delete_project_hook", Verb::Delete, "/projects/:project_id/hooks/:hook_id")
        .no_value();

pub const LIST_NAMESPACES: Endpoint = Endpoint::new("list_namespaces", Verb::Get, "/namespaces").paged();

impl GitlabClient {
    /// Projects visible to the current user.
    ///
    /// # Parameters
    ///
    /// Accepted params: `archived`, `order_by` (`id`, `name`, `path`,
    /// `created_at`, `updated_at`, `last_activity_at`), `sort`
    /// (`asc`/`desc`), `search`, `page`, `per_page`.
    pub async fn list_projects(&self, params: Option<&Params>) -> Result<Option<Vec<Project>>> {
        self.call(&LIST_PROJECTS, &PathArgs::new(), params).await
    }

    pub fn projects_paginator(&self, params: Params) -> Result<EndpointPaginator<Project>> {
        self.paginate(&LIST_PROJECTS, PathArgs::new(), params)
    }

    pub async fn list_owned_projects(
        &self,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Project>>> {
        self.call(&LIST_OWNED_PROJECTS, &PathArgs::new(), params).await
    }

    pub fn owned_projects_paginator(&self, params: Params) -> Result<EndpointPaginator<Project>> {
        self.paginate(&LIST_OWNED_PROJECTS, PathArgs::new(), params)
    }

    /// Every project on the instance. Admin only.
    pub async fn list_all_projects(&self, params: Option<&Params>) -> Result<Option<Vec<Project>>> {
        self.call(&LIST_ALL_PROJECTS, &PathArgs::new(), params).await
    }

    pub fn all_projects_paginator(&self, params: Params) -> Result<EndpointPaginator<Project>> {
        self.paginate(&LIST_ALL_PROJECTS, PathArgs::new(), params)
    }

    /// Projects whose name matches `query`.
    pub async fn search_projects(
        &self,
        query: &str,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Project>>> {
        let args = PathArgs::new().arg("query", query);
        self.call(&SEARCH_PROJECTS, &args, params).await
    }

    pub fn search_projects_paginator(
        &self,
        query: &str,
        params: Params,
    ) -> Result<EndpointPaginator<Project>> {
        self.paginate(&SEARCH_PROJECTS, PathArgs::new().arg("query", query), params)
    }

    /// Fetches a project by id or `namespace/name`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the project does not exist or is not visible.
    pub async fn get_project(&self, project_id: impl fmt::Display) -> Result<Option<Project>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&GET_PROJECT, &args, None).await
    }

    pub async fn list_project_events(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Event>>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&LIST_PROJECT_EVENTS, &args, params).await
    }

    pub fn project_events_paginator(
        &self,
        project_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<Event>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.paginate(&LIST_PROJECT_EVENTS, args, params)
    }

    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Option<Project>> {
        let params = Params::from_serialize(request)?;
        self.call(&CREATE_PROJECT, &PathArgs::new(), Some(&params)).await
    }

    /// Creates a project owned by another user. Admin only.
    pub async fn create_project_for_user(
        &self,
        user_id: u64,
        request: &CreateProjectRequest,
    ) -> Result<Option<Project>> {
        let params = Params::from_serialize(request)?;
        let args = PathArgs::new().arg("user_id", user_id);
        self.call(&CREATE_PROJECT_FOR_USER, &args, Some(&params)).await
    }

    pub async fn edit_project(
        &self,
        project_id: impl fmt::Display,
        params: &Params,
    ) -> Result<Option<Project>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&EDIT_PROJECT, &args, Some(params)).await
    }

    /// Forks a project into the current user's namespace.
    pub async fn fork_project(&self, project_id: impl fmt::Display) -> Result<Option<Project>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&FORK_PROJECT, &args, None).await
    }

    pub async fn delete_project(&self, project_id: impl fmt::Display) -> Result<()> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call_unit(&DELETE_PROJECT, &args, None).await
    }

    /// Shares a project with a group at the given access level.
    pub async fn share_project(
        &self,
        project_id: impl fmt::Display,
        group_id: u64,
        group_access: u8,
    ) -> Result<()> {
        let args = PathArgs::new().arg("project_id", project_id);
        let params = Params::new()
            .set("group_id", group_id)
            .set("group_access", group_access);
        self.call_unit(&SHARE_PROJECT, &args, Some(&params)).await
    }

    /// Lists members. Accepts `query` to filter by name.
    pub async fn list_project_members(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Member>>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&LIST_PROJECT_MEMBERS, &args, params).await
    }

    pub fn project_members_paginator(
        &self,
        project_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<Member>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.paginate(&LIST_PROJECT_MEMBERS, args, params)
    }

    pub async fn get_project_member(
        &self,
        project_id: impl fmt::Display,
        user_id: u64,
    ) -> Result<Option<Member>> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("user_id", user_id);
        self.call(&GET_PROJECT_MEMBER, &args, None).await
    }

    pub async fn add_project_member(
        &self,
        project_id: impl fmt::Display,
        user_id: u64,
        access_level: u8,
    ) -> Result<Option<Member>> {
        let args = PathArgs::new().arg("project_id", project_id);
        let params = Params::new()
            .set("user_id", user_id)
            .set("access_level", access_level);
        self.call(&ADD_PROJECT_MEMBER, &args, Some(&params)).await
    }

    pub async fn edit_project_member(
        &self,
        project_id: impl fmt::Display,
        user_id: u64,
        access_level: u8,
    ) -> Result<Option<Member>> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("user_id", user_id);
        let params = Params::new().set("access_level", access_level);
        self.call(&EDIT_PROJECT_MEMBER, &args, Some(&params)).await
    }

    pub async fn remove_project_member(
        &self,
        project_id: impl fmt::Display,
        user_id: u64,
    ) -> Result<()> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("user_id", user_id);
        self.call_unit(&REMOVE_PROJECT_MEMBER, &args, None).await
    }

    pub async fn list_project_hooks(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<ProjectHook>>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&LIST_PROJECT_HOOKS, &args, params).await
    }

    pub fn project_hooks_paginator(
        &self,
        project_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<ProjectHook>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.paginate(&LIST_PROJECT_HOOKS, args, params)
    }

    pub async fn get_project_hook(
        &self,
        project_id: impl fmt::Display,
        hook_id: u64,
    ) -> Result<Option<ProjectHook>> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("hook_id", hook_id);
        self.call(&GET_PROJECT_HOOK, &args, None).await
    }

    /// Adds a hook. Requires `url`; the `*_events` flags are optional.
    pub async fn add_project_hook(
        &self,
        project_id: impl fmt::Display,
        params: &Params,
    ) -> Result<Option<ProjectHook>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&ADD_PROJECT_HOOK, &args, Some(params)).await
    }

    pub async fn edit_project_hook(
        &self,
        project_id: impl fmt::Display,
        hook_id: u64,
        params: &Params,
    ) -> Result<Option<ProjectHook>> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("hook_id", hook_id);
        self.call(&EDIT_PROJECT_HOOK, &args, Some(params)).await
    }

    pub async fn delete_project_hook(
        &self,
        project_id: impl fmt::Display,
        hook_id: u64,
    ) -> Result<()> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("hook_id", hook_id);
        self.call_unit(&DELETE_PROJECT_HOOK, &args, None).await
    }

    /// Namespaces the current user can create projects in. Accepts `search`.
    pub async fn list_namespaces(&self, params: Option<&Params>) -> Result<Option<Vec<Namespace>>> {
        self.call(&LIST_NAMESPACES, &PathArgs::new(), params).await
    }

    pub fn namespaces_paginator(&self, params: Params) -> Result<EndpointPaginator<Namespace>> {
        self.paginate(&LIST_NAMESPACES, PathArgs::new(), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_project() {
        let project: Project = serde_json::from_value(json!({
            "id": 3,
            "name": "Diaspora Client",
            "path": "diaspora-client",
            "path_with_namespace": "diaspora/diaspora-client",
            "default_branch": "master",
            "public": false,
            "visibility_level": 0,
            "owner": {"id": 3, "username": "root", "name": "Administrator"},
            "namespace": {"id": 3, "name": "Diaspora", "path": "diaspora", "kind": "group"},
            "created_at": "2013-09-30T13:46:02Z",
            "last_activity_at": "2013-09-30T13:46:02Z"
        }))
        .unwrap();

        assert_eq!(project.path_with_namespace, "diaspora/diaspora-client");
        assert_eq!(project.visibility_level, Some(VISIBILITY_PRIVATE));
        assert_eq!(project.owner.unwrap().username, "root");
        assert_eq!(project.namespace.unwrap().kind.as_deref(), Some("group"));
        assert!(project.web_url.is_none());
    }

    #[test]
    fn test_create_request_skips_unset_fields() {
        let request = CreateProjectRequest {
            namespace_id: Some(7),
            wiki_enabled: Some(false),
            ..CreateProjectRequest::new("tooling")
        };
        let params = Params::from_serialize(&request).unwrap();
        assert_eq!(params.to_form(), "name=tooling&namespace_id=7&wiki_enabled=false");
    }
}
