//
//  gitlab3
//  api/v3/groups.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Groups and group members.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::projects::{Member, Project};
use crate::api::client::GitlabClient;
use crate::api::common::{EndpointPaginator, Result};
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner_id: Option<u64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// A group together with its projects, as returned by
/// [`GitlabClient::get_group`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupDetail {
    #[serde(flatten)]
    pub group: Group,
    #[serde(default)]
    pub projects: Vec<Project>,
}

pub const LIST_GROUPS: Endpoint = Endpoint::new("list_groups", Verb::Get, "/groups").paged();
pub const GET_GROUP: Endpoint = Endpoint::new("get_group", Verb::Get, "/groups/:group_id");
pub const CREATE_GROUP: Endpoint =
    Endpoint::new("create_group", Verb::Post, "/groups").with_params();
pub const DELETE_GROUP: Endpoint =
    Endpoint::new("delete_group", Verb::Delete, "/groups/:group_id").no_value();
pub const TRANSFER_PROJECT_TO_GROUP: Endpoint = Endpoint::new(
    "transfer_project_to_group",
    Verb::Post,
    "/groups/:group_id/projects/:project_id",
);
pub const LIST_GROUP_MEMBERS: Endpoint =
    Endpoint::new("list_group_members", Verb::Get, "/groups/:group_id/members").paged();
pub const ADD_GROUP_MEMBER: Endpoint =
    Endpoint::new("add_group_member", Verb::Post, "/groups/:group_id/members").with_params();
pub const REMOVE_GROUP_MEMBER: Endpoint =
    Endpoint::new("remove_group_member", Verb::Delete, "/groups/:group_id/members/:user_id")
        .no_value();

impl GitlabClient {
    /// Groups visible to the current user. Accepts `search`.
    pub async fn list_groups(&self, params: Option<&Params>) -> Result<Option<Vec<Group>>> {
        self.call(&LIST_GROUPS, &PathArgs::new(), params).await
    }

    pub fn groups_paginator(&self, params: Params) -> Result<EndpointPaginator<Group>> {
        self.paginate(&LIST_GROUPS, PathArgs::new(), params)
    }

    /// Fetches a group by id or path, with its projects.
    pub async fn get_group(&self, group_id: impl fmt::Display) -> Result<Option<GroupDetail>> {
        let args = PathArgs::new().arg("group_id", group_id);
        self.call(&GET_GROUP, &args, None).await
    }

    pub async fn create_group(
        &self,
        name: &str,
        path: &str,
        description: Option<&str>,
    ) -> Result<Option<Group>> {
        let params = Params::new()
            .set("name", name)
            .set("path", path)
            .set("description", description);
        self.call(&CREATE_GROUP, &PathArgs::new(), Some(&params)).await
    }

    pub async fn delete_group(&self, group_id: impl fmt::Display) -> Result<()> {
        let args = PathArgs::new().arg("group_id", group_id);
        self.call_unit(&DELETE_GROUP, &args, None).await
    }

    /// Moves a project into a group. Admin only.
    pub async fn transfer_project_to_group(
        &self,
        group_id: impl fmt::Display,
        project_id: impl fmt::Display,
    ) -> Result<Option<GroupDetail>> {
        let args = PathArgs::new()
            .arg("group_id", group_id)
            .arg("project_id", project_id);
        self.call(&TRANSFER_PROJECT_TO_GROUP, &args, None).await
    }

    pub async fn list_group_members(
        &self,
        group_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Member>>> {
        let args = PathArgs::new().arg("group_id", group_id);
        self.call(&LIST_GROUP_MEMBERS, &args, params).await
    }

    pub fn group_members_paginator(
        &self,
        group_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<Member>> {
        let args = PathArgs::new().arg("group_id", group_id);
        self.paginate(&LIST_GROUP_MEMBERS, args, params)
    }

    pub async fn add_group_member(
        &self,
        group_id: impl fmt::Display,
        user_id: u64,
        access_level: u8,
    ) -> Result<Option<Member>> {
        let args = PathArgs::new().arg("group_id", group_id);
        let params = Params::new()
            .set("user_id", user_id)
            .set("access_level", access_level);
        self.call(&ADD_GROUP_MEMBER, &args, Some(&params)).await
    }

    pub async fn remove_group_member(&self, group_id: impl fmt::Display, user_id: u64) -> Result<()> {
        let args = PathArgs::new()
            .arg("group_id", group_id)
            .arg("user_id", user_id);
        self.call_unit(&REMOVE_GROUP_MEMBER, &args, None).await
    }
}
