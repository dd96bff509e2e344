//
//  gitlab3
//  api/v3/snippets.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project snippets.
//!
//! The raw snippet body (`/snippets/:id/raw`) is plain text rather than JSON
//! and is not part of this table.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::users::UserBasic;
use crate::api::client::GitlabClient;
use crate::api::common::{EndpointPaginator, Result};
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    pub id: u64,
    pub title: String,
    pub file_name: String,
    #[serde(default)]
    pub author: Option<UserBasic>,
    #[serde(default)]
    pub expires_at: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

pub const LIST_SNIPPETS: Endpoint =
    Endpoint::new("list_snippets", Verb::Get, "/projects/:project_id/snippets").paged();
pub const GET_SNIPPET: Endpoint =
    Endpoint::new("get_snippet", Verb::Get, "/projects/:project_id/snippets/:snippet_id");
pub const CREATE_SNIPPET: Endpoint =
    Endpoint::new("create_snippet", Verb::Post, "/projects/:project_id/snippets").with_params();
pub const EDIT_SNIPPET: Endpoint =
    Endpoint::new("edit_snippet", Verb::Put, "/projects/:project_id/snippets/:snippet_id")
        .with_params();
pub const DELETE_SNIPPET: Endpoint =
    Endpoint::new("delete_snippet", Verb::Delete, "/projects/:project_id/snippets/:snippet_id")
        .no_value();

fn snippet(project_id: impl fmt::Display, snippet_id: u64) -> PathArgs {
    PathArgs::new()
        .arg("project_id", project_id)
        .arg("snippet_id", snippet_id)
}

impl GitlabClient {
    pub async fn list_snippets(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Snippet>>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&LIST_SNIPPETS, &args, params).await
    }

    pub fn snippets_paginator(
        &self,
        project_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<Snippet>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.paginate(&LIST_SNIPPETS, args, params)
    }

    pub async fn get_snippet(
        &self,
        project_id: impl fmt::Display,
        snippet_id: u64,
    ) -> Result<Option<Snippet>> {
        self.call(&GET_SNIPPET, &snippet(project_id, snippet_id), None)
            .await
    }

    /// Creates a snippet. `visibility_level` may be passed in `params`.
    pub async fn create_snippet(
        &self,
        project_id: impl fmt::Display,
        title: &str,
        file_name: &str,
        code: &str,
        params: Option<&Params>,
    ) -> Result<Option<Snippet>> {
        let args = PathArgs::new().arg("project_id", project_id);
        let params = params
            .cloned()
            .unwrap_or_default()
            .merged("title", title)
            .merged("file_name", file_name)
            .merged("code", code);
        self.call(&CREATE_SNIPPET, &args, Some(&params)).await
    }

    /// Updates `title`, `file_name`, `code` or `visibility_level`.
    pub async fn edit_snippet(
        &self,
        project_id: impl fmt::Display,
        snippet_id: u64,
        params: &Params,
    ) -> Result<Option<Snippet>> {
        self.call(&EDIT_SNIPPET, &snippet(project_id, snippet_id), Some(params))
            .await
    }

    pub async fn delete_snippet(&self, project_id: impl fmt::Display, snippet_id: u64) -> Result<()> {
        self.call_unit(&DELETE_SNIPPET, &snippet(project_id, snippet_id), None)
            .await
    }
}
