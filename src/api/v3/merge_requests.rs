//
//  gitlab3
//  api/v3/merge_requests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Merge requests, their changes and comments.
//!
//! The v3 API addresses a single merge request under the singular
//! `/merge_request/:merge_request_id` path while listing and creation use
//! the plural `/merge_requests`. `merge_request_id` is the global id, not
//! the project-scoped `iid`.
//!
//! # Example
//!
//! ```rust,no_run
//! use gitlab3::api::GitlabClient;
//! use gitlab3::api::v3::CreateMergeRequestRequest;
//!
//! # async fn example(client: GitlabClient) -> gitlab3::api::common::Result<()> {
//! let request = CreateMergeRequestRequest::new("feature/login", "master", "Add login");
//! if let Some(mr) = client.create_merge_request(42, &request).await? {
//!     println!("Opened !{} ({})", mr.iid, mr.state);
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::issues::Milestone;
use super::repository::Diff;
use super::users::UserBasic;
use crate::api::client::GitlabClient;
use crate::api::common::{EndpointPaginator, Result};
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// `opened`, `closed`, `merged` or `reopened`.
    pub state: String,
    pub source_branch: String,
    pub target_branch: String,
    #[serde(default)]
    pub source_project_id: Option<u64>,
    #[serde(default)]
    pub target_project_id: Option<u64>,
    #[serde(default)]
    pub author: Option<UserBasic>,
    #[serde(default)]
    pub assignee: Option<UserBasic>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    #[serde(default)]
    pub work_in_progress: bool,
    #[serde(default)]
    pub merge_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A merge request together with its file diffs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequestChanges {
    #[serde(flatten)]
    pub merge_request: MergeRequest,
    #[serde(default)]
    pub changes: Vec<Diff>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequestComment {
    pub note: String,
    #[serde(default)]
    pub author: Option<UserBasic>,
}

/// Body of [`GitlabClient::create_merge_request`].
///
/// # Fields
///
/// | Field | Required | Notes |
/// |-------|----------|-------|
/// | `source_branch` | yes | |
/// | `target_branch` | yes | |
/// | `title` | yes | |
/// | `assignee_id` | no | |
/// | `target_project_id` | no | For merge requests from a fork |
/// | `description` | no | |
/// | `labels` | no | Sent comma-separated |
/// | `milestone_id` | no | |
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateMergeRequestRequest {
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_project_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
}

impl CreateMergeRequestRequest {
    pub fn new(
        source_branch: impl Into<String>,
        target_branch: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            source_branch: source_branch.into(),
            target_branch: target_branch.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the labels from a list, joined the way GitLab expects.
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined: Vec<String> = labels.into_iter().map(|l| l.as_ref().to_string()).collect();
        self.labels = Some(joined.join(","));
        self
    }
}

pub const LIST_MERGE_REQUESTS: Endpoint = Endpoint::new(
    "list_merge_requests",
    Verb::Get,
    "/projects/:project_id/merge_requests",
)
.paged();
pub const GET_MERGE_REQUEST: Endpoint = Endpoint::new(
    "get_merge_request",
    Verb::Get,
    "/projects/:project_id/merge_request/:merge_request_id",
);
pub const GET_MERGE_REQUEST_CHANGES: Endpoint = Endpoint::new(
    "get_merge_request_changes",
    Verb::Get,
    "/projects/:project_id/merge_request/:merge_request_id/changes",
);
pub const CREATE_MERGE_REQUEST: Endpoint = Endpoint::new(
    "create_merge_request",
    Verb::Post,
    "/projects/:project_id/merge_requests",
)
.with_params();
pub const EDIT_MERGE_REQUEST: Endpoint = Endpoint::new(
    "edit_merge_request",
    Verb::Put,
    "/projects/:project_id/merge_request/:merge_request_id",
)
.with_params();
pub const ACCEPT_MERGE_REQUEST: Endpoint = Endpoint::new(
    "accept_merge_request",
    Verb::Put,
    "/projects/:project_id/merge_request/:merge_request_id/merge",
)
.with_params();
pub const LIST_MERGE_REQUEST_COMMENTS: Endpoint = Endpoint::new(
    "list_merge_request_comments",
    Verb::Get,
    "/projects/:project_id/merge_request/:merge_request_id/comments",
)
.paged();
pub const ADD_MERGE_REQUEST_COMMENT: Endpoint = Endpoint::new(
    "add_merge_request_comment",
    Verb::Post,
    "/projects/:project_id/merge_request/:merge_request_id/comments",
)
.with_params();

fn merge_request(project_id: impl fmt::Display, merge_request_id: u64) -> PathArgs {
    PathArgs::new()
        .arg("project_id", project_id)
        .arg("merge_request_id", merge_request_id)
}

impl GitlabClient {
    /// Lists merge requests.
    ///
    /// # Parameters
    ///
    /// | Param | Values |
    /// |-------|--------|
    /// | `state` | `opened`, `closed`, `merged`, `all` |
    /// | `order_by` | `created_at`, `updated_at` |
    /// | `sort` | `asc`, `desc` |
    /// | `iid` | project-scoped id filter |
    pub async fn list_merge_requests(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<MergeRequest>>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&LIST_MERGE_REQUESTS, &args, params).await
    }

    pub fn merge_requests_paginator(
        &self,
        project_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<MergeRequest>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.paginate(&LIST_MERGE_REQUESTS, args, params)
    }

    pub async fn get_merge_request(
        &self,
        project_id: impl fmt::Display,
        merge_request_id: u64,
    ) -> Result<Option<MergeRequest>> {
        let args = merge_request(project_id, merge_request_id);
        self.call(&GET_MERGE_REQUEST, &args, None).await
    }

    pub async fn get_merge_request_changes(
        &self,
        project_id: impl fmt::Display,
        merge_request_id: u64,
    ) -> Result<Option<MergeRequestChanges>> {
        let args = merge_request(project_id, merge_request_id);
        self.call(&GET_MERGE_REQUEST_CHANGES, &args, None).await
    }

    pub async fn create_merge_request(
        &self,
        project_id: impl fmt::Display,
        request: &CreateMergeRequestRequest,
    ) -> Result<Option<MergeRequest>> {
        let args = PathArgs::new().arg("project_id", project_id);
        let params = Params::from_serialize(request)?;
        self.call(&CREATE_MERGE_REQUEST, &args, Some(&params)).await
    }

    /// Updates a merge request. `state_event` (`close`/`reopen`) changes its
    /// state.
    pub async fn edit_merge_request(
        &self,
        project_id: impl fmt::Display,
        merge_request_id: u64,
        params: &Params,
    ) -> Result<Option<MergeRequest>> {
        let args = merge_request(project_id, merge_request_id);
        self.call(&EDIT_MERGE_REQUEST, &args, Some(params)).await
    }

    /// Merges a merge request.
    ///
    /// # Parameters
    ///
    /// Optional `merge_commit_message` and `should_remove_source_branch`.
    ///
    /// # Errors
    ///
    /// GitLab answers 405 when the merge request cannot be merged and 406
    /// on conflicts; both surface as [`crate::api::Error::Api`].
    pub async fn accept_merge_request(
        &self,
        project_id: impl fmt::Display,
        merge_request_id: u64,
        params: Option<&Params>,
    ) -> Result<Option<MergeRequest>> {
        let args = merge_request(project_id, merge_request_id);
        self.call(&ACCEPT_MERGE_REQUEST, &args, params).await
    }

    pub async fn list_merge_request_comments(
        &self,
        project_id: impl fmt::Display,
        merge_request_id: u64,
        params: Option<&Params>,
    ) -> Result<Option<Vec<MergeRequestComment>>> {
        let args = merge_request(project_id, merge_request_id);
        self.call(&LIST_MERGE_REQUEST_COMMENTS, &args, params).await
    }

    pub fn merge_request_comments_paginator(
        &self,
        project_id: impl fmt::Display,
        merge_request_id: u64,
        params: Params,
    ) -> Result<EndpointPaginator<MergeRequestComment>> {
        let args = merge_request(project_id, merge_request_id);
        self.paginate(&LIST_MERGE_REQUEST_COMMENTS, args, params)
    }

    pub async fn add_merge_request_comment(
        &self,
        project_id: impl fmt::Display,
        merge_request_id: u64,
        note: &str,
    ) -> Result<Option<MergeRequestComment>> {
        let args = merge_request(project_id, merge_request_id);
        let params = Params::new().set("note", note);
        self.call(&ADD_MERGE_REQUEST_COMMENT, &args, Some(&params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_form() {
        let request = CreateMergeRequestRequest {
            assignee_id: Some(2),
            ..CreateMergeRequestRequest::new("feature", "master", "Add feature")
        }
        .with_labels(["ui", "needs review"]);

        let params = Params::from_serialize(&request).unwrap();
        assert_eq!(
            params.to_form(),
            "assignee_id=2&labels=ui%2Cneeds+review&source_branch=feature\
             &target_branch=master&title=Add+feature"
        );
    }

    #[test]
    fn test_changes_flatten_merge_request() {
        let changes: MergeRequestChanges = serde_json::from_value(json!({
            "id": 21,
            "iid": 1,
            "project_id": 4,
            "title": "Blanditiis beatae suscipit hic assumenda et molestias nisi asperiores repellat et.",
            "state": "reopened",
            "source_branch": "test1",
            "target_branch": "master",
            "upvotes": 0,
            "downvotes": 0,
            "labels": [],
            "changes": [{
                "old_path": "VERSION",
                "new_path": "VERSION",
                "a_mode": "100644",
                "b_mode": "100644",
                "diff": "--- a/VERSION\n+++ b/VERSION\n@@ -1 +1 @@\n-1.9.7\n+1.9.8",
                "new_file": false,
                "renamed_file": false,
                "deleted_file": false
            }]
        }))
        .unwrap();

        assert_eq!(changes.merge_request.id, 21);
        assert_eq!(changes.merge_request.state, "reopened");
        assert_eq!(changes.changes.len(), 1);
        assert_eq!(changes.changes[0].new_path, "VERSION");
    }

    #[test]
    fn test_single_merge_request_paths_are_singular() {
        let args = merge_request("group/app", 21);
        assert_eq!(
            ACCEPT_MERGE_REQUEST.resolve(&args).unwrap(),
            "/projects/group%2Fapp/merge_request/21/merge"
        );
    }
}
