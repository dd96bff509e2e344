//
//  gitlab3
//  api/v3/repository.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository contents: branches, tags, tree, files, compare, contributors,
//! commits and commit comments.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::users::UserBasic;
use crate::api::client::GitlabClient;
use crate::api::common::{EndpointPaginator, Result};
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

/// A commit as returned by the commit listing and detail endpoints.
///
/// Branches and tags embed a commit of a slightly different shape, so
/// everything beyond `id` is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    #[serde(default)]
    pub short_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub committed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub authored_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub parent_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub commit: Option<Commit>,
    #[serde(default)]
    pub protected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub commit: Option<Commit>,
}

/// One entry of a repository tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub id: String,
    pub name: String,
    /// `tree` or `blob`.
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
}

/// A file diff inside a commit or comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub diff: String,
    pub old_path: String,
    pub new_path: String,
    #[serde(default)]
    pub a_mode: Option<String>,
    #[serde(default)]
    pub b_mode: Option<String>,
    #[serde(default)]
    pub new_file: bool,
    #[serde(default)]
    pub renamed_file: bool,
    #[serde(default)]
    pub deleted_file: bool,
}

/// Result of comparing two refs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    #[serde(default)]
    pub commit: Option<Commit>,
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub diffs: Vec<Diff>,
    #[serde(default)]
    pub compare_timeout: bool,
    #[serde(default)]
    pub compare_same_ref: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub email: String,
    pub commits: u64,
    pub additions: u64,
    pub deletions: u64,
}

/// A file read from the repository. `content` is base64 when `encoding`
/// says so.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryFile {
    pub file_name: String,
    pub file_path: String,
    pub size: u64,
    pub encoding: String,
    pub content: String,
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub blob_id: String,
    pub commit_id: String,
}

/// Returned by file create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCommit {
    pub file_path: String,
    pub branch_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitComment {
    pub note: String,
    #[serde(default)]
    pub author: Option<UserBasic>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub line: Option<u64>,
    #[serde(default)]
    pub line_type: Option<String>,
}

/// Body shared by file create, update and delete.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileChange {
    pub file_path: String,
    pub branch_name: String,
    pub commit_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// `text` (default) or `base64`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

pub const LIST_BRANCHES: Endpoint =
    Endpoint::new("list_branches", Verb::Get, "/projects/:project_id/repository/branches").paged();
pub const GET_BRANCH: Endpoint = Endpoint::new(
    "get_branch",
    Verb::Get,
    "/projects/:project_id/repository/branches/:branch",
);
pub const PROTECT_BRANCH: Endpoint = Endpoint::new(
    "protect_branch",
    Verb::Put,
    "/projects/:project_id/repository/branches/:branch/protect",
);
pub const UNPROTECT_BRANCH: Endpoint = Endpoint::new(
    "unprotect_branch",
    Verb::Put,
    "/projects/:project_id/repository/branches/:branch/unprotect",
);
pub const CREATE_BRANCH: Endpoint =
    Endpoint::new("create_branch", Verb::Post, "/projects/:project_id/repository/branches")
        .with_params();
pub const DELETE_BRANCH: Endpoint = Endpoint::new(
    "delete_branch",
    Verb::Delete,
    "/projects/:project_id/repository/branches/:branch",
)
.no_value();

pub const LIST_TAGS: Endpoint =
    Endpoint::new("list_tags", Verb::Get, "/projects/:project_id/repository/tags").paged();
pub const CREATE_TAG: Endpoint =
    Endpoint::new("create_tag", Verb::Post, "/projects/:project_id/repository/tags").with_params();

pub const LIST_TREE: Endpoint =
    Endpoint::new("list_tree", Verb::Get, "/projects/:project_id/repository/tree").with_params();
pub const COMPARE: Endpoint =
    Endpoint::new("compare", Verb::Get, "/projects/:project_id/repository/compare").with_params();
pub const LIST_CONTRIBUTORS: Endpoint = Endpoint::new(
    "list_contributors",
    Verb::Get,
    "/projects/:project_id/repository/contributors",
);

pub const GET_FILE: Endpoint =
    Endpoint::new("get_file", Verb::Get, "/projects/:project_id/repository/files").with_params();
pub const CREATE_FILE: Endpoint =
    Endpoint::new("create_file", Verb::Post, "/projects/:project_id/repository/files")
        .with_params();
pub const UPDATE_FILE: Endpoint =
    Endpoint::new("update_file", Verb::Put, "/projects/:project_id/repository/files").with_params();
pub const DELETE_FILE: Endpoint =
    Endpoint::new("delete_file", Verb::Delete, "/projects/:project_id/repository/files")
        .with_params()
        .no_value();

pub const LIST_COMMITS: Endpoint =
    Endpoint::new("list_commits", Verb::Get, "/projects/:project_id/repository/commits").paged();
pub const GET_COMMIT: Endpoint =
    Endpoint::new("get_commit", Verb::Get, "/projects/:project_id/repository/commits/:sha");
pub const GET_COMMIT_DIFF: Endpoint = Endpoint::new(
    "get_commit_diff",
    Verb::Get,
    "/projects/:project_id/repository/commits/:sha/diff",
);
pub const LIST_COMMIT_COMMENTS: Endpoint = Endpoint::new(
    "list_commit_comments",
    Verb::Get,
    "/projects/:project_id/repository/commits/:sha/comments",
)
.paged();
pub const ADD_COMMIT_COMMENT: Endpoint = Endpoint::new(
    "add_commit_comment",
    Verb::Post,
    "/projects/:project_id/repository/commits/:sha/comments",
)
.with_params();

fn project(project_id: impl fmt::Display) -> PathArgs {
    PathArgs::new().arg("project_id", project_id)
}

impl GitlabClient {
    pub async fn list_branches(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Branch>>> {
        self.call(&LIST_BRANCHES, &project(project_id), params).await
    }

    pub fn branches_paginator(
        &self,
        project_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<Branch>> {
        self.paginate(&LIST_BRANCHES, project(project_id), params)
    }

    pub async fn get_branch(
        &self,
        project_id: impl fmt::Display,
        branch: &str,
    ) -> Result<Option<Branch>> {
        let args = project(project_id).arg("branch", branch);
        self.call(&GET_BRANCH, &args, None).await
    }

    pub async fn protect_branch(
        &self,
        project_id: impl fmt::Display,
        branch: &str,
    ) -> Result<Option<Branch>> {
        let args = project(project_id).arg("branch", branch);
        self.call(&PROTECT_BRANCH, &args, None).await
    }

    pub async fn unprotect_branch(
        &self,
        project_id: impl fmt::Display,
        branch: &str,
    ) -> Result<Option<Branch>> {
        let args = project(project_id).arg("branch", branch);
        self.call(&UNPROTECT_BRANCH, &args, None).await
    }

    /// Creates `branch` pointing at `ref_name` (a branch, tag or sha).
    pub async fn create_branch(
        &self,
        project_id: impl fmt::Display,
        branch: &str,
        ref_name: &str,
    ) -> Result<Option<Branch>> {
        let params = Params::new().set("branch_name", branch).set("ref", ref_name);
        self.call(&CREATE_BRANCH, &project(project_id), Some(&params))
            .await
    }

    pub async fn delete_branch(&self, project_id: impl fmt::Display, branch: &str) -> Result<()> {
        let args = project(project_id).arg("branch", branch);
        self.call_unit(&DELETE_BRANCH, &args, None).await
    }

    pub async fn list_tags(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Tag>>> {
        self.call(&LIST_TAGS, &project(project_id), params).await
    }

    pub fn tags_paginator(
        &self,
        project_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<Tag>> {
        self.paginate(&LIST_TAGS, project(project_id), params)
    }

    /// Creates a tag. A `message` makes it an annotated tag.
    pub async fn create_tag(
        &self,
        project_id: impl fmt::Display,
        tag_name: &str,
        ref_name: &str,
        message: Option<&str>,
    ) -> Result<Option<Tag>> {
        let params = Params::new()
            .set("tag_name", tag_name)
            .set("ref", ref_name)
            .set("message", message);
        self.call(&CREATE_TAG, &project(project_id), Some(&params))
            .await
    }

    /// Lists a directory. Accepts `path` and `ref_name`.
    pub async fn list_tree(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<TreeEntry>>> {
        self.call(&LIST_TREE, &project(project_id), params).await
    }

    pub async fn compare(
        &self,
        project_id: impl fmt::Display,
        from: &str,
        to: &str,
    ) -> Result<Option<Comparison>> {
        let params = Params::new().set("from", from).set("to", to);
        self.call(&COMPARE, &project(project_id), Some(&params)).await
    }

    pub async fn list_contributors(
        &self,
        project_id: impl fmt::Display,
    ) -> Result<Option<Vec<Contributor>>> {
        self.call(&LIST_CONTRIBUTORS, &project(project_id), None)
            .await
    }

    /// Reads `file_path` at `ref_name`.
    pub async fn get_file(
        &self,
        project_id: impl fmt::Display,
        file_path: &str,
        ref_name: &str,
    ) -> Result<Option<RepositoryFile>> {
        let params = Params::new().set("file_path", file_path).set("ref", ref_name);
        self.call(&GET_FILE, &project(project_id), Some(&params)).await
    }

    pub async fn create_file(
        &self,
        project_id: impl fmt::Display,
        change: &FileChange,
    ) -> Result<Option<FileCommit>> {
        let params = Params::from_serialize(change)?;
        self.call(&CREATE_FILE, &project(project_id), Some(&params))
            .await
    }

    pub async fn update_file(
        &self,
        project_id: impl fmt::Display,
        change: &FileChange,
    ) -> Result<Option<FileCommit>> {
        let params = Params::from_serialize(change)?;
        self.call(&UPDATE_FILE, &project(project_id), Some(&params))
            .await
    }

    /// Deletes a file in a new commit. `content` and `encoding` are ignored.
    pub async fn delete_file(&self, project_id: impl fmt::Display, change: &FileChange) -> Result<()> {
        let params = Params::new()
            .set("file_path", change.file_path.as_str())
            .set("branch_name", change.branch_name.as_str())
            .set("commit_message", change.commit_message.as_str());
        self.call_unit(&DELETE_FILE, &project(project_id), Some(&params))
            .await
    }

    /// Lists commits. Accepts `ref_name` (defaults to the default branch).
    pub async fn list_commits(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Commit>>> {
        self.call(&LIST_COMMITS, &project(project_id), params).await
    }

    pub fn commits_paginator(
        &self,
        project_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<Commit>> {
        self.paginate(&LIST_COMMITS, project(project_id), params)
    }

    /// Fetches a commit by sha, branch or tag name.
    pub async fn get_commit(
        &self,
        project_id: impl fmt::Display,
        sha: &str,
    ) -> Result<Option<Commit>> {
        let args = project(project_id).arg("sha", sha);
        self.call(&GET_COMMIT, &args, None).await
    }

    pub async fn get_commit_diff(
        &self,
        project_id: impl fmt::Display,
        sha: &str,
    ) -> Result<Option<Vec<Diff>>> {
        let args = project(project_id).arg("sha", sha);
        self.call(&GET_COMMIT_DIFF, &args, None).await
    }

    pub async fn list_commit_comments(
        &self,
        project_id: impl fmt::Display,
        sha: &str,
        params: Option<&Params>,
    ) -> Result<Option<Vec<CommitComment>>> {
        let args = project(project_id).arg("sha", sha);
        self.call(&LIST_COMMIT_COMMENTS, &args, params).await
    }

    pub fn commit_comments_paginator(
        &self,
        project_id: impl fmt::Display,
        sha: &str,
        params: Params,
    ) -> Result<EndpointPaginator<CommitComment>> {
        let args = project(project_id).arg("sha", sha);
        self.paginate(&LIST_COMMIT_COMMENTS, args, params)
    }

    /// Comments on a commit. Pass `path`, `line` and `line_type` (`new` or
    /// `old`) in `params` for an inline comment.
    pub async fn add_commit_comment(
        &self,
        project_id: impl fmt::Display,
        sha: &str,
        note: &str,
        params: Option<&Params>,
    ) -> Result<Option<CommitComment>> {
        let args = project(project_id).arg("sha", sha);
        let params = params.cloned().unwrap_or_default().merged("note", note);
        self.call(&ADD_COMMIT_COMMENT, &args, Some(&params)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_tree_entry() {
        let entry: TreeEntry = serde_json::from_value(json!({
            "id": "a1e8f8d745cc87e3a9248358d9352bb7f9a0aeba",
            "name": "html",
            "type": "tree",
            "mode": "040000"
        }))
        .unwrap();
        assert_eq!(entry.kind, "tree");
    }

    #[test]
    fn test_deserialize_branch_with_embedded_commit() {
        let branch: Branch = serde_json::from_value(json!({
            "name": "master",
            "protected": true,
            "commit": {
                "id": "7b5c3cc8be40ee161ae89a06bba6229da1032a0c",
                "message": "add projects API",
                "parents": [{"id": "4ad91d3c1144c406e50c7b33bae684bd6837faf8"}],
                "authored_date": "2012-06-27T05:51:39Z",
                "committed_date": "2012-06-28T03:44:20Z"
            }
        }))
        .unwrap();
        assert!(branch.protected);
        let commit = branch.commit.unwrap();
        assert!(commit.short_id.is_none());
        assert!(commit.committed_date.is_some());
    }

    #[test]
    fn test_absent_tag_message_is_omitted() {
        let params = Params::new()
            .set("tag_name", "v1.0")
            .set("ref", "master")
            .set("message", None::<&str>);
        assert_eq!(params.to_form(), "ref=master&tag_name=v1.0");
    }
}
