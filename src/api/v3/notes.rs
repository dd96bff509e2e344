//
//  gitlab3
//  api/v3/notes.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Notes (comments) on issues, snippets and merge requests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::users::UserBasic;
use crate::api::client::GitlabClient;
use crate::api::common::{EndpointPaginator, Result};
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub body: String,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub author: Option<UserBasic>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

pub const LIST_ISSUE_NOTES: Endpoint = Endpoint::new(
    "list_issue_notes",
    Verb::Get,
    "/projects/:project_id/issues/:issue_id/notes",
)
.paged();
pub const GET_ISSUE_NOTE: Endpoint = Endpoint::new(
    "get_issue_note",
    Verb::Get,
    "/projects/:project_id/issues/:issue_id/notes/:note_id",
);
pub const CREATE_ISSUE_NOTE: Endpoint = Endpoint::new(
    "create_issue_note",
    Verb::Post,
    "/projects/:project_id/issues/:issue_id/notes",
)
.with_params();

pub const LIST_SNIPPET_NOTES: Endpoint = Endpoint::new(
    "list_snippet_notes",
    Verb::Get,
    "/projects/:project_id/snippets/:snippet_id/notes",
)
.paged();
pub const GET_SNIPPET_NOTE: Endpoint = Endpoint::new(
    "get_snippet_note",
    Verb::Get,
    "/projects/:project_id/snippets/:snippet_id/notes/:note_id",
);
pub const CREATE_SNIPPET_NOTE: Endpoint = Endpoint::new(
    "create_snippet_note",
    Verb::Post,
    "/projects/:project_id/snippets/:snippet_id/notes",
)
.with_params();

pub const LIST_MERGE_REQUEST_NOTES: Endpoint = Endpoint::new(
    "list_merge_request_notes",
    Verb::Get,
    "/projects/:project_id/merge_requests/:merge_request_id/notes",
)
.paged();
pub const GET_MERGE_REQUEST_NOTE: Endpoint = Endpoint::new(
    "get_merge_request_note",
    Verb::Get,
    "/projects/:project_id/merge_requests/:merge_request_id/notes/:note_id",
);
pub const CREATE_MERGE_REQUEST_NOTE: Endpoint = Endpoint::new(
    "create_merge_request_note",
    Verb::Post,
    "/projects/:project_id/merge_requests/:merge_request_id/notes",
)
.with_params();

/// What a note is attached to.
///
/// # Example
///
/// ```rust,no_run
/// use gitlab3::api::GitlabClient;
/// use gitlab3::api::v3::Noteable;
///
/// # async fn example(client: GitlabClient) -> gitlab3::api::common::Result<()> {
/// client.create_note(42, Noteable::Issue(7), "Fixed in !12").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Noteable {
    Issue(u64),
    Snippet(u64),
    MergeRequest(u64),
}

impl Noteable {
    fn endpoints(self) -> (&'static Endpoint, &'static Endpoint, &'static Endpoint) {
        match self {
            Noteable::Issue(_) => (&LIST_ISSUE_NOTES, &GET_ISSUE_NOTE, &CREATE_ISSUE_NOTE),
            Noteable::Snippet(_) => (&LIST_SNIPPET_NOTES, &GET_SNIPPET_NOTE, &CREATE_SNIPPET_NOTE),
            Noteable::MergeRequest(_) => (
                &LIST_MERGE_REQUEST_NOTES,
                &GET_MERGE_REQUEST_NOTE,
                &CREATE_MERGE_REQUEST_NOTE,
            ),
        }
    }

    fn args(self, project_id: impl fmt::Display) -> PathArgs {
        let args = PathArgs::new().arg("project_id", project_id);
        match self {
            Noteable::Issue(id) => args.arg("issue_id", id),
            Noteable::Snippet(id) => args.arg("snippet_id", id),
            Noteable::MergeRequest(id) => args.arg("merge_request_id", id),
        }
    }
}

impl GitlabClient {
    pub async fn list_notes(
        &self,
        project_id: impl fmt::Display,
        target: Noteable,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Note>>> {
        let (list, _, _) = target.endpoints();
        self.call(list, &target.args(project_id), params).await
    }

    pub fn notes_paginator(
        &self,
        project_id: impl fmt::Display,
        target: Noteable,
        params: Params,
    ) -> Result<EndpointPaginator<Note>> {
        let (list, _, _) = target.endpoints();
        self.paginate(list, target.args(project_id), params)
    }

    pub async fn get_note(
        &self,
        project_id: impl fmt::Display,
        target: Noteable,
        note_id: u64,
    ) -> Result<Option<Note>> {
        let (_, get, _) = target.endpoints();
        let args = target.args(project_id).arg("note_id", note_id);
        self.call(get, &args, None).await
    }

    pub async fn create_note(
        &self,
        project_id: impl fmt::Display,
        target: Noteable,
        body: &str,
    ) -> Result<Option<Note>> {
        let (_, _, create) = target.endpoints();
        let params = Params::new().set("body", body);
        self.call(create, &target.args(project_id), Some(&params))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noteable_selects_matching_path() {
        let target = Noteable::MergeRequest(5);
        let (list, get, _) = target.endpoints();
        assert_eq!(
            list.resolve(&target.args(3)).unwrap(),
            "/projects/3/merge_requests/5/notes"
        );
        assert_eq!(
            get.resolve(&target.args(3).arg("note_id", 9)).unwrap(),
            "/projects/3/merge_requests/5/notes/9"
        );

        let target = Noteable::Snippet(2);
        let (_, _, create) = target.endpoints();
        assert_eq!(
            create.resolve(&target.args("a/b")).unwrap(),
            "/projects/a%2Fb/snippets/2/notes"
        );
    }
}
