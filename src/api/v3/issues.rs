//
//  gitlab3
//  api/v3/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issues, labels and milestones.
//!
//! As with merge requests, `issue_id` and `milestone_id` are global ids.
//! The project-scoped number shown in the UI is `iid`.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::users::UserBasic;
use crate::api::client::GitlabClient;
use crate::api::common::{EndpointPaginator, Result};
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

/// A project issue.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `id` | Global id, used in API paths |
/// | `iid` | Number within the project (`#iid`) |
/// | `state` | `opened`, `closed` or `reopened` |
/// | `labels` | Label names |
/// | `milestone` | Milestone, if one is set |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub iid: u64,
    pub project_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub author: Option<UserBasic>,
    #[serde(default)]
    pub assignee: Option<UserBasic>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color including the leading `#`.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    #[serde(default)]
    pub iid: Option<u64>,
    #[serde(default)]
    pub project_id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// `active` or `closed`.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of [`GitlabClient::create_issue`].
///
/// # Example
///
/// ```rust
/// use gitlab3::api::v3::CreateIssueRequest;
///
/// let request = CreateIssueRequest {
///     description: Some("Steps to reproduce...".to_string()),
///     ..CreateIssueRequest::new("Crash on start")
/// }
/// .with_labels(["bug", "p1"]);
/// assert_eq!(request.labels.as_deref(), Some("bug,p1"));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateIssueRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    /// Comma-separated label names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
}

impl CreateIssueRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

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

pub const LIST_ISSUES: Endpoint = Endpoint::new("list_issues", Verb::Get, "/issues").paged();
pub const LIST_PROJECT_ISSUES: Endpoint =
    Endpoint::new("list_project_issues", Verb::Get, "/projects/:project_id/issues").paged();
pub const GET_ISSUE: Endpoint =
    Endpoint::new("get_issue", Verb::Get, "/projects/:project_id/issues/:issue_id");
pub const CREATE_ISSUE: Endpoint =
    Endpoint::new("create_issue", Verb::Post, "/projects/:project_id/issues").with_params();
pub const EDIT_ISSUE: Endpoint =
    Endpoint::new("edit_issue", Verb::Put, "/projects/:project_id/issues/:issue_id").with_params();

pub const LIST_LABELS: Endpoint =
    Endpoint::new("list_labels", Verb::Get, "/projects/:project_id/labels");
pub const CREATE_LABEL: Endpoint =
    Endpoint::new("create_label", Verb::Post, "/projects/:project_id/labels").with_params();
pub const EDIT_LABEL: Endpoint =
    Endpoint::new("edit_label", Verb::Put, "/projects/:project_id/labels").with_params();
pub const DELETE_LABEL: Endpoint =
    Endpoint::new("delete_label", Verb::Delete, "/projects/:project_id/labels")
        .with_params()
        .no_value();

pub const LIST_MILESTONES: Endpoint =
    Endpoint::new("list_milestones", Verb::Get, "/projects/:project_id/milestones").paged();
pub const GET_MILESTONE: Endpoint = Endpoint::new(
    "get_milestone",
    Verb::Get,
    "/projects/:project_id/milestones/:milestone_id",
);
pub const CREATE_MILESTONE: Endpoint =
    Endpoint::new("create_milestone", Verb::Post, "/projects/:project_id/milestones")
        .with_params();
pub const EDIT_MILESTONE: Endpoint = Endpoint::new(
    "edit_milestone",
    Verb::Put,
    "/projects/:project_id/milestones/:milestone_id",
)
.with_params();

impl GitlabClient {
    /// Issues assigned to or created by the current user, across projects.
    ///
    /// Accepts `state` (`opened`/`closed`), `labels` (comma-separated),
    /// `order_by` and `sort`.
    pub async fn list_issues(&self, params: Option<&Params>) -> Result<Option<Vec<Issue>>> {
        self.call(&LIST_ISSUES, &PathArgs::new(), params).await
    }

    pub fn all_issues_paginator(&self, params: Params) -> Result<EndpointPaginator<Issue>> {
        self.paginate(&LIST_ISSUES, PathArgs::new(), params)
    }

    /// Issues of one project. Accepts `iid` and `milestone` on top of the
    /// [`list_issues`](Self::list_issues) filters.
    pub async fn list_project_issues(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Issue>>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&LIST_PROJECT_ISSUES, &args, params).await
    }

    /// Paginator over a project's issues.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab3::api::{GitlabClient, Params};
    ///
    /// # async fn example(client: GitlabClient) -> gitlab3::api::common::Result<()> {
    /// let open = client
    ///     .issues_paginator("group/app", Params::new().set("state", "opened"))?
    ///     .all()
    ///     .await?;
    /// println!("{} open issues", open.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn issues_paginator(
        &self,
        project_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<Issue>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.paginate(&LIST_PROJECT_ISSUES, args, params)
    }

    pub async fn get_issue(
        &self,
        project_id: impl fmt::Display,
        issue_id: u64,
    ) -> Result<Option<Issue>> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("issue_id", issue_id);
        self.call(&GET_ISSUE, &args, None).await
    }

    pub async fn create_issue(
        &self,
        project_id: impl fmt::Display,
        request: &CreateIssueRequest,
    ) -> Result<Option<Issue>> {
        let args = PathArgs::new().arg("project_id", project_id);
        let params = Params::from_serialize(request)?;
        self.call(&CREATE_ISSUE, &args, Some(&params)).await
    }

    /// Updates an issue. Use `state_event` (`close`/`reopen`) to change its
    /// state.
    pub async fn edit_issue(
        &self,
        project_id: impl fmt::Display,
        issue_id: u64,
        params: &Params,
    ) -> Result<Option<Issue>> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("issue_id", issue_id);
        self.call(&EDIT_ISSUE, &args, Some(params)).await
    }

    pub async fn list_labels(&self, project_id: impl fmt::Display) -> Result<Option<Vec<Label>>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&LIST_LABELS, &args, None).await
    }

    pub async fn create_label(
        &self,
        project_id: impl fmt::Display,
        name: &str,
        color: &str,
    ) -> Result<Option<Label>> {
        let args = PathArgs::new().arg("project_id", project_id);
        let params = Params::new().set("name", name).set("color", color);
        self.call(&CREATE_LABEL, &args, Some(&params)).await
    }

    /// Renames or recolors the label called `name`. Pass `new_name` and/or
    /// `color` in `params`.
    pub async fn edit_label(
        &self,
        project_id: impl fmt::Display,
        name: &str,
        params: &Params,
    ) -> Result<Option<Label>> {
        let args = PathArgs::new().arg("project_id", project_id);
        let params = params.merged("name", name);
        self.call(&EDIT_LABEL, &args, Some(&params)).await
    }

    pub async fn delete_label(&self, project_id: impl fmt::Display, name: &str) -> Result<()> {
        let args = PathArgs::new().arg("project_id", project_id);
        let params = Params::new().set("name", name);
        self.call_unit(&DELETE_LABEL, &args, Some(&params)).await
    }

    pub async fn list_milestones(
        &self,
        project_id: impl fmt::Display,
        params: Option<&Params>,
    ) -> Result<Option<Vec<Milestone>>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&LIST_MILESTONES, &args, params).await
    }

    pub fn milestones_paginator(
        &self,
        project_id: impl fmt::Display,
        params: Params,
    ) -> Result<EndpointPaginator<Milestone>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.paginate(&LIST_MILESTONES, args, params)
    }

    pub async fn get_milestone(
        &self,
        project_id: impl fmt::Display,
        milestone_id: u64,
    ) -> Result<Option<Milestone>> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("milestone_id", milestone_id);
        self.call(&GET_MILESTONE, &args, None).await
    }

    /// Creates a milestone. `description` and `due_date` (`YYYY-MM-DD`) may
    /// be passed in `params`.
    pub async fn create_milestone(
        &self,
        project_id: impl fmt::Display,
        title: &str,
        params: Option<&Params>,
    ) -> Result<Option<Milestone>> {
        let args = PathArgs::new().arg("project_id", project_id);
        let params = params.cloned().unwrap_or_default().merged("title", title);
        self.call(&CREATE_MILESTONE, &args, Some(&params)).await
    }

    /// Updates a milestone. `state_event` may be `close` or `activate`.
    pub async fn edit_milestone(
        &self,
        project_id: impl fmt::Display,
        milestone_id: u64,
        params: &Params,
    ) -> Result<Option<Milestone>> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("milestone_id", milestone_id);
        self.call(&EDIT_MILESTONE, &args, Some(params)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_issue() {
        let issue: Issue = serde_json::from_value(json!({
            "id": 43,
            "iid": 3,
            "project_id": 8,
            "title": "4xx/5xx pages",
            "description": "",
            "labels": [],
            "milestone": {
                "id": 1,
                "title": "v1.0",
                "due_date": "2012-07-20",
                "state": "closed"
            },
            "assignee": null,
            "author": {"id": 1, "username": "john_smith", "name": "John Smith", "state": "active"},
            "state": "closed",
            "updated_at": "2012-07-12T13:43:19Z",
            "created_at": "2012-07-12T13:43:19Z"
        }))
        .unwrap();

        assert_eq!(issue.iid, 3);
        assert!(issue.assignee.is_none());
        let milestone = issue.milestone.unwrap();
        assert_eq!(milestone.due_date, NaiveDate::from_ymd_opt(2012, 7, 20));
    }

    #[test]
    fn test_create_issue_request_form() {
        let request = CreateIssueRequest {
            milestone_id: Some(1),
            ..CreateIssueRequest::new("Crash & burn")
        }
        .with_labels(["bug"]);

        let params = Params::from_serialize(&request).unwrap();
        assert_eq!(
            params.to_form(),
            "labels=bug&milestone_id=1&title=Crash+%26+burn"
        );
    }
}
