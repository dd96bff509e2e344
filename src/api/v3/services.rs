//
//  gitlab3
//  api/v3/services.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project service integrations (`gitlab-ci`, `hipchat`, `slack`, ...).
//!
//! Each service takes its own settings, so they are passed as plain
//! [`Params`] and read back as a loosely typed [`Service`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::GitlabClient;
use crate::api::common::Result;
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub push_events: Option<bool>,
    #[serde(default)]
    pub issues_events: Option<bool>,
    #[serde(default)]
    pub merge_requests_events: Option<bool>,
    #[serde(default)]
    pub tag_push_events: Option<bool>,
    #[serde(default)]
    pub note_events: Option<bool>,
    /// Service-specific settings.
    #[serde(default)]
    pub properties: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

pub const GET_SERVICE: Endpoint =
    Endpoint::new("get_service", Verb::Get, "/projects/:project_id/services/:service");
pub const EDIT_SERVICE: Endpoint =
    Endpoint::new("edit_service", Verb::Put, "/projects/:project_id/services/:service")
        .with_params()
        .no_value();
pub const DELETE_SERVICE: Endpoint =
    Endpoint::new("delete_service", Verb::Delete, "/projects/:project_id/services/:service")
        .no_value();

fn service(project_id: impl fmt::Display, name: &str) -> PathArgs {
    PathArgs::new()
        .arg("project_id", project_id)
        .arg("service", name)
}

impl GitlabClient {
    pub async fn get_service(
        &self,
        project_id: impl fmt::Display,
        name: &str,
    ) -> Result<Option<Service>> {
        self.call(&GET_SERVICE, &service(project_id, name), None).await
    }

    /// Configures and enables a service.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gitlab3::api::{GitlabClient, Params};
    ///
    /// # async fn example(client: GitlabClient) -> gitlab3::api::common::Result<()> {
    /// let settings = Params::new()
    ///     .set("token", "ci-token")
    ///     .set("project_url", "https://ci.example.com/projects/3");
    /// client.edit_service(3, "gitlab-ci", &settings).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn edit_service(
        &self,
        project_id: impl fmt::Display,
        name: &str,
        params: &Params,
    ) -> Result<()> {
        self.call_unit(&EDIT_SERVICE, &service(project_id, name), Some(params))
            .await
    }

    /// Disables a service and clears its settings.
    pub async fn delete_service(&self, project_id: impl fmt::Display, name: &str) -> Result<()> {
        self.call_unit(&DELETE_SERVICE, &service(project_id, name), None)
            .await
    }
}
