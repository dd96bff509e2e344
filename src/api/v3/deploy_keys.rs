//
//  gitlab3
//  api/v3/deploy_keys.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Project deploy keys.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::GitlabClient;
use crate::api::common::Result;
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

/// A read-only SSH key granting access to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployKey {
    pub id: u64,
    pub title: String,
    pub key: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

pub const LIST_DEPLOY_KEYS: Endpoint =
    Endpoint::new("list_deploy_keys", Verb::Get, "/projects/:project_id/keys");
pub const GET_DEPLOY_KEY: Endpoint =
    Endpoint::new("get_deploy_key", Verb::Get, "/projects/:project_id/keys/:key_id");
pub const ADD_DEPLOY_KEY: Endpoint =
    Endpoint::new("add_deploy_key", Verb::Post, "/projects/:project_id/keys").with_params();
pub const DELETE_DEPLOY_KEY: Endpoint =
    Endpoint::new("delete_deploy_key", Verb::Delete, "/projects/:project_id/keys/:key_id")
        .no_value();

impl GitlabClient {
    pub async fn list_deploy_keys(
        &self,
        project_id: impl fmt::Display,
    ) -> Result<Option<Vec<DeployKey>>> {
        let args = PathArgs::new().arg("project_id", project_id);
        self.call(&LIST_DEPLOY_KEYS, &args, None).await
    }

    pub async fn get_deploy_key(
        &self,
        project_id: impl fmt::Display,
        key_id: u64,
    ) -> Result<Option<DeployKey>> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("key_id", key_id);
        self.call(&GET_DEPLOY_KEY, &args, None).await
    }

    /// Adds a deploy key. Adding a key already present on another project
    /// enables it here instead of creating a copy.
    pub async fn add_deploy_key(
        &self,
        project_id: impl fmt::Display,
        title: &str,
        key: &str,
    ) -> Result<Option<DeployKey>> {
        let args = PathArgs::new().arg("project_id", project_id);
        let params = Params::new().set("title", title).set("key", key);
        self.call(&ADD_DEPLOY_KEY, &args, Some(&params)).await
    }

    pub async fn delete_deploy_key(&self, project_id: impl fmt::Display, key_id: u64) -> Result<()> {
        let args = PathArgs::new()
            .arg("project_id", project_id)
            .arg("key_id", key_id);
        self.call_unit(&DELETE_DEPLOY_KEY, &args, None).await
    }
}
