//
//  gitlab3
//  api/v3/system_hooks.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Instance-wide system hooks. Admin only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::GitlabClient;
use crate::api::common::Result;
use crate::api::endpoint::{Endpoint, PathArgs, Verb};
use crate::api::params::Params;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemHook {
    pub id: u64,
    pub url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Sample payload GitLab sends when a hook is tested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemHookTest {
    pub event_name: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub project_id: Option<u64>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
}

pub const LIST_SYSTEM_HOOKS: Endpoint = Endpoint::new("list_system_hooks", Verb::Get, "/hooks");
pub const ADD_SYSTEM_HOOK: Endpoint =
    Endpoint::new("add_system_hook", Verb::Post, "/hooks").with_params();
pub const TEST_SYSTEM_HOOK: Endpoint =
    Endpoint::new("test_system_hook", Verb::Get, "/hooks/:hook_id");
pub const DELETE_SYSTEM_HOOK: Endpoint =
    Endpoint::new("delete_system_hook", Verb::Delete, "/hooks/:hook_id").no_value();

impl GitlabClient {
    pub async fn list_system_hooks(&self) -> Result<Option<Vec<SystemHook>>> {
        self.call(&LIST_SYSTEM_HOOKS, &PathArgs::new(), None).await
    }

    pub async fn add_system_hook(&self, url: &str) -> Result<Option<SystemHook>> {
        let params = Params::new().set("url", url);
        self.call(&ADD_SYSTEM_HOOK, &PathArgs::new(), Some(&params))
            .await
    }

    /// Fires a sample event at the hook and returns the payload sent.
    pub async fn test_system_hook(&self, hook_id: u64) -> Result<Option<SystemHookTest>> {
        let args = PathArgs::new().arg("hook_id", hook_id);
        self.call(&TEST_SYSTEM_HOOK, &args, None).await
    }

    pub async fn delete_system_hook(&self, hook_id: u64) -> Result<()> {
        let args = PathArgs::new().arg("hook_id", hook_id);
        self.call_unit(&DELETE_SYSTEM_HOOK, &args, None).await
    }
}
