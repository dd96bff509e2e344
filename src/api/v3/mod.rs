//
//  gitlab3
//  api/v3/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! GitLab v3 Endpoint Table
//!
//! Each submodule declares its endpoints as `pub const` [`Endpoint`]s, the
//! response types, and one typed wrapper method on
//! [`GitlabClient`](crate::api::GitlabClient) per endpoint. Paged list
//! endpoints get an extra `*_paginator` wrapper.
//!
//! | Module | Covers |
//! |--------|--------|
//! | [`users`] | Users, SSH keys, session |
//! | [`projects`] | Projects, members, hooks, events, forks, namespaces |
//! | [`repository`] | Branches, tags, tree, files, compare, commits |
//! | [`merge_requests`] | Merge requests, changes, comments |
//! | [`issues`] | Issues, labels, milestones |
//! | [`notes`] | Notes on issues, snippets, merge requests |
//! | [`deploy_keys`] | Project deploy keys |
//! | [`system_hooks`] | System hooks |
//! | [`groups`] | Groups and group members |
//! | [`snippets`] | Project snippets |
//! | [`services`] | Project services |
//!
//! Descriptors can also be called directly:
//!
//! ```rust,no_run
//! use gitlab3::api::{GitlabClient, PathArgs};
//! use gitlab3::api::v3::{Branch, GET_BRANCH};
//!
//! # async fn example(client: GitlabClient) -> gitlab3::api::common::Result<()> {
//! let args = PathArgs::new().arg("project_id", 7).arg("branch", "master");
//! let branch: Option<Branch> = client.call(&GET_BRANCH, &args, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod deploy_keys;
pub mod groups;
pub mod issues;
pub mod merge_requests;
pub mod notes;
pub mod projects;
pub mod repository;
pub mod services;
pub mod snippets;
pub mod system_hooks;
pub mod users;

pub use deploy_keys::*;
pub use groups::*;
pub use issues::*;
pub use merge_requests::*;
pub use notes::*;
pub use projects::*;
pub use repository::*;
pub use services::*;
pub use snippets::*;
pub use system_hooks::*;
pub use users::*;

use crate::api::endpoint::Endpoint;

/// Every declared endpoint, grouped by resource.
pub static ENDPOINTS: &[&Endpoint] = &[
    // users
    &LIST_USERS,
    &GET_USER,
    &CREATE_USER,
    &EDIT_USER,
    &DELETE_USER,
    &BLOCK_USER,
    &UNBLOCK_USER,
    &CURRENT_USER,
    &LIST_SSH_KEYS,
    &LIST_USER_SSH_KEYS,
    &GET_SSH_KEY,
    &ADD_SSH_KEY,
    &ADD_SSH_KEY_FOR_USER,
    &DELETE_SSH_KEY,
    &DELETE_SSH_KEY_FOR_USER,
    &SESSION,
    // projects
    &LIST_PROJECTS,
    &LIST_OWNED_PROJECTS,
    &LIST_ALL_PROJECTS,
    &SEARCH_PROJECTS,
    &GET_PROJECT,
    &LIST_PROJECT_EVENTS,
    &CREATE_PROJECT,
    &CREATE_PROJECT_FOR_USER,
    &EDIT_PROJECT,
    &FORK_PROJECT,
    &DELETE_PROJECT,
    &SHARE_PROJECT,
    &LIST_PROJECT_MEMBERS,
    &GET_PROJECT_MEMBER,
    &ADD_PROJECT_MEMBER,
    &EDIT_PROJECT_MEMBER,
    &REMOVE_PROJECT_MEMBER,
    &LIST_PROJECT_HOOKS,
    &GET_PROJECT_HOOK,
    &ADD_PROJECT_HOOK,
    &EDIT_PROJECT_HOOK,
    &DELETE_PROJECT_HOOK,
    &LIST_NAMESPACES,
    // repository
    &LIST_BRANCHES,
    &GET_BRANCH,
    &PROTECT_BRANCH,
    &UNPROTECT_BRANCH,
    &CREATE_BRANCH,
    &DELETE_BRANCH,
    &LIST_TAGS,
    &CREATE_TAG,
    &LIST_TREE,
    &COMPARE,
    &LIST_CONTRIBUTORS,
    &GET_FILE,
    &CREATE_FILE,
    &UPDATE_FILE,
    &DELETE_FILE,
    &LIST_COMMITS,
    &GET_COMMIT,
    &GET_COMMIT_DIFF,
    &LIST_COMMIT_COMMENTS,
    &ADD_COMMIT_COMMENT,
    // merge requests
    &LIST_MERGE_REQUESTS,
    &GET_MERGE_REQUEST,
    &GET_MERGE_REQUEST_CHANGES,
    &CREATE_MERGE_REQUEST,
    &EDIT_MERGE_REQUEST,
    &ACCEPT_MERGE_REQUEST,
    &LIST_MERGE_REQUEST_COMMENTS,
    &ADD_MERGE_REQUEST_COMMENT,
    // issues
    &LIST_ISSUES,
    &LIST_PROJECT_ISSUES,
    &GET_ISSUE,
    &CREATE_ISSUE,
    &EDIT_ISSUE,
    &LIST_LABELS,
    &CREATE_LABEL,
    &EDIT_LABEL,
    &DELETE_LABEL,
    &LIST_MILESTONES,
    &GET_MILESTONE,
    &CREATE_MILESTONE,
    &EDIT_MILESTONE,
    // notes
    &LIST_ISSUE_NOTES,
    &GET_ISSUE_NOTE,
    &CREATE_ISSUE_NOTE,
    &LIST_SNIPPET_NOTES,
    &GET_SNIPPET_NOTE,
    &CREATE_SNIPPET_NOTE,
    &LIST_MERGE_REQUEST_NOTES,
    &GET_MERGE_REQUEST_NOTE,
    &CREATE_MERGE_REQUEST_NOTE,
    // deploy keys
    &LIST_DEPLOY_KEYS,
    &GET_DEPLOY_KEY,
    &ADD_DEPLOY_KEY,
    &DELETE_DEPLOY_KEY,
    // system hooks
    &LIST_SYSTEM_HOOKS,
    &ADD_SYSTEM_HOOK,
    &TEST_SYSTEM_HOOK,
    &DELETE_SYSTEM_HOOK,
    // groups
    &LIST_GROUPS,
    &GET_GROUP,
    &CREATE_GROUP,
    &DELETE_GROUP,
    &TRANSFER_PROJECT_TO_GROUP,
    &LIST_GROUP_MEMBERS,
    &ADD_GROUP_MEMBER,
    &REMOVE_GROUP_MEMBER,
    // snippets
    &LIST_SNIPPETS,
    &GET_SNIPPET,
    &CREATE_SNIPPET,
    &EDIT_SNIPPET,
    &DELETE_SNIPPET,
    // services
    &GET_SERVICE,
    &EDIT_SERVICE,
    &DELETE_SERVICE,
];

/// Looks up a descriptor by name.
pub fn endpoint(name: &str) -> Option<&'static Endpoint> {
    ENDPOINTS.iter().copied().find(|e| e.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::api::endpoint::{PathArgs, Verb};

    /// Path args filling every placeholder with a value that needs encoding.
    fn full_args(endpoint: &Endpoint) -> PathArgs {
        endpoint
            .placeholders()
            .into_iter()
            .fold(PathArgs::new(), |args, name| args.arg(name, "a/b c"))
    }

    #[test]
    fn test_every_endpoint_resolves_fully() {
        for endpoint in ENDPOINTS {
            let path = endpoint.resolve(&full_args(endpoint)).unwrap();
            assert!(!path.contains(':'), "{} left a placeholder: {path}", endpoint.name);
            assert!(path.starts_with('/'), "{}: {path}", endpoint.name);

            let expected = endpoint.placeholders().len();
            assert_eq!(path.matches("a%2Fb%20c").count(), expected, "{}", endpoint.name);
        }
    }

    #[test]
    fn test_endpoint_names_are_unique() {
        let mut seen = HashSet::new();
        for endpoint in ENDPOINTS {
            assert!(seen.insert(endpoint.name), "duplicate endpoint {}", endpoint.name);
        }
        assert!(ENDPOINTS.len() >= 100);
    }

    #[test]
    fn test_descriptor_shapes() {
        for endpoint in ENDPOINTS {
            if endpoint.verb == Verb::Delete {
                assert!(!endpoint.returns_value, "{} should discard its body", endpoint.name);
            }
            if endpoint.paged {
                assert_eq!(endpoint.verb, Verb::Get, "{}", endpoint.name);
                assert!(endpoint.accepts_params, "{}", endpoint.name);
            }
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let get = endpoint("get_project").unwrap();
        assert_eq!(get.path, "/projects/:project_id");
        assert!(endpoint("no_such_endpoint").is_none());
    }
}

/// Typed wrappers against a local HTTP server.
#[cfg(test)]
mod server_tests {
    use mockito::{Matcher, Server};
    use serde_json::json;
    use tracing_subscriber::EnvFilter;

    use super::*;
    use crate::api::{AuthMode, Error, GitlabClient, Params};

    /// Request logs show up with `RUST_LOG=gitlab3=debug cargo test`.
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn client(server: &Server) -> GitlabClient {
        init_tracing();
        GitlabClient::new(&server.url(), "tok").unwrap()
    }

    fn issue(id: u64) -> serde_json::Value {
        json!({
            "id": id,
            "iid": id,
            "project_id": 5,
            "title": format!("issue {id}"),
            "state": "opened",
            "labels": []
        })
    }

    #[tokio::test]
    async fn test_get_sends_token_header_and_decodes() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v3/projects/group%2Fapp")
            .match_header("PRIVATE-TOKEN", "tok")
            .match_header("accept", "application/json")
            .match_header("user-agent", Matcher::Regex("^gitlab3/".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "id": 5,
                    "name": "app",
                    "path": "app",
                    "path_with_namespace": "group/app"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let project = client(&server).get_project("group/app").await.unwrap().unwrap();
        assert_eq!(project.id, 5);
        assert_eq!(project.path_with_namespace, "group/app");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_auth_mode() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v3/user")
            .match_query(Matcher::UrlEncoded("private_token".into(), "tok".into()))
            .match_header("PRIVATE-TOKEN", Matcher::Missing)
            .with_status(200)
            .with_body(json!({"id": 1, "username": "root", "name": "Administrator"}).to_string())
            .create_async()
            .await;

        let user = client(&server)
            .with_auth_mode(AuthMode::Query)
            .current_user()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.username, "root");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_not_found_is_absent() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v3/projects/5/issues/99")
            .with_status(404)
            .with_body(r#"{"message":"404 Not found"}"#)
            .create_async()
            .await;

        let found = client(&server).get_issue(5, 99).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_not_found_is_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/api/v3/projects/5/hooks/3")
            .with_status(404)
            .with_body(r#"{"message":"404 Not found"}"#)
            .create_async()
            .await;

        let err = client(&server).delete_project_hook(5, 3).await.unwrap_err();
        let api = err.as_api().unwrap();
        assert!(api.is_not_found());
        assert_eq!(api.path, "/projects/5/hooks/3");
    }

    #[tokio::test]
    async fn test_forbidden_is_preserved() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v3/projects/all")
            .with_status(403)
            .with_body(r#"{"message":"403 Forbidden"}"#)
            .create_async()
            .await;

        let err = client(&server).list_all_projects(None).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        match err {
            Error::Api(api) => {
                assert!(api.is_forbidden());
                assert_eq!(api.message(), "403 Forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_post_sends_form_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v3/projects/5/issues")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("title".into(), "Crash on start".into()),
                Matcher::UrlEncoded("labels".into(), "bug,p1".into()),
            ]))
            .with_status(201)
            .with_body(issue(11).to_string())
            .create_async()
            .await;

        let request = CreateIssueRequest::new("Crash on start").with_labels(["bug", "p1"]);
        let created = client(&server).create_issue(5, &request).await.unwrap().unwrap();
        assert_eq!(created.id, 11);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_with_empty_body_is_absent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v3/projects/5")
            .match_body(Matcher::UrlEncoded("description".into(), "new".into()))
            .with_status(200)
            .create_async()
            .await;

        let params = Params::new().set("description", "new");
        let edited = client(&server).edit_project(5, &params).await.unwrap();
        assert!(edited.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_paginator_walks_pages_until_short() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/api/v3/projects/5/issues")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("per_page".into(), "2".into()),
                Matcher::UrlEncoded("state".into(), "opened".into()),
            ]))
            .with_status(200)
            .with_body(json!([issue(1), issue(2)]).to_string())
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/v3/projects/5/issues")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("per_page".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(json!([issue(3)]).to_string())
            .expect(1)
            .create_async()
            .await;

        let params = Params::new().set("per_page", 2).set("state", "opened");
        let mut issues = client(&server).issues_paginator(5, params).unwrap();

        let mut ids = Vec::new();
        while let Some(issue) = issues.next().await.unwrap() {
            ids.push(issue.id);
        }
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(issues.next().await.unwrap().is_none());

        first.assert_async().await;
        second.assert_async().await;
    }
}
