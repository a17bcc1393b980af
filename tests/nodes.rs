//
//  gh-actions-client
//  tests/nodes.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use mockito::{Matcher, Server};
use serde_json::json;

use gh_actions_client::api::common::MediaType;
use gh_actions_client::api::internal::ArtifactCacheApi;
use gh_actions_client::api::public::{BlockList, GitHubApi};
use gh_actions_client::api::{ApiClient, ApiError};
use gh_actions_client::auth::AuthCredential;
use gh_actions_client::config::RunnerEnv;

fn api(server: &Server) -> GitHubApi {
    GitHubApi::new(
        ApiClient::new(&server.url())
            .unwrap()
            .with_auth(AuthCredential::bearer("test-token")),
    )
}

#[test]
fn test_issue_paths_compose_through_repository() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/repos/O/R/issues/7/comments")
        .match_body(Matcher::Json(json!({"body": "Looks good"})))
        .with_status(201)
        .with_body(r#"{"id": 1}"#)
        .create();

    let api = api(&server);
    let repo = api.repo("O", "R");
    repo.issue(7).comment("Looks good").unwrap();
    mock.assert();
}

#[test]
fn test_database_id_is_resolved_once() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/users/octocat")
        .with_status(200)
        .with_body(r#"{"login": "octocat", "id": 583231}"#)
        .expect(1)
        .create();

    let api = api(&server);
    let user = api.user("octocat");
    assert_eq!(user.database_id().unwrap(), 583231);
    assert_eq!(user.database_id().unwrap(), 583231);
    assert_eq!(user.node_id().unwrap(), "MDQ6VXNlcjU4MzIzMQ==");
    assert_eq!(user.info().unwrap()["login"], "octocat");
    mock.assert();
}

#[test]
fn test_repository_id_comes_from_graphql() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/graphql")
        .match_body(Matcher::PartialJson(json!({
            "variables": {"owner": "octocat", "repo": "hello-world"}
        })))
        .with_status(200)
        .with_body(r#"{"data": {"repository": {"databaseId": 1296269}}}"#)
        .expect(1)
        .create();

    let api = api(&server);
    let repo = api.repo("octocat", "hello-world");
    assert_eq!(repo.database_id().unwrap(), 1296269);
    assert_eq!(repo.database_id().unwrap(), 1296269);
    mock.assert();
}

#[test]
fn test_graphql_errors_surface_as_format_errors() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/graphql")
        .with_status(200)
        .with_body(r#"{"data": {"repository": null}, "errors": [{"message": "Could not resolve to a Repository"}]}"#)
        .create();

    let api = api(&server);
    let repo = api.repo("octocat", "gone");
    match repo.database_id() {
        Err(ApiError::Format(msg)) => assert!(msg.contains("Could not resolve")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_listed_repositories_are_seeded() {
    let mut server = Server::new();
    let listing = server
        .mock("GET", "/users/octocat/repos")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("per_page".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(
            json!([
                {"id": 1296269, "name": "hello-world", "owner": {"login": "octocat", "id": 583231}},
                {"id": 64778136, "name": "linguist", "owner": {"login": "octocat", "id": 583231}}
            ])
            .to_string(),
        )
        .expect(1)
        .create();

    let api = api(&server);
    let user = api.user("octocat");
    let repos = user.repos(false).unwrap();
    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].full_name(), "octocat/hello-world");
    assert_eq!(repos[1].database_id().unwrap(), 64778136);
    assert_eq!(repos[0].owner().database_id().unwrap(), 583231);

    assert_eq!(user.repos(false).unwrap().len(), 2);
    listing.assert();
}

#[test]
fn test_workflow_runs_are_filtered_and_unwrapped() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/repos/o/r/actions/runs")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("status".into(), "failure".into()),
            Matcher::UrlEncoded("per_page".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"total_count": 1, "workflow_runs": [{"id": 30433642, "status": "completed"}]}"#)
        .create();

    let api = api(&server);
    let repo = api.repo("o", "r");
    let actions = repo.actions();
    let runs = actions.runs().list(json!({"status": "failure"})).unwrap();
    assert_eq!(runs, vec![json!({"id": 30433642, "status": "completed"})]);
    mock.assert();
}

#[test]
fn test_readme_json_content_is_decoded() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/repos/o/r/readme/docs")
        .match_query(Matcher::UrlEncoded("ref".into(), "v1.0".into()))
        .match_header("accept", "application/vnd.github+json")
        .with_status(200)
        .with_body(r#"{"name": "README.md", "encoding": "base64", "content": "IyBI\nZWxsbwo=\n"}"#)
        .create();

    let api = api(&server);
    let repo = api.repo("o", "r");
    let readme = repo.readme(MediaType::Json, Some("docs"), Some("v1.0")).unwrap();
    assert_eq!(readme.text(), Some("# Hello\n"));
    assert_eq!(readme.metadata.unwrap()["name"], "README.md");
    mock.assert();
}

#[test]
fn test_issue_events_use_preview() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/repos/o/r/issues/3/events")
        .match_header("accept", ", application/vnd.github.starfox-preview")
        .with_status(200)
        .with_body("[]")
        .create();

    let api = api(&server);
    let repo = api.repo("o", "r");
    assert!(repo.issue(3).events().unwrap().is_empty());
    mock.assert();
}

#[test]
fn test_block_list_on_organization() {
    let mut server = Server::new();
    let mock = server
        .mock("PUT", "/orgs/acme/blocks/spammer")
        .with_status(204)
        .create();

    let api = api(&server);
    api.org("acme").block("spammer").unwrap();
    mock.assert();
}

#[test]
fn test_cache_lookup_hit_and_miss() {
    let mut server = Server::new();
    let env = RunnerEnv::from_vars([
        ("ACTIONS_CACHE_URL".to_string(), format!("{}/cache-1/", server.url())),
        ("ACTIONS_RUNTIME_TOKEN".to_string(), "runtime-token".to_string()),
    ]);
    let api = ArtifactCacheApi::with_env(None, None, env).unwrap();

    let hit = server
        .mock("GET", "/cache-1/_apis/artifactcache/cache")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("keys".into(), "npm-abc,npm-".into()),
            Matcher::UrlEncoded("version".into(), "v1".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"cacheKey": "npm-abc", "scope": "refs/heads/main", "archiveLocation": "https://blob/x"}"#)
        .create();
    let entry = api.cache().lookup(&["npm-abc", "npm-"], "v1").unwrap().unwrap();
    assert_eq!(entry.archive_location.as_deref(), Some("https://blob/x"));
    hit.assert();

    let _miss = server
        .mock("GET", "/cache-1/_apis/artifactcache/cache")
        .match_query(Matcher::UrlEncoded("version".into(), "v2".into()))
        .with_status(204)
        .create();
    assert!(api.cache().lookup(&["npm-abc"], "v2").unwrap().is_none());
}
