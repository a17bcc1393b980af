//
//  gh-actions-client
//  tests/upload.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use mockito::{Matcher, Mock, Server};
use serde_json::json;

use gh_actions_client::api::internal::PipelinesApi;
use gh_actions_client::api::ApiError;
use gh_actions_client::config::RunnerEnv;

const ARTIFACTS_PATH: &str = "/run-1/_apis/pipelines/workflows/42/artifacts";
const CONTAINER_PATH: &str = "/run-1/_apis/resources/Containers/7";
const INTERNAL_ACCEPT: &str = "application/json;api-version=6.0-preview";

fn api(server: &Server) -> PipelinesApi {
    let env = RunnerEnv::from_vars([
        ("ACTIONS_RUNTIME_URL".to_string(), format!("{}/run-1/", server.url())),
        ("ACTIONS_RUNTIME_TOKEN".to_string(), "runtime-token".to_string()),
        ("GITHUB_RUN_ID".to_string(), "42".to_string()),
        ("GITHUB_RETENTION_DAYS".to_string(), "10".to_string()),
    ]);
    PipelinesApi::with_env(None, None, env).unwrap()
}

fn mock_create(server: &mut Server, body: serde_json::Value) -> Mock {
    server
        .mock("POST", ARTIFACTS_PATH)
        .match_header("authorization", "Bearer runtime-token")
        .match_header("accept", INTERNAL_ACCEPT)
        .match_body(Matcher::Json(body))
        .with_status(201)
        .with_body(
            r#"{"containerId": 7, "name": "logs", "expiresOn": "2026-04-01T00:00:00Z"}"#,
        )
        .expect(1)
        .create()
}

fn mock_finalize(server: &mut Server) -> Mock {
    server
        .mock("PATCH", ARTIFACTS_PATH)
        .match_query(Matcher::UrlEncoded("artifactName".into(), "logs".into()))
        .match_body(Matcher::Json(json!({})))
        .with_status(200)
        .with_body(r#"{"containerId": 7, "size": 5}"#)
        .expect(1)
        .create()
}

fn mock_put(server: &mut Server, item_path: &str, status: usize) -> Mock {
    server
        .mock("PUT", CONTAINER_PATH)
        .match_query(Matcher::UrlEncoded("itemPath".into(), item_path.into()))
        .match_header("content-type", "application/octet-stream")
        .with_status(status)
        .with_body("{}")
        .expect(1)
        .create()
}

#[test]
fn test_upload_session() {
    let mut server = Server::new();
    let create = mock_create(&mut server, json!({"Type": "actions_storage", "Name": "logs", "RetentionDays": 5}));
    let put = server
        .mock("PUT", CONTAINER_PATH)
        .match_query(Matcher::UrlEncoded("itemPath".into(), "logs/build/out.txt".into()))
        .match_header("content-range", "bytes 0-4/5")
        .match_header("content-type", "application/octet-stream")
        .match_body("hello")
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create();
    let finalize = mock_finalize(&mut server);

    let api = api(&server);
    let (files, bytes) = api
        .upload_artifact(None, "logs", Some(5), |upload| {
            assert_eq!(upload.container().id, 7);
            assert!(upload.container().expires_at().is_some());
            upload.put("build/out.txt", b"hello")?;
            Ok((upload.files(), upload.bytes()))
        })
        .unwrap();

    assert_eq!((files, bytes), (1, 5));
    create.assert();
    put.assert();
    finalize.assert();
}

#[test]
fn test_failed_write_still_finalizes_once() {
    let mut server = Server::new();
    let create = mock_create(&mut server, json!({"Type": "actions_storage", "Name": "logs"}));
    let first = mock_put(&mut server, "logs/a.txt", 200);
    let second = mock_put(&mut server, "logs/b.txt", 500);
    let finalize = mock_finalize(&mut server);

    let api = api(&server);
    let result = api.upload_artifact(None, "logs", None, |upload| {
        upload.put("a.txt", b"first")?;
        upload.put("b.txt", b"second")?;
        Ok(())
    });

    match result {
        Err(ApiError::Http { status, .. }) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected the write error, got {other:?}"),
    }
    create.assert();
    first.assert();
    second.assert();
    finalize.assert();
}

#[test]
fn test_dropped_session_finalizes() {
    let mut server = Server::new();
    let _create = mock_create(&mut server, json!({"Type": "actions_storage", "Name": "logs"}));
    let put = mock_put(&mut server, "logs/a.txt", 200);
    let finalize = mock_finalize(&mut server);

    let api = api(&server);
    {
        let mut upload = api.artifact_upload(Some(42), "logs", None).unwrap();
        upload.put("a.txt", b"first").unwrap();
    }

    put.assert();
    finalize.assert();
}

#[test]
fn test_empty_file_has_no_content_range() {
    let mut server = Server::new();
    let _create = mock_create(&mut server, json!({"Type": "actions_storage", "Name": "logs"}));
    let put = server
        .mock("PUT", CONTAINER_PATH)
        .match_query(Matcher::UrlEncoded("itemPath".into(), "logs/empty".into()))
        .match_header("content-range", Matcher::Missing)
        .with_status(200)
        .expect(1)
        .create();
    let finalize = mock_finalize(&mut server);

    let api = api(&server);
    let upload = {
        let mut upload = api.artifact_upload(None, "logs", None).unwrap();
        upload.put("empty", b"").unwrap();
        upload
    };
    upload.finish().unwrap();

    put.assert();
    finalize.assert();
}

#[test]
fn test_retention_over_limit_sends_nothing() {
    let mut server = Server::new();
    let create = server.mock("POST", ARTIFACTS_PATH).expect(0).create();

    let api = api(&server);
    let result = api.upload_artifact(None, "logs", Some(11), |_| Ok(()));

    assert!(matches!(result, Err(ApiError::Format(_))));
    create.assert();
}

#[test]
fn test_previews_are_rejected() {
    let server = Server::new();
    let api = api(&server);
    let result = api.request(
        "pipelines",
        gh_actions_client::api::Request::get().preview("starfox"),
    );
    assert!(matches!(result, Err(ApiError::Format(_))));
}
