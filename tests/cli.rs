//
//  gh-actions-client
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use std::io::Write;

use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;

const RUNNER_VARS: [&str; 6] = [
    "GHA_TOKEN",
    "GHA_API_URL",
    "GITHUB_TOKEN",
    "ACTIONS_RUNTIME_TOKEN",
    "ACTIONS_RUNTIME_URL",
    "ACTIONS_CACHE_URL",
];

fn gha() -> Command {
    let mut cmd = Command::cargo_bin("gha").unwrap();
    for var in RUNNER_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_version() {
    gha()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("gha version "));
}

#[test]
fn test_node_id_encode() {
    gha()
        .args(["node-id", "encode", "583231", "User"])
        .assert()
        .success()
        .stdout("MDQ6VXNlcjU4MzIzMQ==\n");
}

#[test]
fn test_node_id_decode() {
    gha()
        .args(["node-id", "decode", "MDQ6VXNlcjU4MzIzMQ=="])
        .assert()
        .success()
        .stdout("User 583231\n");
}

#[test]
fn test_node_id_decode_json() {
    gha()
        .args(["node-id", "decode", "MDQ6VXNlcjU4MzIzMQ==", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id":583231"#))
        .stdout(predicate::str::contains(r#""type":"User""#));
}

#[test]
fn test_node_id_decode_wrong_type_fails() {
    gha()
        .args(["node-id", "decode", "MDQ6VXNlcjU4MzIzMQ==", "--expect", "Issue"])
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_api_get_against_custom_host() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/repos/octocat/hello-world")
        .match_header("authorization", "Bearer cli-token")
        .with_status(200)
        .with_body(r#"{"id": 1296269, "full_name": "octocat/hello-world"}"#)
        .create();

    gha()
        .args(["api", "repos/octocat/hello-world", "--api-url"])
        .arg(server.url())
        .args(["--token", "cli-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("octocat/hello-world"));
    mock.assert();
}

#[test]
fn test_api_fields_become_post_body() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/repos/o/r/issues")
        .match_body(Matcher::Json(serde_json::json!({"title": "Flaky test", "draft": true})))
        .with_status(201)
        .with_body(r#"{"number": 12}"#)
        .create();

    gha()
        .args(["api", "repos/o/r/issues", "-F", "title=Flaky test", "-F", "draft=true"])
        .args(["--api-url", &server.url(), "--token", "cli-token"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12"));
    mock.assert();
}

#[test]
fn test_api_unauthorized_exits_with_auth_code() {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/user")
        .with_status(401)
        .with_body(r#"{"message": "Bad credentials"}"#)
        .create();

    gha()
        .args(["api", "user", "--api-url", &server.url(), "--token", "stale"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Bad credentials"));
}

#[test]
fn test_artifact_upload_needs_runner_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello").unwrap();

    gha()
        .args(["artifact", "upload"])
        .arg(file.path())
        .args(["--name", "out.txt"])
        .assert()
        .code(4)
        .stderr(predicate::str::starts_with("Error:"));
}
