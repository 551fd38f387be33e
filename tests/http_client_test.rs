//! Integration tests for the HTTP helpers against a local mock server

use ats_client::{ClientApp, ClientConfig, ClientError, HttpClient, RequestContext, RequestOptions};
use mockito::Matcher;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn context<'a>(client: &'a HttpClient, base: &str, user: Option<&str>) -> RequestContext<'a> {
    RequestContext::new(client, base, user, None).expect("Failed to build context")
}

#[test]
fn test_get_joins_url_and_sends_user() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/users/42")
        .match_header("x-auth-userid", "bob")
        .with_status(200)
        .with_body(r#"{"id": 42}"#)
        .create();

    let client = HttpClient::new().unwrap();
    let base = format!("{}/api/", server.url());
    let response = context(&client, &base, Some("bob"))
        .get(["/users/", "42"], RequestOptions::new())
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().unwrap(), r#"{"id": 42}"#);
    mock.assert();
}

#[test]
fn test_anonymous_request_has_no_auth_header() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/status")
        .match_header("x-auth-userid", Matcher::Missing)
        .with_status(200)
        .create();

    let client = HttpClient::new().unwrap();
    context(&client, &server.url(), None)
        .get(["status"], RequestOptions::new())
        .unwrap();
    mock.assert();
}

#[test]
fn test_error_body_is_reported() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/items")
        .with_status(400)
        .with_body("invalid field")
        .create();

    let client = HttpClient::new().unwrap();
    let err = context(&client, &server.url(), None)
        .post(["items"], RequestOptions::new())
        .unwrap_err();

    assert!(err.to_string().contains("invalid field"), "message: {}", err);
    match err {
        ClientError::Http { status, url, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "invalid field");
            assert!(url.ends_with("/items"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    mock.assert();
}

#[test]
fn test_server_error_is_not_retried() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("DELETE", "/items/7")
        .with_status(503)
        .with_body("maintenance")
        .expect(1)
        .create();

    let client = HttpClient::new().unwrap();
    let err = context(&client, &server.url(), None)
        .delete(["items", "7"], RequestOptions::new())
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    mock.assert();
}

#[test]
fn test_post_json_body() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/items")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({"name": "widget", "count": 3})))
        .with_status(201)
        .with_body(r#"{"id": 1}"#)
        .create();

    let client = HttpClient::new().unwrap();
    let options = RequestOptions::new()
        .json(&json!({"name": "widget", "count": 3}))
        .unwrap();
    let response = context(&client, &server.url(), None)
        .post(["items"], options)
        .unwrap();

    assert_eq!(response.status(), 201);
    mock.assert();
}

#[test]
fn test_put_text_body_and_query() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("PUT", "/notes/1")
        .match_query(Matcher::UrlEncoded("force".into(), "true".into()))
        .match_body("hello")
        .with_status(204)
        .create();

    let client = HttpClient::new().unwrap();
    let options = RequestOptions::new().text("hello").query("force", "true");
    let response = context(&client, &server.url(), None)
        .put(["notes", "1"], options)
        .unwrap();

    assert_eq!(response.status(), 204);
    mock.assert();
}

#[test]
fn test_explicit_header_overrides_context_user() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/whoami")
        .match_header("x-auth-userid", "carol")
        .with_status(200)
        .create();

    let client = HttpClient::new().unwrap();
    let options = RequestOptions::new().header("X-Auth-UserId", "carol").unwrap();
    context(&client, &server.url(), Some("bob"))
        .get(["whoami"], options)
        .unwrap();
    mock.assert();
}

#[test]
fn test_connection_failure_is_transport_error() {
    let client = HttpClient::new().unwrap();
    let err = client
        .get("http://127.0.0.1:1/unreachable", RequestOptions::new())
        .unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {:?}", err);
}

#[cfg(unix)]
#[test]
fn test_end_to_end_with_config_default_user() {
    use std::os::unix::fs::PermissionsExt;

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/v1/servers")
        .match_header("x-auth-userid", "alice")
        .with_status(200)
        .with_body(r#"[{"a": 1, "b": 2}, {"b": 3, "c": 4}]"#)
        .create();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("client.ini");
    fs::write(
        &path,
        format!("[session]\nserver_url = {}/v1/\nuser = alice\n", server.url()),
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

    let app = ClientApp::with_config(ClientConfig::load(&path).unwrap()).unwrap();
    let response = app
        .context(&Default::default())
        .unwrap()
        .get(["servers"], RequestOptions::new())
        .unwrap();
    let objects: Vec<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_str(&response.text().unwrap()).unwrap();

    let (columns, rows) = ats_client::list_to_table(&objects);
    assert_eq!(columns, vec!["a", "b", "c"]);
    let rows: Vec<_> = rows.collect();
    assert_eq!(rows[0], vec![json!(1), json!(2), json!("")]);
    assert_eq!(rows[1], vec![json!(""), json!(3), json!(4)]);
    mock.assert();
}
