//! End-to-end tests for the JSON API against a stub remote source.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use roster_integration_tests::{StubRemote, TestDashboard, fixture_users};
use serde_json::{Value, json};

#[tokio::test]
async fn test_list_before_and_after_load() {
    let remote = StubRemote::spawn(fixture_users(), Vec::new()).await;
    let dashboard = TestDashboard::spawn(&remote, false).await;

    let resp = dashboard.get("/api/users").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    dashboard.state.load().await.unwrap();
    let users: Vec<Value> = dashboard.get("/api/users").await.json().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["id"], 1);
    assert_eq!(users[0]["company"]["catchPhrase"], "Multi-layered client-server neural-net");
}

#[tokio::test]
async fn test_list_search() {
    let remote = StubRemote::spawn(fixture_users(), Vec::new()).await;
    let dashboard = TestDashboard::spawn_loaded(&remote, false).await;

    let users: Vec<Value> = dashboard.get("/api/users?q=bret").await.json().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["name"], "Leanne Graham");

    let users: Vec<Value> = dashboard.get("/api/users?q=%20%20").await.json().await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn test_create_and_find() {
    let remote = StubRemote::spawn(fixture_users(), Vec::new()).await;
    let dashboard = TestDashboard::spawn_loaded(&remote, true).await;

    let resp = dashboard
        .post_json(
            "/api/users",
            &json!({
                "name": "  Grace Hopper ",
                "username": "grace",
                "email": "grace@navy.mil",
                "phone": "555-0199"
            }),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["id"], 4);
    assert_eq!(created["name"], "Grace Hopper");
    assert_eq!(created["address"]["city"], "Unknown City");
    assert_eq!(created["company"]["name"], "No Company");

    let found: Value = dashboard.get("/api/users/4").await.json().await.unwrap();
    assert_eq!(found, created);
    assert_eq!(remote.user_hits(), 0);
}

#[tokio::test]
async fn test_create_rejects_invalid() {
    let remote = StubRemote::spawn(fixture_users(), Vec::new()).await;
    let dashboard = TestDashboard::spawn_loaded(&remote, true).await;

    let resp = dashboard
        .post_json("/api/users", &json!({ "name": "Grace", "email": "grace at navy" }))
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"]["username"], "Username is required");
    assert_eq!(body["errors"]["email"], "Please enter a valid email address");
    assert_eq!(body["errors"]["phone"], "Phone number is required");
    assert_eq!(remote.create_hits(), 0);
}

#[tokio::test]
async fn test_find_unknown_is_not_found() {
    let remote = StubRemote::spawn(fixture_users(), Vec::new()).await;
    let dashboard = TestDashboard::spawn_loaded(&remote, false).await;

    let resp = dashboard.get("/api/users/42").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(remote.user_hits(), 1);
}
