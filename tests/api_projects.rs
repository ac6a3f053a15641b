mod common;

use serde_json::{json, Value};

use common::TestApp;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn creating_a_project_returns_a_token_and_a_slug() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/projects"))
        .json(&json!({ "name": "La Gazette de la Vie", "password": "plume-d0ree-gazette!91" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert!(body["project"]["slug"].as_str().unwrap().starts_with("la-gazette-de-la-vie"));
    assert_eq!(body["tokenType"], "Bearer");
    assert!(!body["accessToken"].as_str().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn weak_password_is_rejected_with_validation_details() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/projects"))
        .json(&json!({ "name": "La Gazette", "password": "12345678" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"].is_array());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn duplicate_names_get_distinct_slugs() {
    let app = TestApp::spawn().await;

    let mut slugs = Vec::new();
    for _ in 0..2 {
        let response = app
            .client
            .post(app.url("/api/projects"))
            .json(&json!({ "name": "Edition Speciale", "password": "plume-d0ree-gazette!91" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        slugs.push(body["project"]["slug"].as_str().unwrap().to_string());
    }

    assert_ne!(slugs[0], slugs[1]);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn wrong_password_and_unknown_slug_are_indistinguishable() {
    let app = TestApp::spawn().await;
    let (slug, _token) = app.create_project().await;

    let wrong_password = app
        .client
        .post(app.url("/api/projects/access"))
        .json(&json!({ "slug": slug, "password": "not-the-password-1!" }))
        .send()
        .await
        .unwrap();

    let unknown_slug = app
        .client
        .post(app.url("/api/projects/access"))
        .json(&json!({ "slug": "no-such-gazette", "password": "not-the-password-1!" }))
        .send()
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(unknown_slug.status(), 401);

    let a: Value = wrong_password.json().await.unwrap();
    let b: Value = unknown_slug.json().await.unwrap();
    assert_eq!(a["error"]["code"], "INVALID_CREDENTIALS");
    assert_eq!(a["error"], b["error"]);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn protected_routes_reject_missing_tokens() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/api/projects/me")).send().await.unwrap();
    assert_eq!(response.status(), 401);

    let response = app
        .client
        .get(app.url("/api/projects/me"))
        .bearer_auth("garbage-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn deleting_a_project_removes_its_gazette() {
    let app = TestApp::spawn().await;
    let (slug, token) = app.create_project().await;
    app.create_page(&token, "blank").await;

    let response = app
        .client
        .delete(app.url("/api/projects/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let viewer = app
        .client
        .get(app.url(&format!("/api/gazettes/{slug}")))
        .send()
        .await
        .unwrap();
    assert_eq!(viewer.status(), 404);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn public_viewer_serves_pages_in_order_without_a_token() {
    let app = TestApp::spawn().await;
    let (slug, token) = app.create_project().await;

    app.create_page(&token, "front-page").await;
    app.create_page(&token, "blank").await;

    let response = app
        .client
        .get(app.url(&format!("/api/gazettes/{slug}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let pages = body["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["order"], 0);
    assert_eq!(pages[1]["order"], 1);
    assert!(pages[0]["elements"].is_array());
}
