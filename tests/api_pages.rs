mod common;

use serde_json::{json, Value};

use common::TestApp;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn pages_are_appended_with_increasing_order() {
    let app = TestApp::spawn().await;
    let (_slug, token) = app.create_project().await;

    app.create_page(&token, "front-page").await;
    app.create_page(&token, "photo-spread").await;

    let response = app
        .client
        .get(app.url("/api/projects/me/pages"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let pages: Value = response.json().await.unwrap();
    let pages = pages.as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["order"], 0);
    assert_eq!(pages[0]["templateId"], "front-page");
    assert_eq!(pages[1]["order"], 1);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn unknown_template_is_rejected() {
    let app = TestApp::spawn().await;
    let (_slug, token) = app.create_project().await;

    let response = app
        .client
        .post(app.url("/api/projects/me/pages"))
        .bearer_auth(&token)
        .json(&json!({ "templateId": "no-such-template" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn empty_page_update_is_rejected() {
    let app = TestApp::spawn().await;
    let (_slug, token) = app.create_project().await;
    let page_id = app.create_page(&token, "blank").await;

    let response = app
        .client
        .put(app.url(&format!("/api/pages/{page_id}")))
        .bearer_auth(&token)
        .json(&json!({}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn updating_title_leaves_other_fields_alone() {
    let app = TestApp::spawn().await;
    let (_slug, token) = app.create_project().await;
    let page_id = app.create_page(&token, "front-page").await;

    let response = app
        .client
        .put(app.url(&format!("/api/pages/{page_id}")))
        .bearer_auth(&token)
        .json(&json!({ "title": "Dimanche 14 juillet" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let page: Value = response.json().await.unwrap();
    assert_eq!(page["title"], "Dimanche 14 juillet");
    assert_eq!(page["templateId"], "front-page");
    assert!(page["subtitle"].is_null());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn reorder_requires_the_complete_page_set() {
    let app = TestApp::spawn().await;
    let (_slug, token) = app.create_project().await;

    let first = app.create_page(&token, "blank").await;
    let second = app.create_page(&token, "blank").await;

    // Partial list: rejected.
    let partial = app
        .client
        .post(app.url("/api/pages/reorder"))
        .bearer_auth(&token)
        .json(&json!({ "pageIds": [first] }))
        .send()
        .await
        .unwrap();
    assert_eq!(partial.status(), 400);

    // Full permutation: accepted, order flipped.
    let full = app
        .client
        .post(app.url("/api/pages/reorder"))
        .bearer_auth(&token)
        .json(&json!({ "pageIds": [second, first] }))
        .send()
        .await
        .unwrap();
    assert_eq!(full.status(), 200);

    let pages: Value = full.json().await.unwrap();
    let pages = pages.as_array().unwrap();
    assert_eq!(pages[0]["id"], second.to_string());
    assert_eq!(pages[1]["id"], first.to_string());
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn pages_of_another_project_read_as_absent() {
    let app = TestApp::spawn().await;
    let (_slug_a, token_a) = app.create_project().await;
    let (_slug_b, token_b) = app.create_project().await;

    let foreign_page = app.create_page(&token_a, "blank").await;

    let response = app
        .client
        .delete(app.url(&format!("/api/pages/{foreign_page}")))
        .bearer_auth(&token_b)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "PAGE_NOT_FOUND");
}
