mod common;

use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use common::TestApp;

// 1x1 transparent PNG.
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

async fn upload_png(app: &TestApp, token: &str) -> Value {
    let form = Form::new().part(
        "file",
        Part::bytes(TINY_PNG.to_vec())
            .file_name("photo.png")
            .mime_str("image/png")
            .unwrap(),
    );

    let response = app
        .client
        .post(app.url("/api/images"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn uploaded_image_is_served_back_with_its_mime_type() {
    let app = TestApp::spawn().await;
    let (_slug, token) = app.create_project().await;

    let image = upload_png(&app, &token).await;
    assert_eq!(image["mimeType"], "image/png");
    let url = image["imageUrl"].as_str().unwrap();

    // Serving is public: no token.
    let response = app.client.get(app.url(url)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(response.bytes().await.unwrap().as_ref(), TINY_PNG);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn non_image_uploads_are_rejected() {
    let app = TestApp::spawn().await;
    let (_slug, token) = app.create_project().await;

    let form = Form::new().part(
        "file",
        Part::bytes(b"%PDF-1.4 definitely not an image".to_vec()).file_name("doc.pdf"),
    );

    let response = app
        .client
        .post(app.url("/api/images"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn image_survives_while_any_element_references_it() {
    let app = TestApp::spawn().await;
    let (_slug, token) = app.create_project().await;
    let page_id = app.create_page(&token, "blank").await;

    let image = upload_png(&app, &token).await;
    let image_id = image["id"].as_str().unwrap();
    let file_url = image["imageUrl"].as_str().unwrap().to_string();

    let mut element_ids = Vec::new();
    for _ in 0..2 {
        let element: Value = app
            .client
            .post(app.url(&format!("/api/pages/{page_id}/elements")))
            .bearer_auth(&token)
            .json(&json!({
                "type": "image",
                "position": { "x": 0.0, "y": 0.0, "width": 200.0, "height": 150.0 },
                "imageId": image_id
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        element_ids.push(element["id"].as_str().unwrap().to_string());
    }

    // One reference remains: still served.
    app.client
        .delete(app.url(&format!("/api/elements/{}", element_ids[0])))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let still_there = app.client.get(app.url(&file_url)).send().await.unwrap();
    assert_eq!(still_there.status(), 200);

    // Last reference gone: the image goes with it.
    app.client
        .delete(app.url(&format!("/api/elements/{}", element_ids[1])))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let gone = app.client.get(app.url(&file_url)).send().await.unwrap();
    assert_eq!(gone.status(), 404);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn elements_cannot_reference_images_of_other_projects() {
    let app = TestApp::spawn().await;
    let (_slug_a, token_a) = app.create_project().await;
    let (_slug_b, token_b) = app.create_project().await;

    let foreign_image = upload_png(&app, &token_a).await;
    let page_id = app.create_page(&token_b, "blank").await;

    let response = app
        .client
        .post(app.url(&format!("/api/pages/{page_id}/elements")))
        .bearer_auth(&token_b)
        .json(&json!({
            "type": "image",
            "position": { "x": 0.0, "y": 0.0, "width": 200.0, "height": 150.0 },
            "imageId": foreign_image["id"]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "IMAGE_NOT_FOUND");
}
