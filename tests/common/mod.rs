use std::net::TcpListener;
use std::sync::Arc;

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use gazette_backend::infrastructure::auth::jwt::JwtService;
use gazette_backend::infrastructure::storage::images::ImageStorage;
use gazette_backend::interfaces::middlewares::auth::AuthMiddleware;
use gazette_backend::interfaces::routes::configure_routes;
use gazette_backend::settings::{AppConfig, AppEnvironment};
use gazette_backend::AppState;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub pool: PgPool,
    // Dropping the tempdir deletes the uploaded files with it.
    _storage_dir: tempfile::TempDir,
}

fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Gazette Test".into(),
        port: 0,
        host: "127.0.0.1".into(),
        worker_count: 1,
        database_url: String::new(),
        database_max_connections: 2,
        cors_allowed_origins: vec!["*".into()],
        jwt_secret: "integration_test_secret_0123456789_0123456789_0123456789".into(),
        jwt_expiration_minutes: 30,
        image_storage_dir: String::new(),
    }
}

impl TestApp {
    /// Binds the app on a random port against the database named by
    /// TEST_DATABASE_URL (falling back to DATABASE_URL).
    pub async fn spawn() -> TestApp {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("TEST_DATABASE_URL or DATABASE_URL must be set");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("failed to connect to the test database");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("failed to run migrations");

        let storage_dir = tempfile::tempdir().expect("failed to create temp storage dir");
        let storage = ImageStorage::new(storage_dir.path());
        storage.ensure_root().await.expect("failed to prepare storage root");

        let jwt_service = Arc::new(JwtService::new(&test_config()));
        let state = web::Data::new(AppState::new(pool.clone(), jwt_service.clone(), storage));

        let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind random port");
        let port = listener.local_addr().unwrap().port();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .configure(configure_routes)
                .wrap(AuthMiddleware::new(jwt_service.clone()))
                .wrap(NormalizePath::trim())
        })
        .listen(listener)
        .expect("failed to listen")
        .run();

        tokio::spawn(server);

        TestApp {
            address: format!("http://127.0.0.1:{port}"),
            client: reqwest::Client::new(),
            pool,
            _storage_dir: storage_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    /// Creates a fresh project and returns `(slug, access_token)`.
    pub async fn create_project(&self) -> (String, String) {
        let name = format!("Gazette {}", Uuid::new_v4().simple());
        let response = self
            .client
            .post(self.url("/api/projects"))
            .json(&json!({ "name": name, "password": "plume-d0ree-gazette!91" }))
            .send()
            .await
            .expect("create project request failed");
        assert_eq!(response.status(), 201, "project creation should succeed");

        let body: Value = response.json().await.expect("invalid json");
        let slug = body["project"]["slug"].as_str().expect("missing slug").to_string();
        let token = body["accessToken"].as_str().expect("missing token").to_string();
        (slug, token)
    }

    /// Creates a page in the authenticated project and returns its id.
    pub async fn create_page(&self, token: &str, template_id: &str) -> Uuid {
        let response = self
            .client
            .post(self.url("/api/projects/me/pages"))
            .bearer_auth(token)
            .json(&json!({ "templateId": template_id }))
            .send()
            .await
            .expect("create page request failed");
        assert_eq!(response.status(), 201, "page creation should succeed");

        let body: Value = response.json().await.expect("invalid json");
        body["id"].as_str().and_then(|s| s.parse().ok()).expect("missing page id")
    }
}
