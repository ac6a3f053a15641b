use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use gazette_backend::graceful_shutdown::shutdown_signal;
use gazette_backend::infrastructure::auth::jwt::JwtService;
use gazette_backend::infrastructure::db::postgres::create_pool;
use gazette_backend::infrastructure::storage::images::ImageStorage;
use gazette_backend::interfaces::middlewares::auth::AuthMiddleware;
use gazette_backend::interfaces::routes::configure_routes;
use gazette_backend::settings::AppConfig;
use gazette_backend::AppState;

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();

    let mut cors = if origins.iter().any(|o| o == "*") {
        Cors::default().allow_any_origin()
    } else {
        let mut cors = Cors::default();
        for origin in &origins {
            cors = cors.allowed_origin(origin);
        }
        cors
    };

    cors = cors
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(3600);

    cors
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));
    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!(env = %config.env, "starting {} v{}", config.name, env!("CARGO_PKG_VERSION"));
    tracing::debug!(?config, "resolved configuration");

    let pool = create_pool(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let storage = ImageStorage::new(&config.image_storage_dir);
    storage.ensure_root().await?;

    let jwt_service = Arc::new(JwtService::new(&config));
    let state = web::Data::new(AppState::new(pool, jwt_service.clone(), storage));

    let host = config.host.clone();
    let port = config.port;
    let workers = config.worker_count;

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure_routes)
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(build_cors(&config))
            .wrap(TracingLogger::default())
            .wrap(NormalizePath::trim())
    })
    .workers(workers)
    .bind((host.as_str(), port))?
    .run();

    info!("listening on http://{host}:{port}");

    tokio::select! {
        result = server => result?,
        _ = shutdown_signal() => {
            info!("shutdown complete");
        }
    }

    Ok(())
}
