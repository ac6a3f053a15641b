use std::sync::Mutex;

use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use once_cell::sync::Lazy;
use serde::Serialize;
use sysinfo::System;

use crate::constants::START_TIME;
use crate::errors::AppError;
use crate::repositories::project::ProjectRepository;
use crate::AppState;

// Refreshing a System is not free; one shared instance plus a short-lived
// snapshot keeps repeated probes cheap.
static SYSTEM: Lazy<Mutex<System>> = Lazy::new(|| Mutex::new(System::new_all()));
static MEMORY_SNAPSHOT: Lazy<Mutex<Option<(std::time::Instant, u64, u64)>>> =
    Lazy::new(|| Mutex::new(None));

const SNAPSHOT_TTL: std::time::Duration = std::time::Duration::from_secs(5);

fn memory_snapshot() -> Result<(u64, u64), AppError> {
    let mut cached = MEMORY_SNAPSHOT
        .lock()
        .map_err(|_| AppError::InternalError("system info lock poisoned".to_string()))?;

    if let Some((taken_at, used, total)) = *cached {
        if taken_at.elapsed() < SNAPSHOT_TTL {
            return Ok((used, total));
        }
    }

    let mut system = SYSTEM
        .lock()
        .map_err(|_| AppError::InternalError("system info lock poisoned".to_string()))?;
    system.refresh_memory();
    let used = system.used_memory() / (1024 * 1024);
    let total = system.total_memory() / (1024 * 1024);

    *cached = Some((std::time::Instant::now(), used, total));
    Ok((used, total))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime: String,
    database: &'static str,
    memory_used_mb: u64,
    memory_total_mb: u64,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let database = match state.project_handler.project_repo.check_connection().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unreachable");
            "unreachable"
        }
    };

    let uptime_seconds = (Utc::now() - *START_TIME).num_seconds().max(0) as u64;
    let uptime = humantime::format_duration(std::time::Duration::from_secs(uptime_seconds));

    let (memory_used_mb, memory_total_mb) = memory_snapshot()?;

    let status = if database == "connected" { "ok" } else { "degraded" };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime: uptime.to_string(),
        database,
        memory_used_mb,
        memory_total_mb,
    }))
}
