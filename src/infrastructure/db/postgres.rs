use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, warn};

use crate::settings::AppConfig;

const CONNECT_ATTEMPTS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects with bounded retries so the API can come up while Postgres
/// is still starting. The delay between attempts doubles each time.
pub async fn create_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let options = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT);

    let mut attempt = 1;
    let mut delay = Duration::from_secs(1);

    loop {
        match options.clone().connect(&config.database_url).await {
            Ok(pool) => {
                info!(
                    max_connections = config.database_max_connections,
                    "database pool ready"
                );
                return Ok(pool);
            }
            Err(e) => {
                if attempt >= CONNECT_ATTEMPTS {
                    return Err(e);
                }
                warn!(attempt, "database not reachable yet ({e}); next try in {delay:?}");
                tokio::time::sleep(delay).await;
                attempt += 1;
                delay *= 2;
            }
        }
    }
}
