use std::future::Future;
use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{info, warn};

use crate::entities::user_tokens;
use crate::error::AppError;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Hide the password part of a database URL for logging.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth_part, host_part)) = url.split_once('@') else {
        return url.to_string();
    };
    match auth_part.rfind(':') {
        Some(colon_pos) if colon_pos > auth_part.find("://").map_or(0, |p| p + 2) => {
            format!("{}:***@{}", &auth_part[..colon_pos], host_part)
        }
        _ => url.to_string(),
    }
}

/// Retry a connection attempt with fixed interval delays.
async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval: Duration,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, "connection_retry=success");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(_) => {
                warn!(attempt, max_attempts, "connection_retry=failed");
                tokio::time::sleep(interval).await;
                attempt += 1;
            }
        }
    }
}

/// Connect to the token store database. Does not create any schema.
///
/// In-memory SQLite gets no retries; remote databases are retried briefly
/// to ride out container start-up ordering.
pub async fn connect(url: &str, max_connections: u32) -> Result<DatabaseConnection, AppError> {
    // Each in-memory SQLite connection is a separate database.
    let pool_max = if url.contains(":memory:") {
        1
    } else {
        max_connections.max(1)
    };

    let mut opt = ConnectOptions::new(url);
    opt.min_connections(1)
        .max_connections(pool_max)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let attempts = if url.starts_with("sqlite:") {
        1
    } else {
        CONNECT_ATTEMPTS
    };

    let conn = retry_connection(
        || {
            let opt = opt.clone();
            async move {
                Database::connect(opt)
                    .await
                    .map_err(|e| AppError::config(format!("failed to connect to database: {e}")))
            }
        },
        attempts,
        CONNECT_RETRY_INTERVAL,
    )
    .await?;

    info!(db = %sanitize_db_url(url), "token store database connected");
    Ok(conn)
}

/// Create the `user_tokens` table and its indexes if absent.
pub async fn ensure_schema(conn: &DatabaseConnection) -> Result<(), AppError> {
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(user_tokens::Entity);
    conn.execute(backend.build(table.if_not_exists()))
        .await
        .map_err(|e| AppError::config(format!("failed to create user_tokens: {e}")))?;

    for mut index in schema.create_index_from_entity(user_tokens::Entity) {
        conn.execute(backend.build(index.if_not_exists()))
            .await
            .map_err(|e| AppError::config(format!("failed to index user_tokens: {e}")))?;
    }

    Ok(())
}
