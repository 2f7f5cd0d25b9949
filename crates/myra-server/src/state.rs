use sqlx::PgPool;

/// Shared application state passed to all route handlers.
///
/// Constructed once at startup and injected through the router; handlers
/// never reach for a global connection.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
