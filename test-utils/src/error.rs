use thiserror::Error;

/// Errors that can occur while preparing a test environment.
#[derive(Error, Debug)]
pub enum TestError {
    /// Failed to open the in-memory SQLite pool or create the session table.
    #[error(transparent)]
    Database(#[from] tower_sessions_sqlx_store::sqlx::Error),
}
