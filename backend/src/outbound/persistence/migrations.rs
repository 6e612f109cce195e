//! Embedded schema migrations.
//!
//! Migrations under `backend/migrations` are compiled into the binary and run
//! on a dedicated synchronous connection inside a blocking task.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not open the migration connection.
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    /// The blocking task panicked or was cancelled.
    #[error("migration task failed: {message}")]
    Task { message: String },
}

/// Apply all pending migrations against `database_url`.
///
/// # Errors
/// Returns [`MigrationError`] when the connection or any migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || -> Result<usize, MigrationError> {
        let mut connection =
            PgConnection::establish(&url).map_err(|error| MigrationError::Connect {
                message: error.to_string(),
            })?;
        let versions = connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(|error| MigrationError::Apply {
                message: error.to_string(),
            })?;
        Ok(versions.len())
    })
    .await
    .map_err(|error| MigrationError::Task {
        message: error.to_string(),
    })??;
    info!(applied, "database migrations complete");
    Ok(())
}
