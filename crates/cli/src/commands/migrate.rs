//! Database migration command.
//!
//! Applies the migrations embedded from `crates/server/migrations/` to the
//! database named by `DATABASE_URL`. Already-applied migrations are skipped.

use super::CommandError;

/// Run pending database migrations.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
