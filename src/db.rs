//! Database module
//!
//! Connectivity and schema presence checks. The service performs no
//! migrations and never creates wallet rows; it only verifies at startup
//! that the table it conditionally updates exists.

use sqlx::PgPool;

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Check that the wallets table exists
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = 'wallets'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !exists {
        tracing::error!("Required table 'wallets' does not exist");
    }

    Ok(exists)
}
