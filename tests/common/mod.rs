//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Connect to the test database and make sure the wallets table exists.
///
/// Tests create their own uniquely-named wallets instead of truncating, so
/// they can run concurrently against the same database.
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS wallets (id TEXT PRIMARY KEY, balance BIGINT NOT NULL)",
    )
    .execute(&pool)
    .await
    .expect("Failed to ensure wallets table");

    pool
}

/// Insert a wallet row with the given starting balance and return its id.
pub async fn seed_wallet(pool: &PgPool, balance: i64) -> String {
    let wallet_id = format!("test-{}", Uuid::new_v4());

    sqlx::query("INSERT INTO wallets (id, balance) VALUES ($1, $2)")
        .bind(&wallet_id)
        .bind(balance)
        .execute(pool)
        .await
        .expect("Failed to seed wallet");

    wallet_id
}

/// Read a wallet's balance directly, bypassing the store.
pub async fn raw_balance(pool: &PgPool, wallet_id: &str) -> i64 {
    sqlx::query_scalar("SELECT balance FROM wallets WHERE id = $1")
        .bind(wallet_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read balance")
}
