//! Wallet Store
//!
//! Persistence layer for wallet balances. Each mutation is a single fused
//! predicate+mutation UPDATE evaluated by Postgres, so the existence check
//! (and, for debits, the sufficiency check) and the write happen atomically.
//! No in-process lock serializes access to a wallet: a process-local mutex
//! cannot protect rows shared with other replicas, so all serialization is
//! pushed to the storage engine.

mod error;

pub use error::StoreError;

use sqlx::PgPool;
use uuid::Uuid;

/// Balance primitives over the wallets table.
///
/// Implementations must guarantee that concurrent calls against the same
/// wallet never lose an update and never drive the balance below zero.
pub trait WalletStore {
    /// Add `amount` to the wallet's balance.
    ///
    /// Reports `NotFound` when no row matched; the balance is untouched.
    fn credit(
        &self,
        wallet_id: &str,
        amount: i64,
        request_id: Uuid,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Subtract `amount` from the wallet's balance, only if the current
    /// balance covers it.
    ///
    /// Reports `InsufficientFundsOrNotFound` when no row matched; the two
    /// causes are indistinguishable by design (row-count signal).
    fn debit(
        &self,
        wallet_id: &str,
        amount: i64,
        request_id: Uuid,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Point read of the current balance.
    fn balance(
        &self,
        wallet_id: &str,
        request_id: Uuid,
    ) -> impl std::future::Future<Output = Result<i64, StoreError>> + Send;
}

/// Postgres-backed store over a shared connection pool.
///
/// The pool is created once at startup and closed once at shutdown by the
/// process lifecycle; cloning this struct clones the pool handle only.
#[derive(Debug, Clone)]
pub struct PgWalletStore {
    pool: PgPool,
}

impl PgWalletStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl WalletStore for PgWalletStore {
    async fn credit(
        &self,
        wallet_id: &str,
        amount: i64,
        request_id: Uuid,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE wallets SET balance = balance + $1 WHERE id = $2")
            .bind(amount)
            .bind(wallet_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "credit statement failed");
                StoreError::Storage(e)
            })?;

        if result.rows_affected() == 0 {
            tracing::warn!(request_id = %request_id, wallet_id, "credit: wallet not found");
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn debit(
        &self,
        wallet_id: &str,
        amount: i64,
        request_id: Uuid,
    ) -> Result<(), StoreError> {
        // The balance >= $1 predicate and the decrement are one statement,
        // so two concurrent debits can never both observe the pre-mutation
        // balance.
        let result = sqlx::query(
            "UPDATE wallets SET balance = balance - $1 WHERE id = $2 AND balance >= $1",
        )
        .bind(amount)
        .bind(wallet_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "debit statement failed");
            StoreError::Storage(e)
        })?;

        if result.rows_affected() == 0 {
            tracing::warn!(
                request_id = %request_id,
                wallet_id,
                "debit: insufficient funds or wallet not found"
            );
            return Err(StoreError::InsufficientFundsOrNotFound);
        }

        Ok(())
    }

    async fn balance(&self, wallet_id: &str, request_id: Uuid) -> Result<i64, StoreError> {
        let balance: Option<i64> = sqlx::query_scalar("SELECT balance FROM wallets WHERE id = $1")
            .bind(wallet_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(request_id = %request_id, error = %e, "balance query failed");
                StoreError::Storage(e)
            })?;

        balance.ok_or(StoreError::NotFound)
    }
}
