//! Wallet Service
//!
//! Validates an operation request and dispatches it to the store, folding
//! store outcomes into a closed error taxonomy the HTTP layer can map to
//! status codes. The service holds no state between calls and never
//! retries; retry policy belongs to the caller.

use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use crate::store::{StoreError, WalletStore};

/// The two recognized operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Credit,
    Debit,
}

impl FromStr for OperationKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREDIT" => Ok(Self::Credit),
            "DEBIT" => Ok(Self::Debit),
            other => Err(ServiceError::InvalidOperation(other.to_string())),
        }
    }
}

/// Service error taxonomy.
///
/// Each variant maps to exactly one outcome category: bad input, not found,
/// business-rule failure, or transient unavailability (retryable).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected before any store access.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("wallet not found: {0}")]
    AccountNotFound(String),

    /// A debit the balance could not cover. Indistinguishable from a
    /// missing wallet at the store level; surfaced as the business-rule
    /// failure since that is the common case for known callers.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Storage or network failure; the caller may retry.
    #[error("storage unavailable")]
    Unavailable(#[source] StoreError),
}

/// Stateless front for the wallet store.
#[derive(Debug, Clone)]
pub struct WalletService<S> {
    store: S,
}

impl<S: WalletStore> WalletService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and apply one balance mutation.
    ///
    /// `kind` outside {CREDIT, DEBIT} and negative amounts are rejected
    /// without touching the store.
    pub async fn execute(
        &self,
        wallet_id: &str,
        kind: &str,
        amount: i64,
        request_id: Uuid,
    ) -> Result<(), ServiceError> {
        let kind: OperationKind = kind.parse()?;

        if amount < 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "amount must be non-negative, got {amount}"
            )));
        }

        match kind {
            OperationKind::Credit => {
                self.store
                    .credit(wallet_id, amount, request_id)
                    .await
                    .map_err(|e| match e {
                        StoreError::NotFound => {
                            ServiceError::AccountNotFound(wallet_id.to_string())
                        }
                        other => ServiceError::Unavailable(other),
                    })?
            }
            OperationKind::Debit => {
                self.store
                    .debit(wallet_id, amount, request_id)
                    .await
                    .map_err(|e| match e {
                        StoreError::InsufficientFundsOrNotFound => {
                            ServiceError::InsufficientFunds
                        }
                        other => ServiceError::Unavailable(other),
                    })?
            }
        }

        tracing::info!(
            request_id = %request_id,
            wallet_id,
            kind = ?kind,
            amount,
            "wallet operation applied"
        );
        Ok(())
    }

    /// Read the current balance without mutating it.
    pub async fn balance(&self, wallet_id: &str, request_id: Uuid) -> Result<i64, ServiceError> {
        let balance = self
            .store
            .balance(wallet_id, request_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => ServiceError::AccountNotFound(wallet_id.to_string()),
                other => ServiceError::Unavailable(other),
            })?;

        tracing::debug!(request_id = %request_id, wallet_id, balance, "balance read");
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Call-recording store. Each primitive counts its invocations and
    /// replays a scripted outcome; the next error to return is taken from
    /// the corresponding slot, success otherwise.
    #[derive(Clone, Default)]
    struct MockStore {
        inner: Arc<MockInner>,
    }

    #[derive(Default)]
    struct MockInner {
        credit_calls: AtomicUsize,
        debit_calls: AtomicUsize,
        balance_calls: AtomicUsize,
        credit_error: Mutex<Option<StoreError>>,
        debit_error: Mutex<Option<StoreError>>,
        balance_error: Mutex<Option<StoreError>>,
        balance_value: AtomicI64,
    }

    impl MockStore {
        fn total_calls(&self) -> usize {
            self.inner.credit_calls.load(Ordering::SeqCst)
                + self.inner.debit_calls.load(Ordering::SeqCst)
                + self.inner.balance_calls.load(Ordering::SeqCst)
        }
    }

    impl WalletStore for MockStore {
        async fn credit(&self, _: &str, _: i64, _: Uuid) -> Result<(), StoreError> {
            self.inner.credit_calls.fetch_add(1, Ordering::SeqCst);
            match self.inner.credit_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn debit(&self, _: &str, _: i64, _: Uuid) -> Result<(), StoreError> {
            self.inner.debit_calls.fetch_add(1, Ordering::SeqCst);
            match self.inner.debit_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }

        async fn balance(&self, _: &str, _: Uuid) -> Result<i64, StoreError> {
            self.inner.balance_calls.fetch_add(1, Ordering::SeqCst);
            match self.inner.balance_error.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(self.inner.balance_value.load(Ordering::SeqCst)),
            }
        }
    }

    fn rid() -> Uuid {
        Uuid::new_v4()
    }

    #[tokio::test]
    async fn test_unknown_kind_rejected_before_store_access() {
        let store = MockStore::default();
        let service = WalletService::new(store.clone());

        let result = service.execute("w1", "TRANSFER", 10, rid()).await;

        assert!(matches!(result, Err(ServiceError::InvalidOperation(_))));
        assert_eq!(store.total_calls(), 0, "store must not be touched");
    }

    #[tokio::test]
    async fn test_negative_amount_rejected_before_store_access() {
        let store = MockStore::default();
        let service = WalletService::new(store.clone());

        let result = service.execute("w1", "CREDIT", -5, rid()).await;

        assert!(matches!(result, Err(ServiceError::InvalidOperation(_))));
        assert_eq!(store.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_credit_success_delegates_once() {
        let store = MockStore::default();
        let service = WalletService::new(store.clone());

        service.execute("w1", "CREDIT", 100, rid()).await.unwrap();

        assert_eq!(store.inner.credit_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.inner.debit_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_credit_missing_wallet_maps_to_account_not_found() {
        let store = MockStore::default();
        *store.inner.credit_error.lock().unwrap() = Some(StoreError::NotFound);
        let service = WalletService::new(store.clone());

        let result = service.execute("zzz", "CREDIT", 10, rid()).await;

        match result {
            Err(ServiceError::AccountNotFound(id)) => assert_eq!(id, "zzz"),
            other => panic!("expected AccountNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_debit_zero_rows_maps_to_insufficient_funds() {
        let store = MockStore::default();
        *store.inner.debit_error.lock().unwrap() = Some(StoreError::InsufficientFundsOrNotFound);
        let service = WalletService::new(store.clone());

        let result = service.execute("w1", "DEBIT", 60, rid()).await;

        assert!(matches!(result, Err(ServiceError::InsufficientFunds)));
    }

    #[tokio::test]
    async fn test_storage_failure_maps_to_unavailable() {
        let store = MockStore::default();
        *store.inner.debit_error.lock().unwrap() =
            Some(StoreError::Storage(sqlx::Error::PoolClosed));
        let service = WalletService::new(store.clone());

        let result = service.execute("w1", "DEBIT", 60, rid()).await;

        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_balance_missing_wallet_maps_to_account_not_found() {
        let store = MockStore::default();
        *store.inner.balance_error.lock().unwrap() = Some(StoreError::NotFound);
        let service = WalletService::new(store.clone());

        let result = service.balance("zzz", rid()).await;

        assert!(matches!(result, Err(ServiceError::AccountNotFound(_))));
    }

    #[tokio::test]
    async fn test_balance_passthrough() {
        let store = MockStore::default();
        store.inner.balance_value.store(40, Ordering::SeqCst);
        let service = WalletService::new(store.clone());

        assert_eq!(service.balance("w1", rid()).await.unwrap(), 40);
    }

    #[test]
    fn test_operation_kind_parsing() {
        assert_eq!("CREDIT".parse::<OperationKind>().unwrap(), OperationKind::Credit);
        assert_eq!("DEBIT".parse::<OperationKind>().unwrap(), OperationKind::Debit);
        assert!("credit".parse::<OperationKind>().is_err());
        assert!("TRANSFER".parse::<OperationKind>().is_err());
    }
}
