//! wallet-service Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
mod error;
pub mod service;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use service::{OperationKind, ServiceError, WalletService};
pub use store::{PgWalletStore, StoreError, WalletStore};
