//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::AppError;
use crate::service::WalletService;
use crate::store::PgWalletStore;

use super::middleware::RequestId;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletOperationRequest {
    pub wallet_id: String,
    /// "CREDIT" or "DEBIT"; left as a string so unrecognized kinds reach
    /// the service and come back as a proper invalid_operation error.
    pub kind: String,
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub wallet_id: String,
    pub balance: i64,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<PgPool> {
    Router::new()
        .route("/wallet", post(wallet_operation))
        .route("/balance/:wallet_id", get(wallet_balance))
}

// =========================================================================
// POST /wallet
// =========================================================================

/// Apply one credit or debit to a wallet
async fn wallet_operation(
    State(pool): State<PgPool>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<WalletOperationRequest>,
) -> Result<StatusCode, AppError> {
    let service = WalletService::new(PgWalletStore::new(pool));

    service
        .execute(&request.wallet_id, &request.kind, request.amount, request_id)
        .await?;

    Ok(StatusCode::OK)
}

// =========================================================================
// GET /balance/:wallet_id
// =========================================================================

/// Read a wallet's current balance
async fn wallet_balance(
    State(pool): State<PgPool>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Path(wallet_id): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let service = WalletService::new(PgWalletStore::new(pool));

    let balance = service.balance(&wallet_id, request_id).await?;

    Ok(Json(BalanceResponse { wallet_id, balance }))
}
