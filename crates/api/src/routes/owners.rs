//! Owner lifecycle hook.
//!
//! The registration workflow lives in the external identity layer; it
//! invokes this hook synchronously after creating an owner, which creates
//! the owner's wallet with a zero balance.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use pesabank_core::auth::is_admin;
use pesabank_db::repositories::wallet::WalletRepository;

use super::internal_error;

/// Creates the owner hook routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/owners/{owner_id}/wallet", post(owner_created))
}

/// POST `/owners/{owner_id}/wallet` - Owner-created hook.
///
/// Admin-only: the identity layer calls this with a service token.
/// Idempotent, so a retried registration returns the existing wallet.
async fn owner_created(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(owner_id): Path<Uuid>,
) -> impl IntoResponse {
    if !is_admin(auth.role()) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Only the registration workflow may create wallets"
            })),
        )
            .into_response();
    }

    let repo = WalletRepository::new((*state.db).clone());

    match repo.on_owner_created(owner_id).await {
        Ok(wallet) => (
            StatusCode::CREATED,
            Json(json!({
                "id": wallet.id,
                "owner_id": wallet.owner_id,
                "account_number": wallet.account_number,
                "balance": wallet.balance.to_string(),
                "created_at": wallet.created_at
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, owner_id = %owner_id, "Failed to create wallet");
            internal_error()
        }
    }
}
