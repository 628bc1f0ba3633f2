//! Wallet routes: detail, transfer PIN, and entry history.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use pesabank_db::entities::ledger_entries;
use pesabank_db::entities::sea_orm_active_enums::EntryType;
use pesabank_db::repositories::ledger::{EntryFilter, LedgerRepository};
use pesabank_db::repositories::pin::{TransferPinError, TransferPinRepository};
use pesabank_db::repositories::wallet::WalletRepository;

use super::{internal_error, ledger_error_response};

/// Creates the wallet routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallet", get(get_wallet))
        .route("/wallet/pin", put(set_pin))
        .route("/wallet/entries", get(list_entries))
}

/// Request body for setting the transfer PIN.
#[derive(Debug, Deserialize)]
pub struct SetPinRequest {
    /// The new 4-digit PIN.
    pub pin: String,
}

/// Query parameters for listing ledger entries.
#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    /// Filter by entry kind: top_up, withdraw, transfer.
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    /// Minimum amount (inclusive).
    pub min_amount: Option<Decimal>,
    /// Maximum amount (inclusive).
    pub max_amount: Option<Decimal>,
    /// Start date (inclusive, YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// End date (inclusive, YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// Response for a ledger entry.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Entry kind.
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Entry status.
    pub status: String,
    /// Amount moved.
    pub amount: String,
    /// Debited wallet, if any.
    pub sender_wallet_id: Option<Uuid>,
    /// Credited wallet, if any.
    pub recipient_wallet_id: Option<Uuid>,
    /// Free-text description.
    pub description: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

fn entry_type_to_string(t: &EntryType) -> String {
    match t {
        EntryType::TopUp => "top_up".to_string(),
        EntryType::Withdraw => "withdraw".to_string(),
        EntryType::Transfer => "transfer".to_string(),
    }
}

impl From<ledger_entries::Model> for EntryResponse {
    fn from(entry: ledger_entries::Model) -> Self {
        Self {
            id: entry.id,
            entry_type: entry_type_to_string(&entry.entry_type),
            status: format!("{:?}", entry.status).to_ascii_lowercase(),
            amount: entry.amount.to_string(),
            sender_wallet_id: entry.sender_wallet_id,
            recipient_wallet_id: entry.recipient_wallet_id,
            description: entry.description,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

/// GET `/wallet` - The caller's wallet.
async fn get_wallet(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = WalletRepository::new((*state.db).clone());

    match repo.find_by_owner(auth.owner_id()).await {
        Ok(Some(wallet)) => (
            StatusCode::OK,
            Json(json!({
                "id": wallet.id,
                "account_number": wallet.account_number,
                "balance": wallet.balance.to_string(),
                "is_active": wallet.is_active,
                "is_frozen": wallet.is_frozen,
                "created_at": wallet.created_at
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "owner_wallet_not_found",
                "message": "No wallet exists for this owner"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load wallet");
            internal_error()
        }
    }
}

/// PUT `/wallet/pin` - Set or replace the transfer PIN.
async fn set_pin(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SetPinRequest>,
) -> impl IntoResponse {
    let repo = TransferPinRepository::new((*state.db).clone());

    match repo.set_pin(auth.owner_id(), &payload.pin).await {
        Ok(()) => {
            info!(owner_id = %auth.owner_id(), "Transfer PIN set");
            (
                StatusCode::OK,
                Json(json!({ "message": "Transfer PIN set successfully" })),
            )
                .into_response()
        }
        Err(TransferPinError::InvalidFormat) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_pin_format",
                "message": "PIN must be a 4-digit number"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to set transfer PIN");
            internal_error()
        }
    }
}

/// GET `/wallet/entries` - The caller's ledger history, newest first.
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<EntriesQuery>,
) -> impl IntoResponse {
    let entry_type = match query.entry_type.as_deref() {
        None => None,
        Some(raw) => match super::transactions::parse_entry_type(raw) {
            Some(t) => Some(t),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_entry_type",
                        "message": "Entry type must be one of: top_up, withdraw, transfer"
                    })),
                )
                    .into_response();
            }
        },
    };

    let filter = EntryFilter {
        entry_type,
        min_amount: query.min_amount,
        max_amount: query.max_amount,
        date_from: query.from,
        date_to: query.to,
    };

    let repo = LedgerRepository::new((*state.db).clone());
    match repo.list_entries(auth.owner_id(), filter).await {
        Ok(entries) => {
            let entries: Vec<EntryResponse> = entries.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(json!({ "entries": entries }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list entries");
            ledger_error_response(&e)
        }
    }
}
