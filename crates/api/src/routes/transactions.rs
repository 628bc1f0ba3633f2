//! Transaction routes: top-up, withdraw, and peer-to-peer transfer.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::{AppState, middleware::AuthUser};
use pesabank_core::ledger::EntryKind;
use pesabank_shared::types::AccountNumber;
use pesabank_db::entities::sea_orm_active_enums::NotificationKind;
use pesabank_db::repositories::ledger::LedgerRepository;
use pesabank_db::repositories::notification::NotificationRepository;

use super::ledger_error_response;

/// Balance below which a withdrawal triggers a low-balance notification.
const LOW_BALANCE_THRESHOLD: Decimal = Decimal::from_parts(10000, 0, 0, false, 2); // 100.00

/// Creates the transaction routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/top-up", post(top_up))
        .route("/transactions/withdraw", post(withdraw))
        .route("/transactions/transfer", post(transfer))
}

/// Parses an entry kind from its wire name.
pub(crate) fn parse_entry_type(raw: &str) -> Option<EntryKind> {
    match raw {
        "top_up" => Some(EntryKind::TopUp),
        "withdraw" => Some(EntryKind::Withdraw),
        "transfer" => Some(EntryKind::Transfer),
        _ => None,
    }
}

/// Request body for top-up and withdraw.
#[derive(Debug, Deserialize)]
pub struct AmountRequest {
    /// Amount to move.
    pub amount: Decimal,
    /// Optional description recorded on the entry.
    pub description: Option<String>,
}

/// Request body for a transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Recipient account number.
    pub recipient_account: String,
    /// Amount to transfer.
    pub amount: Decimal,
    /// The sender's 4-digit transfer PIN.
    pub pin: String,
    /// Optional description recorded on the entry.
    pub description: Option<String>,
}

/// POST `/transactions/top-up` - Credit the caller's wallet.
async fn top_up(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AmountRequest>,
) -> impl IntoResponse {
    let ledger = LedgerRepository::new((*state.db).clone());

    match ledger
        .top_up(auth.owner_id(), payload.amount, payload.description)
        .await
    {
        Ok(outcome) => {
            info!(owner_id = %auth.owner_id(), "Top-up completed");
            (
                StatusCode::CREATED,
                Json(json!({
                    "entry_id": outcome.entry_id,
                    "balance": outcome.new_balance.to_string()
                })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/transactions/withdraw` - Debit the caller's wallet.
async fn withdraw(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AmountRequest>,
) -> impl IntoResponse {
    let ledger = LedgerRepository::new((*state.db).clone());
    let owner_id = auth.owner_id();

    match ledger
        .withdraw(owner_id, payload.amount, payload.description)
        .await
    {
        Ok(outcome) => {
            info!(owner_id = %owner_id, "Withdrawal completed");

            if outcome.new_balance < LOW_BALANCE_THRESHOLD {
                let notifications = NotificationRepository::new((*state.db).clone());
                tokio::spawn(async move {
                    if let Err(e) = notifications
                        .create(
                            owner_id,
                            NotificationKind::LowBalance,
                            "Your wallet balance is running low".to_string(),
                        )
                        .await
                    {
                        warn!(error = %e, "Failed to record low-balance notification");
                    }
                });
            }

            (
                StatusCode::CREATED,
                Json(json!({
                    "entry_id": outcome.entry_id,
                    "balance": outcome.new_balance.to_string()
                })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

/// POST `/transactions/transfer` - PIN-gated transfer to another wallet.
async fn transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TransferRequest>,
) -> impl IntoResponse {
    if AccountNumber::parse(&payload.recipient_account).is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_account_number",
                "message": "Recipient account number must be exactly 10 digits"
            })),
        )
            .into_response();
    }

    let ledger = LedgerRepository::new((*state.db).clone());

    match ledger
        .transfer(
            auth.owner_id(),
            &payload.recipient_account,
            payload.amount,
            &payload.pin,
            payload.description,
        )
        .await
    {
        Ok(outcome) => {
            info!(
                owner_id = %auth.owner_id(),
                entry_id = %outcome.entry_id,
                "Transfer completed"
            );

            // Fire-and-forget: the ledger result never waits on fan-out.
            let notifications = NotificationRepository::new((*state.db).clone());
            let recipient = outcome.recipient_owner_id;
            let amount = outcome.amount;
            tokio::spawn(async move {
                if let Err(e) = notifications
                    .create(
                        recipient,
                        NotificationKind::TransferReceived,
                        format!("You received KSh {amount}"),
                    )
                    .await
                {
                    warn!(error = %e, "Failed to record transfer notification");
                }
            });

            (
                StatusCode::OK,
                Json(json!({
                    "entry_id": outcome.entry_id,
                    "amount": outcome.amount.to_string(),
                    "balance": outcome.sender_balance.to_string()
                })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_entry_type() {
        assert_eq!(parse_entry_type("top_up"), Some(EntryKind::TopUp));
        assert_eq!(parse_entry_type("withdraw"), Some(EntryKind::Withdraw));
        assert_eq!(parse_entry_type("transfer"), Some(EntryKind::Transfer));
        assert_eq!(parse_entry_type("TRANSFER"), None);
        assert_eq!(parse_entry_type(""), None);
    }

    #[test]
    fn test_low_balance_threshold_value() {
        assert_eq!(LOW_BALANCE_THRESHOLD, dec!(100.00));
    }
}
