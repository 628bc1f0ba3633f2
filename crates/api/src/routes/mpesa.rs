//! M-Pesa routes: STK push initiation and the result callback webhook.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::{AppState, middleware::AuthUser};
use pesabank_core::ledger::validate_amount;
use pesabank_core::mpesa::{StkCallbackEnvelope, validate_msisdn};
use pesabank_db::entities::sea_orm_active_enums::NotificationKind;
use pesabank_db::repositories::mpesa::{
    MpesaError, MpesaRepository, Reconciliation, RecordStkPushInput,
};
use pesabank_db::repositories::notification::NotificationRepository;

use super::{internal_error, ledger_error_response};

/// Creates the authenticated M-Pesa routes.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/mpesa/stk-push", post(stk_push))
}

/// Creates the public callback webhook route.
///
/// The gateway cannot carry a bearer token; it authenticates by knowing
/// the registered callback URL.
pub fn callback_routes() -> Router<AppState> {
    Router::new().route("/mpesa/callback", post(callback))
}

/// Request body for initiating an STK push.
#[derive(Debug, Deserialize)]
pub struct StkPushRequest {
    /// Phone number in gateway format (2547XXXXXXXX).
    pub phone: String,
    /// Amount in whole shillings.
    pub amount: Decimal,
    /// Account reference shown on the prompt.
    pub reference: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// POST `/mpesa/stk-push` - Initiate a payment prompt on the customer's
/// phone and record the pending transaction.
async fn stk_push(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<StkPushRequest>,
) -> impl IntoResponse {
    if validate_msisdn(&payload.phone).is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_phone",
                "message": "Phone number must be in the format 2547XXXXXXXX"
            })),
        )
            .into_response();
    }

    if let Err(e) = validate_amount(payload.amount) {
        return ledger_error_response(&e);
    }
    // The gateway only accepts whole shillings.
    let Some(gateway_amount) = payload
        .amount
        .normalize()
        .to_u64()
        .filter(|_| payload.amount.normalize().scale() == 0)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "amount_precision",
                "message": "Amount must be whole shillings"
            })),
        )
            .into_response();
    };

    let reference = payload.reference.unwrap_or_else(|| "PesaBank".to_string());
    let description = payload
        .description
        .unwrap_or_else(|| "Deposit to wallet".to_string());

    let response = match state
        .daraja
        .stk_push(&payload.phone, gateway_amount, &reference, &description)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "STK push failed");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "gateway_error",
                    "message": "Payment gateway rejected the request"
                })),
            )
                .into_response();
        }
    };

    let repo = MpesaRepository::new((*state.db).clone());
    let input = RecordStkPushInput {
        owner_id: auth.owner_id(),
        phone_number: payload.phone,
        amount: payload.amount,
        account_reference: Some(reference),
        description: Some(description),
        checkout_request_id: response.checkout_request_id.clone(),
        merchant_request_id: response.merchant_request_id.clone(),
    };

    match repo.record_stk_push(input).await {
        Ok(row) => {
            info!(
                owner_id = %auth.owner_id(),
                checkout_request_id = %row.checkout_request_id,
                "STK push sent"
            );
            (
                StatusCode::ACCEPTED,
                Json(json!({
                    "message": "STK push request sent successfully",
                    "checkout_request_id": row.checkout_request_id
                })),
            )
                .into_response()
        }
        Err(MpesaError::Ledger(e)) => ledger_error_response(&e),
        Err(e) => {
            error!(error = %e, "Failed to record STK push");
            internal_error()
        }
    }
}

/// POST `/mpesa/callback` - Reconcile the asynchronous payment result.
///
/// Always acknowledges with result code 0 once the callback has been
/// handled (including duplicates); the gateway retries anything else.
async fn callback(
    State(state): State<AppState>,
    Json(envelope): Json<StkCallbackEnvelope>,
) -> impl IntoResponse {
    let callback = envelope.body.stk_callback;
    let receipt = callback.receipt_number();
    let repo = MpesaRepository::new((*state.db).clone());

    match repo
        .reconcile(
            &callback.checkout_request_id,
            callback.result_code,
            callback.result_desc.clone(),
            receipt,
        )
        .await
    {
        Ok(Reconciliation::Completed { owner_id, amount }) => {
            let notifications = NotificationRepository::new((*state.db).clone());
            tokio::spawn(async move {
                if let Err(e) = notifications
                    .create(
                        owner_id,
                        NotificationKind::DepositSuccess,
                        format!("Your deposit of KSh {amount} was successful"),
                    )
                    .await
                {
                    warn!(error = %e, "Failed to record deposit notification");
                }
            });

            ack()
        }
        Ok(Reconciliation::Failed { owner_id }) => {
            info!(owner_id = %owner_id, "Payment failed, no credit applied");
            ack()
        }
        Ok(Reconciliation::AlreadyProcessed) => ack(),
        Err(MpesaError::UnknownCheckoutId) => {
            // The external system is the source of truth for id uniqueness;
            // log and acknowledge so the gateway stops retrying.
            warn!(
                checkout_request_id = %callback.checkout_request_id,
                "Callback for unknown checkout id"
            );
            ack()
        }
        Err(e) => {
            error!(error = %e, "Reconciliation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "ResultCode": 1, "ResultDesc": "Internal error" })),
            )
                .into_response()
        }
    }
}

fn ack() -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({ "ResultCode": 0, "ResultDesc": "Accepted" })),
    )
        .into_response()
}
