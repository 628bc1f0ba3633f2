//! REST API routes.

pub mod health;
pub mod loans;
pub mod mpesa;
pub mod notifications;
pub mod owners;
pub mod transactions;
pub mod wallets;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use pesabank_core::ledger::LedgerError;

/// Assembles all API routes, applying auth middleware to protected ones.
///
/// The M-Pesa callback webhook and the health check stay public; the
/// gateway authenticates by knowing the callback URL, not by bearer token.
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(wallets::routes())
        .merge(transactions::routes())
        .merge(loans::routes())
        .merge(notifications::routes())
        .merge(owners::routes())
        .merge(mpesa::protected_routes())
        .layer(middleware::from_fn_with_state(
            state,
            crate::middleware::auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(mpesa::callback_routes())
        .merge(protected)
}

/// Maps a ledger error to an HTTP response.
///
/// Storage failures are logged by the caller and surfaced as a generic
/// message; everything else carries its stable category and reason.
pub(crate) fn ledger_error_response(e: &LedgerError) -> Response {
    let status = StatusCode::from_u16(e.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match e {
        LedgerError::Database(_) | LedgerError::Internal(_) => "An error occurred".to_string(),
        other => other.to_string(),
    };

    (
        status,
        Json(json!({
            "error": e.error_code().to_ascii_lowercase(),
            "message": message
        })),
    )
        .into_response()
}

/// Maps an application error to an HTTP response.
pub(crate) fn app_error_response(e: &pesabank_shared::AppError) -> Response {
    use pesabank_shared::AppError;

    let status = StatusCode::from_u16(e.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match e {
        AppError::Database(_) | AppError::ExternalService(_) | AppError::Internal(_) => {
            "An error occurred".to_string()
        }
        other => other.to_string(),
    };

    (
        status,
        Json(json!({
            "error": e.error_code().to_ascii_lowercase(),
            "message": message
        })),
    )
        .into_response()
}

/// Standard internal-error response.
pub(crate) fn internal_error() -> Response {
    app_error_response(&pesabank_shared::AppError::Internal(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_ledger_error_codes_are_lowercase() {
        let response = ledger_error_response(&LedgerError::InsufficientFunds);
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ledger_error_response(&LedgerError::InvalidPin);
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ledger_error_response(&LedgerError::WalletNotFound(Uuid::nil()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_errors_do_not_leak() {
        let response = ledger_error_response(&LedgerError::Database("password=hunter2".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
