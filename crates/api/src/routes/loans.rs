//! Loan routes: eligibility, application, listing, and repayment.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use pesabank_db::entities::loans;
use pesabank_db::repositories::loan::{LoanError, LoanRepository};

use super::{internal_error, ledger_error_response};

/// Creates the loan routes (auth middleware applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loans", get(list_loans).post(apply_for_loan))
        .route("/loans/eligibility", get(eligibility))
        .route("/loans/{loan_id}/repay", post(repay_loan))
}

/// Request body for a loan application.
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    /// Requested principal.
    pub amount: Decimal,
    /// Interest rate in percent; defaults to the standard rate.
    pub interest_rate: Option<Decimal>,
}

/// Standard interest rate applied when the request does not name one.
const DEFAULT_INTEREST_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 0); // 10%

/// Response for a loan.
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    /// Loan ID.
    pub id: Uuid,
    /// Disbursed principal.
    pub principal: String,
    /// Interest rate in percent.
    pub interest_rate: String,
    /// Principal plus interest, frozen at creation.
    pub total_due: String,
    /// Loan status.
    pub status: String,
    /// Eligibility score at application time.
    pub score: i16,
    /// Application timestamp.
    pub applied_at: String,
    /// Repayment due date.
    pub due_date: String,
}

impl From<loans::Model> for LoanResponse {
    fn from(loan: loans::Model) -> Self {
        Self {
            id: loan.id,
            principal: loan.principal.to_string(),
            interest_rate: loan.interest_rate.to_string(),
            total_due: loan.total_due.to_string(),
            status: format!("{:?}", loan.status).to_ascii_lowercase(),
            score: loan.score,
            applied_at: loan.applied_at.to_rfc3339(),
            due_date: loan.due_date.to_string(),
        }
    }
}

fn loan_error_response(e: &LoanError) -> axum::response::Response {
    match e {
        LoanError::NotEligible { score } => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "not_eligible",
                "message": "You are not eligible for a loan",
                "score": score
            })),
        )
            .into_response(),
        LoanError::ActiveLoanExists => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "active_loan_exists",
                "message": "An approved loan is already outstanding"
            })),
        )
            .into_response(),
        LoanError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "loan_not_found",
                "message": "Loan not found"
            })),
        )
            .into_response(),
        LoanError::NotRepayable => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "loan_not_repayable",
                "message": "Loan already repaid or not approved"
            })),
        )
            .into_response(),
        LoanError::InvalidRate => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_rate",
                "message": "Interest rate cannot be negative"
            })),
        )
            .into_response(),
        LoanError::Ledger(inner) => ledger_error_response(inner),
        LoanError::Database(e) => {
            error!(error = %e, "Loan database error");
            internal_error()
        }
    }
}

/// GET `/loans/eligibility` - The caller's current score.
async fn eligibility(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone(), state.loan_policy.clone());

    match repo.score(auth.owner_id(), auth.verified()).await {
        Ok(score) => (
            StatusCode::OK,
            Json(json!({
                "score": score,
                "eligible": state.loan_policy.is_eligible(score)
            })),
        )
            .into_response(),
        Err(e) => loan_error_response(&e),
    }
}

/// POST `/loans` - Apply for a loan.
async fn apply_for_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ApplyRequest>,
) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone(), state.loan_policy.clone());
    let rate = payload.interest_rate.unwrap_or(DEFAULT_INTEREST_RATE);

    match repo
        .apply(auth.owner_id(), auth.verified(), payload.amount, rate)
        .await
    {
        Ok(loan) => {
            info!(owner_id = %auth.owner_id(), loan_id = %loan.id, "Loan approved");
            (StatusCode::CREATED, Json(LoanResponse::from(loan))).into_response()
        }
        Err(e) => loan_error_response(&e),
    }
}

/// GET `/loans` - The caller's loans, newest first.
async fn list_loans(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone(), state.loan_policy.clone());

    match repo.list(auth.owner_id()).await {
        Ok(loans) => {
            let loans: Vec<LoanResponse> = loans.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(json!({ "loans": loans }))).into_response()
        }
        Err(e) => loan_error_response(&e),
    }
}

/// POST `/loans/{loan_id}/repay` - Repay an approved loan in full.
async fn repay_loan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(loan_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone(), state.loan_policy.clone());

    match repo.repay(auth.owner_id(), loan_id).await {
        Ok(loan) => {
            info!(owner_id = %auth.owner_id(), loan_id = %loan_id, "Loan repaid");
            (StatusCode::OK, Json(LoanResponse::from(loan))).into_response()
        }
        Err(e) => loan_error_response(&e),
    }
}
