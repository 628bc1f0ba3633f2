//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for wallets, transactions, loans, M-Pesa, and
//!   notifications
//! - Authentication middleware trusting the external identity layer
//! - Response types

pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use pesabank_core::loan::LoanPolicy;
use pesabank_shared::{DarajaClient, JwtService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Daraja gateway client.
    pub daraja: Arc<DarajaClient>,
    /// Loan scoring policy.
    pub loan_policy: LoanPolicy,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
