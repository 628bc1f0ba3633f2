//! PesaBank API Server
//!
//! Main entry point for the PesaBank backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pesabank_api::{AppState, create_router};
use pesabank_core::loan::LoanPolicy;
use pesabank_db::connect;
use pesabank_shared::{AppConfig, DarajaClient, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pesabank=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service (verifies tokens issued by the identity layer)
    let jwt_service = JwtService::new(config.jwt.clone());

    // Create Daraja client
    let daraja = DarajaClient::new(config.mpesa.clone());
    info!(
        shortcode = %config.mpesa.shortcode,
        base_url = %config.mpesa.base_url,
        "Daraja gateway configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        daraja: Arc::new(daraja),
        loan_policy: LoanPolicy::default(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
