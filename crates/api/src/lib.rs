//! # Bookdesk API
//!
//! The API crate provides the web server for the booking dashboard. It
//! exposes the availability calculator over HTTP so the booking form can
//! refresh its slot picker whenever staff, date or services change.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Parse requests, call the calculator, shape responses
//! - **Middleware**: Session extraction and error-to-HTTP mapping
//! - **Config**: Environment-driven application configuration

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{error_handling::HandleErrorLayer, http::HeaderValue, Router};
use bookdesk_core::{availability::SlotConfig, lookup::AvailabilityLookup};
use bookdesk_db::{DbPool, PgAvailabilityLookup};
use eyre::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// Immutable after start-up. Handlers get the calculator's collaborators
/// through `lookup`, so tests can swap in a mock store.
pub struct ApiState {
    /// Bookings, service durations and working hours
    pub lookup: Arc<dyn AvailabilityLookup>,
    /// Candidate slot settings
    pub slot_config: SlotConfig,
    /// Argon2 hash of the bearer token, `None` for an open API
    pub token_hash: Option<String>,
}

/// Builds the router with every route and the shared state attached.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Availability endpoints
        .merge(routes::availability::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// Sets up logging, wraps the router with CORS and a request timeout, and
/// serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState {
        lookup: Arc::new(PgAvailabilityLookup::new(db_pool)),
        slot_config: config.slots,
        token_hash: config.token_hash.clone(),
    });

    if state.token_hash.is_none() {
        warn!("API_TOKEN_HASH not set; availability endpoints are open");
    }

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(allowed)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(HandleErrorLayer::new(middleware::error_handling::handle_middleware_error))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
