//! # UniMed API
//!
//! The API crate provides the web server for the UniMed clinic appointment service.
//! It exposes RESTful endpoints for slot availability, booking, cancellation and
//! administrator status changes.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into [`Scheduler`] calls
//! - **Middleware**: Error-to-response mapping
//! - **Config**: Handle environment and application configuration
//!
//! All allocation rules live in `unimed-core`; handlers never talk to the store directly.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling middleware
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;
use unimed_core::Scheduler;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Allocation engine bound to the configured catalog and store
    pub scheduler: Scheduler,
}

impl ApiState {
    pub fn new(scheduler: Scheduler) -> Arc<Self> {
        Arc::new(Self { scheduler })
    }
}

/// Builds the application router with all routes and no outer layers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use unimed_api::{build_router, ApiState};
/// use unimed_core::{store::InMemoryAppointmentStore, Scheduler};
///
/// let scheduler = Scheduler::with_defaults(Arc::new(InMemoryAppointmentStore::new()));
/// let app = build_router(ApiState::new(scheduler));
/// ```
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Slot catalog
        .merge(routes::slots::routes())
        // Per-day availability
        .merge(routes::availability::routes())
        // Booking, cancellation and status management
        .merge(routes::appointment::routes())
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_origin(origins)
}

/// Starts the API server
///
/// Installs the log subscriber, wraps the router in request tracing, the
/// request timeout and (when origins are configured) CORS, then serves until
/// the listener fails.
///
/// # Example
///
/// ```no_run
/// # async fn run() -> eyre::Result<()> {
/// use std::sync::Arc;
/// use unimed_api::{config::ApiConfig, start_server};
/// use unimed_core::{store::InMemoryAppointmentStore, Scheduler};
///
/// let config = ApiConfig::from_env()?;
/// let scheduler = Scheduler::new(
///     config.slot_catalog()?,
///     Arc::new(InMemoryAppointmentStore::new()),
///     config.store_timeout,
/// );
/// start_server(config, scheduler).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, scheduler: Scheduler) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let app = build_router(ApiState::new(scheduler));

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    // Add request tracing and timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        backend = ?config.store_backend,
        capacity = config.slot_capacity,
        slots = config.time_slots.len(),
        "Server listening on http://{}",
        addr
    );
    axum::serve(listener, app).await?;

    Ok(())
}
