//! Virtus Rental Server - Vehicle Rental Management System
//!
//! REST API server for fleet availability, reservations, contracts, and
//! inspections.

use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use virtus_rental_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("virtus_rental_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Virtus Rental Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config.storage, &config.drafts)
        .expect("Failed to create services");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Vehicles (fleet)
        .route("/vehicles", get(api::vehicles::list_vehicles))
        .route("/vehicles/:id", get(api::vehicles::get_vehicle))
        .route(
            "/vehicles/:id/availability",
            get(api::vehicles::check_availability),
        )
        // Reservations
        .route("/reservations", get(api::reservations::list_reservations))
        .route("/reservations", post(api::reservations::create_reservation))
        .route("/reservations/:id", get(api::reservations::get_reservation))
        .route("/reservations/:id", put(api::reservations::update_reservation))
        .route(
            "/reservations/:id/cancel",
            post(api::reservations::cancel_reservation),
        )
        .route(
            "/reservations/:id/inspections/:direction",
            post(api::reservations::record_inspection),
        )
        .route(
            "/reservations/:id/inspections/:direction",
            get(api::reservations::get_inspection),
        )
        .route(
            "/reservations/:id/checklist",
            post(api::reservations::generate_checklist),
        )
        .route("/reservations/:id/reply", post(api::reservations::smart_reply))
        // Contracts
        .route("/contracts", post(api::contracts::create_contract))
        .route("/contracts/:id", get(api::contracts::get_contract))
        .route(
            "/contracts/:id/finalize",
            post(api::contracts::finalize_contract),
        )
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
