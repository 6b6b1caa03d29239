//! Festa server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use festa_api::{AppState, router as api_router};
use festa_common::Config;
use festa_core::{
    FestivalService, ProductService, ReservationService, ReviewService, UserService,
    WishlistService,
};
use festa_db::repositories::{
    FestivalRepository, ProductRepository, ReservationRepository, ReviewRepository,
    UserRepository, WishlistRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "festa=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting festa server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = Arc::new(festa_db::init(&config).await?);
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    festa_db::migrate(&db).await?;
    info!("Migrations completed");

    // Repositories
    let user_repo = UserRepository::new(db.clone());
    let festival_repo = FestivalRepository::new(db.clone());
    let product_repo = ProductRepository::new(db.clone());
    let reservation_repo = ReservationRepository::new(db.clone());
    let review_repo = ReviewRepository::new(db.clone());
    let wishlist_repo = WishlistRepository::new(db.clone());

    // Services
    let user_service = UserService::new(user_repo.clone());
    let festival_service = FestivalService::new(
        festival_repo.clone(),
        user_repo.clone(),
        review_repo.clone(),
    );
    let product_service = ProductService::new(product_repo.clone(), festival_repo.clone());
    let reservation_service = ReservationService::new(
        reservation_repo.clone(),
        user_repo.clone(),
        festival_repo.clone(),
        product_repo.clone(),
    );
    let review_service = ReviewService::new(review_repo, reservation_repo);
    let wishlist_service = WishlistService::new(wishlist_repo, user_repo, festival_repo);

    let state = AppState {
        user_service,
        festival_service,
        product_service,
        reservation_service,
        review_service,
        wishlist_service,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
