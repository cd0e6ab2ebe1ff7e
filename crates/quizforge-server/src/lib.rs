//! quizforge-server — REST API for generating, storing, and sharing quizzes.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub use auth::{AuthConfig, AuthUser};
pub use error::ApiError;
pub use state::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/auth/register", post(routes::register))
        .route("/api/auth/login", post(routes::login))
        .route("/api/generate-quiz", post(routes::generate_quiz))
        .route("/api/my-quizzes", get(routes::my_quizzes))
        .route(
            "/api/quiz/:id",
            get(routes::get_quiz).delete(routes::delete_quiz),
        )
        .route("/api/chat", post(routes::chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve the API until the process is stopped.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("quizforge API listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .await
        .context("server error")?;
    Ok(())
}
