mod routes;
mod models;
mod gemini;
mod prompt;
mod parser;
mod refine;
mod render;

use axum::{Router, routing::{post, get}};
use routes::{
    AppState, current_page, generate_content, get_content, health_check, index, navigate_page,
    set_credential,
};
use std::net::SocketAddr;
use tracing_subscriber::{fmt, EnvFilter};
use std::sync::Arc;
use tower_http::cors::{CorsLayer, Any};

use crate::gemini::GeminiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let state = AppState {
        session: Arc::default(),
        gemini: Arc::new(GeminiClient::new()),
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/credential", post(set_credential))
        .route("/api/generate", post(generate_content))
        .route("/api/content", get(get_content))
        .route("/api/content/page", get(current_page).post(navigate_page))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state);

    let port: u16 = std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Starting server");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
