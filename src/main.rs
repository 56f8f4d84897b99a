//src/main.rs

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Settings};

/// Todas as rotas da aplicação, já com o estado.
pub fn build_router(app_state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route("/", get(handlers::dashboard::get_page))
        .route("/overview", get(handlers::dashboard::get_overview))
        .route("/products", get(handlers::dashboard::get_products))
        .route("/products/export", get(handlers::dashboard::export_products))
        .route("/stores", get(handlers::dashboard::get_stores))
        .route("/stores/export", get(handlers::dashboard::export_stores));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/filters", get(handlers::filters::get_filter_options))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG manda; sem ele, info para o nosso crate
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("saborbi=info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let addr = settings.server_addr.clone();

    let app_state = AppState::new(settings).await?;
    let app = build_router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
