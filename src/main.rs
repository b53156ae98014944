mod catalog;
mod config;
mod db;
mod entities;
mod error;
mod models;
mod routes;
mod store;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    catalog::Catalog,
    config::Config,
    store::sql::SqlStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
}

fn app(state: Arc<AppState>) -> Router {
    let public = ServeDir::new(&state.config.public_dir);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/movies/top", get(routes::top_movies))
        .route("/api/movies/random", get(routes::random_movies))
        .route("/api/movies/search", get(routes::search_movies))
        .route("/api/movies/{id}", get(routes::get_movie))
        .route("/api/genres", get(routes::genres))
        .fallback_service(public)
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,movies=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect(&config).await?;
    if config.run_migrations {
        db::migrate(&db).await?;
    }

    let store = SqlStore::new(db, config.store_timeout);
    let catalog = Catalog::new(Arc::new(store), config.limits);
    let state = Arc::new(AppState { config: config.clone(), catalog });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, public_dir = %config.public_dir.display(), "listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
