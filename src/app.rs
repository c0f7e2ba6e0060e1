/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (HTTP / CORS / access guard)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::AppError;
use crate::repos::{
    DocumentStore, MemoryDocumentStore, MemoryUserDirectory, PgDocumentStore, PgUserDirectory,
    UserDirectory,
};
use crate::services::auth::{PasswordHasher, build_auth_service, build_revocation_store};
use crate::services::id_codec::IdCodec;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,access_guard=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)
        .await
        .map_err(|e| anyhow::anyhow!("failed to build application state: {e}"))?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

pub async fn build_state(config: &Config) -> Result<AppState, AppError> {
    let id_codec = IdCodec::new(config.sqids_min_length, &config.sqids_alphabet)?;

    let revocations = build_revocation_store(config).await?;
    let auth = build_auth_service(config, revocations);

    let (documents, users): (Arc<dyn DocumentStore>, Arc<dyn UserDirectory>) =
        match config.database_url.as_deref() {
            Some(url) => {
                let pool = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "failed to connect to database");
                        AppError::Internal
                    })?;

                sqlx::migrate!().run(&pool).await.map_err(|e| {
                    tracing::error!(error = %e, "failed to run migrations");
                    AppError::Internal
                })?;

                (
                    Arc::new(PgDocumentStore::new(pool.clone())),
                    Arc::new(PgUserDirectory::new(pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory stores (data is not persisted)");
                (
                    Arc::new(MemoryDocumentStore::new()),
                    Arc::new(MemoryUserDirectory::new()),
                )
            }
        };

    let passwords = PasswordHasher::new(config.password_hash_cost)?;

    Ok(AppState::new(auth, documents, users, id_codec, passwords))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
