/*
 * Responsibility
 * - Config読み込み → 依存生成 (公開鍵 → TokenParser → Authenticator) → Router 組み立て
 * - Middleware の適用順をここで固定する
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, handlers::health::health};
use crate::config::Config;
use crate::middleware;
use crate::services::auth::{KeyLoadError, build_authenticator};
use crate::services::csrf::CsrfProtection;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,chumbok_security=debug,tower_http=debug cargo run
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

        // Development: fail fast. Production: default behavior, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        env = ?config.app_env,
        security_enabled = config.security_enable,
        assert_org = config.assert_org_with.is_some(),
        assert_tenant = config.assert_tenant,
        "starting on {}",
        config.addr
    );
    if !config.security_enable {
        tracing::warn!("SECURITY_ENABLE=false: requests without a valid token run as anonymous");
    }

    // A key that cannot be loaded aborts startup.
    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build process-level services once and share them read-only through `AppState`.
pub fn build_state(config: &Config) -> Result<AppState, KeyLoadError> {
    let auth = build_authenticator(config)?;
    let csrf = CsrfProtection::new(config.app_env.is_production());

    Ok(AppState::new(auth, csrf))
}

/// Layer order (outermost first): http → cors → security headers → authentication → csrf → handler.
pub fn build_router(state: AppState, config: &Config) -> Router {
    // axum runs the last-applied layer first, so csrf goes on before auth.
    let protected = api::routes();
    let protected = middleware::csrf::apply(protected, state.clone());
    let protected = middleware::auth::access::apply(protected, state.clone());

    let router = Router::new()
        .route("/health", get(health))
        .merge(protected)
        .with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
