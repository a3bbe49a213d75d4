//! Notify Server - push notification batch dispatch over HTTP.

mod config;

use axum::Router;
use color_eyre::eyre::WrapErr as _;
use notify_provider::{CachedProvider, FcmFactory, MAX_ALLOWED_RECIPIENTS};
use notify_service::{PushService, RecipientLimit};
use tower_http::trace::TraceLayer;

use crate::config::Config;

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = Config::from_env().wrap_err("invalid configuration")?;

    tracing::info!(
        credentials = ?config.credentials,
        max_recipients = config.max_recipients,
        "notify-server starting"
    );
    if config.credentials.is_none() {
        tracing::warn!("no FCM credentials configured; push requests will fail");
    }

    let limit = RecipientLimit::new(config.max_recipients, Some(MAX_ALLOWED_RECIPIENTS));
    let factory = FcmFactory::new(config.credentials, config.fcm_endpoint);
    let service = PushService::new(CachedProvider::new(factory), limit);

    let app = Router::new()
        .merge(notify_http::push_router(service))
        .layer(TraceLayer::new_for_http());

    tracing::info!(addr = %config.listen_addr, allowed = limit.allowed(), "listening");

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .wrap_err("failed to bind")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")?;

    tracing::info!("notify-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
