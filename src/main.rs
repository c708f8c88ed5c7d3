use anyhow::Context;
use creatorkit::{build_app, AppState, Config};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::from_config(config).context("failed to build app state")?;

    tracing::info!(
        sources = ?state.resolver.source_names(),
        ai = state.generator.ai_configured(),
        "starting creatorkit v{}",
        env!("CARGO_PKG_VERSION")
    );

    let app = build_app(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;

    Ok(())
}
