mod config;
mod error;
mod routes;
mod state;
mod upstream;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), error::ProxyError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::ProxyConfig::from_env();
    let port = config.port;
    let upstream = upstream::Upstream::new(&config)?;
    tracing::info!(
        api = %config.api_base,
        data = %config.data_base,
        origins = config.allowed_origins.len(),
        "upstream configured"
    );

    let app = routes::app(state::AppState::new(config, upstream));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "richmenu-proxy listening");
    axum::serve(listener, app).await?;
    Ok(())
}
