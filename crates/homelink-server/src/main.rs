use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use homelink_api::{AuthClient, InsightsClient, InsightsConfig, TransportConfig};
use homelink_core::{DeviceService, RetryPolicy};
use homelink_server::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "homelink=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = InsightsConfig::from_env().context("loading CALIX_* configuration")?;
    let transport = TransportConfig::default();

    let auth = Arc::new(AuthClient::new(config.clone(), &transport)?);
    let client = Arc::new(InsightsClient::new(&config, auth, &transport)?);
    let devices = Arc::new(DeviceService::new(client, RetryPolicy::default()));

    let app = create_router(AppState { devices });

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    let addr = format!("0.0.0.0:{port}");

    info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
