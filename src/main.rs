use std::sync::Arc;

use lyson::config::Settings;
use lyson::middleware::cors::cors_layer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "lyson=info".into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let settings = match Settings::load() {
        Ok(settings) => Arc::new(settings),
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration, refusing to start");
            return Err(e.into());
        }
    };
    settings.log_summary();

    if settings.debug() && settings.is_production() {
        tracing::warn!("Debug mode is enabled in production");
    }

    let cors = cors_layer(&settings)?;
    tracing::debug!(?cors, "CORS layer ready");
    tracing::info!(environment = %settings.environment(), "Configuration check passed");

    Ok(())
}
