use std::process::ExitCode;

use cardio_dashboard::api::{start_server, AppContext};
use cardio_dashboard::assets::AssetLoader;
use cardio_dashboard::config::{self, DashboardConfig};

#[tokio::main]
async fn main() -> ExitCode {
    cardio_dashboard::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // Every asset is loaded before the first request; any failure is fatal.
    let loader = AssetLoader::new(config.clone());
    let assets = match loader.load_all() {
        Ok(assets) => assets,
        Err(e) => {
            tracing::error!(error = %e, assets_dir = %config.assets_dir.display(), "Failed to load assets");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        rows = assets.dataset.len(),
        charts = assets.charts.len(),
        "Assets loaded"
    );

    let ctx = AppContext::new(assets, config.session_ttl);
    let mut server = match start_server(ctx, config.bind).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start server");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Dashboard available at http://{}/", server.addr);

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
    }
    server.shutdown();
    server.stopped().await;
    ExitCode::SUCCESS
}
