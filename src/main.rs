use ingest_portal::booter::Booter;
use ingest_portal::config::PortalConfig;
use ingest_portal::core::workflow::UploadWorkflow;
use ingest_portal::orchestrator::controller::PortalController;
use ingest_portal::server::app;
use ingest_portal::server::types::AppState;
use reqwest::Client;

// Initialize app state from the portal config
fn init_app_state(config: &PortalConfig) -> AppState {
    // No timeout: remote calls run until they complete or fail
    let http_client = Client::new();

    let workflow = UploadWorkflow::new(http_client, config.api_url.clone());
    let controller = PortalController::new(workflow, config.mode, config.report_url.clone());

    AppState { controller }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let config = PortalConfig::from_env()?;
    tracing::info!(
        mode = %config.mode,
        api_url = %config.api_url,
        report_url = ?config.report_url.as_ref().map(|u| u.as_str()),
        "starting data ingestion portal"
    );

    let state = init_app_state(&config);
    let router = app(state, config.body_limit_bytes);

    Booter::new(config.port).await?.start(router).await
}
