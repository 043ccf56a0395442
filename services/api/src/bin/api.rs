//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DriveAdapter, MemoryFileStore, MemoryTabularStore, SheetsAdapter, TokenGate},
    config::{Backend, Config},
    error::ApiError,
    web::{router, rest::ApiDoc, state::AppState},
};
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method};
use axum::Router;
use recruitment_core::ports::{FileStore, TabularStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Backend Adapters ---
    let (tabular, files, token_gate): (Arc<dyn TabularStore>, Arc<dyn FileStore>, Arc<TokenGate>) =
        match config.backend {
            Backend::Memory => {
                info!("Using the in-memory demo backend");
                let tabular: Arc<dyn TabularStore> = Arc::new(MemoryTabularStore::with_demo_rows());
                let files: Arc<dyn FileStore> = Arc::new(MemoryFileStore::new());
                (
                    tabular,
                    files,
                    Arc::new(TokenGate::granted("demo", config.token_wait)),
                )
            }
            Backend::Google => {
                let token_gate = Arc::new(match &config.access_token {
                    Some(token) => TokenGate::granted(token.clone(), config.token_wait),
                    None => TokenGate::new(config.token_wait),
                });
                if !config.uploads_configured() {
                    warn!("OAuth2 client id or Drive folder id is not configured; uploads are disabled");
                }
                let client = reqwest::Client::new();
                let sheets: Arc<dyn TabularStore> = Arc::new(SheetsAdapter::new(
                    client.clone(),
                    config.sheets_base.clone(),
                    config.spreadsheet_id.clone(),
                    config.sheets_api_key.clone(),
                    token_gate.clone(),
                ));
                let drive: Arc<dyn FileStore> = Arc::new(DriveAdapter::new(
                    client,
                    config.drive_base.clone(),
                    config.upload_base.clone(),
                    token_gate.clone(),
                ));
                (sheets, drive, token_gate)
            }
        };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(config.clone(), tabular, files, token_gate));

    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!("Invalid CORS_ORIGIN '{}': {}", config.cors_origin, e))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let app = Router::new()
        .merge(router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
