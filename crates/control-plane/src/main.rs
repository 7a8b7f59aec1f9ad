// Wellness API server
// Decision: PostgreSQL when DATABASE_URL is set, otherwise in-memory dev mode
// Decision: A missing signing secret aborts startup

use anyhow::{Context, Result};
use std::sync::Arc;
use wellness_control_plane::{
    auth::AuthConfig,
    build_app,
    config::ServerConfig,
    storage::{StorageBackend, TokenReaper},
};
use wellness_core::telemetry::{init_telemetry, TelemetryConfig};
use wellness_core::AuthService;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();

    // Configure via environment variables:
    // - RUST_LOG: Log filter (default: "wellness_control_plane=debug,wellness_core=info,tower_http=debug")
    // - LOG_FORMAT: "json" for JSON lines
    let mut telemetry_config = TelemetryConfig::from_env();
    if telemetry_config.service_name == "wellness" {
        telemetry_config.service_name = "wellness-control-plane".to_string();
    }
    if telemetry_config.log_filter.is_none() {
        telemetry_config.log_filter = Some(
            "wellness_control_plane=debug,wellness_core=info,wellness_storage=info,tower_http=debug"
                .to_string(),
        );
    }
    telemetry_config.service_version = Some(env!("CARGO_PKG_VERSION").to_string());
    init_telemetry(telemetry_config);

    tracing::info!("wellness-control-plane starting...");

    let server_config = ServerConfig::from_env()?;
    let auth_config = AuthConfig::from_env()?;
    tracing::info!(
        token_lifetime_secs = auth_config.token_lifetime.as_secs(),
        min_password_length = auth_config.min_password_length,
        "Authentication configured"
    );

    if server_config.development {
        tracing::info!("Development mode: 5xx responses include error detail");
    }

    // Initialize storage
    let backend = match &server_config.database_url {
        Some(url) => {
            let backend = StorageBackend::postgres(url).await?;
            tracing::info!("Connected to database, migrations applied");
            backend
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
            StorageBackend::in_memory()
        }
    };

    let auth_service = AuthService::new(
        backend.credential_store(),
        backend.token_store(),
        auth_config.settings(),
    )
    .context("Failed to create auth service")?;
    let auth_service = Arc::new(auth_service);

    // Keep the handle alive for the lifetime of the server
    let _reaper = TokenReaper::spawn(auth_service.clone(), auth_config.token_purge_interval);

    if !server_config.api_prefix.is_empty() {
        tracing::info!(prefix = %server_config.api_prefix, "API prefix configured");
    }
    if server_config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?server_config.cors_origins, "CORS origins configured");
    }

    let app = build_app(&backend, auth_service, &server_config);

    // Start HTTP server
    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
