//! Formgate API Server

use anyhow::{Context, Result};
use formgate_api::{create_router, AppConfig, AppState};
use formgate_persistence::Database;
use formgate_workflow::WorkflowContext;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env();

    // Initialize tracing: RUST_LOG wins over FORMGATE_LOG_LEVEL
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if let Some(parent) = config.database_path().as_deref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }
    }

    let db = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    let roles = config.role_resolver();
    let configured = roles.configured_tiers();
    if configured.len() < 3 {
        tracing::warn!(?configured, "not every tier has a role token; missing tiers cannot act");
    }

    let ctx = WorkflowContext::with_config(db, Arc::new(roles), config.workflow_config());
    let app = create_router(AppState::new(ctx));

    let addr: SocketAddr = config.bind_address().parse()?;
    tracing::info!("🚀 API server starting at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
