//! Database initialization, status and workflow context

use anyhow::{Context, Result};
use formgate_core::{StaticTokenResolver, Tier};
use formgate_persistence::{AccountRepo, Database, FormRepo};
use formgate_workflow::{SummaryService, WorkflowConfig, WorkflowContext};
use std::path::Path;
use std::sync::Arc;

/// Initialize the database with schema
pub async fn init_database(db_path: &Path, force: bool) -> Result<()> {
    if force && db_path.exists() {
        std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = db_path.as_os_str().to_owned();
            sidecar.push(suffix);
            std::fs::remove_file(&sidecar).ok();
        }
        println!("🗑️  Removed existing database");
    }

    println!("📦 Applying migrations...");
    let db = Database::open(db_path)
        .await
        .context("Failed to create database")?;
    db.close().await;
    Ok(())
}

/// Show database status
pub async fn show_status(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'formgate init' to create the database");
        return Ok(());
    }

    let ctx = open(db_path).await?;

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();

    let account_count = AccountRepo::count(ctx.pool()).await?;
    let form_count = FormRepo::count(ctx.pool()).await?;
    let summary = SummaryService::new(&ctx).all().await?;

    println!("   Accounts:  {}", account_count);
    println!("   Forms:     {}", form_count);
    println!("     pending:   {}", summary.counts.pending);
    println!("     approved:  {}", summary.counts.approved);
    println!("     cancelled: {}", summary.counts.cancelled);

    ctx.database().close().await;
    Ok(())
}

/// Open the database and build a workflow context with env-configured tier tokens
pub async fn open(db_path: &Path) -> Result<WorkflowContext> {
    let db = Database::open(db_path)
        .await
        .context("Failed to connect to database. Run 'formgate init' first.")?;

    let config = WorkflowConfig {
        max_retries: std::env::var("FORMGATE_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(WorkflowConfig::default().max_retries),
        ..WorkflowConfig::default()
    };

    Ok(WorkflowContext::with_config(db, Arc::new(roles_from_env()), config))
}

/// Tier tokens from `FORMGATE_*_TOKEN`; unset or empty tiers cannot act
fn roles_from_env() -> StaticTokenResolver {
    let token = |key: &str| std::env::var(key).ok();
    StaticTokenResolver::new()
        .with_optional_token(Tier::Admin, token("FORMGATE_ADMIN_TOKEN"))
        .with_optional_token(Tier::HigherOfficial, token("FORMGATE_HIGHER_OFFICIAL_TOKEN"))
        .with_optional_token(Tier::SuperOfficial, token("FORMGATE_SUPER_OFFICIAL_TOKEN"))
}
