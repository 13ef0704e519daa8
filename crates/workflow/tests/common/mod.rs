//! Shared setup for workflow integration tests
#![allow(dead_code)]

use formgate_core::{FormPayload, StaticTokenResolver, Tier};
use formgate_persistence::Database;
use formgate_workflow::{AccountService, FormService, NewSubmission, WorkflowContext};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

pub const ADMIN_TOKEN: &str = "admin-key";
pub const HIGHER_TOKEN: &str = "higher-key";
pub const SUPER_TOKEN: &str = "super-key";

pub async fn setup() -> (TempDir, Arc<WorkflowContext>) {
    let dir = TempDir::new().unwrap();
    let db = Database::open(dir.path().join("formgate.db")).await.unwrap();
    let roles = StaticTokenResolver::new()
        .with_token(Tier::Admin, ADMIN_TOKEN)
        .with_token(Tier::HigherOfficial, HIGHER_TOKEN)
        .with_token(Tier::SuperOfficial, SUPER_TOKEN);
    (dir, Arc::new(WorkflowContext::new(db, Arc::new(roles))))
}

pub fn payload() -> FormPayload {
    json!({
        "applicant": "Hari Bahadur",
        "ward": 4,
        "documents": ["citizenship", "land ownership"],
        "urgent": false
    })
    .as_object()
    .cloned()
    .unwrap()
}

pub async fn register(ctx: &WorkflowContext, phone: &str) -> i64 {
    AccountService::new(ctx)
        .register("Hari Bahadur", phone, "pw")
        .await
        .unwrap()
        .id
}

pub async fn submit(ctx: &WorkflowContext, owner_id: i64, form_type: &str) -> i64 {
    FormService::new(ctx)
        .submit(
            owner_id,
            NewSubmission::new(Some(form_type.to_string()), payload()),
        )
        .await
        .unwrap()
        .id
}
