//! Summary command - per-citizen status or the all-forms dashboard

use anyhow::Result;
use formgate_workflow::{FormSummary, SummaryScope, SummaryService};
use std::path::Path;

use crate::db;

/// With `--phone`: that citizen's forms. Otherwise the dashboard, which needs a role token.
pub async fn run(db_path: &Path, phone: Option<String>, token: Option<String>) -> Result<()> {
    let ctx = db::open(db_path).await?;
    let summaries = SummaryService::new(&ctx);

    let (title, result) = match phone {
        Some(phone) => (
            format!("Forms for {}", phone),
            summaries.summarize(SummaryScope::OwnerPhone(phone)).await,
        ),
        None => ("All forms".to_string(), summaries.dashboard(token.as_deref()).await),
    };

    match result {
        Ok(summary) => print_summary(&title, &summary),
        Err(e) if e.is_not_found() => println!("❌ {}", e),
        Err(e) if e.is_unauthorized() => println!("❌ A valid role token is required (--token)"),
        Err(e) => return Err(e.into()),
    }

    ctx.database().close().await;
    Ok(())
}

fn print_summary(title: &str, summary: &FormSummary) {
    println!("📊 {}", title);
    println!(
        "   Pending: {}   Approved: {}   Cancelled: {}",
        summary.counts.pending, summary.counts.approved, summary.counts.cancelled
    );
    if summary.forms.is_empty() {
        return;
    }

    println!();
    println!("{:<6} {:<16} {:<20} {:<10} {:<24}", "ID", "PHONE", "TYPE", "STATE", "CANCEL REASON");
    println!("{}", "-".repeat(80));
    for form in &summary.forms {
        println!(
            "{:<6} {:<16} {:<20} {:<10} {:<24}",
            form.id,
            form.owner_phone,
            form.form_type.as_deref().unwrap_or("-"),
            form.state,
            form.cancellation.reason.as_deref().unwrap_or("")
        );
    }
}
