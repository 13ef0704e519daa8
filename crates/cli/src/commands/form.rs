//! Form submission and tier action commands

use anyhow::{bail, Context, Result};
use formgate_core::{FormPayload, Tier};
use formgate_workflow::{
    AccountService, FormService, FormView, NewSubmission, StageActionProcessor, TierActionRequest,
};
use std::path::Path;

use crate::db;
use crate::FormAction;

/// Handle form subcommands
pub async fn handle(db_path: &Path, action: FormAction) -> Result<()> {
    let ctx = db::open(db_path).await?;
    let forms = FormService::new(&ctx);

    match action {
        FormAction::Submit { phone, form_type, data, entered } => {
            let payload = parse_payload(&data)?;
            let submission = NewSubmission::new(form_type, payload).with_enter_date_and_time(entered);

            match forms.submit_by_phone(&phone, submission).await {
                Ok(form) => println!("✅ Form #{} submitted for {}", form.id, phone),
                Err(e) if e.is_not_found() => println!("❌ Account '{}' not found", phone),
                Err(e) => return Err(e).context("Failed to submit form"),
            }
        }
        FormAction::Show { form_id } => match forms.get(form_id).await {
            Ok(view) => print_form(&view),
            Err(e) if e.is_not_found() => println!("❌ Form #{} not found", form_id),
            Err(e) => return Err(e.into()),
        },
        FormAction::List { phone } => {
            let owner = match AccountService::new(&ctx).find_by_phone(&phone).await {
                Ok(owner) => owner,
                Err(e) if e.is_not_found() => {
                    println!("❌ Account '{}' not found", phone);
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            let submissions = forms.list_by_owner(owner.id).await?;

            if submissions.is_empty() {
                println!("No forms found for {}", owner);
            } else {
                println!("📄 Forms for {}", owner);
                println!("{:<6} {:<24} {:<10} {:<20}", "ID", "TYPE", "STATE", "SUBMITTED");
                println!("{}", "-".repeat(64));
                for form in submissions {
                    println!(
                        "{:<6} {:<24} {:<10} {:<20}",
                        form.id,
                        form.form_type.as_deref().unwrap_or("-"),
                        form.state(),
                        form.submitted_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        FormAction::Act {
            form_id,
            decision,
            token,
            reason,
            last_action,
            next_step,
        } => {
            let request = TierActionRequest {
                decision: Some(decision),
                reason,
                last_action_done: last_action,
                next_step,
            };
            let outcome = StageActionProcessor::new(&ctx)
                .act_with_token(token.as_deref(), form_id, request)
                .await
                .with_context(|| format!("Tier action on form #{} failed", form_id))?;

            println!(
                "✅ {} {} form #{} → {}",
                outcome.tier, outcome.decision, outcome.form_id, outcome.state
            );
        }
    }

    ctx.database().close().await;
    Ok(())
}

/// Parse `--data`; must be a JSON object
fn parse_payload(raw: &str) -> Result<FormPayload> {
    let value: serde_json::Value = serde_json::from_str(raw).context("--data is not valid JSON")?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => bail!("--data must be a JSON object"),
    }
}

fn print_form(view: &FormView) {
    println!("📋 Form #{}", view.id);
    println!("   Owner:     {} ({})", view.owner_name, view.owner_phone);
    println!("   Type:      {}", view.form_type.as_deref().unwrap_or("-"));
    println!("   Submitted: {}", view.submitted_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(entered) = &view.enter_date_and_time {
        println!("   Entered:   {}", entered);
    }
    println!("   State:     {}", view.state);

    println!("\n   Tiers:");
    for tier in Tier::ALL {
        let decision = view.tier(tier);
        let at = decision
            .decided_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let mark = if decision.decided {
            "✔"
        } else if decision.has_acted() {
            "✘"
        } else {
            "·"
        };
        println!("     {} {:<16} {}", mark, tier.as_str(), at);
    }

    if view.cancellation.cancelled {
        println!(
            "\n   Cancelled: {}",
            view.cancellation.reason.as_deref().unwrap_or("-")
        );
    }
    if let Some(last) = &view.last_action_done {
        println!("   Last action: {}", last);
    }
    if let Some(next) = &view.next_step {
        println!("   Next step:   {}", next);
    }

    println!("\n   Data:");
    for (key, value) in &view.form_data {
        println!("     {}: {}", key, value);
    }
}
