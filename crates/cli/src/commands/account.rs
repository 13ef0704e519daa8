//! Account management commands

use anyhow::{bail, Context, Result};
use formgate_persistence::AccountRepo;
use formgate_workflow::{AccountService, WorkflowError};
use std::path::Path;

use crate::db;
use crate::AccountAction;

/// Handle account subcommands
pub async fn handle(db_path: &Path, action: AccountAction) -> Result<()> {
    let ctx = db::open(db_path).await?;
    let accounts = AccountService::new(&ctx);

    match action {
        AccountAction::Register { name, phone, password } => {
            match accounts.register(&name, &phone, &password).await {
                Ok(account) => {
                    println!("✅ Registered {}", account);
                }
                Err(WorkflowError::AlreadyRegistered(phone)) => {
                    println!("❌ Phone number '{}' is already registered", phone);
                }
                Err(e) => return Err(e).context("Failed to register account"),
            }
        }
        AccountAction::Login { phone, password } => match accounts.login(&phone, &password).await {
            Ok(account) => println!("✅ Credentials valid for {}", account),
            Err(e) if e.is_unauthorized() => println!("❌ Invalid phone number or password"),
            Err(e) => return Err(e.into()),
        },
        AccountAction::List => {
            let rows = AccountRepo::get_all(ctx.pool()).await?;
            if rows.is_empty() {
                println!("No accounts found.");
            } else {
                println!("{:<6} {:<16} {:<24} {:<20}", "ID", "PHONE", "NAME", "REGISTERED");
                println!("{}", "-".repeat(68));
                for row in rows {
                    println!(
                        "{:<6} {:<16} {:<24} {:<20}",
                        row.id,
                        row.phone_number,
                        row.user_name,
                        row.created_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        AccountAction::Show { phone, id } => {
            let (label, result) = match (phone, id) {
                (_, Some(id)) => (format!("#{}", id), accounts.get(id).await),
                (Some(phone), None) => {
                    let found = accounts.find_by_phone(&phone).await;
                    (phone, found)
                }
                (None, None) => bail!("either a phone number or --id is required"),
            };
            match result {
                Ok(account) => {
                    println!("📋 Account Details");
                    println!("   ID:         {}", account.id);
                    println!("   Name:       {}", account.user_name);
                    println!("   Phone:      {}", account.phone_number);
                    println!("   Registered: {}", account.created_at.format("%Y-%m-%d %H:%M:%S"));
                }
                Err(e) if e.is_not_found() => println!("❌ Account '{}' not found", label),
                Err(e) => return Err(e.into()),
            }
        }
    }

    ctx.database().close().await;
    Ok(())
}
