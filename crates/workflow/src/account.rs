//! Account operations - register, login, lookup
//!
//! Plumbing around the Form Store: the approval workflow only needs to know
//! that an owner exists.

use crate::context::WorkflowContext;
use crate::credential::CredentialDigest;
use crate::error::{WorkflowError, WorkflowResult};
use chrono::Utc;
use formgate_core::Account;
use formgate_persistence::{AccountRepo, NewAccountRow, PersistenceError};
use tracing::info;

/// Account Service - registration and account resolution
pub struct AccountService<'a> {
    ctx: &'a WorkflowContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a WorkflowContext) -> Self {
        Self { ctx }
    }

    /// Register a citizen; phone numbers are unique
    pub async fn register(
        &self,
        user_name: &str,
        phone_number: &str,
        credential: &str,
    ) -> WorkflowResult<Account> {
        let user_name = user_name.trim();
        let phone_number = phone_number.trim();

        if phone_number.is_empty() {
            return Err(WorkflowError::Validation("phone number is required".to_string()));
        }
        if user_name.is_empty() {
            return Err(WorkflowError::Validation("user name is required".to_string()));
        }
        if credential.is_empty() {
            return Err(WorkflowError::Validation("password is required".to_string()));
        }

        let digest = CredentialDigest::create(credential);
        let row = NewAccountRow {
            phone_number: phone_number.to_string(),
            user_name: user_name.to_string(),
            credential_hash: digest.hash,
            credential_salt: digest.salt,
            created_at: Utc::now(),
        };

        let account = AccountRepo::insert(self.ctx.pool(), &row)
            .await
            .map_err(|e| match e {
                PersistenceError::AlreadyExists { .. } => {
                    WorkflowError::AlreadyRegistered(phone_number.to_string())
                }
                other => other.into(),
            })?;

        info!(account_id = account.id, "account registered");
        Ok(account.into())
    }

    /// Verify phone + credential. Unknown phone and wrong credential fail the same way.
    pub async fn login(&self, phone_number: &str, credential: &str) -> WorkflowResult<Account> {
        let row = match AccountRepo::get_by_phone(self.ctx.pool(), phone_number.trim()).await {
            Ok(row) => row,
            Err(e) if e.is_not_found() => {
                return Err(WorkflowError::Unauthorized("invalid credentials".to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let stored = CredentialDigest::from_parts(&row.credential_hash, &row.credential_salt);
        if !stored.verify(credential) {
            return Err(WorkflowError::Unauthorized("invalid credentials".to_string()));
        }

        Ok(row.into())
    }

    /// Resolve an account by phone number
    pub async fn find_by_phone(&self, phone_number: &str) -> WorkflowResult<Account> {
        let row = AccountRepo::get_by_phone(self.ctx.pool(), phone_number.trim()).await?;
        Ok(row.into())
    }

    pub async fn get(&self, account_id: i64) -> WorkflowResult<Account> {
        let row = AccountRepo::get_by_id(self.ctx.pool(), account_id).await?;
        Ok(row.into())
    }
}
