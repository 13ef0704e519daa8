//! SQLite persistence module
//!
//! Repository pattern cho SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{create_pool, init_database, run_migrations, AccountRepo, FormRepo};
pub use schema::{AccountRow, FormRow, FormWithOwnerRow, NewAccountRow, NewFormRow};
