//! CLI subcommand handlers

pub mod account;
pub mod form;
pub mod summary;
