//! Command surface for keygate administrators.
//!
//! Loads configuration, opens the configured store and turns each command
//! into one [`CredentialService`](keygate_service::CredentialService) call,
//! rendering the result as a short status line.

pub mod commands;
pub mod config;
pub mod render;

pub use commands::{run, Command, Outcome};
pub use config::{open_store, AppConfig, StoreConfig, TOKEN_ENV};
