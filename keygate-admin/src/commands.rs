//! Command definitions and dispatch.

use clap::Subcommand;
use keygate_credential::DeviceFingerprint;
use keygate_service::{CallerId, CredentialService, ServiceResult};
use tracing::debug;

use crate::render;

/// Administrative commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new user
    Create {
        username: String,
        password: String,
        /// Expiry date, e.g. 2030-01-01
        expiry: String,
    },
    /// Delete a user
    Delete { username: String },
    /// Pause a user
    Pause { username: String },
    /// Unpause a user
    Unpause { username: String },
    /// Clear a user's hardware binding
    ResetHwid { username: String },
    /// Set a new expiry for a user
    Extend { username: String, expiry: String },
    /// List all users
    List,
    /// Count users
    Count,
    /// Check a login the way clients do (read-only, no admin rights needed)
    Verify {
        username: String,
        password: String,
        /// Device fingerprint to compare with the stored binding
        #[arg(long)]
        hwid: Option<String>,
    },
    /// Print this machine's device fingerprint
    Fingerprint,
}

impl Command {
    /// Returns false for commands that never read or write the document.
    pub fn needs_store(&self) -> bool {
        !matches!(self, Command::Fingerprint)
    }
}

/// Rendered result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub ok: bool,
}

impl Outcome {
    fn from_result(result: ServiceResult<String>) -> Self {
        match result {
            Ok(message) => Self { message, ok: true },
            Err(err) => {
                debug!(error = %err, "command failed");
                Self {
                    message: render::error(&err),
                    ok: false,
                }
            }
        }
    }
}

/// Runs `command` on behalf of `caller`.
pub async fn run(service: &CredentialService, caller: CallerId, command: Command) -> Outcome {
    let result = match command {
        Command::Create {
            username,
            password,
            expiry,
        } => service
            .create(caller, &username, &password, &expiry)
            .await
            .map(|()| render::created(&username)),
        Command::Delete { username } => service
            .delete(caller, &username)
            .await
            .map(|()| render::deleted(&username)),
        Command::Pause { username } => service
            .pause(caller, &username)
            .await
            .map(|()| render::paused(&username)),
        Command::Unpause { username } => service
            .unpause(caller, &username)
            .await
            .map(|()| render::unpaused(&username)),
        Command::ResetHwid { username } => service
            .reset_hwid(caller, &username)
            .await
            .map(|()| render::hwid_reset(&username)),
        Command::Extend { username, expiry } => service
            .extend(caller, &username, &expiry)
            .await
            .map(|()| render::extended(&username, &expiry)),
        Command::List => service.list(caller).await.map(|s| render::list(&s)),
        Command::Count => service.count(caller).await.map(render::count),
        Command::Verify {
            username,
            password,
            hwid: None,
        } => service
            .verify(&username, &password)
            .await
            .map(|outcome| render::verification(outcome, None)),
        Command::Verify {
            username,
            password,
            hwid: Some(device),
        } => service
            .verify_device(&username, &password, &device)
            .await
            .map(|(outcome, binding)| render::verification(outcome, binding)),
        Command::Fingerprint => Ok(DeviceFingerprint::generate().id().to_string()),
    };

    Outcome::from_result(result)
}
