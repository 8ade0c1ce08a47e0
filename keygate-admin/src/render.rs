//! Human-readable status lines.

use keygate_credential::{BindingCheck, CredentialSummary, VerifyOutcome};
use keygate_service::ServiceError;

/// Status line for a failed operation. Each failure kind reads differently.
pub fn error(err: &ServiceError) -> String {
    match err {
        ServiceError::Unauthorized(_) => "❌ Admin only".to_string(),
        ServiceError::NotFound(_) => "❌ User not found".to_string(),
        ServiceError::AlreadyExists(_) => "❌ User already exists".to_string(),
        ServiceError::InvalidInput(msg) => format!("❌ Invalid input: {msg}"),
        ServiceError::Conflict { attempts } => format!(
            "⚠️ Credential store is busy (gave up after {attempts} attempts), try again"
        ),
        ServiceError::StoreUnavailable(msg) => format!("⚠️ Credential store unavailable: {msg}"),
        ServiceError::CorruptDocument(msg) => format!("⚠️ Credential document is corrupt: {msg}"),
    }
}

pub fn created(username: &str) -> String {
    format!("✅ User `{username}` created")
}

pub fn deleted(username: &str) -> String {
    format!("🗑️ `{username}` deleted")
}

pub fn paused(username: &str) -> String {
    format!("⏸️ `{username}` paused")
}

pub fn unpaused(username: &str) -> String {
    format!("▶️ `{username}` unpaused")
}

pub fn hwid_reset(username: &str) -> String {
    format!("🔄 HWID reset for `{username}`")
}

pub fn extended(username: &str, expiry: &str) -> String {
    format!("📅 `{username}` now expires {expiry}")
}

/// One line per credential, or a placeholder when there are none.
pub fn list(summaries: &[CredentialSummary]) -> String {
    if summaries.is_empty() {
        return "📭 No users".to_string();
    }

    let mut msg = String::from("**👥 Users List**\n");
    for s in summaries {
        let status = if s.paused { "⏸️ Paused" } else { "✅ Active" };
        msg.push_str(&format!("`{}` | {} | Expiry: {}\n", s.username, status, s.expiry));
    }
    msg
}

pub fn count(n: usize) -> String {
    format!("📊 Total users: **{n}**")
}

/// Login check result, with the device binding when one was asked about.
pub fn verification(outcome: VerifyOutcome, binding: Option<BindingCheck>) -> String {
    match binding {
        Some(BindingCheck::Unbound) if outcome.is_success() => {
            format!("{} (device not bound yet)", outcome.message())
        }
        Some(BindingCheck::Matches) if outcome.is_success() => {
            format!("{} (device matches)", outcome.message())
        }
        Some(BindingCheck::Mismatch) if outcome.is_success() => {
            "HWID mismatch".to_string()
        }
        _ => outcome.message().to_string(),
    }
}
