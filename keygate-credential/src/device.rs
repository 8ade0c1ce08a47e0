//! Device fingerprints for hardware binding.
//!
//! Clients bind a credential to the first device that logs in by storing
//! its fingerprint in the record's `hwid` field. Administrators can clear
//! the binding; everything else about binding happens client-side.

use std::env;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A stable identifier for one machine, suitable as an `hwid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceFingerprint {
    id: String,
}

impl DeviceFingerprint {
    /// Fingerprints the current machine.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_components(&collect_hardware_ids())
    }

    /// Fingerprints an explicit list of identifiers.
    ///
    /// The id is the first 16 bytes of `SHA-256(components joined by '|')`,
    /// base64url encoded.
    #[must_use]
    pub fn from_components<S: AsRef<str>>(components: &[S]) -> Self {
        let mut hasher = Sha256::new();
        for (i, part) in components.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(part.as_ref().as_bytes());
        }
        let hash = hasher.finalize();

        Self {
            id: URL_SAFE_NO_PAD.encode(&hash[..16]),
        }
    }

    /// Returns the fingerprint id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

fn collect_hardware_ids() -> Vec<String> {
    let mut ids = vec![
        env::consts::OS.to_string(),
        env::consts::ARCH.to_string(),
        get_hostname(),
    ];
    if let Some(machine_id) = get_machine_id() {
        ids.push(machine_id);
    }
    ids
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn get_machine_id() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/machine-id")
            .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|output| {
                output
                    .lines()
                    .find(|l| l.contains("IOPlatformUUID"))
                    .and_then(|l| l.split('"').nth(3))
                    .map(String::from)
            })
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}
