use keygate_admin::{run, Command, Outcome};
use keygate_service::{CallerId, CredentialService, RetryPolicy, ServiceConfig};
use keygate_store::MemoryStore;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const ADMIN: CallerId = CallerId(777_857_263_548_497_920);
const STRANGER: CallerId = CallerId(42);

/// SHA-256 of "secret123".
const SECRET123_SHA256: &str = "fcf730b6d95236ecd3c9fc2d92d7b6b2bb061514961aec041d6c7a7192f592e4";

fn service(store: Arc<MemoryStore>) -> CredentialService {
    let config = ServiceConfig {
        admin_ids: vec![ADMIN.0],
        retry: RetryPolicy {
            max_attempts: 3,
            base_delay_ms: 1,
            max_delay_ms: 2,
        },
        ..Default::default()
    };
    CredentialService::new(store, config)
}

fn seeded_store() -> Arc<MemoryStore> {
    let json = format!(
        r#"{{
            "alice": {{"passwordHash": "{SECRET123_SHA256}", "expiry": "2099-01-01", "paused": false, "hwid": "dev-1"}},
            "bob": {{"passwordHash": "{SECRET123_SHA256}", "expiry": "2000-01-01", "paused": true, "hwid": null}}
        }}"#
    );
    Arc::new(MemoryStore::with_content(json))
}

fn ok(message: &str) -> Outcome {
    Outcome {
        message: message.to_string(),
        ok: true,
    }
}

fn failed(message: &str) -> Outcome {
    Outcome {
        message: message.to_string(),
        ok: false,
    }
}

fn user(name: &str) -> String {
    name.to_string()
}

#[tokio::test]
async fn test_create_then_duplicate() {
    let svc = service(Arc::new(MemoryStore::new()));
    let create = Command::Create {
        username: user("carol"),
        password: user("pw"),
        expiry: user("2030-01-01"),
    };

    assert_eq!(run(&svc, ADMIN, create.clone()).await, ok("✅ User `carol` created"));
    assert_eq!(run(&svc, ADMIN, create).await, failed("❌ User already exists"));
}

#[tokio::test]
async fn test_stranger_is_refused() {
    let store = seeded_store();
    let svc = service(store.clone());

    let outcome = run(&svc, STRANGER, Command::Delete { username: user("alice") }).await;

    assert_eq!(outcome, failed("❌ Admin only"));
    assert_eq!(store.fetch_count(), 0);
}

#[tokio::test]
async fn test_mutations_render() {
    let svc = service(seeded_store());

    assert_eq!(
        run(&svc, ADMIN, Command::Pause { username: user("alice") }).await,
        ok("⏸️ `alice` paused")
    );
    assert_eq!(
        run(&svc, ADMIN, Command::Unpause { username: user("alice") }).await,
        ok("▶️ `alice` unpaused")
    );
    assert_eq!(
        run(&svc, ADMIN, Command::ResetHwid { username: user("alice") }).await,
        ok("🔄 HWID reset for `alice`")
    );
    assert_eq!(
        run(
            &svc,
            ADMIN,
            Command::Extend {
                username: user("bob"),
                expiry: user("2031-06-30"),
            }
        )
        .await,
        ok("📅 `bob` now expires 2031-06-30")
    );
    assert_eq!(
        run(&svc, ADMIN, Command::Delete { username: user("bob") }).await,
        ok("🗑️ `bob` deleted")
    );
    assert_eq!(
        run(&svc, ADMIN, Command::Delete { username: user("bob") }).await,
        failed("❌ User not found")
    );
}

#[tokio::test]
async fn test_invalid_expiry_rendered() {
    let svc = service(Arc::new(MemoryStore::new()));
    let outcome = run(
        &svc,
        ADMIN,
        Command::Create {
            username: user("dave"),
            password: user("pw"),
            expiry: user("next tuesday"),
        },
    )
    .await;

    assert!(!outcome.ok);
    assert!(outcome.message.starts_with("❌ Invalid input: "));
}

#[tokio::test]
async fn test_list_and_count() {
    let svc = service(seeded_store());

    let list = run(&svc, ADMIN, Command::List).await;
    assert_eq!(
        list,
        ok("**👥 Users List**\n\
            `alice` | ✅ Active | Expiry: 2099-01-01\n\
            `bob` | ⏸️ Paused | Expiry: 2000-01-01\n")
    );
    assert_eq!(run(&svc, ADMIN, Command::Count).await, ok("📊 Total users: **2**"));
}

#[tokio::test]
async fn test_list_empty() {
    let svc = service(Arc::new(MemoryStore::new()));
    assert_eq!(run(&svc, ADMIN, Command::List).await, ok("📭 No users"));
    assert_eq!(run(&svc, ADMIN, Command::Count).await, ok("📊 Total users: **0**"));
}

#[tokio::test]
async fn test_verify_needs_no_admin() {
    let svc = service(seeded_store());
    let verify = |username: &str, password: &str, hwid: Option<&str>| Command::Verify {
        username: username.to_string(),
        password: password.to_string(),
        hwid: hwid.map(str::to_string),
    };

    assert_eq!(
        run(&svc, STRANGER, verify("alice", "secret123", None)).await,
        ok("Login success")
    );
    assert_eq!(
        run(&svc, STRANGER, verify("alice", "secret123", Some("dev-1"))).await,
        ok("Login success (device matches)")
    );
    assert_eq!(
        run(&svc, STRANGER, verify("alice", "secret123", Some("dev-2"))).await,
        ok("HWID mismatch")
    );
    assert_eq!(
        run(&svc, STRANGER, verify("alice", "nope", None)).await,
        ok("Wrong password")
    );
    assert_eq!(
        run(&svc, STRANGER, verify("bob", "secret123", None)).await,
        ok("Account paused")
    );
    assert_eq!(
        run(&svc, STRANGER, verify("zed", "secret123", None)).await,
        ok("Invalid username")
    );
}

#[tokio::test]
async fn test_fingerprint_is_stable() {
    let svc = service(Arc::new(MemoryStore::new()));
    let first = run(&svc, STRANGER, Command::Fingerprint).await;
    let second = run(&svc, STRANGER, Command::Fingerprint).await;

    assert!(first.ok);
    assert_eq!(first, second);
    assert!(!first.message.is_empty());
}

#[test]
fn test_only_fingerprint_skips_the_store() {
    assert!(!Command::Fingerprint.needs_store());
    assert!(Command::List.needs_store());
    assert!(Command::Verify {
        username: user("alice"),
        password: user("pw"),
        hwid: None,
    }
    .needs_store());
}
