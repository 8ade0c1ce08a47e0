mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{document_with, record};
use keygate_credential::{
    check_binding, verify, BindingCheck, CredentialDocument, CredentialRecord, SchemeKind,
    VerifyOutcome,
};
use proptest::prelude::*;

fn before_expiry() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2029, 12, 31, 23, 59, 59).unwrap()
}

fn after_expiry() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 1).unwrap()
}

// ── Check order ──────────────────────────────────────────────────

#[test]
fn unknown_username() {
    let doc = document_with(&[("alice", "secret123", "2030-01-01")]);
    assert_eq!(
        verify(&doc, "bob", "secret123", before_expiry()),
        VerifyOutcome::InvalidUsername
    );
}

#[test]
fn correct_login_succeeds() {
    let doc = document_with(&[("alice", "secret123", "2030-01-01")]);
    let outcome = verify(&doc, "alice", "secret123", before_expiry());
    assert_eq!(outcome, VerifyOutcome::LoginSuccess);
    assert!(outcome.is_success());
}

#[test]
fn wrong_password() {
    let doc = document_with(&[("alice", "secret123", "2030-01-01")]);
    assert_eq!(
        verify(&doc, "alice", "nope", before_expiry()),
        VerifyOutcome::WrongPassword
    );
}

#[test]
fn paused_wins_over_expired_and_wrong_password() {
    let mut doc = document_with(&[("alice", "secret123", "2030-01-01")]);
    doc.get_mut("alice").unwrap().pause();
    assert_eq!(
        verify(&doc, "alice", "secret123", before_expiry()),
        VerifyOutcome::AccountPaused
    );
    assert_eq!(
        verify(&doc, "alice", "wrong", after_expiry()),
        VerifyOutcome::AccountPaused
    );
}

#[test]
fn expired_wins_over_wrong_password() {
    let doc = document_with(&[("alice", "secret123", "2030-01-01")]);
    assert_eq!(
        verify(&doc, "alice", "wrong", after_expiry()),
        VerifyOutcome::AccountExpired
    );
    assert_eq!(
        verify(&doc, "alice", "secret123", after_expiry()),
        VerifyOutcome::AccountExpired
    );
}

#[test]
fn expiry_instant_itself_is_still_valid() {
    let doc = document_with(&[("alice", "secret123", "2030-01-01")]);
    let exact = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(
        verify(&doc, "alice", "secret123", exact),
        VerifyOutcome::LoginSuccess
    );
}

#[test]
fn unparseable_stored_expiry_is_malformed() {
    let json = r#"{"mallory": {"passwordHash": "00", "expiry": "whenever", "paused": false, "hwid": null}}"#;
    let doc = CredentialDocument::from_slice(json.as_bytes()).unwrap();
    let outcome = verify(&doc, "mallory", "x", before_expiry());
    assert_eq!(outcome, VerifyOutcome::MalformedRecord);
    assert_eq!(outcome.message(), "Server error");
}

#[test]
fn argon2id_records_verify() {
    let mut doc = CredentialDocument::new();
    doc.insert(
        "alice",
        CredentialRecord::new("secret123", "2030-01-01", SchemeKind::Argon2id).unwrap(),
    )
    .unwrap();
    assert_eq!(
        verify(&doc, "alice", "secret123", before_expiry()),
        VerifyOutcome::LoginSuccess
    );
    assert_eq!(
        verify(&doc, "alice", "secret12", before_expiry()),
        VerifyOutcome::WrongPassword
    );
}

#[test]
fn outcome_messages() {
    assert_eq!(VerifyOutcome::LoginSuccess.message(), "Login success");
    assert_eq!(VerifyOutcome::InvalidUsername.message(), "Invalid username");
    assert_eq!(VerifyOutcome::AccountPaused.message(), "Account paused");
    assert_eq!(VerifyOutcome::AccountExpired.message(), "Account expired");
    assert_eq!(VerifyOutcome::WrongPassword.message(), "Wrong password");
}

// ── Binding ──────────────────────────────────────────────────────

#[test]
fn binding_states() {
    let mut r = record("pw", "2030-01-01");
    assert_eq!(check_binding(&r, "dev-a"), BindingCheck::Unbound);
    r.bind_hwid("dev-a");
    assert_eq!(check_binding(&r, "dev-a"), BindingCheck::Matches);
    assert_eq!(check_binding(&r, "dev-b"), BindingCheck::Mismatch);
    r.reset_hwid();
    assert_eq!(check_binding(&r, "dev-b"), BindingCheck::Unbound);
}

// ── Properties ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn paused_always_rejects(password in ".{1,32}", attempt in ".{0,32}", offset_days in -3650i64..3650) {
        let mut doc = document_with(&[("u", password.as_str(), "2030-01-01")]);
        doc.get_mut("u").unwrap().pause();
        let now = before_expiry() + Duration::days(offset_days);
        prop_assert_eq!(verify(&doc, "u", &attempt, now), VerifyOutcome::AccountPaused);
    }

    #[test]
    fn expired_rejects_any_password(password in ".{1,32}", attempt in ".{0,32}", days_past in 1i64..3650) {
        let doc = document_with(&[("u", password.as_str(), "2030-01-01")]);
        let now = after_expiry() + Duration::days(days_past);
        prop_assert_eq!(verify(&doc, "u", &attempt, now), VerifyOutcome::AccountExpired);
    }

    #[test]
    fn live_record_accepts_only_its_password(password in ".{1,32}", attempt in ".{1,32}") {
        let doc = document_with(&[("u", password.as_str(), "2030-01-01")]);
        let expected = if attempt == password {
            VerifyOutcome::LoginSuccess
        } else {
            VerifyOutcome::WrongPassword
        };
        prop_assert_eq!(verify(&doc, "u", &attempt, before_expiry()), expected);
    }
}

#[test]
fn unusable_scheme_parameters_are_malformed() {
    let json = r#"{"mallory": {
        "passwordHash": "00",
        "expiry": "2030-01-01",
        "paused": false,
        "hwid": null,
        "scheme": {"kind": "argon2id", "salt": "00112233445566778899aabbccddeeff", "m_cost": 1, "t_cost": 0, "p_cost": 1}
    }}"#;
    let doc = CredentialDocument::from_slice(json.as_bytes()).unwrap();
    assert_eq!(
        verify(&doc, "mallory", "x", before_expiry()),
        VerifyOutcome::MalformedRecord
    );
}
