use keygate_credential::CredentialError;

#[test]
fn error_display_invalid_input() {
    let err = CredentialError::InvalidInput("username must not be empty".into());
    let msg = format!("{err}");
    assert!(msg.contains("invalid input"));
    assert!(msg.contains("username"));
}

#[test]
fn error_display_invalid_expiry() {
    let err = CredentialError::InvalidExpiry("'soon'".into());
    assert!(format!("{err}").contains("invalid expiry"));
}

#[test]
fn error_display_already_exists() {
    let err = CredentialError::AlreadyExists("alice".into());
    assert_eq!(format!("{err}"), "user already exists: alice");
}

#[test]
fn error_display_not_found() {
    let err = CredentialError::NotFound("bob".into());
    assert_eq!(format!("{err}"), "user not found: bob");
}

#[test]
fn error_from_serde_json() {
    let serde_err: Result<serde_json::Value, _> = serde_json::from_str("not json");
    let err: CredentialError = serde_err.unwrap_err().into();
    assert!(format!("{err}").contains("serialization"));
}
