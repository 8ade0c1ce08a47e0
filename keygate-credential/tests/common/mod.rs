#![allow(dead_code)]

use keygate_credential::{CredentialDocument, CredentialRecord, SchemeKind};

pub const SECRET123_SHA256: &str =
    "fcf730b6d95236ecd3c9fc2d92d7b6b2bb061514961aec041d6c7a7192f592e4";

/// Builds a legacy record, panicking on invalid input.
pub fn record(password: &str, expiry: &str) -> CredentialRecord {
    CredentialRecord::new(password, expiry, SchemeKind::Legacy).unwrap()
}

/// A document holding the given `(username, password, expiry)` triples.
pub fn document_with(entries: &[(&str, &str, &str)]) -> CredentialDocument {
    let mut doc = CredentialDocument::new();
    for (user, password, expiry) in entries {
        doc.insert(user, record(password, expiry)).unwrap();
    }
    doc
}
