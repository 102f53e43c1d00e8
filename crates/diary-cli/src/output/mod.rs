//! Output formatting helpers for the CLI.
//!
//! JSON shapes for search hits and encrypted export records. Decrypted
//! notes and list rows serialize through their own derives.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use diary_core::crypto::{Salt, PBKDF2_ITERATIONS};
use diary_core::storage::NoteRecord;
use diary_core::SearchHit;
use serde::Serialize;

/// A search hit as emitted by `search --json`.
#[derive(Serialize)]
pub struct HitRow<'a> {
    #[serde(flatten)]
    hit: &'a SearchHit,
    matched: Vec<&'static str>,
}

pub fn hit_rows(hits: &[SearchHit]) -> Vec<HitRow<'_>> {
    hits.iter()
        .map(|hit| HitRow {
            hit,
            matched: matched_fields(hit),
        })
        .collect()
}

/// Ciphertext export: every encrypted field as standard base64.
pub fn encrypted_record_json(record: &NoteRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id,
        "created_at": record.created_at,
        "title": STANDARD.encode(&record.title),
        "tags": STANDARD.encode(&record.tags),
        "body": STANDARD.encode(&record.body),
    })
}

/// Key derivation parameters needed to decrypt an encrypted export offline.
pub fn kdf_json(salt: &Salt) -> serde_json::Value {
    serde_json::json!({
        "kdf": "pbkdf2-hmac-sha256",
        "iterations": PBKDF2_ITERATIONS,
        "salt": STANDARD.encode(salt.as_bytes()),
        "cipher": "xchacha20poly1305",
    })
}

/// Which fields a search hit matched in, as shown to the user.
pub fn matched_fields(hit: &SearchHit) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if hit.in_title {
        fields.push("title");
    }
    if hit.in_body {
        fields.push("body");
    }
    fields
}
