//! Unlocked notebook session.
//!
//! A `Session` is created once per invocation from the store salt and the
//! master password. It owns the derived key and is the only place where
//! fields are encrypted before insertion and decrypted after retrieval.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use zeroize::Zeroize;

use crate::crypto::{decrypt, derive_key, encrypt, DerivedKey};
use crate::error::{DiaryError, Result};
use crate::storage::{format_created_at, NewNote, NoteId, NoteStore};

/// Plaintext fields of a note about to be written.
#[derive(Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    /// Comma-separated tags, stored as one encrypted field
    pub tags: String,
    pub body: String,
}

impl Drop for NoteDraft {
    fn drop(&mut self) {
        self.title.zeroize();
        self.tags.zeroize();
        self.body.zeroize();
    }
}

/// Decrypted list row (no body).
#[derive(Debug, Clone, Serialize)]
pub struct NoteHeader {
    pub id: NoteId,
    pub title: String,
    #[serde(serialize_with = "serialize_tags")]
    pub tags: String,
    pub created_at: String,
}

impl NoteHeader {
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }
}

impl Drop for NoteHeader {
    fn drop(&mut self) {
        self.title.zeroize();
        self.tags.zeroize();
    }
}

/// A fully decrypted note.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(serialize_with = "serialize_tags")]
    pub tags: String,
    pub body: String,
    pub created_at: String,
}

impl Note {
    /// Tags split on commas, trimmed, empties dropped.
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }
}

impl Drop for Note {
    fn drop(&mut self) {
        self.title.zeroize();
        self.tags.zeroize();
        self.body.zeroize();
    }
}

/// A search match.
///
/// Serializes as `{id, title}`; callers decide how to present which
/// fields matched.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: NoteId,
    pub title: String,
    #[serde(skip)]
    pub in_title: bool,
    #[serde(skip)]
    pub in_body: bool,
}

impl Drop for SearchHit {
    fn drop(&mut self) {
        self.title.zeroize();
    }
}

/// Split a comma-separated tag string.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tags go out as a list, not the stored comma form.
fn serialize_tags<S>(tags: &str, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(split_tags(tags))
}

/// Holder of the derived key for one invocation.
#[derive(Debug)]
pub struct Session {
    key: DerivedKey,
}

impl Session {
    /// Derive the key for `store` and check it against existing notes.
    ///
    /// When the store already holds notes, the newest title is decrypted so
    /// a mistyped password fails here instead of appending notes under a
    /// key nothing else can read.
    ///
    /// # Errors
    ///
    /// - `DiaryError::NotInitialized` if the store has no salt
    /// - `DiaryError::Decryption` if the password does not match
    pub fn unlock(store: &dyn NoteStore, password: &SecretString) -> Result<Self> {
        let salt = store.get_salt()?;
        let session = Self {
            key: derive_key(password.expose_secret(), &salt),
        };

        if let Some(newest) = store.list_notes()?.first() {
            decrypt(&session.key, &newest.title)?;
        }

        tracing::debug!("session unlocked");
        Ok(session)
    }

    /// Build a session around an already derived key.
    pub fn from_key(key: DerivedKey) -> Self {
        Self { key }
    }

    /// Encrypt and append a note stamped with the current time.
    pub fn add_note(&self, store: &dyn NoteStore, draft: &NoteDraft) -> Result<NoteId> {
        self.add_note_at(store, draft, Utc::now())
    }

    /// Encrypt and append a note with an explicit creation time.
    pub fn add_note_at(
        &self,
        store: &dyn NoteStore,
        draft: &NoteDraft,
        created_at: DateTime<Utc>,
    ) -> Result<NoteId> {
        let note = NewNote {
            title: encrypt(&self.key, draft.title.as_bytes())?,
            tags: encrypt(&self.key, draft.tags.as_bytes())?,
            body: encrypt(&self.key, draft.body.as_bytes())?,
            created_at: format_created_at(created_at),
        };
        store.insert_note(&note)
    }

    /// Every note without its body, newest first.
    pub fn list_notes(&self, store: &dyn NoteStore) -> Result<Vec<NoteHeader>> {
        store
            .list_notes()?
            .into_iter()
            .map(|row| {
                Ok(NoteHeader {
                    id: row.id,
                    title: self.open_text(&row.title)?,
                    tags: self.open_text(&row.tags)?,
                    created_at: row.created_at,
                })
            })
            .collect()
    }

    /// Notes carrying `tag` (case-insensitive), newest first.
    ///
    /// Tags are a single encrypted field, so this decrypts every row.
    pub fn notes_with_tag(&self, store: &dyn NoteStore, tag: &str) -> Result<Vec<NoteHeader>> {
        let wanted = tag.trim().to_lowercase();
        Ok(self
            .list_notes(store)?
            .into_iter()
            .filter(|header| {
                header
                    .tag_list()
                    .iter()
                    .any(|candidate| candidate.to_lowercase() == wanted)
            })
            .collect())
    }

    /// Fetch and decrypt one note.
    pub fn read_note(&self, store: &dyn NoteStore, id: NoteId) -> Result<Note> {
        let record = store.get_note(id)?;
        Ok(Note {
            id: record.id,
            title: self.open_text(&record.title)?,
            tags: self.open_text(&record.tags)?,
            body: self.open_text(&record.body)?,
            created_at: record.created_at,
        })
    }

    /// Case-insensitive substring search over titles and bodies.
    ///
    /// An empty query matches every note.
    pub fn search(&self, store: &dyn NoteStore, query: &str) -> Result<Vec<SearchHit>> {
        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        for row in store.list_all_for_search()? {
            let mut title = self.open_text(&row.title)?;
            let mut folded_title = title.to_lowercase();
            let mut body = self.open_text(&row.body)?;
            let mut folded_body = body.to_lowercase();
            let in_title = folded_title.contains(&needle);
            let in_body = folded_body.contains(&needle);
            folded_title.zeroize();
            folded_body.zeroize();
            body.zeroize();
            if in_title || in_body {
                hits.push(SearchHit {
                    id: row.id,
                    title,
                    in_title,
                    in_body,
                });
            } else {
                title.zeroize();
            }
        }
        tracing::debug!(hits = hits.len(), "search finished");
        Ok(hits)
    }

    /// Every note fully decrypted, newest first.
    pub fn export_notes(&self, store: &dyn NoteStore) -> Result<Vec<Note>> {
        store
            .list_notes()?
            .into_iter()
            .map(|row| self.read_note(store, row.id))
            .collect()
    }

    /// Decrypt every field of every note; returns how many were checked.
    pub fn verify_all(&self, store: &dyn NoteStore) -> Result<usize> {
        let mut checked = 0;
        for row in store.list_notes()? {
            let record = store.get_note(row.id)?;
            for blob in [&record.title, &record.tags, &record.body] {
                decrypt(&self.key, blob).inspect_err(|_| {
                    tracing::warn!(id = %record.id, "note failed to decrypt");
                })?;
            }
            checked += 1;
        }
        tracing::info!(checked, "all notes decrypted");
        Ok(checked)
    }

    fn open_text(&self, blob: &[u8]) -> Result<String> {
        let mut plaintext = decrypt(&self.key, blob)?;
        String::from_utf8(std::mem::take(&mut *plaintext)).map_err(|err| {
            err.into_bytes().zeroize();
            DiaryError::Integrity("Decrypted field is not valid UTF-8".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{NewNote, SqliteStore, StoreOptions};
    use chrono::TimeZone;
    use tempfile::{tempdir, TempDir};

    fn password(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn draft(title: &str, tags: &str, body: &str) -> NoteDraft {
        NoteDraft {
            title: title.to_string(),
            tags: tags.to_string(),
            body: body.to_string(),
        }
    }

    fn fresh_store() -> (TempDir, SqliteStore) {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(dir.path(), &StoreOptions::default()).unwrap();
        store.initialize().unwrap();
        (dir, store)
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags("work, personal,,  "), vec!["work", "personal"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn test_unlock_requires_initialized_store() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(dir.path(), &StoreOptions::default()).unwrap();
        let result = Session::unlock(&store, &password("pw"));
        assert!(matches!(result, Err(DiaryError::NotInitialized)));
    }

    #[test]
    fn test_unlock_rejects_wrong_password_once_notes_exist() {
        let (_dir, store) = fresh_store();

        // An empty store accepts any password.
        let session = Session::unlock(&store, &password("right")).unwrap();
        session
            .add_note(&store, &draft("first", "", "body"))
            .unwrap();

        assert!(Session::unlock(&store, &password("right")).is_ok());
        assert!(matches!(
            Session::unlock(&store, &password("wrong")),
            Err(DiaryError::Decryption)
        ));
    }

    #[test]
    fn test_add_and_read_round_trip() {
        let (_dir, store) = fresh_store();
        let session = Session::unlock(&store, &password("pw")).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 5, 6, 7).unwrap();

        let id = session
            .add_note_at(&store, &draft("Title", "a, b", "Body text"), at)
            .unwrap();
        let note = session.read_note(&store, id).unwrap();

        assert_eq!(note.title, "Title");
        assert_eq!(note.body, "Body text");
        assert_eq!(note.tag_list(), vec!["a", "b"]);
        assert_eq!(note.created_at, "2024-03-04T05:06:07.000000Z");
    }

    #[test]
    fn test_empty_body_allowed() {
        let (_dir, store) = fresh_store();
        let session = Session::unlock(&store, &password("pw")).unwrap();
        let id = session.add_note(&store, &draft("t", "", "")).unwrap();
        assert_eq!(session.read_note(&store, id).unwrap().body, "");
    }

    #[test]
    fn test_list_and_tag_filter() {
        let (_dir, store) = fresh_store();
        let session = Session::unlock(&store, &password("pw")).unwrap();
        session.add_note(&store, &draft("one", "Work", "x")).unwrap();
        session
            .add_note(&store, &draft("two", "personal", "y"))
            .unwrap();
        session
            .add_note(&store, &draft("three", "work,travel", "z"))
            .unwrap();

        let titles: Vec<String> = session
            .list_notes(&store)
            .unwrap()
            .into_iter()
            .map(|h| h.title.clone())
            .collect();
        assert_eq!(titles, vec!["three", "two", "one"]);

        let tagged: Vec<String> = session
            .notes_with_tag(&store, "work")
            .unwrap()
            .into_iter()
            .map(|h| h.title.clone())
            .collect();
        assert_eq!(tagged, vec!["three", "one"]);
    }

    #[test]
    fn test_search_matches_title_or_body() {
        let (_dir, store) = fresh_store();
        let session = Session::unlock(&store, &password("pw")).unwrap();
        let a = session
            .add_note(&store, &draft("Groceries", "", "milk"))
            .unwrap();
        let b = session
            .add_note(&store, &draft("Trip", "", "Bought MILK at the station"))
            .unwrap();
        session.add_note(&store, &draft("Other", "", "nothing")).unwrap();

        let hits = session.search(&store, "Milk").unwrap();
        let ids: Vec<NoteId> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![b, a]);
        assert!(hits.iter().all(|h| h.in_body && !h.in_title));

        let by_title = session.search(&store, "groc").unwrap();
        assert_eq!(by_title.len(), 1);
        assert!(by_title[0].in_title);

        assert_eq!(session.search(&store, "").unwrap().len(), 3);
    }

    #[test]
    fn test_export_and_verify() {
        let (_dir, store) = fresh_store();
        let session = Session::unlock(&store, &password("pw")).unwrap();
        session.add_note(&store, &draft("a", "x", "1")).unwrap();
        session.add_note(&store, &draft("b", "y", "2")).unwrap();

        let exported = session.export_notes(&store).unwrap();
        assert_eq!(exported.len(), 2);
        assert_eq!(exported[0].title, "b");
        assert_eq!(exported[1].body, "1");

        assert_eq!(session.verify_all(&store).unwrap(), 2);
    }

    #[test]
    fn test_non_utf8_field_is_integrity_error() {
        let (_dir, store) = fresh_store();
        let session = Session::unlock(&store, &password("pw")).unwrap();
        let note = NewNote {
            title: encrypt(&session.key, &[0xff, 0xfe]).unwrap(),
            tags: encrypt(&session.key, b"").unwrap(),
            body: encrypt(&session.key, b"").unwrap(),
            created_at: format_created_at(Utc::now()),
        };
        let id = store.insert_note(&note).unwrap();

        assert!(matches!(
            session.read_note(&store, id),
            Err(DiaryError::Integrity(_))
        ));
    }

    #[test]
    fn test_serialized_notes_carry_tag_lists() {
        let (_dir, store) = fresh_store();
        let session = Session::unlock(&store, &password("pw")).unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let id = session
            .add_note_at(&store, &draft("Diary", "personal, work", "fine"), at)
            .unwrap();

        let note = serde_json::to_value(session.read_note(&store, id).unwrap()).unwrap();
        assert_eq!(note["id"], 1);
        assert_eq!(note["tags"], serde_json::json!(["personal", "work"]));
        assert_eq!(note["body"], "fine");
        assert_eq!(note["created_at"], "2024-01-01T00:00:00.000000Z");

        let headers = serde_json::to_value(session.list_notes(&store).unwrap()).unwrap();
        assert_eq!(headers[0]["tags"], serde_json::json!(["personal", "work"]));
        assert!(headers[0].get("body").is_none());

        let hits = serde_json::to_value(session.search(&store, "fine").unwrap()).unwrap();
        assert_eq!(hits, serde_json::json!([{ "id": 1, "title": "Diary" }]));
    }

    #[test]
    fn test_verify_all_with_foreign_key_fails() {
        let (_dir, store) = fresh_store();
        let session = Session::unlock(&store, &password("pw")).unwrap();
        session.add_note(&store, &draft("a", "", "1")).unwrap();

        let salt = store.get_salt().unwrap();
        let foreign = Session::from_key(derive_key("other", &salt));
        assert!(matches!(
            foreign.verify_all(&store),
            Err(DiaryError::Decryption)
        ));
    }
}
