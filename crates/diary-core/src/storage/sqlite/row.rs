//! Row mappers for notebook queries.

use rusqlite::Row;

use crate::storage::types::{NoteId, NoteRecord, NoteSummary, SearchRecord};

pub(super) const SELECT_SUMMARIES: &str =
    "SELECT id, title, tags, created_at FROM notes ORDER BY id DESC";

pub(super) const SELECT_NOTE: &str =
    "SELECT id, title, tags, body, created_at FROM notes WHERE id = ?1";

pub(super) const SELECT_SEARCH: &str = "SELECT id, title, body FROM notes ORDER BY id DESC";

pub(super) fn note_summary(row: &Row<'_>) -> rusqlite::Result<NoteSummary> {
    Ok(NoteSummary {
        id: NoteId(row.get(0)?),
        title: row.get(1)?,
        tags: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub(super) fn note_record(row: &Row<'_>) -> rusqlite::Result<NoteRecord> {
    Ok(NoteRecord {
        id: NoteId(row.get(0)?),
        title: row.get(1)?,
        tags: row.get(2)?,
        body: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub(super) fn search_record(row: &Row<'_>) -> rusqlite::Result<SearchRecord> {
    Ok(SearchRecord {
        id: NoteId(row.get(0)?),
        title: row.get(1)?,
        body: row.get(2)?,
    })
}
