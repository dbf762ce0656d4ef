use serde::{Deserialize, Serialize};

/// A catalog record as stored and returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store-assigned identifier, never reused
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Unique across the catalog
    pub isbn: String,
    pub genre: String,
    pub published_year: i32,
    pub publisher: String,
    pub description: Option<String>,
    /// Copies owned by the library, loaned or not
    pub total_copies: i32,
    /// Copies currently on the shelf
    pub available_copies: i32,
}

impl Book {
    pub fn from_draft(id: i64, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            isbn: draft.isbn,
            genre: draft.genre,
            published_year: draft.published_year,
            publisher: draft.publisher,
            description: draft.description,
            total_copies: draft.total_copies,
            available_copies: draft.available_copies,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

/// Validated book fields without an identifier; input to inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub genre: String,
    pub published_year: i32,
    pub publisher: String,
    pub description: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
}
