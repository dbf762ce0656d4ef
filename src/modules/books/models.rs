use serde::{Deserialize, Serialize};

pub use libris_db::{Book, BookDraft};

/// Request body for creating or replacing a book.
///
/// Every field is optional on the wire so that a missing field is reported as
/// a validation error naming the field. An `id` in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPayload {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub published_year: Option<i32>,
    pub publisher: Option<String>,
    pub description: Option<String>,
    /// Defaults to 0 when omitted
    pub total_copies: Option<i32>,
    /// Defaults to 0 when omitted
    pub available_copies: Option<i32>,
}
