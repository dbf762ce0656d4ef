use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Book, BookDraft};

/// Errors raised by catalog store backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("book {0} not found")]
    NotFound(i64),

    #[error("a book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    #[error("book {id} cannot move to {attempted} available copies (total {total})")]
    CopyBounds { id: i64, attempted: i64, total: i32 },

    #[error("storage failure: {0}")]
    Storage(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent collection of books.
///
/// Implementations own every record; callers only ever receive clones.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All records ordered by identifier
    async fn find_all(&self) -> StoreResult<Vec<Book>>;

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Book>>;

    /// Exact ISBN lookup
    async fn find_by_isbn(&self, isbn: &str) -> StoreResult<Option<Book>>;

    /// Case-insensitive substring match on the author
    async fn find_by_author_contains(&self, fragment: &str) -> StoreResult<Vec<Book>>;

    /// Case-insensitive substring match on either the title or the genre
    async fn find_by_title_or_genre_contains(&self, fragment: &str) -> StoreResult<Vec<Book>>;

    /// Case-insensitive exact genre match
    async fn find_by_genre(&self, genre: &str) -> StoreResult<Vec<Book>>;

    /// Store a new record under a freshly assigned identifier
    async fn insert(&self, draft: BookDraft) -> StoreResult<Book>;

    /// Overwrite every mutable field of an existing record
    async fn update(&self, id: i64, draft: BookDraft) -> StoreResult<Book>;

    async fn exists_by_id(&self, id: i64) -> StoreResult<bool>;

    async fn delete_by_id(&self, id: i64) -> StoreResult<()>;

    /// Atomically add `delta` to the available copies of a record.
    ///
    /// Fails with [`StoreError::CopyBounds`] instead of leaving
    /// `0..=total_copies`; nothing is written in that case.
    async fn adjust_available_copies(&self, id: i64, delta: i32) -> StoreResult<Book>;
}
