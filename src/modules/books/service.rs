//! Catalog operations on top of an injected [`BookRepository`].

use std::sync::Arc;

use libris_db::{BookRepository, StoreError};
use libris_http::error::AppError;
use thiserror::Error;

use super::models::{Book, BookPayload};
use super::validation::{self, FieldError};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid book: {} field(s) rejected", .0.len())]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => CatalogError::NotFound(not_found_message(id)),
            StoreError::DuplicateIsbn(isbn) => CatalogError::Conflict(duplicate_isbn_message(&isbn)),
            StoreError::CopyBounds { id, .. } => {
                CatalogError::Conflict(format!("Copy count bounds violated for book ID {}", id))
            }
            other => CatalogError::Store(other),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(message) => AppError::not_found(message),
            CatalogError::Conflict(message) => AppError::conflict(Vec::new(), message),
            CatalogError::Validation(errors) => AppError::validation(
                errors.into_iter().map(FieldError::to_detail).collect(),
                "Book payload failed validation",
            ),
            CatalogError::Store(err) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

fn not_found_message(id: i64) -> String {
    format!("Book with ID {} not found.", id)
}

fn duplicate_isbn_message(isbn: &str) -> String {
    format!("A book with the ISBN {} already exists.", isbn)
}

/// Stateless request handling for the book catalog
#[derive(Clone)]
pub struct CatalogService {
    books: Arc<dyn BookRepository>,
}

impl CatalogService {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self { books }
    }

    pub async fn list_all(&self) -> CatalogResult<Vec<Book>> {
        Ok(self.books.find_all().await?)
    }

    pub async fn get_by_id(&self, id: i64) -> CatalogResult<Book> {
        self.books
            .find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(not_found_message(id)))
    }

    pub async fn get_by_isbn(&self, isbn: &str) -> CatalogResult<Book> {
        self.books
            .find_by_isbn(isbn)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Book with ISBN {} not found.", isbn)))
    }

    /// Books whose title or genre contains `keyword`, ignoring case
    pub async fn search(&self, keyword: &str) -> CatalogResult<Vec<Book>> {
        Ok(self.books.find_by_title_or_genre_contains(keyword).await?)
    }

    pub async fn by_author(&self, author: &str) -> CatalogResult<Vec<Book>> {
        Ok(self.books.find_by_author_contains(author).await?)
    }

    pub async fn by_genre(&self, genre: &str) -> CatalogResult<Vec<Book>> {
        Ok(self.books.find_by_genre(genre).await?)
    }

    pub async fn add(&self, payload: BookPayload) -> CatalogResult<Book> {
        let draft = validation::validate(payload).map_err(CatalogError::Validation)?;

        if self.books.find_by_isbn(&draft.isbn).await?.is_some() {
            return Err(CatalogError::Conflict(duplicate_isbn_message(&draft.isbn)));
        }

        let book = self.books.insert(draft).await?;
        tracing::info!(book_id = book.id, isbn = %book.isbn, "book added");
        Ok(book)
    }

    /// Replace every mutable field of book `id`.
    ///
    /// The new ISBN may not belong to a different book.
    pub async fn update(&self, id: i64, payload: BookPayload) -> CatalogResult<Book> {
        let draft = validation::validate(payload).map_err(CatalogError::Validation)?;

        if !self.books.exists_by_id(id).await? {
            return Err(CatalogError::NotFound(not_found_message(id)));
        }

        if let Some(holder) = self.books.find_by_isbn(&draft.isbn).await? {
            if holder.id != id {
                return Err(CatalogError::Conflict(duplicate_isbn_message(&draft.isbn)));
            }
        }

        let book = self.books.update(id, draft).await?;
        tracing::info!(book_id = id, "book updated");
        Ok(book)
    }

    pub async fn delete(&self, id: i64) -> CatalogResult<()> {
        if !self.books.exists_by_id(id).await? {
            return Err(CatalogError::NotFound(format!(
                "Book with ID {} does not exist.",
                id
            )));
        }

        self.books.delete_by_id(id).await?;
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    /// Check out one copy of book `id`
    pub async fn lend(&self, id: i64) -> CatalogResult<Book> {
        match self.books.adjust_available_copies(id, -1).await {
            Ok(book) => {
                tracing::info!(book_id = id, available = book.available_copies, "book lent");
                Ok(book)
            }
            Err(StoreError::CopyBounds { .. }) => Err(CatalogError::Conflict(format!(
                "No available copies for book ID {}",
                id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Check one copy of book `id` back in
    pub async fn return_book(&self, id: i64) -> CatalogResult<Book> {
        match self.books.adjust_available_copies(id, 1).await {
            Ok(book) => {
                tracing::info!(book_id = id, available = book.available_copies, "book returned");
                Ok(book)
            }
            Err(StoreError::CopyBounds { .. }) => Err(CatalogError::Conflict(format!(
                "All copies of book ID {} are already available.",
                id
            ))),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn is_available(&self, id: i64) -> CatalogResult<bool> {
        Ok(self.get_by_id(id).await?.is_available())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_db::InMemoryBookRepository;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(InMemoryBookRepository::new()))
    }

    fn payload(title: &str, isbn: &str, total: i32, available: i32) -> BookPayload {
        BookPayload {
            title: Some(title.to_string()),
            author: Some("Frank Herbert".to_string()),
            isbn: Some(isbn.to_string()),
            genre: Some("Science Fiction".to_string()),
            published_year: Some(1965),
            publisher: Some("Chilton Books".to_string()),
            description: None,
            total_copies: Some(total),
            available_copies: Some(available),
        }
    }

    #[tokio::test]
    async fn lend_until_exhausted_then_return() {
        let catalog = service();
        let book = catalog.add(payload("Dune", "111", 3, 3)).await.unwrap();
        assert_eq!(book.id, 1);

        for expected in [2, 1, 0] {
            let lent = catalog.lend(book.id).await.unwrap();
            assert_eq!(lent.available_copies, expected);
        }

        let err = catalog.lend(book.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(ref m) if m == "No available copies for book ID 1"));
        assert!(!catalog.is_available(book.id).await.unwrap());

        let returned = catalog.return_book(book.id).await.unwrap();
        assert_eq!(returned.available_copies, 1);
        assert!(catalog.is_available(book.id).await.unwrap());
    }

    #[tokio::test]
    async fn return_fails_when_all_copies_are_in() {
        let catalog = service();
        let book = catalog.add(payload("Dune", "111", 2, 2)).await.unwrap();

        let err = catalog.return_book(book.id).await.unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
        assert_eq!(catalog.get_by_id(book.id).await.unwrap().available_copies, 2);
    }

    #[tokio::test]
    async fn duplicate_isbn_is_a_conflict_and_leaves_store_untouched() {
        let catalog = service();
        catalog.add(payload("Dune", "111", 3, 3)).await.unwrap();

        let err = catalog.add(payload("Other", "111", 1, 1)).await.unwrap_err();
        assert!(
            matches!(err, CatalogError::Conflict(ref m) if m == "A book with the ISBN 111 already exists.")
        );

        let all = catalog.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(catalog.get_by_isbn("111").await.unwrap().title, "Dune");
    }

    #[tokio::test]
    async fn update_replaces_fields_and_guards_isbn() {
        let catalog = service();
        let dune = catalog.add(payload("Dune", "111", 3, 3)).await.unwrap();
        catalog.add(payload("Messiah", "222", 1, 1)).await.unwrap();

        let updated = catalog
            .update(dune.id, payload("Dune (revised)", "111", 4, 2))
            .await
            .unwrap();
        assert_eq!(updated.title, "Dune (revised)");
        assert_eq!((updated.total_copies, updated.available_copies), (4, 2));

        let err = catalog
            .update(dune.id, payload("Dune", "222", 4, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));

        let err = catalog.update(99, payload("Ghost", "999", 1, 1)).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(ref m) if m == "Book with ID 99 not found."));
    }

    #[tokio::test]
    async fn invalid_payload_is_rejected_before_touching_the_store() {
        let catalog = service();

        let err = catalog.add(BookPayload::default()).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(ref fields) if fields.len() == 6));
        assert!(catalog.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_missing_book_is_not_found() {
        let catalog = service();
        let book = catalog.add(payload("Dune", "111", 1, 1)).await.unwrap();

        let err = catalog.delete(book.id + 1).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert_eq!(catalog.list_all().await.unwrap().len(), 1);

        catalog.delete(book.id).await.unwrap();
        assert!(matches!(
            catalog.get_by_isbn("111").await.unwrap_err(),
            CatalogError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn lending_unknown_book_is_not_found() {
        let catalog = service();

        assert!(matches!(catalog.lend(5).await.unwrap_err(), CatalogError::NotFound(_)));
        assert!(matches!(catalog.return_book(5).await.unwrap_err(), CatalogError::NotFound(_)));
        assert!(matches!(catalog.is_available(5).await.unwrap_err(), CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn searches_delegate_to_the_store() {
        let catalog = service();
        catalog.add(payload("Dune", "111", 1, 1)).await.unwrap();

        assert_eq!(catalog.search("DUNE").await.unwrap().len(), 1);
        assert_eq!(catalog.search("fiction").await.unwrap().len(), 1);
        assert!(catalog.search("poetry").await.unwrap().is_empty());
        assert_eq!(catalog.by_author("herb").await.unwrap().len(), 1);
        assert_eq!(catalog.by_genre("science fiction").await.unwrap().len(), 1);
    }
}
