//! Map-backed catalog store for tests and throwaway deployments.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::model::{Book, BookDraft};
use crate::repository::{BookRepository, StoreError, StoreResult};

#[derive(Default)]
struct Catalog {
    books: BTreeMap<i64, Book>,
    last_id: i64,
}

impl Catalog {
    fn isbn_taken(&self, isbn: &str, except: Option<i64>) -> bool {
        self.books
            .values()
            .any(|book| book.isbn == isbn && Some(book.id) != except)
    }

    fn matching(&self, predicate: impl Fn(&Book) -> bool) -> Vec<Book> {
        self.books
            .values()
            .filter(|book| predicate(book))
            .cloned()
            .collect()
    }
}

/// In-memory catalog store.
///
/// Every mutation runs under a single write guard, which makes
/// read-check-write sequences such as [`BookRepository::adjust_available_copies`]
/// atomic. Clone-friendly via Arc.
#[derive(Clone, Default)]
pub struct InMemoryBookRepository {
    catalog: Arc<RwLock<Catalog>>,
}

impl InMemoryBookRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Catalog>> {
        self.catalog
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Catalog>> {
        self.catalog
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        Ok(self.read()?.matching(|_| true))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Book>> {
        Ok(self.read()?.books.get(&id).cloned())
    }

    async fn find_by_isbn(&self, isbn: &str) -> StoreResult<Option<Book>> {
        Ok(self
            .read()?
            .books
            .values()
            .find(|book| book.isbn == isbn)
            .cloned())
    }

    async fn find_by_author_contains(&self, fragment: &str) -> StoreResult<Vec<Book>> {
        Ok(self
            .read()?
            .matching(|book| contains_ignore_case(&book.author, fragment)))
    }

    async fn find_by_title_or_genre_contains(&self, fragment: &str) -> StoreResult<Vec<Book>> {
        Ok(self.read()?.matching(|book| {
            contains_ignore_case(&book.title, fragment) || contains_ignore_case(&book.genre, fragment)
        }))
    }

    async fn find_by_genre(&self, genre: &str) -> StoreResult<Vec<Book>> {
        let genre = genre.to_lowercase();
        Ok(self
            .read()?
            .matching(|book| book.genre.to_lowercase() == genre))
    }

    async fn insert(&self, draft: BookDraft) -> StoreResult<Book> {
        let mut catalog = self.write()?;
        if catalog.isbn_taken(&draft.isbn, None) {
            return Err(StoreError::DuplicateIsbn(draft.isbn));
        }

        catalog.last_id += 1;
        let book = Book::from_draft(catalog.last_id, draft);
        catalog.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update(&self, id: i64, draft: BookDraft) -> StoreResult<Book> {
        let mut catalog = self.write()?;
        if !catalog.books.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if catalog.isbn_taken(&draft.isbn, Some(id)) {
            return Err(StoreError::DuplicateIsbn(draft.isbn));
        }

        let book = Book::from_draft(id, draft);
        catalog.books.insert(id, book.clone());
        Ok(book)
    }

    async fn exists_by_id(&self, id: i64) -> StoreResult<bool> {
        Ok(self.read()?.books.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        self.write()?
            .books
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn adjust_available_copies(&self, id: i64, delta: i32) -> StoreResult<Book> {
        let mut catalog = self.write()?;
        let book = catalog.books.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let attempted = i64::from(book.available_copies) + i64::from(delta);
        match i32::try_from(attempted) {
            Ok(next) if (0..=book.total_copies).contains(&next) => {
                book.available_copies = next;
                Ok(book.clone())
            }
            _ => Err(StoreError::CopyBounds {
                id,
                attempted,
                total: book.total_copies,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::conformance;

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        conformance::insert_assigns_increasing_ids(&InMemoryBookRepository::new()).await;
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        conformance::ids_are_not_reused(&InMemoryBookRepository::new()).await;
    }

    #[tokio::test]
    async fn duplicate_isbn_is_rejected() {
        conformance::duplicate_isbn_is_rejected(&InMemoryBookRepository::new()).await;
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_ids() {
        conformance::update_and_delete_report_missing_ids(&InMemoryBookRepository::new()).await;
    }

    #[tokio::test]
    async fn update_overwrites_fields() {
        conformance::update_overwrites_fields(&InMemoryBookRepository::new()).await;
    }

    #[tokio::test]
    async fn searches_ignore_case() {
        conformance::searches_ignore_case(&InMemoryBookRepository::new()).await;
    }

    #[tokio::test]
    async fn adjusting_copies_respects_bounds() {
        conformance::adjusting_copies_respects_bounds(&InMemoryBookRepository::new()).await;
    }

    #[tokio::test]
    async fn adjusting_copies_at_i32_max_is_bounded() {
        conformance::adjusting_copies_at_i32_max_is_bounded(&InMemoryBookRepository::new()).await;
    }

    #[tokio::test]
    async fn concurrent_lends_never_oversell() {
        let repo = InMemoryBookRepository::new();
        let book = repo
            .insert(conformance::draft("Dune", "111", 5, 5))
            .await
            .unwrap();

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.adjust_available_copies(book.id, -1).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 5);
        let stored = repo.find_by_id(book.id).await.unwrap().unwrap();
        assert_eq!(stored.available_copies, 0);
    }
}
