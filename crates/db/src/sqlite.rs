//! SQLite catalog store on top of `sqlx`.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::model::{Book, BookDraft};
use crate::repository::{BookRepository, StoreError, StoreResult};

/// Catalog store backed by the `books` table.
///
/// The table is created by the books module's migrations; see
/// [`crate::Database::migrate`].
#[derive(Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Turn a unique-index hit into the domain error, pass everything else through.
fn map_write_error(err: sqlx::Error, isbn: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::DuplicateIsbn(isbn.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn find_all(&self) -> StoreResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn find_by_isbn(&self, isbn: &str) -> StoreResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = ?")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn find_by_author_contains(&self, fragment: &str) -> StoreResult<Vec<Book>> {
        // instr() instead of LIKE so `%` and `_` in the input match literally
        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE instr(lower(author), lower(?)) > 0 ORDER BY id",
        )
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn find_by_title_or_genre_contains(&self, fragment: &str) -> StoreResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE instr(lower(title), lower(?)) > 0
               OR instr(lower(genre), lower(?)) > 0
            ORDER BY id
            "#,
        )
        .bind(fragment)
        .bind(fragment)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn find_by_genre(&self, genre: &str) -> StoreResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE lower(genre) = lower(?) ORDER BY id",
        )
        .bind(genre)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn insert(&self, draft: BookDraft) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                title, author, isbn, genre, published_year, publisher,
                description, total_copies, available_copies
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(&draft.isbn)
        .bind(&draft.genre)
        .bind(draft.published_year)
        .bind(&draft.publisher)
        .bind(&draft.description)
        .bind(draft.total_copies)
        .bind(draft.available_copies)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_write_error(err, &draft.isbn))
    }

    async fn update(&self, id: i64, draft: BookDraft) -> StoreResult<Book> {
        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = ?, author = ?, isbn = ?, genre = ?, published_year = ?,
                publisher = ?, description = ?, total_copies = ?, available_copies = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(&draft.isbn)
        .bind(&draft.genre)
        .bind(draft.published_year)
        .bind(&draft.publisher)
        .bind(&draft.description)
        .bind(draft.total_copies)
        .bind(draft.available_copies)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_write_error(err, &draft.isbn))?
        .ok_or(StoreError::NotFound(id))
    }

    async fn exists_by_id(&self, id: i64) -> StoreResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn adjust_available_copies(&self, id: i64, delta: i32) -> StoreResult<Book> {
        // Check and write in one statement so concurrent lends cannot both
        // pass the bounds check.
        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET available_copies = available_copies + ?
            WHERE id = ? AND available_copies + ? BETWEEN 0 AND total_copies
            RETURNING *
            "#,
        )
        .bind(delta)
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(book) = updated {
            return Ok(book);
        }

        match self.find_by_id(id).await? {
            Some(book) => Err(StoreError::CopyBounds {
                id,
                attempted: i64::from(book.available_copies) + i64::from(delta),
                total: book.total_copies,
            }),
            None => Err(StoreError::NotFound(id)),
        }
    }
}
