//! HTTP handlers for the books module.

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use libris_http::error::{AppError, AppResult};

use super::models::{Book, BookPayload};
use super::service::CatalogService;

/// Route table of the books module, relative to its mount point.
pub fn router(service: CatalogService) -> Router {
    Router::new()
        .route("/", post(add_book))
        .route("/all", get(list_books))
        .route("/health", get(health_check))
        .route("/isbn/{isbn}", get(get_book_by_isbn))
        .route("/search/{keyword}", get(search_books))
        .route("/author/{author}", get(books_by_author))
        .route("/genre/{genre}", get(books_by_genre))
        .route("/lend/{id}", put(lend_book))
        .route("/return/{id}", put(return_book))
        .route("/{id}/availability", get(check_availability))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

/// Numeric book identifier from the path; malformed ids render as a 400 envelope.
pub struct BookId(pub i64);

impl<S> FromRequestParts<S> for BookId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(BookId(id))
    }
}

fn json_body(body: Result<Json<BookPayload>, JsonRejection>) -> AppResult<BookPayload> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(catalog): State<CatalogService>) -> AppResult<Json<Vec<Book>>> {
    Ok(Json(catalog.list_all().await?))
}

async fn get_book(
    State(catalog): State<CatalogService>,
    BookId(id): BookId,
) -> AppResult<Json<Book>> {
    Ok(Json(catalog.get_by_id(id).await?))
}

async fn get_book_by_isbn(
    State(catalog): State<CatalogService>,
    Path(isbn): Path<String>,
) -> AppResult<Json<Book>> {
    Ok(Json(catalog.get_by_isbn(&isbn).await?))
}

async fn search_books(
    State(catalog): State<CatalogService>,
    Path(keyword): Path<String>,
) -> AppResult<Json<Vec<Book>>> {
    Ok(Json(catalog.search(&keyword).await?))
}

async fn books_by_author(
    State(catalog): State<CatalogService>,
    Path(author): Path<String>,
) -> AppResult<Json<Vec<Book>>> {
    Ok(Json(catalog.by_author(&author).await?))
}

async fn books_by_genre(
    State(catalog): State<CatalogService>,
    Path(genre): Path<String>,
) -> AppResult<Json<Vec<Book>>> {
    Ok(Json(catalog.by_genre(&genre).await?))
}

async fn add_book(
    State(catalog): State<CatalogService>,
    body: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = catalog.add(json_body(body)?).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(catalog): State<CatalogService>,
    BookId(id): BookId,
    body: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<Json<Book>> {
    Ok(Json(catalog.update(id, json_body(body)?).await?))
}

async fn delete_book(
    State(catalog): State<CatalogService>,
    BookId(id): BookId,
) -> AppResult<StatusCode> {
    catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn lend_book(
    State(catalog): State<CatalogService>,
    BookId(id): BookId,
) -> AppResult<Json<Book>> {
    Ok(Json(catalog.lend(id).await?))
}

async fn return_book(
    State(catalog): State<CatalogService>,
    BookId(id): BookId,
) -> AppResult<Json<Book>> {
    Ok(Json(catalog.return_book(id).await?))
}

async fn check_availability(
    State(catalog): State<CatalogService>,
    BookId(id): BookId,
) -> AppResult<Json<bool>> {
    Ok(Json(catalog.is_available(id).await?))
}
