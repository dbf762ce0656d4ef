pub mod models;
pub mod openapi;
pub mod routes;
pub mod service;
pub mod validation;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use libris_db::BookRepository;
use libris_kernel::{InitCtx, Migration, Module};

use service::CatalogService;

/// Book catalog module: CRUD, search and lend/return over `/books`
pub struct BooksModule {
    catalog: CatalogService,
}

impl BooksModule {
    pub fn new(books: Arc<dyn BookRepository>) -> Self {
        Self {
            catalog: CatalogService::new(books),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let stored = self.catalog.list_all().await?.len();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            stored,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.catalog.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::document())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: libris_db::schema::CREATE_BOOKS,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(books: Arc<dyn BookRepository>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(books))
}
