//! Catalog storage for Libris: the `BookRepository` abstraction, its SQLite
//! and in-memory backends, and migration tooling.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use libris_kernel::settings::{DatabaseBackend, DatabaseSettings};
use libris_kernel::Migration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod memory;
pub mod model;
pub mod repository;
pub mod schema;
pub mod sqlite;

pub use memory::InMemoryBookRepository;
pub use model::{Book, BookDraft};
pub use repository::{BookRepository, StoreError, StoreResult};
pub use sqlite::SqliteBookRepository;

/// A connected storage backend.
#[derive(Clone)]
pub enum Database {
    Sqlite(SqlitePool),
    Memory(InMemoryBookRepository),
}

impl Database {
    /// Connect to the backend selected in settings.
    pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        match settings.backend {
            DatabaseBackend::Memory => {
                tracing::info!(target: "libris-db", "using in-memory catalog store");
                Ok(Database::Memory(InMemoryBookRepository::new()))
            }
            DatabaseBackend::Sqlite => {
                let options = SqliteConnectOptions::from_str(&settings.url)
                    .with_context(|| format!("invalid SQLite url '{}'", settings.url))?
                    .create_if_missing(true);

                // Every connection to `:memory:` opens its own empty database, so
                // pin a single connection and never let the pool recycle it.
                let pool_options = if settings.url.contains(":memory:") {
                    SqlitePoolOptions::new()
                        .max_connections(1)
                        .min_connections(1)
                        .idle_timeout(None::<Duration>)
                        .max_lifetime(None::<Duration>)
                } else {
                    SqlitePoolOptions::new().max_connections(settings.max_connections)
                };

                let pool = pool_options
                    .connect_with(options)
                    .await
                    .with_context(|| format!("failed to open SQLite database '{}'", settings.url))?;

                tracing::info!(target: "libris-db", url = %settings.url, "connected to SQLite");
                Ok(Database::Sqlite(pool))
            }
        }
    }

    /// Apply module migrations that have not run yet, in the order given.
    ///
    /// Returns how many migrations were applied. The in-memory backend has no
    /// schema and applies nothing.
    pub async fn migrate(&self, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
        let pool = match self {
            Database::Memory(_) => {
                tracing::debug!(target: "libris-db", "in-memory store needs no migrations");
                return Ok(0);
            }
            Database::Sqlite(pool) => pool,
        };

        sqlx::raw_sql(schema::CREATE_MIGRATIONS)
            .execute(pool)
            .await
            .context("failed to create migration bookkeeping table")?;

        let mut applied = 0;
        for (module, migration) in migrations {
            let already: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM _libris_migrations WHERE module = ? AND id = ?",
            )
            .bind(module)
            .bind(migration.id)
            .fetch_one(pool)
            .await?;

            if already > 0 {
                tracing::debug!(target: "libris-db", %module, id = migration.id, "migration already applied");
                continue;
            }

            let mut tx = pool.begin().await?;
            sqlx::raw_sql(migration.up)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
            sqlx::query("INSERT INTO _libris_migrations (module, id) VALUES (?, ?)")
                .bind(module)
                .bind(migration.id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            tracing::info!(target: "libris-db", %module, id = migration.id, "applied migration");
            applied += 1;
        }

        Ok(applied)
    }

    /// The catalog store on this backend.
    pub fn books(&self) -> Arc<dyn BookRepository> {
        match self {
            Database::Sqlite(pool) => Arc::new(SqliteBookRepository::new(pool.clone())),
            Database::Memory(repo) => Arc::new(repo.clone()),
        }
    }
}
