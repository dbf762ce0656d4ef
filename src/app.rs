//! Application bootstrap: storage, modules, migrations and serving.

use std::future::Future;

use anyhow::Context;
use axum::Router;
use libris_db::Database;
use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// A fully wired service, migrated and initialized, ready to serve
pub struct Application {
    settings: Settings,
    database: Database,
    registry: ModuleRegistry,
}

impl Application {
    /// Connect storage, register modules, apply migrations and run module init
    pub async fn build(settings: Settings) -> anyhow::Result<Self> {
        let app = Self::assemble(settings).await?;
        app.migrate().await?;

        let ctx = InitCtx {
            settings: &app.settings,
        };
        app.registry.init_all(&ctx).await?;

        Ok(app)
    }

    /// Connect storage and register modules without touching the schema
    pub async fn assemble(settings: Settings) -> anyhow::Result<Self> {
        let database = Database::connect(&settings.database)
            .await
            .context("failed to connect catalog storage")?;

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, &database)?;

        Ok(Self {
            settings,
            database,
            registry,
        })
    }

    /// Apply pending migrations of every registered module
    pub async fn migrate(&self) -> anyhow::Result<usize> {
        let migrations = self.registry.collect_migrations();
        let applied = self
            .database
            .migrate(&migrations)
            .await
            .context("failed to apply migrations")?;

        tracing::info!(applied, total = migrations.len(), "migrations complete");
        Ok(applied)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// The complete HTTP router, middleware included
    pub fn router(&self) -> Router {
        libris_http::build_router(&self.registry, &self.settings)
    }

    /// Start modules, serve until `shutdown` resolves, then stop modules
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
        };
        self.registry.start_all(&ctx).await?;

        let served = libris_http::start_server(&self.registry, &self.settings, shutdown).await;

        self.registry.stop_all().await?;
        served
    }
}
