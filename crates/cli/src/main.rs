use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_app::Application;
use libris_kernel::settings::{DatabaseBackend, Settings};

/// Libris book catalog service
#[derive(Debug, Parser)]
#[command(name = "libris", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
    /// Print the effective configuration as JSON
    Config,
    /// List the HTTP paths the server exposes
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!(env = ?settings.environment, "libris serve");
            let app = Application::build(settings).await?;
            app.run(libris_http::shutdown_signal()).await
        }
        Command::Migrate => {
            let app = Application::assemble(settings).await?;
            let applied = app.migrate().await?;
            println!("applied {} migration(s)", applied);
            Ok(())
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        Command::Routes => {
            // Route listing needs the module set, not real storage
            let mut settings = settings;
            settings.database.backend = DatabaseBackend::Memory;

            let app = Application::assemble(settings).await?;
            let document =
                libris_http::router::collect_openapi(app.registry(), &app.settings().server.api_prefix);

            let paths = document["paths"]
                .as_object()
                .context("OpenAPI document has no paths")?;
            for (path, item) in paths {
                let methods: Vec<String> = item
                    .as_object()
                    .map(|ops| ops.keys().map(|m| m.to_uppercase()).collect())
                    .unwrap_or_default();
                println!("{:<28} {}", path, methods.join(","));
            }
            Ok(())
        }
    }
}
