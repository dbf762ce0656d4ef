use anyhow::Context;
use libris_app::Application;
use libris_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load Libris settings")?;
    libris_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        backend = ?settings.database.backend,
        "libris-app bootstrap starting"
    );

    let app = Application::build(settings).await?;
    app.run(libris_http::shutdown_signal()).await
}
