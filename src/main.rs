//! NeuroAI: Clinical EEG analytics dashboard
//!
//! Main entry point for the terminal application.

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use neuroai::adapters::sanitize::SanitizingMakeWriter;
use neuroai::adapters::{HttpBackend, MemoryStore, SqliteStore};
use neuroai::ports::KeyValueStore;
use neuroai::tui::App;
use neuroai::AppConfig;

fn main() -> Result<()> {
    let mut config = AppConfig::from_env();
    if std::env::args().skip(1).any(|arg| arg == "--ephemeral") {
        config.ephemeral = true;
    }

    // Logs written to the terminal would corrupt the alternate screen, so an
    // interactive session logs to a file unless told otherwise.
    let interactive = std::io::stdout().is_terminal();
    let (writer, _guard) = if config.log_mode.use_file(interactive) {
        if let Some(parent) = config.log_file.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting NeuroAI...");

    let backend = Arc::new(
        HttpBackend::new(config.api_url.clone(), config.api_timeout)
            .context("Failed to build the backend client")?,
    );

    if config.ephemeral {
        tracing::info!("Session storage is in memory only");
        run(Arc::new(MemoryStore::new()), backend, &config)?;
    } else {
        let store = SqliteStore::new(&config.store_path)
            .with_context(|| format!("Failed to open session store {:?}", config.store_path))?;
        run(Arc::new(store), backend, &config)?;
    }

    tracing::info!("NeuroAI shutdown complete.");
    Ok(())
}

fn run<S: KeyValueStore>(
    storage: Arc<S>,
    backend: Arc<HttpBackend>,
    config: &AppConfig,
) -> Result<()> {
    let mut app = App::new(storage, backend, &config.start_route);
    app.run()
}
