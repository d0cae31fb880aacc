//! Tracing initialization: one fmt layer (level, target, all fields) teed to
//! stdout and an append-mode log file.

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Installs the global tracing subscriber.
///
/// Console and log file share the same fmt layer output. The level comes from
/// RUST_LOG (e.g. info, debug, trace); unset falls back to `default_filter`.
/// Load .env first (e.g. dotenvy::dotenv()) if RUST_LOG lives there.
/// Span lifecycle events and thread ids are left out: the chat REPL prints to
/// the same stdout and per-call span noise drowns the prompt.
pub fn init_tracing(log_file_path: &str, default_filter: &str) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    let file = Arc::new(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let writer = io::stdout.and(file);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}
