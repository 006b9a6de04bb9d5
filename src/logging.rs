//! Run log setup using `tracing` and `tracing-subscriber`.
//!
//! Events are appended as plain text lines to the log file. The subscriber is
//! installed for the current thread only and removed when the returned guard
//! is dropped, so the log file is released on every exit path out of `main`.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing::subscriber::DefaultGuard;
use tracing::Level;
use tracing_subscriber::{filter::Directive, fmt, layer::SubscriberExt, EnvFilter};

/// Opens `path` for appending and routes `tracing` events to it.
///
/// `RUST_LOG` may add directives, but this crate's own events at `level`
/// and above are always kept.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(path: &Path, level: Level) -> io::Result<DefaultGuard> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    install(path, build_env_filter(directives.as_deref(), level)?)
}

fn install(path: &Path, filter: EnvFilter) -> io::Result<DefaultGuard> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false);
    let subscriber = tracing_subscriber::registry().with(filter).with(layer);

    Ok(tracing::subscriber::set_default(subscriber))
}

fn build_env_filter(directives: Option<&str>, level: Level) -> io::Result<EnvFilter> {
    let level = level.as_str().to_lowercase();
    let floor: Directive = format!("{}={level}", env!("CARGO_CRATE_NAME"))
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let filter = match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::new(level),
    };
    Ok(filter.add_directive(floor))
}
