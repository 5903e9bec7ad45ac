//! Tracing subscriber setup.
//!
//! Console output is always on, in `text` or `json` form. When `LOG_DIR` is
//! set, the same events are also written to a daily-rotated file through a
//! non-blocking writer.

use crate::config::Config;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "client-crud-api.log";

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held until
/// the process exits. It is `None` when file logging is disabled.
///
/// # Errors
///
/// Returns an error if `RUST_LOG` is not a valid filter directive or a global
/// subscriber is already installed.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&config.log_level)?;
    let json = config.log_format == "json";

    let (file_writer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    let text_layer = (!json).then(|| fmt::layer().with_target(true));
    let json_layer = json.then(|| fmt::layer().json().with_current_span(true));
    let file_layer = file_writer.map(|writer| fmt::layer().with_ansi(false).with_writer(writer));

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
