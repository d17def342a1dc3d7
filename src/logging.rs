use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use crate::error::{Error, Result};

pub const LOG_FILE: &str = "hanzi-cards.log";

fn default_directives() -> &'static str {
    if cfg!(debug_assertions) {
        "hanzi_cards=debug,info"
    } else {
        "hanzi_cards=info,warn"
    }
}

/// Install a global subscriber writing to `dir/hanzi-cards.log`.
///
/// `RUST_LOG` overrides the default filter. Keep the returned guard alive for
/// the life of the process or buffered lines are lost.
pub fn init(dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives()));

    let file_layer = fmt::layer()
        .with_timer(fmt::time::ChronoLocal::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_target(true)
        .with_ansi(false)
        .with_writer(writer);

    registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(guard)
}
