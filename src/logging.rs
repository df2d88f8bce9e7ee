use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TYPIST_LOG";
pub const LOG_FILE: &str = "typist.log";

/// Default filter when `TYPIST_LOG` is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "typist=debug"
    } else {
        "typist=info"
    }
}

/// Route tracing output to `<dir>/typist.log`; the terminal belongs to the TUI.
/// Keep the guard alive until exit or buffered lines are lost.
pub fn init(dir: &Path, verbose: bool) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // a second init (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(guard)
}
