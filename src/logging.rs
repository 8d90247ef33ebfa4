/// File logging.
///
/// The terminal belongs to the view, so log lines go to a file through a
/// non-blocking writer. `RUST_LOG` overrides the configured level.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber. Keep the returned guard alive until exit
/// or buffered lines are lost.
pub fn init(config: &LoggingConfig) -> Option<WorkerGuard> {
    let path = config.file.as_ref()?;
    let file_name = path.file_name()?;
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| std::path::Path::new("."));

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init();

    if let Err(e) = installed {
        eprintln!("Warning: logging disabled: {e}");
        return None;
    }
    Some(guard)
}
