use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "scanner.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Daily rolling appender under `log_dir`, created on demand.
fn file_appender(log_dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE)
        .build(log_dir)
}

/// Log to stderr and a daily rolling file under `log_dir`. Keep the returned
/// guard alive until exit or buffered file output is lost. Fails without
/// installing anything when the log directory is unusable.
pub fn init(log_dir: &Path) -> Result<WorkerGuard, InitError> {
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender(log_dir)?);

    let registry = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer),
        );

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = registry.try_init();

    Ok(guard)
}

/// Stderr-only logging for when the log file can't be opened.
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_log_dir_is_an_error() {
        let dir = Path::new("/proc/warranty-scanner-logs");
        assert!(file_appender(dir).is_err());
        assert!(init(dir).is_err());
    }

    #[test]
    fn log_dir_is_created() {
        let dir = std::env::temp_dir().join(format!("warranty-scanner-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        assert!(file_appender(&dir).is_ok());
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
