use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

/// Log file name inside the data dir
pub const LOG_FILE: &str = "carebook.log";

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "CAREBOOK_LOG";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Non-blocking writer appending to `<data_dir>/carebook.log`. Lines are
/// flushed by a worker thread until the guard is dropped.
fn file_writer(data_dir: &Path) -> (NonBlocking, WorkerGuard) {
    let file_appender = tracing_appender::rolling::never(data_dir, LOG_FILE);
    tracing_appender::non_blocking(file_appender)
}

/// Route tracing output to `<data_dir>/carebook.log`. The terminal belongs to
/// the TUI, so nothing goes to stderr. Keep the returned guard alive until
/// exit; dropping it flushes and stops the writer. `None` means a subscriber
/// was already installed.
pub fn init_file_logging(data_dir: &Path) -> Option<WorkerGuard> {
    let (writer, guard) = file_writer(data_dir);
    match tracing_subscriber::fmt()
        .with_env_filter(env_filter("carebook=info"))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
    {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

/// Route tracing output to stderr for CLI commands (warnings and up by default)
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("carebook=warn"))
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn file_writer_appends_to_log_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LOG_FILE), "earlier\n").unwrap();

        let (mut writer, guard) = file_writer(dir.path());
        writer.write_all(b"saved MED-1\n").unwrap();
        drop(guard);

        let content = std::fs::read_to_string(dir.path().join(LOG_FILE)).unwrap();
        assert_eq!(content, "earlier\nsaved MED-1\n");
    }
}
