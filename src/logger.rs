use std::{io, path::Path, sync::OnceLock};
use tracing_subscriber::{EnvFilter, fmt};

static GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Send `tracing` output to `path`, once per process.
/// - `filter`: e.g. "info", "autochess=debug,moves=info"
///
/// `RUST_LOG` wins over `filter` when set. Later calls do nothing.
pub fn init_logging<P: AsRef<Path>>(path: P, filter: &str) -> io::Result<()> {
    if GUARD.get().is_some() {
        return Ok(());
    }
    let path = path.as_ref();
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    // Flushes on drop, so it lives as long as the process.
    if GUARD.set(guard).is_err() {
        return Ok(());
    }

    let env_filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_writer(non_blocking)
        .finish();

    // Someone else may own the global subscriber already (tests).
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}
