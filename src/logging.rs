use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// The TUI owns stdout and stderr; only log when `DEXTUI_LOG` names a file.
    FileOnly,
    /// Non-interactive commands log to stderr.
    Stderr,
}

/// Initialize tracing. Filtering follows `RUST_LOG`, defaulting to `info`.
pub fn init_tracing(target: LogTarget) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .init();
        }
        LogTarget::FileOnly => {
            let Some(log_path) = std::env::var("DEXTUI_LOG").ok() else {
                return;
            };
            let Ok(file) = std::fs::File::create(&log_path) else {
                eprintln!("Warning: Failed to create log file: {}", log_path);
                return;
            };
            let file_layer = fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_level(true);
            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .init();
        }
    }
}
