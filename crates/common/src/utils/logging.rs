use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber once per process.
/// - Respects `RUST_LOG` if set
/// - Falls back to info for the app plus request logs from `tower_http`
/// - Writes to stdout for consistent container logging behavior
pub fn init_logging_default() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info,service=info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(|| io::stdout())
        .try_init();
}
