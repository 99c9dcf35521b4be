use gonv_store::is_truthy;
use tracing_subscriber::EnvFilter;

/// Diagnostics go to standard error. `GONV_DEBUG` forces `debug`; otherwise
/// `RUST_LOG` applies, defaulting to `warn`.
pub fn init() {
    let debug = std::env::var("GONV_DEBUG").is_ok_and(|v| is_truthy(&v));
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(debug)
        .without_time()
        .try_init();
}
