use tracing_subscriber::EnvFilter;

/// Environment variable that forces debug logging regardless of `RUST_LOG`.
pub const DEBUG_ENV: &str = "TILE_INSPECTOR_DEBUG";

/// Initialize tracing and bridge `log` to `tracing`.
/// Calling this multiple times is safe (subsequent attempts are ignored where possible).
pub fn init_tracing(enable_debug: bool) {
    let _ = tracing_log::LogTracer::init();

    let env_filter = if enable_debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_names(false)
        .try_init()
        .ok();
}

pub fn debug_requested() -> bool {
    std::env::var_os(DEBUG_ENV).is_some()
}
