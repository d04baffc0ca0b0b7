//! Subscriber setup shared by the binaries

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-d` debug level
pub fn level_for(debug: u8) -> &'static str {
    match debug {
        1 => "info",
        2 => "debug",
        _ => "warn",
    }
}

/// Install a stderr fmt subscriber; `RUST_LOG` wins when set
pub fn init(debug: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(debug)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
