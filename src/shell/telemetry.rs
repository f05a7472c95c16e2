use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG` wins when set; otherwise `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}
