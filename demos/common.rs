// Shared by every demo binary; not all of them read required variables.
#![allow(dead_code)]

use std::io;

use tracing_subscriber::EnvFilter;

/// Log the client's request/response events; `RUST_LOG` overrides the level.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mitake=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

pub fn required_env(key: &str) -> Result<String, io::Error> {
    std::env::var(key).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{key} environment variable is required"),
        )
    })
}
