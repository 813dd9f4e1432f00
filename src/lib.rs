//! # iplookup
//!
//! IPv4 geolocation with a sequential provider fallback
//! (ipapi.co → ipwho.is → ipinfo.io), merged with placeholder personal
//! data for display.
//!
//! - [`lookup`]: validation, provider adapters and the fallback resolver
//! - [`mock`]: random placeholder identity
//! - [`report`]: ordered display fields and user-facing messages
//! - [`server`]: axum server for the browser UI

pub mod config;
pub mod lookup;
pub mod mock;
pub mod report;
pub mod server;

/// Install the stderr tracing subscriber. `RUST_LOG` overrides `default_level`.
pub fn init_logging(default_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
