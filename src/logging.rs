//! Diagnostic logging setup.
//!
//! Library code logs through `tracing`; the binary installs a subscriber
//! writing to stderr so progress lines on stdout stay clean.
//!
//! `RUST_LOG` takes precedence over the verbosity flag:
//! ```bash
//! RUST_LOG=cdgraph=debug cdgraph --name project
//! ```

use std::sync::Once;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: Once = Once::new();

/// Filter directive for a `-v` count: 0 → warn, 1 → info, 2+ → debug.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize logging. Only the first call takes effect.
pub fn init(verbosity: u8) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(level_for_verbosity(verbosity))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .with_filter(filter);

        // A subscriber may already be installed by an embedding application
        let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
    });
}
