//! Operational log output.
//!
//! Human-readable lines, prefixed with status glyphs by the call sites.
//! Warnings and errors go to stderr, everything else to stdout.  The level
//! is fixed at `info`; `RUST_LOG` is not consulted.

use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .or_else(std::io::stdout);

    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().compact().with_target(false).with_writer(writer))
        .init();
}

fn filter() -> EnvFilter {
    EnvFilter::new("info")
}
