// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The runway command-line interface.
//!
//! This crate is the external CLI layer over
//! [`runway_resolver`]: it parses command-line flags into a flat override
//! map and hands it to the resolver entry points, printing the resolved
//! configuration record as JSON.

mod dispatch;

pub use dispatch::RunwayApp;

use tracing_subscriber::EnvFilter;

/// Initializes logging to stderr. The filter is taken from `RUNWAY_LOG`,
/// defaulting to warnings and errors only.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("RUNWAY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
