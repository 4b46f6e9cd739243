// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use runway_cli::RunwayApp;

fn main() -> Result<()> {
    color_eyre::install()?;
    runway_cli::init_logging();

    let app = RunwayApp::parse();
    app.exec()
}
