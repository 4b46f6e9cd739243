// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [runway](https://crates.io/crates/runway-cli), a
//! cross-browser test session tool.
//!
//! This crate resolves the effective configuration for a test session by
//! layering global, project and command-line sources, and -- when no runner
//! page is supplied -- synthesizes one by discovering a tests directory,
//! enumerating test scripts, resolving module aliases from package metadata,
//! and rendering an HTML runner page from a template.

pub mod config;
pub mod errors;
mod helpers;
pub mod runner;
