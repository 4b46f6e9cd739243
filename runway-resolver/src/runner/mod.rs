// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Runner page resolution for runway.
//!
//! Given a resolved configuration, the runner page is either:
//!
//! * accepted as specified by the user (with its existence and extension
//!   checked),
//! * discovered inside the tests directory (`runner.html`, then
//!   `index.html`),
//! * rebuilt in place when the overwrite flag is set, or
//! * synthesized from scratch when nothing was specified and nothing was
//!   discovered.
//!
//! The decision logic is modeled as an explicit state machine in
//! [`resolve_runner`], so each branch is independently testable. Synthesis
//! assembles test discovery and alias resolution output into template data
//! and renders an HTML page.

mod alias;
mod discovery;
mod resolve;
mod synth;

pub use alias::*;
pub use discovery::*;
pub use resolve::*;
pub use synth::*;
