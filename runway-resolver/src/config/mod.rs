// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for runway.
//!
//! Configuration is resolved by layering sources in a fixed precedence
//! order, lowest first:
//!
//! 1. built-in defaults,
//! 2. the global config file (`~/.config/runway/config.json`),
//! 3. the project config file (`runway-config.json` in the working
//!    directory),
//! 4. command-line overrides.
//!
//! Each layer may overwrite any key set by a prior layer; a layer
//! contributes nothing for keys it does not define, and merging never
//! removes a key. The file layers are loaded best-effort: a missing or
//! malformed file degrades to an empty layer with a logged warning rather
//! than failing resolution.

mod record;
mod resolver;
mod source;

pub use record::*;
pub use resolver::*;
pub use source::*;
