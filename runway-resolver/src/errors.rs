// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by runway-resolver.

use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

/// A diagnostic recorded while loading an optional configuration layer.
///
/// Layer loading is best-effort: a missing or malformed file degrades to an
/// empty mapping and never fails the caller. The diagnostic is carried
/// alongside the (empty) result so the caller can surface it once.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LayerDiagnostic {
    /// The file exists but could not be read.
    #[error("failed to read config file `{path}`")]
    Unreadable {
        /// The path to the config file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },

    /// The file was read but is not a JSON object.
    #[error("failed to parse config file `{path}`")]
    Malformed {
        /// The path to the config file.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        error: serde_json::Error,
    },
}

/// An error that occurred while synthesizing a runner page.
///
/// These are the only failures that cross the resolver boundary: everything
/// expected (missing optional files, empty test lists, invalid runner paths)
/// degrades with logged diagnostics instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthesisError {
    /// The runner page template failed to compile.
    #[error("failed to compile the runner page template")]
    Template(#[source] Box<handlebars::TemplateError>),

    /// The runner page template failed to render.
    #[error("failed to render the runner page")]
    Render(#[source] Box<handlebars::RenderError>),

    /// The rendered runner page could not be written out.
    #[error("failed to write runner page to `{path}`")]
    Write {
        /// The path the runner page was being written to.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: io::Error,
    },
}

impl From<handlebars::TemplateError> for SynthesisError {
    fn from(error: handlebars::TemplateError) -> Self {
        Self::Template(Box::new(error))
    }
}

impl From<handlebars::RenderError> for SynthesisError {
    fn from(error: handlebars::RenderError) -> Self {
        Self::Render(Box::new(error))
    }
}
