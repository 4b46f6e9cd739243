// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for runway-resolver.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value;

/// Returns true if a JSON value counts as "set" for override purposes.
///
/// Follows the truthiness rules of the config file format: `null`, `false`,
/// `0` and the empty string are all treated as absent.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Resolves `path` against `base` if it is relative.
pub(crate) fn absolutize(base: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_owned()
    } else {
        base.join(path)
    }
}

/// Computes the `./`-prefixed path of `file` relative to `dir`, as embedded
/// in the generated runner page.
pub(crate) fn relative_dep_path(dir: &Utf8Path, file: &Utf8Path) -> String {
    let rel = pathdiff::diff_utf8_paths(file, dir).unwrap_or_else(|| file.to_owned());
    format!("./{rel}")
}
