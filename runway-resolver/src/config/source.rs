// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort loading of configuration file layers.

use crate::{config::ConfigLayer, errors::LayerDiagnostic};
use camino::{Utf8Path, Utf8PathBuf};
use etcetera::{BaseStrategy, base_strategy::Xdg};
use std::io;

/// The name of the project config file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE_NAME: &str = "runway-config.json";

/// The result of loading an optional configuration layer.
///
/// Loading is best-effort by design: a malformed optional config file must
/// not block execution. The layer degrades to an empty mapping and the
/// problem is carried as a diagnostic for the caller to log -- never as an
/// error that halts resolution.
#[derive(Debug)]
pub struct LayerLoad {
    /// The loaded key-value mapping. Empty if the file is missing or could
    /// not be parsed.
    pub values: ConfigLayer,
    /// At most one diagnostic describing why the layer is empty.
    pub diagnostic: Option<LayerDiagnostic>,
}

impl LayerLoad {
    fn empty() -> Self {
        Self {
            values: ConfigLayer::new(),
            diagnostic: None,
        }
    }
}

/// Loads a configuration layer from a JSON file.
///
/// A missing file is not an error: optional config files are simply absent
/// in most projects. An unreadable or unparsable file produces an empty
/// layer with exactly one diagnostic attached.
pub fn load_layer(path: &Utf8Path) -> LayerLoad {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return LayerLoad::empty();
        }
        Err(error) => {
            return LayerLoad {
                values: ConfigLayer::new(),
                diagnostic: Some(LayerDiagnostic::Unreadable {
                    path: path.to_owned(),
                    error,
                }),
            };
        }
    };

    match serde_json::from_str::<ConfigLayer>(&contents) {
        Ok(values) => LayerLoad {
            values,
            diagnostic: None,
        },
        Err(error) => LayerLoad {
            values: ConfigLayer::new(),
            diagnostic: Some(LayerDiagnostic::Malformed {
                path: path.to_owned(),
                error,
            }),
        },
    }
}

/// Returns the path of the global config file
/// (`~/.config/runway/config.json`), or `None` if the home directory cannot
/// be determined or is not UTF-8.
pub fn global_config_path() -> Option<Utf8PathBuf> {
    let strategy = Xdg::new().ok()?;
    let path = strategy.config_dir().join("runway").join("config.json");
    Utf8PathBuf::try_from(path).ok()
}

/// Returns the path of the project config file within `cwd`.
pub fn project_config_path(cwd: &Utf8Path) -> Utf8PathBuf {
    cwd.join(PROJECT_CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::tempdir;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn missing_file_degrades_silently() {
        let dir = tempdir().expect("created temp dir");
        let load = load_layer(&dir.path().join("no-such-config.json"));
        assert!(load.values.is_empty());
        assert!(load.diagnostic.is_none());
    }

    #[test]
    fn valid_file_loads() {
        let dir = tempdir().expect("created temp dir");
        let path = dir.path().join("runway-config.json");
        std::fs::write(
            &path,
            indoc! {r#"
                {
                    "timeout": 10,
                    "browsers": ["chrome"]
                }
            "#},
        )
        .expect("wrote config");

        let load = load_layer(&path);
        assert!(load.diagnostic.is_none());
        assert_eq!(load.values.get("timeout"), Some(&json!(10)));
        assert_eq!(load.values.get("browsers"), Some(&json!(["chrome"])));
    }

    #[test]
    fn malformed_file_degrades_with_one_diagnostic() {
        let dir = tempdir().expect("created temp dir");
        let path = dir.path().join("runway-config.json");
        std::fs::write(&path, "{ not json").expect("wrote config");

        let load = load_layer(&path);
        assert!(load.values.is_empty());
        assert!(
            matches!(load.diagnostic, Some(LayerDiagnostic::Malformed { .. })),
            "expected a malformed-file diagnostic, got {:?}",
            load.diagnostic
        );
    }

    #[test]
    fn empty_file_degrades_with_one_diagnostic() {
        let dir = tempdir().expect("created temp dir");
        let path = dir.path().join("runway-config.json");
        std::fs::write(&path, "").expect("wrote config");

        let load = load_layer(&path);
        assert!(load.values.is_empty());
        assert!(load.diagnostic.is_some());
    }

    #[test]
    fn non_object_document_degrades() {
        let dir = tempdir().expect("created temp dir");
        let path = dir.path().join("runway-config.json");
        std::fs::write(&path, "[1, 2, 3]").expect("wrote config");

        let load = load_layer(&path);
        assert!(load.values.is_empty());
        assert!(load.diagnostic.is_some());
    }
}
