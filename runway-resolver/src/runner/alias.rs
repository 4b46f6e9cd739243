// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module alias resolution for the generated runner page.

use camino::Utf8Path;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

/// An ordered short-name-to-module-path mapping, embedded in the runner
/// page for module resolution at test time.
pub type AliasMap = IndexMap<String, String>;

/// Which side wins when a package-declared dependency collides with a
/// built-in alias.
///
/// The observed behavior of the original overlay order is that built-ins
/// win; that is kept as the default, but the precedence is a named policy
/// rather than a hidden overlay order so callers can flip it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AliasPrecedence {
    /// Built-in aliases override package-declared dependencies.
    #[default]
    BuiltinWins,
    /// Package-declared dependencies override built-in aliases.
    PackageWins,
}

/// The fixed built-in alias table.
pub fn builtin_aliases() -> AliasMap {
    [
        ("$", "gallery/jquery/1.7.2/jquery"),
        ("jquery", "gallery/jquery/1.7.2/jquery"),
        ("expect", "gallery/expect/0.2.0/expect"),
        ("sinon", "gallery/sinon/1.6.0/sinon"),
        ("event-simulate", "arale/event-simulate/1.0.0/event-simulate"),
    ]
    .into_iter()
    .map(|(name, path)| (name.to_owned(), path.to_owned()))
    .collect()
}

#[derive(Debug, Default, Deserialize)]
struct PackageMetadata {
    #[serde(default)]
    dependencies: AliasMap,
}

/// Builds the alias mapping for a runner page generated in `tests_dir`.
///
/// Package metadata is looked up one level above the tests directory; a
/// missing or unparsable file contributes no dependencies. Dependencies not
/// named in the built-in table pass through unchanged.
pub fn resolve_aliases(tests_dir: &Utf8Path, precedence: AliasPrecedence) -> AliasMap {
    let dependencies = package_dependencies(tests_dir);
    let (base, overlay) = match precedence {
        AliasPrecedence::BuiltinWins => (dependencies, builtin_aliases()),
        AliasPrecedence::PackageWins => (builtin_aliases(), dependencies),
    };

    let mut alias = base;
    for (name, path) in overlay {
        alias.insert(name, path);
    }
    alias
}

fn package_dependencies(tests_dir: &Utf8Path) -> AliasMap {
    let pkg_path = tests_dir.join("..").join("package.json");
    let contents = match std::fs::read_to_string(&pkg_path) {
        Ok(contents) => contents,
        Err(_) => {
            debug!("no package metadata at `{pkg_path}`");
            return AliasMap::new();
        }
    };

    match serde_json::from_str::<PackageMetadata>(&contents) {
        Ok(pkg) => pkg.dependencies,
        Err(error) => {
            warn!("failed to parse package metadata at `{pkg_path}`: {error}");
            AliasMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::tempdir;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn builtins_win_on_collision_by_default() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path().join("test");
        fs::create_dir(&tests_dir).expect("created tests dir");
        fs::write(
            dir.path().join("package.json"),
            indoc! {r#"
                {
                    "dependencies": {
                        "jquery": "2.0.0",
                        "underscore": "1.4.4"
                    }
                }
            "#},
        )
        .expect("wrote package.json");

        let alias = resolve_aliases(&tests_dir, AliasPrecedence::default());
        assert_eq!(
            alias.get("jquery").map(String::as_str),
            Some("gallery/jquery/1.7.2/jquery")
        );
        // Dependencies not named in the built-in table pass through.
        assert_eq!(alias.get("underscore").map(String::as_str), Some("1.4.4"));
        // All other built-ins are present.
        for name in ["$", "expect", "sinon", "event-simulate"] {
            assert!(alias.contains_key(name), "missing built-in `{name}`");
        }
    }

    #[test]
    fn package_wins_when_asked_to() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path().join("test");
        fs::create_dir(&tests_dir).expect("created tests dir");
        fs::write(
            dir.path().join("package.json"),
            r#"{ "dependencies": { "jquery": "2.0.0" } }"#,
        )
        .expect("wrote package.json");

        let alias = resolve_aliases(&tests_dir, AliasPrecedence::PackageWins);
        assert_eq!(alias.get("jquery").map(String::as_str), Some("2.0.0"));
    }

    #[test]
    fn missing_metadata_yields_builtins_only() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path().join("test");
        fs::create_dir(&tests_dir).expect("created tests dir");

        let alias = resolve_aliases(&tests_dir, AliasPrecedence::default());
        assert_eq!(alias, builtin_aliases());
    }

    #[test]
    fn unparsable_metadata_yields_builtins_only() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path().join("test");
        fs::create_dir(&tests_dir).expect("created tests dir");
        fs::write(dir.path().join("package.json"), "not json").expect("wrote package.json");

        let alias = resolve_aliases(&tests_dir, AliasPrecedence::default());
        assert_eq!(alias, builtin_aliases());
    }
}
