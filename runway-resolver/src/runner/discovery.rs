// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discovery of the tests directory and the test scripts inside it.

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use tracing::{debug, error, warn};

/// Locates the directory likely to contain tests.
///
/// If the working directory itself is named with a `test`/`tests` suffix it
/// is used directly, regardless of any subdirectories. Otherwise a `test`
/// subdirectory is preferred, then `tests`. Returns `None` (with a reported
/// error) if nothing qualifies -- synthesis cannot proceed without a tests
/// directory, so the caller must handle absence.
pub fn find_tests_dir(cwd: &Utf8Path) -> Option<Utf8PathBuf> {
    let dir = if cwd
        .file_name()
        .is_some_and(|name| name.ends_with("test") || name.ends_with("tests"))
    {
        Some(cwd.to_owned())
    } else if cwd.join("test").is_dir() {
        Some(cwd.join("test"))
    } else if cwd.join("tests").is_dir() {
        Some(cwd.join("tests"))
    } else {
        None
    };

    match &dir {
        Some(dir) => debug!("found tests dir `{dir}`"),
        None => error!("no tests directory found under `{cwd}`"),
    }
    dir
}

/// Enumerates test scripts under `tests_dir`, recursively.
///
/// A test script is a `.js` file whose name contains `test` or `spec`,
/// case-insensitively. Entries within each directory are visited in name
/// order so the result is deterministic. An empty result is a configuration
/// failure and is reported as an error, not silently ignored.
pub fn find_tests(tests_dir: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut tests = Vec::new();
    walk(tests_dir, &mut tests);
    if tests.is_empty() {
        error!("no tests found in `{tests_dir}`");
    }
    tests
}

fn walk(dir: &Utf8Path, tests: &mut Vec<Utf8PathBuf>) {
    let entries = match dir.read_dir_utf8() {
        Ok(entries) => entries,
        Err(error) => {
            warn!("failed to read directory `{dir}`: {error}");
            return;
        }
    };

    let mut paths: Vec<_> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.into_path()),
            Err(error) => {
                warn!("failed to read an entry of `{dir}`: {error}");
                None
            }
        })
        .collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            walk(&path, tests);
        } else if is_test_script(&path) {
            tests.push(path);
        }
    }
}

fn is_test_script(path: &Utf8Path) -> bool {
    if !path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("js"))
    {
        return false;
    }
    let name = path.file_name().unwrap_or_default().to_ascii_lowercase();
    name.contains("test") || name.contains("spec")
}

/// The authoring convention of a set of test scripts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TestStyle {
    /// Behavior-driven (`describe`/`it`).
    Bdd,
    /// Test-driven (`suite`/`test`).
    Tdd,
}

impl TestStyle {
    /// Returns the style tag embedded in the runner page.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bdd => "bdd",
            Self::Tdd => "tdd",
        }
    }
}

impl fmt::Display for TestStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies the authoring convention of a set of test scripts.
///
/// Kept as a trait so future heuristics (inspecting script sources, say)
/// can be plugged in without changing callers.
pub trait StyleClassifier {
    /// Classifies `tests`, returning the style tag to embed in the runner
    /// page.
    fn classify(&self, tests: &[Utf8PathBuf]) -> TestStyle;
}

/// The default classifier. Always resolves to [`TestStyle::Bdd`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultStyleClassifier;

impl StyleClassifier for DefaultStyleClassifier {
    fn classify(&self, _tests: &[Utf8PathBuf]) -> TestStyle {
        TestStyle::Bdd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::tempdir;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn cwd_named_tests_wins_over_subdirs() {
        let dir = tempdir().expect("created temp dir");
        let cwd = dir.path().join("tests");
        fs::create_dir_all(cwd.join("test")).expect("created subdir");
        fs::create_dir_all(cwd.join("tests")).expect("created subdir");

        assert_eq!(find_tests_dir(&cwd), Some(cwd.clone()));
    }

    #[test]
    fn test_subdir_preferred_over_tests() {
        let dir = tempdir().expect("created temp dir");
        let cwd = dir.path().join("proj");
        fs::create_dir_all(cwd.join("test")).expect("created subdir");
        fs::create_dir_all(cwd.join("tests")).expect("created subdir");

        assert_eq!(find_tests_dir(&cwd), Some(cwd.join("test")));
    }

    #[test]
    fn tests_subdir_is_the_fallback() {
        let dir = tempdir().expect("created temp dir");
        let cwd = dir.path().join("proj");
        fs::create_dir_all(cwd.join("tests")).expect("created subdir");

        assert_eq!(find_tests_dir(&cwd), Some(cwd.join("tests")));
    }

    #[test]
    fn no_tests_dir_is_none() {
        let dir = tempdir().expect("created temp dir");
        let cwd = dir.path().join("proj");
        fs::create_dir_all(&cwd).expect("created dir");

        assert_eq!(find_tests_dir(&cwd), None);
    }

    #[test]
    fn finds_only_test_scripts() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path();
        fs::write(tests_dir.join("a.test.js"), "").expect("wrote file");
        fs::write(tests_dir.join("b.spec.js"), "").expect("wrote file");
        fs::write(tests_dir.join("helper.js"), "").expect("wrote file");
        fs::write(tests_dir.join("notes.txt"), "").expect("wrote file");

        let found = find_tests(tests_dir);
        assert_eq!(
            found,
            vec![tests_dir.join("a.test.js"), tests_dir.join("b.spec.js")]
        );
    }

    #[test]
    fn enumeration_recurses_into_subdirs() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path();
        fs::create_dir(tests_dir.join("unit")).expect("created subdir");
        fs::write(tests_dir.join("unit").join("c.spec.js"), "").expect("wrote file");
        fs::write(tests_dir.join("z.test.js"), "").expect("wrote file");

        let found = find_tests(tests_dir);
        assert_eq!(
            found,
            vec![
                tests_dir.join("unit").join("c.spec.js"),
                tests_dir.join("z.test.js"),
            ]
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path();
        fs::write(tests_dir.join("WidgetTest.JS"), "").expect("wrote file");

        let found = find_tests(tests_dir);
        assert_eq!(found, vec![tests_dir.join("WidgetTest.JS")]);
    }

    #[test]
    fn empty_dir_returns_empty_list() {
        let dir = tempdir().expect("created temp dir");
        assert!(find_tests(dir.path()).is_empty());
    }

    #[test]
    fn default_classifier_is_bdd() {
        let tests = vec![Utf8PathBuf::from("a.test.js")];
        assert_eq!(DefaultStyleClassifier.classify(&tests), TestStyle::Bdd);
    }
}
