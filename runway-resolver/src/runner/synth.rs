// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synthesis of the runner page.

use crate::{
    errors::SynthesisError,
    helpers::relative_dep_path,
    runner::{
        AliasPrecedence, DefaultStyleClassifier, StyleClassifier, find_tests, resolve_aliases,
    },
};
use camino::{Utf8Path, Utf8PathBuf};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, error, warn};

const TEMPLATE_NAME: &str = "runner";

/// The data a runner page template is rendered with.
///
/// `alias` and `use_deps` are pre-encoded JSON strings, embedded in the page
/// verbatim.
#[derive(Debug, Serialize)]
struct RunnerData {
    #[serde(rename = "testStyle")]
    test_style: String,
    alias: String,
    #[serde(rename = "useDeps")]
    use_deps: String,
}

/// Synthesizes runner pages by rendering a template with discovery and
/// alias-resolution output.
///
/// The synthesizer is the only component that writes the runner artifact.
pub struct RunnerSynthesizer {
    registry: Handlebars<'static>,
    classifier: Box<dyn StyleClassifier>,
    precedence: AliasPrecedence,
}

impl RunnerSynthesizer {
    /// The default runner page template, shipped with the crate.
    pub const DEFAULT_TEMPLATE: &'static str = include_str!("../../static/runner.html");

    /// Creates a synthesizer using the default template, classifier and
    /// alias precedence.
    pub fn new() -> Result<Self, SynthesisError> {
        Self::with_template(Self::DEFAULT_TEMPLATE)
    }

    /// Creates a synthesizer rendering the given template string.
    pub fn with_template(template: &str) -> Result<Self, SynthesisError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(TEMPLATE_NAME, template)?;
        Ok(Self {
            registry,
            classifier: Box::new(DefaultStyleClassifier),
            precedence: AliasPrecedence::default(),
        })
    }

    /// Replaces the test style classifier.
    pub fn with_classifier(mut self, classifier: Box<dyn StyleClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replaces the alias precedence policy.
    pub fn with_precedence(mut self, precedence: AliasPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Creates a runner page for `tests_dir`, returning its path.
    ///
    /// The target defaults to `runner.html` inside `tests_dir`; a file
    /// already at the target is overwritten. If `explicit_tests` are given
    /// (as absolute paths), only those that exist on disk are used, with a
    /// warning per missing entry and an error if none survive -- synthesis
    /// still proceeds with an empty list in that case. Otherwise test
    /// discovery supplies the list.
    pub fn create_runner(
        &self,
        tests_dir: &Utf8Path,
        explicit_tests: Option<&[Utf8PathBuf]>,
        target: Option<&Utf8Path>,
    ) -> Result<Utf8PathBuf, SynthesisError> {
        let target = target.map_or_else(|| tests_dir.join("runner.html"), Utf8Path::to_path_buf);

        let tests = match explicit_tests {
            Some(explicit) => {
                debug!("using explicitly specified test scripts");
                let tests: Vec<_> = explicit
                    .iter()
                    .filter(|file| {
                        let exists = file.exists();
                        if !exists {
                            warn!("test script `{file}` not found");
                        }
                        exists
                    })
                    .cloned()
                    .collect();
                if tests.is_empty() {
                    error!("none of the specified test scripts exist");
                }
                tests
            }
            None => {
                debug!("searching for test scripts in `{tests_dir}`");
                find_tests(tests_dir)
            }
        };

        let test_style = self.classifier.classify(&tests);
        let deps: Vec<_> = tests
            .iter()
            .map(|test| relative_dep_path(tests_dir, test))
            .collect();
        let use_deps = serde_json::to_string(&deps).expect("a list of strings serializes");
        let alias = resolve_aliases(tests_dir, self.precedence);
        let alias = serde_json::to_string(&alias).expect("a map of strings serializes");

        let data = RunnerData {
            test_style: test_style.to_string(),
            alias,
            use_deps,
        };
        let page = self.registry.render(TEMPLATE_NAME, &data)?;
        std::fs::write(&target, page).map_err(|error| SynthesisError::Write {
            path: target.clone(),
            error,
        })?;
        debug!("rendered runner page `{target}`");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::tempdir;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn synthesizer() -> RunnerSynthesizer {
        RunnerSynthesizer::new().expect("default template compiles")
    }

    #[test]
    fn discovered_tests_land_in_the_page_verbatim() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path();
        fs::write(tests_dir.join("a.test.js"), "").expect("wrote file");
        fs::write(tests_dir.join("b.spec.js"), "").expect("wrote file");

        let runner = synthesizer()
            .create_runner(tests_dir, None, None)
            .expect("synthesized runner");
        assert_eq!(runner, tests_dir.join("runner.html"));

        let page = fs::read_to_string(&runner).expect("read runner page");
        // The JSON-encoded dependency list is embedded without re-escaping.
        assert!(
            page.contains(r#"["./a.test.js","./b.spec.js"]"#),
            "unexpected page contents:\n{page}"
        );
        assert!(page.contains("mocha.setup('bdd')"));
        assert!(page.contains(r#""jquery":"gallery/jquery/1.7.2/jquery""#));
    }

    #[test]
    fn explicit_tests_are_filtered_to_existing_files() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path();
        fs::write(tests_dir.join("a.test.js"), "").expect("wrote file");

        let explicit = vec![
            tests_dir.join("a.test.js"),
            tests_dir.join("missing.test.js"),
        ];
        let runner = synthesizer()
            .create_runner(tests_dir, Some(&explicit), None)
            .expect("synthesized runner");

        let page = fs::read_to_string(&runner).expect("read runner page");
        assert!(page.contains(r#"["./a.test.js"]"#));
        assert!(!page.contains("missing.test.js"));
    }

    #[test]
    fn all_missing_explicit_tests_produce_an_empty_list() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path();

        let explicit = vec![tests_dir.join("missing.test.js")];
        let runner = synthesizer()
            .create_runner(tests_dir, Some(&explicit), None)
            .expect("synthesized runner");

        let page = fs::read_to_string(&runner).expect("read runner page");
        assert!(page.contains("seajs.use([],"));
    }

    #[test]
    fn explicit_target_is_overwritten_in_place() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path();
        fs::write(tests_dir.join("a.test.js"), "").expect("wrote file");
        let target = tests_dir.join("index.html");
        fs::write(&target, "stale contents").expect("wrote stale runner");

        let runner = synthesizer()
            .create_runner(tests_dir, None, Some(&target))
            .expect("synthesized runner");
        assert_eq!(runner, target);

        let page = fs::read_to_string(&runner).expect("read runner page");
        assert!(!page.contains("stale contents"));
        assert!(page.contains("./a.test.js"));
    }

    #[test]
    fn custom_template_round_trips_use_deps() {
        let dir = tempdir().expect("created temp dir");
        let tests_dir = dir.path();
        fs::write(tests_dir.join("it's a \"test\".js"), "").expect("wrote file");

        let synth =
            RunnerSynthesizer::with_template("{{{useDeps}}}").expect("template compiles");
        let runner = synth
            .create_runner(tests_dir, None, None)
            .expect("synthesized runner");

        let page = fs::read_to_string(&runner).expect("read runner page");
        // The page is exactly the JSON encoding, quotes escaped once.
        let deps: Vec<String> = serde_json::from_str(&page).expect("page parses as JSON");
        assert_eq!(deps, vec![r#"./it's a "test".js"#.to_owned()]);
    }
}
