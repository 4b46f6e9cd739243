// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The runner resolution state machine.

use crate::{
    errors::SynthesisError,
    helpers::absolutize,
    runner::{RunnerSynthesizer, find_tests_dir},
};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, error};

/// Conventional runner file names searched for inside the tests directory,
/// in priority order.
const RUNNER_FILE_NAMES: &[&str] = &["runner.html", "index.html"];

/// The states of runner resolution.
///
/// Existence and validity checks are modeled as explicit states rather than
/// nested conditionals so each branch is independently testable.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunnerState {
    /// No runner was specified and none could be discovered or synthesized.
    NoRunnerSpecified,
    /// A runner was specified by the user but has not been checked yet.
    RunnerSpecified,
    /// The runner exists and looks like a runner page.
    RunnerValid,
    /// The specified runner is missing or is not an HTML file. The resolved
    /// path is still used, best-effort.
    RunnerInvalid,
    /// A rebuild of an existing runner was requested.
    RebuildRequested,
    /// The runner page was synthesized by runway.
    Synthesized,
}

/// The runner-related inputs of a resolved client config.
#[derive(Clone, Debug, Default)]
pub struct RunnerRequest<'a> {
    /// The user-specified runner page, if any.
    pub runner: Option<&'a Utf8Path>,
    /// Explicit test scripts, if any, as written by the user.
    pub tests: Option<&'a [String]>,
    /// Rebuild the runner page in place even if it exists.
    pub overwrite: bool,
}

/// The outcome of runner resolution.
#[derive(Clone, Debug)]
pub struct RunnerResolution {
    /// The terminal state of the resolution.
    pub state: RunnerState,
    /// The absolute runner path. `None` only in the degraded case where no
    /// runner was specified and no tests directory could be found.
    pub runner: Option<Utf8PathBuf>,
    /// The tests directory, when discovery ran or a rebuild derived one.
    pub tests_dir: Option<Utf8PathBuf>,
    /// True if the runner page was synthesized from scratch.
    pub auto_runner: bool,
}

/// Resolves the runner page for a session.
///
/// Expected failure conditions (missing specified runner, wrong extension,
/// no tests directory) are reported through the log and resolution
/// continues with best-effort state; only synthesis failures (template
/// rendering, writing the page) are returned as errors.
pub fn resolve_runner(
    cwd: &Utf8Path,
    request: &RunnerRequest<'_>,
    synth: &RunnerSynthesizer,
) -> Result<RunnerResolution, SynthesisError> {
    let explicit_tests: Option<Vec<Utf8PathBuf>> = request.tests.map(|tests| {
        tests
            .iter()
            .map(|test| absolutize(cwd, Utf8Path::new(test)))
            .collect()
    });

    let (state, runner, tests_dir) = match request.runner {
        Some(runner) => {
            debug!("specified runner `{runner}`");
            let resolved = absolutize(cwd, runner);
            let state = check_runner(&resolved);
            (state, Some(resolved), None)
        }
        None => {
            debug!("no runner specified, will look for one");
            match find_tests_dir(cwd) {
                Some(tests_dir) => {
                    let found = find_existing_runner(&tests_dir);
                    let state = if found.is_some() {
                        RunnerState::RunnerValid
                    } else {
                        RunnerState::NoRunnerSpecified
                    };
                    (state, found, Some(tests_dir))
                }
                // Discovery already reported the error; synthesis cannot
                // proceed without a tests directory.
                None => (RunnerState::NoRunnerSpecified, None, None),
            }
        }
    };

    match runner {
        Some(runner) if request.overwrite => {
            // Rebuild in place, regardless of the validity check above. A
            // specified runner has no discovered tests directory; its parent
            // serves as one.
            debug!("overwriting existing runner `{runner}`");
            let mut state = RunnerState::RebuildRequested;
            let tests_dir =
                tests_dir.or_else(|| runner.parent().map(Utf8Path::to_path_buf));
            match &tests_dir {
                Some(dir) => {
                    synth.create_runner(dir, explicit_tests.as_deref(), Some(&runner))?;
                    state = RunnerState::Synthesized;
                }
                None => error!("cannot rebuild runner `{runner}`: no tests directory"),
            }
            Ok(RunnerResolution {
                state,
                runner: Some(runner),
                tests_dir,
                auto_runner: false,
            })
        }
        Some(runner) => Ok(RunnerResolution {
            state,
            runner: Some(runner),
            tests_dir,
            auto_runner: false,
        }),
        None => match tests_dir {
            Some(tests_dir) => {
                let runner = synth.create_runner(&tests_dir, explicit_tests.as_deref(), None)?;
                debug!("created runner `{runner}`");
                Ok(RunnerResolution {
                    state: RunnerState::Synthesized,
                    runner: Some(runner),
                    tests_dir: Some(tests_dir),
                    auto_runner: true,
                })
            }
            None => Ok(RunnerResolution {
                state: RunnerState::NoRunnerSpecified,
                runner: None,
                tests_dir: None,
                auto_runner: false,
            }),
        },
    }
}

/// Checks a specified runner path for existence and the expected markup
/// extension. Both failures are reported but non-fatal: the resolved path is
/// used either way.
fn check_runner(resolved: &Utf8Path) -> RunnerState {
    if !resolved.exists() {
        error!("runner `{resolved}` not found");
        RunnerState::RunnerInvalid
    } else if resolved.extension() != Some("html") {
        error!("runner `{resolved}` is not a valid runner file");
        RunnerState::RunnerInvalid
    } else {
        RunnerState::RunnerValid
    }
}

/// Searches `tests_dir` for a conventional runner file.
fn find_existing_runner(tests_dir: &Utf8Path) -> Option<Utf8PathBuf> {
    for name in RUNNER_FILE_NAMES {
        let candidate = tests_dir.join(name);
        if candidate.exists() {
            debug!("found runner `{candidate}`");
            return Some(candidate);
        }
    }
    debug!("no runner found in `{tests_dir}`");
    None
}
