// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    config::{
        ClientConfig, ConfigLayer, OverrideMap, ServerConfig, global_config_path, load_layer,
        project_config_path,
    },
    errors::SynthesisError,
    helpers::absolutize,
    runner::{RunnerRequest, RunnerSynthesizer, resolve_runner},
};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

/// The officially supported adapter names.
///
/// The list itself is maintained by the client side; it is carried here so
/// adapter values can be told apart from file paths.
pub const DEFAULT_ADAPTERS: &[&str] = &["mocha", "jasmine"];

/// Resolves effective session configuration from layered sources.
///
/// A resolver is constructed per invocation and owns no process-wide state:
/// the working directory, the default client host and the layer file
/// locations are all explicit. Entry points may be called in any order and
/// repeatedly; each call re-reads the file layers.
#[derive(Clone, Debug)]
pub struct ConfigResolver {
    cwd: Utf8PathBuf,
    client_host: String,
    adapters: Vec<String>,
    global_config: Option<Utf8PathBuf>,
    project_config: Utf8PathBuf,
}

impl ConfigResolver {
    /// Creates a resolver for the given working directory.
    ///
    /// `client_host` is the externally supplied default client host value
    /// (the machine's outward-facing network address). The global and
    /// project config files are looked up in their default locations.
    pub fn new(cwd: impl Into<Utf8PathBuf>, client_host: impl Into<String>) -> Self {
        let cwd = cwd.into();
        Self {
            global_config: global_config_path(),
            project_config: project_config_path(&cwd),
            cwd,
            client_host: client_host.into(),
            adapters: DEFAULT_ADAPTERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Overrides the global config file location. `None` skips the global
    /// layer entirely.
    pub fn with_global_config(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Overrides the project config file location.
    pub fn with_project_config(mut self, path: Utf8PathBuf) -> Self {
        self.project_config = path;
        self
    }

    /// Replaces the list of recognized adapter names.
    pub fn with_adapters(mut self, adapters: Vec<String>) -> Self {
        self.adapters = adapters;
        self
    }

    /// Resolves the server configuration record.
    pub fn resolve_server_config(&self, overrides: &OverrideMap) -> ServerConfig {
        let mut config = ServerConfig::new(&self.client_host);
        let (global, project) = self.load_layers();
        config.merge_layer(&global);
        config.merge_layer(&project);
        config.apply_overrides(overrides);
        config
    }

    /// Resolves the client configuration record without runner handling.
    ///
    /// Used by the listing entry point, which only needs the merged option
    /// values.
    pub fn resolve_list_config(&self, overrides: &OverrideMap) -> ClientConfig {
        let mut config = ClientConfig::new(&self.client_host);
        let (global, project) = self.load_layers();
        config.merge_layer(&global);
        config.merge_layer(&project);
        config.apply_overrides(overrides);
        config
    }

    /// Resolves the full client configuration record, including the runner
    /// page.
    ///
    /// This merges all layers, runs the runner resolution state machine
    /// (synthesizing a page if necessary), normalizes the adapter, and
    /// guesses the client root when unset. Expected failures degrade with
    /// logged diagnostics; only synthesis failures are returned as errors.
    pub fn resolve_client_config(
        &self,
        overrides: &OverrideMap,
    ) -> Result<ClientConfig, SynthesisError> {
        let synth = RunnerSynthesizer::new()?;
        self.resolve_client_config_with(overrides, &synth)
    }

    /// [`Self::resolve_client_config`] with a caller-supplied synthesizer,
    /// for custom templates, classifiers or alias precedence.
    pub fn resolve_client_config_with(
        &self,
        overrides: &OverrideMap,
        synth: &RunnerSynthesizer,
    ) -> Result<ClientConfig, SynthesisError> {
        let mut config = self.resolve_list_config(overrides);

        let request = RunnerRequest {
            runner: config.runner.as_deref(),
            tests: config.tests.as_deref(),
            overwrite: config.overwrite,
        };
        let resolution = resolve_runner(&self.cwd, &request, synth)?;
        config.runner = resolution.runner;
        config.tests_dir = resolution.tests_dir;
        config.auto_runner = resolution.auto_runner;

        // An adapter that is neither a known name nor an absolute path is a
        // project-relative file.
        if let Some(adapter) = &config.adapter {
            if !self.adapters.contains(adapter) && !Utf8Path::new(adapter).is_absolute() {
                config.adapter = Some(self.cwd.join(adapter).into_string());
            }
        }

        config.client_root = match config.client_root.take() {
            Some(root) => Some(absolutize(&self.cwd, &root)),
            None => config
                .tests_dir
                .as_deref()
                .and_then(Utf8Path::parent)
                .map(|root| {
                    debug!("guessed client root `{root}`");
                    root.to_path_buf()
                }),
        };

        Ok(config)
    }

    fn load_layers(&self) -> (ConfigLayer, ConfigLayer) {
        let global = match &self.global_config {
            Some(path) => load_and_log(path),
            None => ConfigLayer::new(),
        };
        let project = load_and_log(&self.project_config);
        (global, project)
    }
}

fn load_and_log(path: &Utf8Path) -> ConfigLayer {
    let load = load_layer(path);
    if let Some(diagnostic) = &load.diagnostic {
        warn!("{diagnostic}");
    }
    load.values
}
