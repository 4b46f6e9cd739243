// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::helpers::is_truthy;
use camino::Utf8PathBuf;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// A flat mapping of already-parsed command-line override values.
///
/// Produced by the external CLI layer; this crate only consumes it.
pub type OverrideMap = Map<String, Value>;

/// A single configuration layer, as loaded from a JSON config file.
pub type ConfigLayer = Map<String, Value>;

/// The default browser list for a client session.
pub const DEFAULT_BROWSERS: &[&str] =
    &["chrome", "firefox", "safari", "ie/9", "ie/8", "ie/7", "ie/6"];

/// The default per-test timeout, in minutes.
pub const DEFAULT_TIMEOUT: u64 = 5;

/// The default port the client serves assets on.
pub const DEFAULT_CLIENT_PORT: &str = "9998";

/// The default port the server listens on.
pub const DEFAULT_SERVER_PORT: &str = "9999";

/// The default server host a client connects to.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// The outcome of attempting to set a single key on a config record.
enum SetOutcome {
    /// The key is part of the schema and was set.
    Set,
    /// The key is not part of the schema.
    Unknown,
    /// The key is part of the schema but the value has the wrong shape.
    Mismatch,
}

/// The client-side configuration record.
///
/// Holds every recognized client option plus the two fields derived during
/// runner resolution (`tests_dir` and `auto_runner`). Every key present in
/// the default schema remains present after all merges: merging only ever
/// overwrites values, it never removes keys.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Explicit test scripts to run, if any.
    pub tests: Option<Vec<String>>,
    /// The runner page, as specified or as resolved.
    pub runner: Option<Utf8PathBuf>,
    /// The adapter identifier or path.
    pub adapter: Option<String>,
    /// Rebuild the runner page in place even if it exists.
    pub overwrite: bool,
    /// Browsers to run the session in.
    pub browsers: Vec<String>,
    /// The root directory served to browsers.
    pub client_root: Option<Utf8PathBuf>,
    /// Per-test timeout, in minutes.
    pub timeout: u64,
    /// The host browsers connect back to.
    pub client_host: String,
    /// The port the client serves assets on.
    pub client_port: String,
    /// The server host.
    pub server_host: String,
    /// The server port.
    pub server_port: String,
    /// The tests directory discovered during runner resolution.
    pub tests_dir: Option<Utf8PathBuf>,
    /// True if the runner page was synthesized rather than user-supplied or
    /// discovered.
    pub auto_runner: bool,
    /// Unrecognized keys from config file layers. Preserved, but without
    /// effect on resolution.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClientConfig {
    /// The recognized client option names, as they appear in config files.
    pub const KEYS: &'static [&'static str] = &[
        "tests",
        "runner",
        "adapter",
        "overwrite",
        "browsers",
        "clientRoot",
        "timeout",
        "clientHost",
        "clientPort",
        "serverHost",
        "serverPort",
    ];

    /// Creates a client config holding the built-in defaults.
    ///
    /// `client_host` is the externally supplied default client host (the
    /// machine's outward-facing address), substituted at process start.
    pub fn new(client_host: impl Into<String>) -> Self {
        Self {
            tests: None,
            runner: None,
            adapter: None,
            overwrite: false,
            browsers: DEFAULT_BROWSERS.iter().map(|s| s.to_string()).collect(),
            client_root: None,
            timeout: DEFAULT_TIMEOUT,
            client_host: client_host.into(),
            client_port: DEFAULT_CLIENT_PORT.to_owned(),
            server_host: DEFAULT_SERVER_HOST.to_owned(),
            server_port: DEFAULT_SERVER_PORT.to_owned(),
            tests_dir: None,
            auto_runner: false,
            extra: Map::new(),
        }
    }

    /// Merges a configuration layer into this record.
    ///
    /// Every recognized key present in the layer unconditionally overwrites
    /// the current value. Unrecognized keys are preserved in [`Self::extra`]
    /// but have no effect.
    pub fn merge_layer(&mut self, layer: &ConfigLayer) {
        for (key, value) in layer {
            match self.set_key(key, value) {
                SetOutcome::Set => {}
                SetOutcome::Unknown => {
                    self.extra.insert(key.clone(), value.clone());
                }
                SetOutcome::Mismatch => {
                    warn!("ignoring config key `{key}`: unexpected value shape");
                }
            }
        }
    }

    /// Applies command-line overrides to this record.
    ///
    /// Only keys already present in the schema are considered; unknown
    /// override keys are silently ignored. A value that is not set (null,
    /// false, zero, or an empty string) contributes nothing.
    pub fn apply_overrides(&mut self, overrides: &OverrideMap) {
        for (key, value) in overrides {
            if !is_truthy(value) {
                continue;
            }
            match self.set_key(key, value) {
                SetOutcome::Set => {}
                SetOutcome::Unknown => {
                    debug!("ignoring unknown override key `{key}`");
                }
                SetOutcome::Mismatch => {
                    warn!("ignoring override `{key}`: unexpected value shape");
                }
            }
        }
    }

    fn set_key(&mut self, key: &str, value: &Value) -> SetOutcome {
        match key {
            "tests" => match as_string_list(value) {
                Some(tests) => {
                    self.tests = Some(tests);
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "runner" => match value.as_str() {
                Some(runner) => {
                    self.runner = Some(Utf8PathBuf::from(runner));
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "adapter" => match value.as_str() {
                Some(adapter) => {
                    self.adapter = Some(adapter.to_owned());
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "overwrite" => match value.as_bool() {
                Some(overwrite) => {
                    self.overwrite = overwrite;
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "browsers" => match as_string_list(value) {
                Some(browsers) => {
                    self.browsers = browsers;
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "clientRoot" => match value.as_str() {
                Some(root) => {
                    self.client_root = Some(Utf8PathBuf::from(root));
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "timeout" => match as_timeout(value) {
                Some(timeout) => {
                    self.timeout = timeout;
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "clientHost" => match value.as_str() {
                Some(host) => {
                    self.client_host = host.to_owned();
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "clientPort" => match as_port(value) {
                Some(port) => {
                    self.client_port = port;
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "serverHost" => match value.as_str() {
                Some(host) => {
                    self.server_host = host.to_owned();
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "serverPort" => match as_port(value) {
                Some(port) => {
                    self.server_port = port;
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            _ => SetOutcome::Unknown,
        }
    }
}

/// The server-side configuration record.
///
/// Structurally independent of [`ClientConfig`], but populated from the same
/// three layered sources.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// The host the server binds to.
    pub server_host: String,
    /// The port the server listens on.
    pub server_port: String,
    /// Scripts injected into every served page.
    pub insert_scripts: Vec<String>,
    /// Unrecognized keys from config file layers. Preserved, but without
    /// effect on resolution.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ServerConfig {
    /// The recognized server option names, as they appear in config files.
    pub const KEYS: &'static [&'static str] = &["serverHost", "serverPort", "insertScripts"];

    /// Creates a server config holding the built-in defaults, binding to the
    /// supplied host address.
    pub fn new(server_host: impl Into<String>) -> Self {
        Self {
            server_host: server_host.into(),
            server_port: DEFAULT_SERVER_PORT.to_owned(),
            insert_scripts: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Merges a configuration layer into this record. Same semantics as
    /// [`ClientConfig::merge_layer`].
    pub fn merge_layer(&mut self, layer: &ConfigLayer) {
        for (key, value) in layer {
            match self.set_key(key, value) {
                SetOutcome::Set => {}
                SetOutcome::Unknown => {
                    self.extra.insert(key.clone(), value.clone());
                }
                SetOutcome::Mismatch => {
                    warn!("ignoring config key `{key}`: unexpected value shape");
                }
            }
        }
    }

    /// Applies command-line overrides to this record. Same semantics as
    /// [`ClientConfig::apply_overrides`].
    pub fn apply_overrides(&mut self, overrides: &OverrideMap) {
        for (key, value) in overrides {
            if !is_truthy(value) {
                continue;
            }
            match self.set_key(key, value) {
                SetOutcome::Set => {}
                SetOutcome::Unknown => {
                    debug!("ignoring unknown override key `{key}`");
                }
                SetOutcome::Mismatch => {
                    warn!("ignoring override `{key}`: unexpected value shape");
                }
            }
        }
    }

    fn set_key(&mut self, key: &str, value: &Value) -> SetOutcome {
        match key {
            "serverHost" => match value.as_str() {
                Some(host) => {
                    self.server_host = host.to_owned();
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "serverPort" => match as_port(value) {
                Some(port) => {
                    self.server_port = port;
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            "insertScripts" => match as_string_list(value) {
                Some(scripts) => {
                    self.insert_scripts = scripts;
                    SetOutcome::Set
                }
                None => SetOutcome::Mismatch,
            },
            _ => SetOutcome::Unknown,
        }
    }
}

/// Coerces a JSON value into a list of strings. A bare string becomes a
/// single-element list, matching the config file format.
fn as_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => None,
    }
}

/// Coerces a JSON value into a port string. Ports are carried as strings but
/// config files may spell them as numbers.
fn as_port(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_timeout(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
