// Copyright (c) The runway Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use runway_resolver::config::{ConfigResolver, OverrideMap};
use serde_json::{Value, json};

/// The default client host when no outward-facing address is supplied.
const FALLBACK_CLIENT_HOST: &str = "127.0.0.1";

/// A cross-browser test session tool.
#[derive(Debug, Parser)]
#[command(name = "runway", version)]
pub struct RunwayApp {
    /// Working directory [default: the current directory]
    #[arg(long, global = true, value_name = "DIR")]
    cwd: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve the client session configuration
    ///
    /// Layers the global config file, the project config file and the flags
    /// given here, then resolves the runner page -- synthesizing one from
    /// discovered test scripts if necessary. Prints the resolved record as
    /// JSON.
    Client {
        #[command(flatten)]
        opts: SessionOpts,
    },
    /// Resolve the server configuration
    Server {
        #[command(flatten)]
        opts: ServerOpts,
    },
    /// Resolve the client configuration without runner handling
    List {
        #[command(flatten)]
        opts: SessionOpts,
    },
}

impl RunwayApp {
    /// Executes the app.
    pub fn exec(self) -> Result<()> {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => {
                let cwd = std::env::current_dir().wrap_err("failed to get current directory")?;
                Utf8PathBuf::try_from(cwd).wrap_err("current directory is not valid UTF-8")?
            }
        };
        let client_host = std::env::var("RUNWAY_CLIENT_HOST")
            .unwrap_or_else(|_| FALLBACK_CLIENT_HOST.to_owned());
        let resolver = ConfigResolver::new(cwd, client_host);

        let record = match self.command {
            Command::Client { opts } => {
                let config = resolver
                    .resolve_client_config(&opts.to_overrides())
                    .wrap_err("failed to resolve client configuration")?;
                serde_json::to_value(config)?
            }
            Command::Server { opts } => {
                serde_json::to_value(resolver.resolve_server_config(&opts.to_overrides()))?
            }
            Command::List { opts } => {
                serde_json::to_value(resolver.resolve_list_config(&opts.to_overrides()))?
            }
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
        Ok(())
    }
}

/// Client session flags, mapped one-to-one onto recognized config keys.
#[derive(Debug, Args)]
struct SessionOpts {
    /// Test scripts to run [default: discovered in the tests directory]
    #[arg(long, value_name = "FILE", num_args = 1..)]
    tests: Vec<String>,

    /// Runner page to use [default: discovered or synthesized]
    #[arg(long, value_name = "PATH")]
    runner: Option<Utf8PathBuf>,

    /// Adapter name or path
    #[arg(long, value_name = "NAME_OR_PATH")]
    adapter: Option<String>,

    /// Rebuild the runner page in place even if it exists
    #[arg(long)]
    overwrite: bool,

    /// Browsers to run the session in
    #[arg(long, value_name = "BROWSER", value_delimiter = ',')]
    browsers: Vec<String>,

    /// Root directory served to browsers [default: parent of the tests dir]
    #[arg(long, value_name = "DIR")]
    client_root: Option<Utf8PathBuf>,

    /// Per-test timeout, in minutes
    #[arg(long, value_name = "MINUTES")]
    timeout: Option<u64>,

    /// Host browsers connect back to
    #[arg(long, value_name = "HOST")]
    client_host: Option<String>,

    /// Port the client serves assets on
    #[arg(long, value_name = "PORT")]
    client_port: Option<String>,

    /// Server host
    #[arg(long, value_name = "HOST")]
    server_host: Option<String>,

    /// Server port
    #[arg(long, value_name = "PORT")]
    server_port: Option<String>,
}

impl SessionOpts {
    fn to_overrides(&self) -> OverrideMap {
        let mut overrides = OverrideMap::new();
        if !self.tests.is_empty() {
            overrides.insert("tests".to_owned(), json!(self.tests));
        }
        if let Some(runner) = &self.runner {
            overrides.insert("runner".to_owned(), json!(runner));
        }
        if let Some(adapter) = &self.adapter {
            overrides.insert("adapter".to_owned(), json!(adapter));
        }
        if self.overwrite {
            overrides.insert("overwrite".to_owned(), Value::Bool(true));
        }
        if !self.browsers.is_empty() {
            overrides.insert("browsers".to_owned(), json!(self.browsers));
        }
        if let Some(root) = &self.client_root {
            overrides.insert("clientRoot".to_owned(), json!(root));
        }
        if let Some(timeout) = self.timeout {
            overrides.insert("timeout".to_owned(), json!(timeout));
        }
        if let Some(host) = &self.client_host {
            overrides.insert("clientHost".to_owned(), json!(host));
        }
        if let Some(port) = &self.client_port {
            overrides.insert("clientPort".to_owned(), json!(port));
        }
        if let Some(host) = &self.server_host {
            overrides.insert("serverHost".to_owned(), json!(host));
        }
        if let Some(port) = &self.server_port {
            overrides.insert("serverPort".to_owned(), json!(port));
        }
        overrides
    }
}

/// Server flags.
#[derive(Debug, Args)]
struct ServerOpts {
    /// Host the server binds to
    #[arg(long, value_name = "HOST")]
    server_host: Option<String>,

    /// Port the server listens on
    #[arg(long, value_name = "PORT")]
    server_port: Option<String>,

    /// Scripts injected into every served page
    #[arg(long, value_name = "FILE", num_args = 1..)]
    insert_scripts: Vec<String>,
}

impl ServerOpts {
    fn to_overrides(&self) -> OverrideMap {
        let mut overrides = OverrideMap::new();
        if let Some(host) = &self.server_host {
            overrides.insert("serverHost".to_owned(), json!(host));
        }
        if let Some(port) = &self.server_port {
            overrides.insert("serverPort".to_owned(), json!(port));
        }
        if !self.insert_scripts.is_empty() {
            overrides.insert("insertScripts".to_owned(), json!(self.insert_scripts));
        }
        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> RunwayApp {
        RunwayApp::try_parse_from(args).expect("arguments parse")
    }

    #[test]
    fn session_flags_become_camel_case_overrides() {
        let app = parse(&[
            "runway",
            "client",
            "--tests",
            "test/a.test.js",
            "test/b.spec.js",
            "--browsers",
            "chrome,firefox",
            "--client-port",
            "8000",
            "--overwrite",
        ]);
        let Command::Client { opts } = app.command else {
            panic!("expected client subcommand");
        };

        let overrides = opts.to_overrides();
        assert_eq!(
            overrides.get("tests"),
            Some(&json!(["test/a.test.js", "test/b.spec.js"]))
        );
        assert_eq!(overrides.get("browsers"), Some(&json!(["chrome", "firefox"])));
        assert_eq!(overrides.get("clientPort"), Some(&json!("8000")));
        assert_eq!(overrides.get("overwrite"), Some(&json!(true)));
        // Flags that were not given contribute nothing.
        assert_eq!(overrides.get("adapter"), None);
        assert_eq!(overrides.get("timeout"), None);
    }

    #[test]
    fn unset_overwrite_is_not_an_override() {
        let app = parse(&["runway", "list"]);
        let Command::List { opts } = app.command else {
            panic!("expected list subcommand");
        };
        assert!(opts.to_overrides().is_empty());
    }

    #[test]
    fn server_flags_become_overrides() {
        let app = parse(&[
            "runway",
            "server",
            "--server-port",
            "9005",
            "--insert-scripts",
            "inject.js",
        ]);
        let Command::Server { opts } = app.command else {
            panic!("expected server subcommand");
        };

        let overrides = opts.to_overrides();
        assert_eq!(overrides.get("serverPort"), Some(&json!("9005")));
        assert_eq!(overrides.get("insertScripts"), Some(&json!(["inject.js"])));
    }
}
