use crate::cli::Cli;
use crate::storage::DeletePolicy;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_FILTER: &str = "coursebase=debug,tower_http=info";

/// Runtime configuration of the gateway.
///
/// Resolved as defaults, then environment (including a `.env` file), then
/// command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Snapshot file; `None` keeps everything in memory
    pub data_file: Option<PathBuf>,

    /// What deleting a referenced record does
    pub delete_policy: DeletePolicy,

    /// Origins allowed by CORS; empty allows any
    pub cors_origins: Vec<String>,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_file: None,
            delete_policy: DeletePolicy::default(),
            cors_origins: Vec::new(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the process environment after loading `.env` when present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("APP_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("APP_PORT") {
            config.port = port
                .trim()
                .parse::<u16>()
                .context("APP_PORT must be a valid u16")?;
        }
        if let Some(path) = lookup("COURSEBASE_DATA_FILE").filter(|p| !p.trim().is_empty()) {
            config.data_file = Some(PathBuf::from(path));
        }
        if let Some(policy) = lookup("COURSEBASE_DELETE_POLICY") {
            config.delete_policy = policy
                .parse::<DeletePolicy>()
                .map_err(anyhow::Error::msg)
                .context("COURSEBASE_DELETE_POLICY is invalid")?;
        }
        if let Some(origins) = lookup("COURSEBASE_CORS_ORIGINS") {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(filter) = lookup("RUST_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Overrides with whatever flags were given on the command line.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if cli.memory_only {
            self.data_file = None;
        } else if let Some(path) = &cli.data_file {
            self.data_file = Some(path.clone());
        }
        if let Some(policy) = cli.delete_policy {
            self.delete_policy = policy;
        }
        if !cli.cors_origins.is_empty() {
            self.cors_origins = cli.cors_origins.clone();
        }
        if let Some(filter) = &cli.log {
            self.log_filter = filter.clone();
        }
        self
    }

    /// Set the host
    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Persist to a snapshot file
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    pub fn delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn cors_origin(mut self, origin: &str) -> Self {
        self.cors_origins.push(origin.to_string());
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
