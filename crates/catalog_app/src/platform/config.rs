//! Application configuration: a RON file plus command-line overrides.
use std::path::{Path, PathBuf};
use std::time::Duration;

use catalog_engine::{read_if_exists, EngineSettings, FetchSettings, PersistError, RetryPolicy};
use catalog_logging::LogSettings;
use clap::Parser;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_CONFIG_FILE: &str = "catalog.ron";

#[derive(Debug, Parser)]
#[command(name = "catalog", about = "Browse the product catalog from the terminal")]
pub struct Cli {
    /// Configuration file (RON). Defaults to ./catalog.ron when present.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Initial query string, e.g. "?page=2&order=desc". Overrides the saved location.
    #[arg(long)]
    pub location: Option<String>,
    /// Product API base URL.
    #[arg(long)]
    pub api: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: PersistError,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid api base url {url:?}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub debounce_ms: u64,
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_body_bytes: u64,
    pub redirect_limit: usize,
    pub location_file: PathBuf,
    pub log: LogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        let retry = RetryPolicy::default();
        Self {
            api_base_url: "https://dummyjson.com".to_string(),
            debounce_ms: catalog_engine::DEFAULT_DEBOUNCE.as_millis() as u64,
            max_retries: retry.max_retries,
            initial_delay_ms: retry.initial_delay.as_millis() as u64,
            connect_timeout_ms: fetch.connect_timeout.as_millis() as u64,
            request_timeout_ms: fetch.request_timeout.as_millis() as u64,
            max_body_bytes: fetch.max_bytes,
            redirect_limit: fetch.redirect_limit,
            location_file: PathBuf::from(".catalog_location.ron"),
            log: LogSettings::default(),
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `./catalog.ron` when no path is given.
    ///
    /// A missing file yields the defaults. An explicitly requested file that
    /// is missing is still an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        let content = read_if_exists(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        match content {
            Some(text) => Self::parse(&path, &text),
            None if required => Err(ConfigError::Read {
                path: path.clone(),
                source: PersistError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "config file not found",
                )),
            }),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(path: &Path, text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(api) = &cli.api {
            self.api_base_url = api.clone();
        }
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_base_url).map_err(|source| ConfigError::BaseUrl {
            url: self.api_base_url.clone(),
            source,
        })
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            fetch: FetchSettings {
                connect_timeout: Duration::from_millis(self.connect_timeout_ms),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
                redirect_limit: self.redirect_limit,
                max_bytes: self.max_body_bytes,
            },
            retry: RetryPolicy {
                max_retries: self.max_retries,
                initial_delay: Duration::from_millis(self.initial_delay_ms),
            },
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}
