//! Configuration management with layered hierarchy

use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::lookup::{FileLookup, HttpLookup, LookupService, DEFAULT_API_BASE};

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    #[diagnostic(code(signup::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    #[diagnostic(code(signup::config::parse), help("Known keys: api_base, reference_dir"))]
    Parse { path: PathBuf, message: String },
}

/// Signup configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the country lookup API
    pub api_base: Option<String>,

    /// Directory with saved `codes.json` / `countries.json` responses;
    /// takes precedence over `api_base`
    pub reference_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // 1. Global user config (~/.config/signup/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(Self::from_file(&global_path)?);
            }
        }

        // 2. Environment variables
        if let Ok(base) = std::env::var("SIGNUP_API_BASE") {
            config.api_base = Some(base);
        }
        if let Ok(dir) = std::env::var("SIGNUP_REFERENCE_DIR") {
            config.reference_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Parse a single YAML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "signup")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.api_base.is_some() {
            self.api_base = other.api_base;
        }
        if other.reference_dir.is_some() {
            self.reference_dir = other.reference_dir;
        }
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// The lookup service this configuration points at
    pub fn lookup_service(&self) -> Box<dyn LookupService> {
        match &self.reference_dir {
            Some(dir) => Box::new(FileLookup::new(dir.clone())),
            None => Box::new(HttpLookup::new(self.api_base())),
        }
    }
}
