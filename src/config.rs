//! Configuration management for the `nwp-import` binary.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ImportError, Result};
use crate::importer::ImportOptions;
use crate::providers::{canonical_name, importer_names};

/// Command-line arguments for nwp-import
#[derive(Parser, Debug)]
#[command(name = "nwp-import")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Name of the importer (bom_nwp, knmi_nwp, rmi_nwp)
    pub importer: String,

    /// Path to the NetCDF file to import
    pub file: PathBuf,

    /// Name of the precipitation variable (default depends on the importer)
    #[arg(long, env = "NWP_IMPORT_VARNAME")]
    pub varname: Option<String>,

    /// Name of the time coordinate
    #[arg(long, env = "NWP_IMPORT_VARNAME_TIME")]
    pub varname_time: Option<String>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "NWP_IMPORT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "NWP_IMPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Print the metadata on a single line
    #[arg(long)]
    pub compact: bool,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Options per importer name
    #[serde(default)]
    pub importers: BTreeMap<String, ImportOptions>,
}

/// A single import to run
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRequest {
    /// Importer name as given on the command line
    pub importer: String,
    /// File to import
    pub path: PathBuf,
    /// Effective options after all layers are applied
    pub options: ImportOptions,
    /// Print the metadata on a single line
    pub compact: bool,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, ImportRequest)> {
        Self::from_args(Args::parse())
    }

    /// Build configuration and the import request from parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, ImportRequest)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments and environment
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }

        let mut options = config.options_for(&args.importer);
        if let Some(varname) = args.varname {
            options.varname = Some(varname);
        }
        if let Some(varname_time) = args.varname_time {
            options.varname_time = varname_time;
        }

        let request = ImportRequest {
            importer: args.importer,
            path: args.file,
            options,
            compact: args.compact,
        };

        Ok((config, request))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        self.log_level = other.log_level;
        for (name, options) in other.importers {
            self.importers.insert(canonical_name(&name), options);
        }
    }

    /// Options configured for an importer, or the defaults
    pub fn options_for(&self, importer: &str) -> ImportOptions {
        let key = canonical_name(importer);
        self.importers
            .iter()
            .find(|(name, _)| canonical_name(name) == key)
            .map(|(_, options)| options.clone())
            .unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ImportError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        // Validate importer sections
        for (name, options) in &self.importers {
            if !importer_names().contains(&canonical_name(name).as_str()) {
                return Err(ImportError::Config {
                    message: format!(
                        "Unknown importer section: {}. Must be one of: {}",
                        name,
                        importer_names().join(", ")
                    ),
                });
            }
            options.validate()?;
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            importers: BTreeMap::new(),
        }
    }
}

// Default value functions for serde
fn default_log_level() -> String {
    "info".to_string()
}
