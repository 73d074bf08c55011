//! Configuration loading, env vars, CLI flags.

use std::env;

use serde::Deserialize;

#[cfg(feature = "cli")]
use clap::Parser;

use crate::data_management::cache::DEFAULT_ROUTE_CACHE_CAPACITY;
use crate::engine::assembler::AssemblerConfig;

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub pairs_file: Option<String>,
    pub source_token: Option<String>,
    pub destination_token: Option<String>,
    pub max_hops: Option<usize>,
    pub cache_capacity: usize,
    pub log_level: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub pairs_file: Option<String>,
    pub source_token: Option<String>,
    pub destination_token: Option<String>,
    pub max_hops: Option<usize>,
    pub cache_capacity: Option<usize>,
    pub log_level: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(author, version, about = "Assemble a multi-hop swap route from a pair snapshot", long_about = None)]
pub struct CliConfig {
    /// TOML file with default settings
    #[arg(long)]
    pub config: Option<String>,
    /// JSON or TOML file listing the known pairs
    #[arg(long)]
    pub pairs_file: Option<String>,
    /// Source token: `native`, `<addr>` or `<addr>:<code_hash>`
    #[arg(long = "from")]
    pub source_token: Option<String>,
    /// Destination token, same format as --from
    #[arg(long = "to")]
    pub destination_token: Option<String>,
    #[arg(long)]
    pub max_hops: Option<usize>,
    #[arg(long)]
    pub cache_capacity: Option<usize>,
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pairs_file: None,
            source_token: None,
            destination_token: None,
            max_hops: None,
            cache_capacity: DEFAULT_ROUTE_CACHE_CAPACITY,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Settings from environment variables only.
    pub fn load() -> Self {
        Self::merge(FileConfig::default(), FileConfig::from_env())
    }

    /// CLI flags, then the `--config` file, then environment variables.
    #[cfg(feature = "cli")]
    pub fn load_with_cli() -> anyhow::Result<Self> {
        let cli = CliConfig::parse();
        let file_config = match &cli.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        let cli_config = FileConfig {
            pairs_file: cli.pairs_file,
            source_token: cli.source_token,
            destination_token: cli.destination_token,
            max_hops: cli.max_hops,
            cache_capacity: cli.cache_capacity,
            log_level: cli.log_level,
        };
        let layered = Self::merge(cli_config, file_config);
        Ok(Self::merge(layered.into_file_config(), FileConfig::from_env()))
    }

    /// Fills every setting missing from `primary` from `fallback`, then defaults.
    pub fn merge(primary: FileConfig, fallback: FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            pairs_file: primary.pairs_file.or(fallback.pairs_file),
            source_token: primary.source_token.or(fallback.source_token),
            destination_token: primary.destination_token.or(fallback.destination_token),
            max_hops: primary.max_hops.or(fallback.max_hops),
            cache_capacity: primary
                .cache_capacity
                .or(fallback.cache_capacity)
                .unwrap_or(defaults.cache_capacity),
            log_level: primary
                .log_level
                .or(fallback.log_level)
                .unwrap_or(defaults.log_level),
        }
    }

    /// Names of the settings a command-line lookup needs but this config lacks.
    pub fn missing_route_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.pairs_file.is_none() {
            missing.push("pairs_file");
        }
        if self.source_token.is_none() {
            missing.push("source_token");
        }
        if self.destination_token.is_none() {
            missing.push("destination_token");
        }
        missing
    }

    pub fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig {
            max_hops: self.max_hops,
        }
    }

    #[cfg(feature = "cli")]
    fn into_file_config(self) -> FileConfig {
        FileConfig {
            pairs_file: self.pairs_file,
            source_token: self.source_token,
            destination_token: self.destination_token,
            max_hops: self.max_hops,
            cache_capacity: Some(self.cache_capacity),
            log_level: Some(self.log_level),
        }
    }
}

impl FileConfig {
    pub fn from_env() -> Self {
        Self {
            pairs_file: env::var("ROUTE_PAIRS_FILE").ok(),
            source_token: env::var("ROUTE_FROM").ok(),
            destination_token: env::var("ROUTE_TO").ok(),
            max_hops: env::var("ROUTE_MAX_HOPS").ok().and_then(|s| s.parse().ok()),
            cache_capacity: env::var("ROUTE_CACHE_CAPACITY").ok().and_then(|s| s.parse().ok()),
            log_level: env::var("ROUTE_LOG_LEVEL").ok(),
        }
    }

    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("unable to read config {}: {}", path.as_ref().display(), e)
        })?;
        Self::from_toml(&text)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.as_ref().display(), e))
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
