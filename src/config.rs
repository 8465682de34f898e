//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the product catalog JSON file
    #[serde(default = "default_products_file")]
    pub products_file: PathBuf,

    /// Path to the Google service-account key file
    #[serde(default = "default_service_account_file")]
    pub service_account_file: PathBuf,

    /// Target spreadsheet document id
    #[serde(default = "default_spreadsheet_id")]
    pub spreadsheet_id: String,

    /// Target worksheet tab name
    #[serde(default = "default_worksheet")]
    pub worksheet: String,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Retry attempts per product before it is skipped
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed wait between retry attempts, in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// Short pause after each product, sampled uniformly (seconds)
    #[serde(default = "default_short_pause_secs")]
    pub short_pause_secs: (u64, u64),

    /// Long pause every `long_pause_every` products, sampled uniformly (seconds)
    #[serde(default = "default_long_pause_secs")]
    pub long_pause_secs: (u64, u64),

    /// Take the long pause at every Nth product
    #[serde(default = "default_long_pause_every")]
    pub long_pause_every: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cap on the number of products processed (None = whole catalog)
    #[serde(default)]
    pub limit: Option<usize>,

    /// Output format for printed quotes
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_products_file() -> PathBuf {
    PathBuf::from("products.json")
}

fn default_service_account_file() -> PathBuf {
    PathBuf::from("service_account.json")
}

fn default_spreadsheet_id() -> String {
    "1tKHZEiOve-MO8pOgfn9mHPf1e6SGbfJkx2hsGmd2ZWw".to_string()
}

fn default_worksheet() -> String {
    "Used Buyback Prices - iPad".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_short_pause_secs() -> (u64, u64) {
    (5, 10)
}

fn default_long_pause_secs() -> (u64, u64) {
    (60, 120)
}

fn default_long_pause_every() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            products_file: default_products_file(),
            service_account_file: default_service_account_file(),
            spreadsheet_id: default_spreadsheet_id(),
            worksheet: default_worksheet(),
            proxy: None,
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
            short_pause_secs: default_short_pause_secs(),
            long_pause_secs: default_long_pause_secs(),
            long_pause_every: default_long_pause_every(),
            timeout_secs: default_timeout_secs(),
            limit: None,
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("sellup-tracker").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(path) = std::env::var("SELLUP_PRODUCTS") {
            self.products_file = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("SELLUP_SERVICE_ACCOUNT") {
            self.service_account_file = PathBuf::from(path);
        }

        if let Ok(id) = std::env::var("SELLUP_SPREADSHEET_ID") {
            self.spreadsheet_id = id;
        }

        if let Ok(tab) = std::env::var("SELLUP_WORKSHEET") {
            self.worksheet = tab;
        }

        if let Ok(proxy) = std::env::var("SELLUP_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(limit) = std::env::var("SELLUP_LIMIT") {
            if let Ok(n) = limit.parse() {
                self.limit = Some(n);
            }
        }

        self
    }
}

/// Output format for printed quote rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
