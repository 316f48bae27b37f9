use crate::core::ConfigProvider;
use crate::utils::error::{AnalyzerError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_EDHREC_BASE_URL: &str = "https://edhrec.com";
pub const DEFAULT_EDHREC_JSON_BASE_URL: &str = "https://json.edhrec.com";
pub const DEFAULT_SCRYFALL_BASE_URL: &str = "https://api.scryfall.com";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Analyzer settings, loadable from a TOML file. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub edhrec: EdhrecConfig,
    pub scryfall: ScryfallConfig,
    pub fetch: FetchConfig,
    pub paths: PathsConfig,
    pub server: ServerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdhrecConfig {
    pub base_url: String,
    pub json_base_url: String,
    pub min_delay_ms: u64,
}

impl Default for EdhrecConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EDHREC_BASE_URL.to_string(),
            json_base_url: DEFAULT_EDHREC_JSON_BASE_URL.to_string(),
            min_delay_ms: 800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScryfallConfig {
    pub base_url: String,
    pub min_delay_ms: u64,
}

impl Default for ScryfallConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SCRYFALL_BASE_URL.to_string(),
            min_delay_ms: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub concurrent_requests: usize,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: 5,
            timeout_seconds: 30,
            user_agent: concat!("edhrec-etl/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub cache_dir: String,
    pub output_path: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cache_dir: "./cache".to_string(),
            output_path: "./output".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Also write the text reports for API runs.
    pub write_outputs: bool,
}

impl AnalyzerConfig {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalyzerError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalyzerError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Load `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::info!("Loading settings from {}", path);
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Replace `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalyzerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn write_outputs(&self) -> bool {
        self.server.write_outputs
    }
}

impl ConfigProvider for AnalyzerConfig {
    fn edhrec_base_url(&self) -> &str {
        &self.edhrec.base_url
    }

    fn edhrec_json_base_url(&self) -> &str {
        &self.edhrec.json_base_url
    }

    fn scryfall_base_url(&self) -> &str {
        &self.scryfall.base_url
    }

    fn edhrec_min_delay(&self) -> Duration {
        Duration::from_millis(self.edhrec.min_delay_ms)
    }

    fn scryfall_min_delay(&self) -> Duration {
        Duration::from_millis(self.scryfall.min_delay_ms)
    }

    fn concurrent_requests(&self) -> usize {
        self.fetch.concurrent_requests
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.fetch.user_agent
    }

    fn cache_dir(&self) -> &str {
        &self.paths.cache_dir
    }

    fn output_path(&self) -> &str {
        &self.paths.output_path
    }
}

impl Validate for AnalyzerConfig {
    fn validate(&self) -> Result<()> {
        validate_url("edhrec.base_url", &self.edhrec.base_url)?;
        validate_url("edhrec.json_base_url", &self.edhrec.json_base_url)?;
        validate_url("scryfall.base_url", &self.scryfall.base_url)?;

        validate_range(
            "fetch.concurrent_requests",
            self.fetch.concurrent_requests,
            1,
            32,
        )?;
        validate_range("fetch.timeout_seconds", self.fetch.timeout_seconds, 1, 600)?;
        validate_non_empty_string("fetch.user_agent", &self.fetch.user_agent)?;

        validate_path("paths.cache_dir", &self.paths.cache_dir)?;
        validate_path("paths.output_path", &self.paths.output_path)?;

        if let Some(host) = &self.server.host {
            validate_non_empty_string("server.host", host)?;
        }

        Ok(())
    }
}
