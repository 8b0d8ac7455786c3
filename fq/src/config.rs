//! FeatureQuest configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main FeatureQuest configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plan executor service configuration
    pub executor: ExecutorConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Local artifact output configuration
    pub output: OutputConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the executor API key environment variable is set.
    /// Call this early in startup to fail fast with a clear error message.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.executor.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Executor API key not found. Set the {} environment variable.",
                self.executor.api_key_env
            ));
        }
        Ok(())
    }

    /// Read the executor API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.executor.api_key_env).context(format!(
            "Executor API key not found in {} environment variable",
            self.executor.api_key_env
        ))
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .featurequest.yml
        let local_config = PathBuf::from(".featurequest.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/featurequest/featurequest.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("featurequest").join("featurequest.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Plan executor service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// Request timeout in milliseconds
    ///
    /// Bounds one HTTP exchange; run_plan blocks server-side until the run
    /// settles, so this stays generous.
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.planexec.dev".to_string(),
            api_key_env: "PLANEXEC_API_KEY".to_string(),
            timeout_ms: 600_000,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Local artifact output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for analysis JSON artifacts
    #[serde(rename = "analysis-dir")]
    pub analysis_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            analysis_dir: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.executor.api_key_env, "PLANEXEC_API_KEY");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.output.analysis_dir, PathBuf::from("."));
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
executor:
  base-url: https://executor.internal
  api-key-env: MY_EXEC_KEY
  timeout-ms: 120000

server:
  host: 127.0.0.1
  port: 9000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.executor.base_url, "https://executor.internal");
        assert_eq!(config.executor.api_key_env, "MY_EXEC_KEY");
        assert_eq!(config.executor.timeout_ms, 120_000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
server:
  port: 8080
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.executor.api_key_env, "PLANEXEC_API_KEY");
    }

    #[test]
    #[serial]
    fn test_validate_requires_api_key() {
        let mut config = Config::default();
        config.executor.api_key_env = "FQ_TEST_MISSING_KEY".to_string();
        assert!(config.validate().is_err());

        unsafe { std::env::set_var("FQ_TEST_MISSING_KEY", "secret") };
        assert!(config.validate().is_ok());
        unsafe { std::env::remove_var("FQ_TEST_MISSING_KEY") };
    }
}
