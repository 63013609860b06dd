// src/config.rs
//! Configuration injected into the submission controller

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub const ENDPOINT_ENV_VAR: &str = "RESUME_ANALYZER_API_URL";
pub const ENVIRONMENT_ENV_VAR: &str = "RESUME_ANALYZER_ENV";
pub const DEFAULT_CONFIG_FILE: &str = "resume-analyzer.yaml";

const DEFAULT_TIMEOUT_SECS: u64 = 400;
const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Base URL of the analysis service. Absent means simulated mode.
    pub endpoint: Option<String>,
    pub request_timeout_secs: u64,
    pub upload_chunk_size: usize,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub step_delay_min_ms: u64,
    pub step_delay_max_ms: u64,
    pub settle_pause_ms: u64,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: AnalyzerConfig,
    #[serde(default)]
    production: Option<AnalyzerConfig>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            upload_chunk_size: DEFAULT_CHUNK_SIZE,
            simulation: SimulationConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_delay_min_ms: 140,
            step_delay_max_ms: 320,
            settle_pause_ms: 220,
        }
    }
}

impl SimulationConfig {
    /// No delays at all, for tests
    pub fn instant() -> Self {
        Self {
            step_delay_min_ms: 0,
            step_delay_max_ms: 0,
            settle_pause_ms: 0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.step_delay_min_ms > self.step_delay_max_ms {
            anyhow::bail!(
                "simulation.step_delay_min_ms ({}) exceeds step_delay_max_ms ({})",
                self.step_delay_min_ms,
                self.step_delay_max_ms
            );
        }
        Ok(())
    }
}

impl AnalyzerConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn without_endpoint(mut self) -> Self {
        self.endpoint = None;
        self
    }

    pub fn with_upload_chunk_size(mut self, chunk_size: usize) -> Self {
        self.upload_chunk_size = chunk_size;
        self
    }

    pub fn with_simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = simulation;
        self
    }

    /// Configured endpoint, ignoring blank values
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn is_simulated(&self) -> bool {
        self.endpoint().is_none()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load from an optional YAML file, then apply the endpoint environment variable
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading analyzer configuration for environment: {}", environment);

        let config = match path {
            Some(path) => Self::load_from_file(path, &environment)?,
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(&default_path, &environment)?
                } else {
                    Self::default()
                }
            }
        };

        Ok(config.apply_endpoint_override(std::env::var(ENDPOINT_ENV_VAR).ok()))
    }

    fn get_environment() -> String {
        std::env::var(ENVIRONMENT_ENV_VAR)
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn parse(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;

        let config = match (environment, file.production) {
            ("production", Some(production)) => production,
            ("production", None) => {
                anyhow::bail!("No production section in configuration file")
            }
            _ => file.local,
        };

        config.simulation.validate()?;

        if config.upload_chunk_size == 0 {
            anyhow::bail!("upload_chunk_size must be greater than zero");
        }

        Ok(config)
    }

    /// A non-blank value replaces the configured endpoint
    pub fn apply_endpoint_override(mut self, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.endpoint = Some(value);
        }
        self
    }
}
