use crate::core::error::AssistantError;
use crate::language::Language;
use crate::pipeline::settings::AssistantSettings;
use crate::pipeline::{DEFAULT_SIMULATED_DELAY, PipelineOptions};
use crate::providers::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CREDENTIAL_ENV: &str = "OPENAI_API_KEY";

/// Startup options. Every field is optional and falls back to the built-in
/// default. The file is only ever read.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub language: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub simulated_delay_ms: Option<u64>,
    pub api_key: Option<String>,
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".codeassist")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Read the user config, then let the environment credential override it.
    pub fn load() -> Result<Config, AssistantError> {
        let config = Self::load_from(&Self::config_path())?;
        Ok(config.with_env_credential(std::env::var(CREDENTIAL_ENV).ok()))
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Config, AssistantError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
            .map_err(|err| AssistantError::Config(format!("{}: {}", path.display(), err)))
    }

    pub fn parse(contents: &str) -> Result<Config, AssistantError> {
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_env_credential(mut self, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(value);
        }
        self
    }

    fn validate(&self) -> Result<(), AssistantError> {
        if let Some(name) = &self.language {
            if Language::from_str(name).is_none() {
                return Err(AssistantError::Config(format!("unknown language: {}", name)));
            }
        }
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(AssistantError::Config(format!(
                    "temperature must be between 0 and 2, got {}",
                    temperature
                )));
            }
        }
        Ok(())
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn language(&self) -> Language {
        self.language
            .as_deref()
            .and_then(Language::from_str)
            .unwrap_or_default()
    }

    pub fn simulated_delay(&self) -> Duration {
        self.simulated_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SIMULATED_DELAY)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            simulated_delay: self.simulated_delay(),
        }
    }

    /// Initial settings: demo mode, with the configured credential available
    /// for the direct route.
    pub fn settings(&self) -> AssistantSettings {
        AssistantSettings {
            credential: self.api_key.clone(),
            startup_credential: self.api_key.clone(),
            language: self.language(),
            model: self.model().to_string(),
            ..AssistantSettings::default()
        }
    }
}
