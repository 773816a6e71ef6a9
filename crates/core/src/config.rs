//! Configuration management for the docqa pipeline.
//!
//! Configuration is merged from three layers, later layers winning:
//! defaults, an optional YAML config file, environment variables, and
//! finally CLI flag overrides applied by the binary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default relevance threshold for the lexical classifier.
///
/// The score must strictly exceed this for the document to be judged
/// sufficient. Inherited policy value; kept configurable because its
/// rationale is undocumented.
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.3;

/// Default cap on external search results merged into the fallback prompt.
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 2;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider (e.g., "ollama", "openai", "claude")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// API key for the LLM provider
    pub api_key: Option<String>,

    /// Custom endpoint for the external search backend
    pub search_endpoint: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Pipeline decision policy
    pub policy: PipelinePolicy,

    /// LLM provider configurations from the config file
    pub llm: Option<LlmSection>,
}

/// Decision-policy constants for one pipeline invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelinePolicy {
    /// Relevance score above which the document alone is judged sufficient
    #[serde(rename = "relevanceThreshold", default = "default_threshold")]
    pub relevance_threshold: f64,

    /// Maximum number of search results merged into the fallback prompt
    #[serde(rename = "maxSearchResults", default = "default_max_results")]
    pub max_search_results: usize,
}

fn default_threshold() -> f64 {
    DEFAULT_RELEVANCE_THRESHOLD
}

fn default_max_results() -> usize {
    DEFAULT_MAX_SEARCH_RESULTS
}

impl Default for PipelinePolicy {
    fn default() -> Self {
        Self {
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
        }
    }
}

/// LLM configuration section from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    OpenAI {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Claude {
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        model: String,
        endpoint: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        timeout: Option<u64>,
    },
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    pipeline: Option<PipelinePolicy>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "ollama".to_string(), // Local-first default
            model: "llama3.2".to_string(),
            api_key: None,
            search_endpoint: None,
            log_level: None,
            verbose: false,
            no_color: false,
            policy: PipelinePolicy::default(),
            llm: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `DOCQA_CONFIG`: Path to config file
    /// - `DOCQA_PROVIDER`: LLM provider
    /// - `DOCQA_MODEL`: Model identifier
    /// - `DOCQA_API_KEY`: API key
    /// - `DOCQA_SEARCH_ENDPOINT`: External search endpoint
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an explicit config file path.
    ///
    /// The explicit path wins over `DOCQA_CONFIG`.
    pub fn load_from(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        config.config_file = config_file;

        if config.config_file.is_none() {
            if let Ok(path) = std::env::var("DOCQA_CONFIG") {
                config.config_file = Some(PathBuf::from(path));
            }
        }

        // Load from YAML config file if one was given and it exists
        if let Some(config_path) = config.config_file.clone() {
            if config_path.exists() {
                config = config.merge_yaml(&config_path)?;
            } else {
                return Err(AppError::Config(format!(
                    "Config file does not exist: {:?}",
                    config_path
                )));
            }
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("DOCQA_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("DOCQA_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("DOCQA_SEARCH_ENDPOINT") {
            config.search_endpoint = Some(endpoint);
        }

        if let Ok(key) = std::env::var("DOCQA_API_KEY") {
            config.api_key = Some(key);
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(pipeline) = config_file.pipeline {
            result.policy = pipeline;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                result.model = match provider_config {
                    ProviderConfig::OpenAI { model, .. } => model.clone(),
                    ProviderConfig::Claude { model, .. } => model.clone(),
                    ProviderConfig::Ollama { model, .. } => model.clone(),
                };
            }

            result.llm = Some(llm);
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the active provider configuration, if the config file defined one.
    pub fn get_provider_config(&self, provider: &str) -> Option<ProviderConfig> {
        self.llm
            .as_ref()
            .and_then(|llm| llm.providers.get(provider).cloned())
    }

    /// Resolve the API key for a provider.
    ///
    /// An explicit `DOCQA_API_KEY` wins; otherwise the provider config names
    /// an environment variable to read.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        if let Some(provider_config) = self.get_provider_config(provider) {
            let env_var = match provider_config {
                ProviderConfig::OpenAI { api_key_env, .. } => Some(api_key_env),
                ProviderConfig::Claude { api_key_env, .. } => Some(api_key_env),
                ProviderConfig::Ollama { .. } => None,
            };

            if let Some(env_var) = env_var {
                if let Ok(key) = std::env::var(&env_var) {
                    return Some(key);
                }
            }
        }

        None
    }

    /// Resolve the endpoint for the active LLM provider.
    pub fn resolve_endpoint(&self, provider: &str) -> Option<String> {
        match self.get_provider_config(provider)? {
            ProviderConfig::Ollama { endpoint, .. } => Some(endpoint),
            ProviderConfig::OpenAI { endpoint, .. } => endpoint,
            ProviderConfig::Claude { endpoint, .. } => endpoint,
        }
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let provider = &self.provider;
        let known_providers = ["openai", "claude", "ollama"];

        if !known_providers.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                provider,
                known_providers.join(", ")
            )));
        }

        if !(0.0..=1.0).contains(&self.policy.relevance_threshold) {
            return Err(AppError::Config(format!(
                "Relevance threshold must be in [0, 1], got {}",
                self.policy.relevance_threshold
            )));
        }

        if let Some(provider_config) = self.get_provider_config(provider) {
            match provider_config {
                ProviderConfig::OpenAI { api_key_env, .. }
                | ProviderConfig::Claude { api_key_env, .. } => {
                    if self.api_key.is_none() && std::env::var(&api_key_env).is_err() {
                        return Err(AppError::Config(format!(
                            "API key not found in environment variable: {}",
                            api_key_env
                        )));
                    }
                }
                ProviderConfig::Ollama { .. } => {
                    // Ollama doesn't require API keys
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert!(!config.verbose);
        assert!(!config.no_color);
        assert_eq!(config.policy.relevance_threshold, 0.3);
        assert_eq!(config.policy.max_search_results, 2);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            None,
            Some("openai".to_string()),
            Some("gpt-4".to_string()),
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "openai");
        assert_eq!(overridden.model, "gpt-4");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = AppConfig::default();
        config.provider = "unknown".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_threshold_range() {
        let mut config = AppConfig::default();
        config.policy.relevance_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_yaml_parsing() {
        let yaml = "relevanceThreshold: 0.5\nmaxSearchResults: 4\n";
        let policy: PipelinePolicy = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(policy.relevance_threshold, 0.5);
        assert_eq!(policy.max_search_results, 4);
    }

    #[test]
    fn test_policy_yaml_defaults() {
        let policy: PipelinePolicy = serde_yaml::from_str("{}").unwrap();
        assert_eq!(policy.relevance_threshold, DEFAULT_RELEVANCE_THRESHOLD);
        assert_eq!(policy.max_search_results, DEFAULT_MAX_SEARCH_RESULTS);
    }
}
