use std::env;
use std::time::Duration;

use thiserror::Error;

pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";

const DEFAULT_MODEL: &str = "llama3-8b-8192";
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_TIMEOUT_SECONDS: u64 = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub telegram_token: Option<String>,
    pub llm: LlmSettings,
}

/// Credentials checked at bot startup.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub telegram_token: String,
    pub llm_api_key: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let timeout_seconds = match non_blank("APPSCOUT_LLM_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "APPSCOUT_LLM_TIMEOUT_SECONDS",
                    value: raw,
                })?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        let temperature = match non_blank("APPSCOUT_TEMPERATURE") {
            Some(raw) => raw
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|value| (0.0..=2.0).contains(value))
                .ok_or(ConfigError::InvalidValue {
                    name: "APPSCOUT_TEMPERATURE",
                    value: raw,
                })?,
            None => 0.0,
        };

        Ok(Self {
            telegram_token: non_blank(TELEGRAM_TOKEN_VAR),
            llm: LlmSettings {
                api_key: non_blank(GROQ_API_KEY_VAR),
                model: non_blank("APPSCOUT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: non_blank("APPSCOUT_LLM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                temperature,
                timeout: Duration::from_secs(timeout_seconds),
            },
        })
    }

    pub fn require_credentials(&self) -> Result<Credentials, ConfigError> {
        let telegram_token = self
            .telegram_token
            .clone()
            .ok_or(ConfigError::MissingVar(TELEGRAM_TOKEN_VAR))?;
        let llm_api_key = self
            .llm
            .api_key
            .clone()
            .ok_or(ConfigError::MissingVar(GROQ_API_KEY_VAR))?;

        Ok(Credentials {
            telegram_token,
            llm_api_key,
        })
    }
}
