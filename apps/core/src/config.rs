//! Runtime configuration, resolved once at startup from the environment.
//!
//! Every remote backend is optional. With nothing configured the service
//! scores with the local rule engine only.

use crate::error::{AppError, AppResult};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 3_000;
const MAX_REMOTE_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_CHAT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    /// Bunyan-style JSON lines.
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("Unknown LOG_FORMAT '{}'", other))),
        }
    }
}

/// Settings for an OpenAI-compatible chat completion backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatModelConfig {
    pub api_key: String,
    pub base_url: Url,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of an external assessment service exposing `POST /assess`.
    pub assessment_service_url: Option<Url>,
    pub chat_model: Option<ChatModelConfig>,
    /// Upper bound on any single remote scoring attempt.
    pub remote_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assessment_service_url: None,
            chat_model: None,
            remote_timeout: Duration::from_millis(DEFAULT_REMOTE_TIMEOUT_MS),
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Loads `.env` (if present) and then reads the process environment.
    pub fn load() -> AppResult<Self> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Reads configuration from the process environment only.
    pub fn from_env() -> AppResult<Self> {
        let assessment_service_url = non_empty_var("ASSESSMENT_SERVICE_URL")
            .map(|raw| parse_http_url("ASSESSMENT_SERVICE_URL", &raw))
            .transpose()?;

        let chat_model = match non_empty_var("OPENAI_API_KEY") {
            Some(api_key) => {
                let base = non_empty_var("OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_CHAT_BASE_URL.to_string());
                Some(ChatModelConfig {
                    api_key,
                    base_url: parse_http_url("OPENAI_BASE_URL", &base)?,
                    model: non_empty_var("OPENAI_MODEL")
                        .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
                })
            }
            None => None,
        };

        let remote_timeout = match non_empty_var("REMOTE_TIMEOUT_MS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_millis(DEFAULT_REMOTE_TIMEOUT_MS),
        };

        let log_format = non_empty_var("LOG_FORMAT")
            .map(|raw| raw.parse())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            assessment_service_url,
            chat_model,
            remote_timeout,
            log_format,
        })
    }

    pub fn has_remote_backend(&self) -> bool {
        self.assessment_service_url.is_some() || self.chat_model.is_some()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_http_url(key: &str, raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AppError::Config(format!(
            "{} must use http or https, got '{}'",
            key, scheme
        ))),
    }
}

fn parse_timeout(raw: &str) -> AppResult<Duration> {
    let ms: u64 = raw
        .parse()
        .map_err(|_| AppError::Config(format!("REMOTE_TIMEOUT_MS must be an integer, got '{}'", raw)))?;
    if ms == 0 || ms > MAX_REMOTE_TIMEOUT_MS {
        return Err(AppError::Config(format!(
            "REMOTE_TIMEOUT_MS must be between 1 and {}, got {}",
            MAX_REMOTE_TIMEOUT_MS, ms
        )));
    }
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 6] = [
        "ASSESSMENT_SERVICE_URL",
        "OPENAI_API_KEY",
        "OPENAI_BASE_URL",
        "OPENAI_MODEL",
        "REMOTE_TIMEOUT_MS",
        "LOG_FORMAT",
    ];

    fn with_env<F: FnOnce()>(values: &[(&str, &str)], f: F) {
        let vars: Vec<(&str, Option<&str>)> = VARS
            .iter()
            .map(|key| {
                let value = values.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
                (*key, value)
            })
            .collect();
        temp_env::with_vars(vars, f);
    }

    #[test]
    fn test_defaults_without_environment() {
        with_env(&[], || {
            let config = AppConfig::from_env().unwrap();
            assert_eq!(config, AppConfig::default());
            assert!(!config.has_remote_backend());
        });
    }

    #[test]
    fn test_full_environment() {
        with_env(
            &[
                ("ASSESSMENT_SERVICE_URL", "http://localhost:8000"),
                ("OPENAI_API_KEY", "sk-test"),
                ("OPENAI_MODEL", "gpt-4o-mini"),
                ("REMOTE_TIMEOUT_MS", "1500"),
                ("LOG_FORMAT", "json"),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                assert_eq!(
                    config.assessment_service_url.unwrap().as_str(),
                    "http://localhost:8000/"
                );
                let chat = config.chat_model.unwrap();
                assert_eq!(chat.model, "gpt-4o-mini");
                assert_eq!(chat.base_url.as_str(), "https://api.openai.com/v1");
                assert_eq!(config.remote_timeout, Duration::from_millis(1500));
                assert_eq!(config.log_format, LogFormat::Json);
            },
        );
    }

    #[test]
    fn test_rejects_bad_url() {
        with_env(&[("ASSESSMENT_SERVICE_URL", "ftp://example.com")], || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });
        with_env(&[("ASSESSMENT_SERVICE_URL", "not a url")], || {
            assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));
        });
    }

    #[test]
    fn test_rejects_unbounded_timeout() {
        for raw in ["0", "60000", "soon"] {
            with_env(&[("REMOTE_TIMEOUT_MS", raw)], || {
                assert!(AppConfig::from_env().is_err(), "{raw}");
            });
        }
    }
}
