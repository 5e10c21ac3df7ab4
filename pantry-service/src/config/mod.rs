use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Recipes are generated deterministically unless overridden.
const DEFAULT_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Clone, Deserialize)]
pub struct PantryConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub models: ModelConfig,
    pub google: GoogleConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Which backend serves recipe generation.
    pub provider: ProviderKind,
    /// Model identifier, e.g. gemini-2.0-flash.
    pub text_model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    Mock,
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(format!("Unknown GENAI_PROVIDER '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    /// Missing keys are tolerated at startup; generation fails at request time.
    pub api_key: Option<String>,
}

impl PantryConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("GOOGLE_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(PantryConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("pantry_db"), is_prod)?,
            },
            models: ModelConfig {
                provider: get_env("GENAI_PROVIDER", Some("gemini"), false)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
                text_model: get_env("GENAI_TEXT_MODEL", Some("gemini-2.0-flash"), is_prod)?,
                temperature: parse_temperature(&get_env(
                    "GENAI_TEMPERATURE",
                    Some(&DEFAULT_TEMPERATURE.to_string()),
                    false,
                )?)?,
            },
            google: GoogleConfig { api_key },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
        })
    }

    /// Configuration for tests and local tooling: in-process defaults, random port.
    pub fn for_tests() -> Self {
        PantryConfig {
            common: core_config::Config {
                port: 0,
                ..Default::default()
            },
            mongodb: MongoConfig {
                uri: "mongodb://localhost:27017".to_string(),
                database: format!("pantry_test_{}", uuid::Uuid::new_v4()),
            },
            models: ModelConfig {
                provider: ProviderKind::Mock,
                text_model: "gemini-2.0-flash".to_string(),
                temperature: DEFAULT_TEMPERATURE,
            },
            google: GoogleConfig { api_key: None },
            otlp_endpoint: None,
        }
    }
}

fn parse_temperature(raw: &str) -> Result<f32, AppError> {
    raw.trim()
        .parse::<f32>()
        .ok()
        .filter(|t| (0.0..=2.0).contains(t))
        .ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!(
                "GENAI_TEMPERATURE must be a number between 0.0 and 2.0, got '{}'",
                raw
            ))
        })
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("Gemini".parse::<ProviderKind>(), Ok(ProviderKind::Gemini));
        assert_eq!("mock".parse::<ProviderKind>(), Ok(ProviderKind::Mock));
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn temperature_must_be_a_number_in_range() {
        assert_eq!(parse_temperature("0").unwrap(), 0.0);
        assert_eq!(parse_temperature(" 0.7 ").unwrap(), 0.7);
        assert!(matches!(parse_temperature("warm"), Err(AppError::ConfigError(_))));
        assert!(matches!(parse_temperature(""), Err(AppError::ConfigError(_))));
        assert!(matches!(parse_temperature("3.5"), Err(AppError::ConfigError(_))));
        assert!(matches!(parse_temperature("NaN"), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn test_config_uses_random_port_and_mock_provider() {
        let config = PantryConfig::for_tests();
        assert_eq!(config.common.port, 0);
        assert_eq!(config.models.provider, ProviderKind::Mock);
        assert_eq!(config.models.temperature, 0.0);
        assert!(config.google.api_key.is_none());
    }
}
