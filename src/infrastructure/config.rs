//! 配置基础设施
//!
//! 配置只来自环境变量：`HOST`、`PORT`、`LOG_LEVEL`、`API_KEY`。

use std::env;

use thiserror::Error;
use tracing::Level;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// 设置后 `/api/products` 需要 `x-api-key` 请求头
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            api_key: None,
        }
    }
}

impl AppConfig {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// 从任意键值来源加载配置，空值视为未设置
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = read("HOST") {
            config.host = value;
        }
        if let Some(value) = read("PORT") {
            config.port = value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "PORT".to_string(),
                    value: value.clone(),
                })?;
        }
        if let Some(value) = read("LOG_LEVEL") {
            config.log_level = value.trim().to_lowercase();
        }
        config.api_key = read("API_KEY");

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level()?;
        if self.host.trim().is_empty() {
            return Err(ConfigError::Validation("host must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn level(&self) -> Result<Level, ConfigError> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| ConfigError::Validation(format!("unknown log level `{}`", self.log_level)))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_source(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_environment() {
        let config = load(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.level().unwrap(), Level::INFO);
    }

    #[test]
    fn overrides_are_read_and_blank_values_ignored() {
        let config = load(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("LOG_LEVEL", "DEBUG"),
            ("API_KEY", "   "),
        ])
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.level().unwrap(), Level::DEBUG);
        assert_eq!(config.api_key, None);
    }

    #[test]
    fn invalid_port_is_reported_with_its_key() {
        let err = load(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidEnvOverride {
                key: "PORT".to_string(),
                value: "eighty".to_string(),
            }
        );
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        assert!(matches!(
            load(&[("LOG_LEVEL", "loud")]),
            Err(ConfigError::Validation(_))
        ));
    }
}
