use serde::Deserialize;
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// CSV file path or http(s) URL.
    pub data_source: String,
    /// Products to analyze; empty means every product in the table.
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Where the JSON batch report is written, if anywhere.
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_true")]
    pub generate_sample_if_missing: bool,
    #[serde(default)]
    pub sample_seed: Option<u64>,
}

fn default_db_path() -> String {
    "profiler.db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(content)?;
        if config.data_source.trim().is_empty() {
            return Err(ConfigError::Invalid("data_source must not be empty".into()));
        }
        Ok(config)
    }
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    AppConfig::from_json(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let cfg = AppConfig::from_json(r#"{ "data_source": "sales.csv" }"#).unwrap();
        assert_eq!(cfg.data_source, "sales.csv");
        assert!(cfg.products.is_empty());
        assert_eq!(cfg.db_path, "profiler.db");
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.generate_sample_if_missing);
        assert_eq!(cfg.output_path, None);
        assert_eq!(cfg.sample_seed, None);
    }

    #[test]
    fn full_config() {
        let cfg = AppConfig::from_json(
            r#"{
                "data_source": "https://example.com/sales.csv",
                "products": ["RoseBox_Z"],
                "db_path": "/tmp/r.db",
                "output_path": "report.json",
                "log_level": "debug",
                "generate_sample_if_missing": false,
                "sample_seed": 9
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.products, vec!["RoseBox_Z"]);
        assert_eq!(cfg.output_path.as_deref(), Some("report.json"));
        assert!(!cfg.generate_sample_if_missing);
        assert_eq!(cfg.sample_seed, Some(9));
    }

    #[test]
    fn empty_source_is_rejected() {
        assert!(matches!(
            AppConfig::from_json(r#"{ "data_source": " " }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(AppConfig::from_json("{}"), Err(ConfigError::Json(_))));
    }
}
