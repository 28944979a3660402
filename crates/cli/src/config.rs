//! Layered configuration: defaults, then `config/vitalrisk.toml`, then
//! `VITALRISK_*` environment variables (`__` separates nested keys, e.g.
//! `VITALRISK_MODEL__EXPECTED_HASH`).

use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/vitalrisk.toml";
pub const ENV_PREFIX: &str = "VITALRISK";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub health: HealthConfig,
    pub survey: SurveyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Pinned artifact hash; loading fails on mismatch when set
    pub expected_hash: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/diabetes_linear.json"),
            expected_hash: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// JSON fixture seeding the in-memory provider
    pub fixture: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    /// Survey answers (TOML or JSON)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (or the default location when present) and the
    /// process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let resolved = match path {
            Some(path) => {
                if !path.exists() {
                    bail!(
                        "Configuration file {} not found (specified via --config)",
                        path.display()
                    );
                }
                Some(path.to_path_buf())
            }
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_PATH);
                default.exists().then_some(default)
            }
        };

        let mut builder = Config::builder();
        if let Some(path) = &resolved {
            builder = builder.add_source(File::from(path.as_path()));
        }
        builder = builder.add_source(env);

        Ok(builder.build()?.try_deserialize()?)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_from(vars: &[(&str, &str)]) -> Environment {
        let map: ::config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(AppConfig::load_with_env(Some(&missing), env_from(&[])).is_err());

        let config: AppConfig = Config::builder()
            .add_source(env_from(&[]))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.model.path, PathBuf::from("models/diabetes_linear.json"));
    }

    #[test]
    fn test_file_values() {
        let file = toml_file(
            r#"
[model]
path = "models/forest.json"
expected_hash = "abc123"

[health]
fixture = "data/health_fixture.json"

[logging]
format = "json"
"#,
        );
        let config = AppConfig::load_with_env(Some(file.path()), env_from(&[])).unwrap();
        assert_eq!(config.model.path, PathBuf::from("models/forest.json"));
        assert_eq!(config.model.expected_hash.as_deref(), Some("abc123"));
        assert_eq!(
            config.health.fixture,
            Some(PathBuf::from("data/health_fixture.json"))
        );
        assert_eq!(config.survey.path, None);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = toml_file("[logging]\nlevel = \"warn\"\n");
        let env = env_from(&[
            ("VITALRISK_LOGGING__LEVEL", "debug"),
            ("VITALRISK_SURVEY__PATH", "answers.toml"),
        ]);
        let config = AppConfig::load_with_env(Some(file.path()), env).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.survey.path, Some(PathBuf::from("answers.toml")));
    }
}
