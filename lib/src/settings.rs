//! Layered configuration.
//!
//! Sources, later ones winning: built-in defaults, `config/default`,
//! `config/local`, an optional extra file, then `PORTER_FARE__SECTION__KEY`
//! environment variables.

use crate::fare::estimator::{EstimatorSettings, MaxFeaturesSetting};
use crate::fare::simulator::DEFAULT_CORPUS_SIZE;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const ENV_PREFIX: &str = "PORTER_FARE";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub corpus: CorpusSettings,
    pub estimator: EstimatorSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub size: usize,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_CORPUS_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Settings {
    /// Loads every layer, with `extra` (if any) above the `config/` files.
    pub fn load(extra: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_from(Path::new("config"), extra)
    }

    /// Same as [`Settings::load`] with `default` and `local` read from `dir`.
    pub fn load_from(dir: &Path, extra: Option<&Path>) -> Result<Self, SettingsError> {
        let default = dir.join("default");
        let local = dir.join("local");
        let mut builder = Config::builder()
            .add_source(File::with_name(&default.to_string_lossy()).required(false))
            .add_source(File::with_name(&local.to_string_lossy()).required(false));
        if let Some(path) = extra {
            builder = builder.add_source(File::from(path));
        }
        Self::build(builder.add_source(environment()))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let est = &self.estimator;
        if est.n_estimators == 0 {
            return Err(SettingsError::Invalid {
                key: "estimator.n_estimators",
                reason: "must be at least 1".to_string(),
            });
        }
        if est.min_samples_split < 2 {
            return Err(SettingsError::Invalid {
                key: "estimator.min_samples_split",
                reason: format!("must be at least 2, got {}", est.min_samples_split),
            });
        }
        if est.max_depth == Some(0) {
            return Err(SettingsError::Invalid {
                key: "estimator.max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if let MaxFeaturesSetting::Fraction(f) = est.max_features {
            if !(f > 0.0 && f <= 1.0) {
                return Err(SettingsError::Invalid {
                    key: "estimator.max_features",
                    reason: format!("fraction {} not in (0, 1]", f),
                });
            }
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::HandleUnknown;
    use config::FileFormat;
    use std::collections::HashMap;

    fn from_toml(toml: &str) -> Result<Settings, SettingsError> {
        Settings::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_defaults() {
        let s = from_toml("").unwrap();
        assert_eq!(s.corpus.size, 200);
        assert_eq!(s.estimator, EstimatorSettings::default());
        assert_eq!(s.logging.level, "info");
        assert_eq!(s.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_file_overrides() {
        let s = from_toml(
            r#"
            [corpus]
            size = 500

            [estimator]
            n_estimators = 25
            max_features = 0.5
            bootstrap = true
            handle_unknown = "ignore"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(s.corpus.size, 500);
        assert_eq!(s.estimator.n_estimators, 25);
        assert_eq!(s.estimator.max_features, MaxFeaturesSetting::Fraction(0.5));
        assert!(s.estimator.bootstrap);
        assert_eq!(s.estimator.handle_unknown, HandleUnknown::Ignore);
        assert_eq!(s.estimator.seed, 42);
        assert_eq!(s.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_environment_overrides_file() {
        let vars: HashMap<String, String> = [
            ("PORTER_FARE__ESTIMATOR__SEED", "7"),
            ("PORTER_FARE__CORPUS__SIZE", "50"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let s = Settings::build(
            Config::builder()
                .add_source(File::from_str("[estimator]\nseed = 1", FileFormat::Toml))
                .add_source(environment().source(Some(vars))),
        )
        .unwrap();
        assert_eq!(s.estimator.seed, 7);
        assert_eq!(s.corpus.size, 50);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for toml in [
            "[estimator]\nn_estimators = 0",
            "[estimator]\nmin_samples_split = 1",
            "[estimator]\nmax_features = 1.5",
            "[estimator]\nmax_depth = 0",
        ] {
            assert!(
                matches!(from_toml(toml), Err(SettingsError::Invalid { .. })),
                "{}",
                toml
            );
        }
    }

    #[test]
    fn test_unknown_policy_name_fails_to_load() {
        assert!(matches!(
            from_toml("[estimator]\nhandle_unknown = \"guess\""),
            Err(SettingsError::Load(_))
        ));
    }
}
