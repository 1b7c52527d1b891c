//! Layered configuration for shelf.
//!
//! Values are read from, in increasing priority:
//!
//! 1. built-in defaults,
//! 2. a configuration file (TOML, YAML or JSON, picked by extension),
//! 3. environment variables prefixed with `SHELF_`, using `__` to reach
//!    nested keys (`SHELF_DECODER__TIMEOUT_MS=500`).

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use shelf_decode::Limits;

use crate::error::{ErrorKind, Result};

const ENV_PREFIX: &str = "SHELF_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub resolution: ResolutionConfig,
    pub decoder: DecoderConfig,
}

/// Title resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Minimum similarity, in `[0, 1]`, for a cached title to count as a match.
    pub threshold: f64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            threshold: shelf_cache::DEFAULT_ACCEPTANCE_THRESHOLD,
        }
    }
}

/// Sandbox limits for site decoding scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub timeout_ms: u64,
    pub memory_limit_bytes: usize,
    pub max_stack_bytes: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Limits::default().into()
    }
}

impl From<Limits> for DecoderConfig {
    fn from(limits: Limits) -> Self {
        Self {
            timeout_ms: u64::try_from(limits.timeout.as_millis()).unwrap_or(u64::MAX),
            memory_limit_bytes: limits.memory_limit,
            max_stack_bytes: limits.max_stack_size,
        }
    }
}

impl From<&DecoderConfig> for Limits {
    fn from(config: &DecoderConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            memory_limit: config.memory_limit_bytes,
            max_stack_size: config.max_stack_bytes,
        }
    }
}

impl Config {
    /// Location of the per-user configuration file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "shelf").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load and validate configuration.
    ///
    /// With `path`, that file must exist. Without, the file at
    /// [`default_path`](Self::default_path) is used when present and
    /// skipped otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.is_file()),
        };
        let figment = Self::figment(path.as_deref())?.merge(Env::prefixed(ENV_PREFIX).split("__"));
        let config = Self::from_figment(figment)?;
        tracing::debug!(path = ?path, "Loaded configuration");
        Ok(config)
    }

    /// Defaults layered under the file at `path`, without the environment.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let Some(path) = path else {
            return Ok(figment);
        };
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "Configuration file not found");
            exn::bail!(ErrorKind::Load);
        }
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        Ok(match extension.as_deref() {
            Some("toml") => figment.merge(Toml::file(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
        })
    }

    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.resolution.threshold) {
            exn::bail!(ErrorKind::Invalid {
                field: "resolution.threshold",
                reason: "must be between 0 and 1",
            });
        }
        if self.decoder.timeout_ms == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "decoder.timeout_ms",
                reason: "must be greater than 0",
            });
        }
        if self.decoder.memory_limit_bytes == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "decoder.memory_limit_bytes",
                reason: "must be greater than 0",
            });
        }
        if self.decoder.max_stack_bytes == 0 {
            exn::bail!(ErrorKind::Invalid {
                field: "decoder.max_stack_bytes",
                reason: "must be greater than 0",
            });
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits::from(&self.decoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_figment(Config::figment(None).unwrap()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.resolution.threshold, 0.9);
        assert_eq!(config.decoder.timeout_ms, 1000);
        assert_eq!(config.decoder.memory_limit_bytes, 32 * 1024 * 1024);
        assert_eq!(config.decoder.max_stack_bytes, 1024 * 1024);
        assert_eq!(config.limits(), Limits::default());
    }

    #[rstest]
    #[case(".toml", "[resolution]\nthreshold = 0.75\n[decoder]\ntimeout_ms = 250\n")]
    #[case(".yaml", "resolution:\n  threshold: 0.75\ndecoder:\n  timeout_ms: 250\n")]
    #[case(".yml", "resolution:\n  threshold: 0.75\ndecoder:\n  timeout_ms: 250\n")]
    #[case(".json", r#"{"resolution": {"threshold": 0.75}, "decoder": {"timeout_ms": 250}}"#)]
    fn test_file_formats(#[case] suffix: &str, #[case] contents: &str) {
        let file = file_with(suffix, contents);
        let config = Config::from_figment(Config::figment(Some(file.path())).unwrap()).unwrap();
        assert_eq!(config.resolution.threshold, 0.75);
        assert_eq!(config.limits().timeout, Duration::from_millis(250));
        // Unset keys keep their defaults.
        assert_eq!(config.decoder.max_stack_bytes, DecoderConfig::default().max_stack_bytes);
    }

    #[test]
    fn test_later_layers_win() {
        let file = file_with(".toml", "[decoder]\ntimeout_ms = 250\n");
        let figment = Config::figment(Some(file.path()))
            .unwrap()
            .merge(Toml::string("[decoder]\ntimeout_ms = 500\n"));
        assert_eq!(Config::from_figment(figment).unwrap().decoder.timeout_ms, 500);
    }

    #[test]
    fn test_load_explicit_path() {
        let file = file_with(".toml", "[resolution]\nthreshold = 0.5\n");
        assert_eq!(Config::load(Some(file.path())).unwrap().resolution.threshold, 0.5);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = Config::load(Some(missing.as_path())).unwrap_err();
        assert_eq!(*err, ErrorKind::Load);
    }

    #[test]
    fn test_unsupported_format() {
        let file = file_with(".ini", "threshold=1");
        let err = Config::figment(Some(file.path())).unwrap_err();
        assert_eq!(*err, ErrorKind::UnsupportedFormat(file.path().to_path_buf()));
    }

    #[test]
    fn test_malformed_file() {
        let file = file_with(".toml", "[decoder]\ntimeout_ms = \"soon\"\n");
        let err = Config::from_figment(Config::figment(Some(file.path())).unwrap()).unwrap_err();
        assert_eq!(*err, ErrorKind::Load);
    }

    #[rstest]
    #[case("[resolution]\nthreshold = 1.5\n", "resolution.threshold")]
    #[case("[resolution]\nthreshold = -0.1\n", "resolution.threshold")]
    #[case("[decoder]\ntimeout_ms = 0\n", "decoder.timeout_ms")]
    #[case("[decoder]\nmemory_limit_bytes = 0\n", "decoder.memory_limit_bytes")]
    #[case("[decoder]\nmax_stack_bytes = 0\n", "decoder.max_stack_bytes")]
    fn test_invalid_values(#[case] contents: &str, #[case] field: &str) {
        let figment = Config::figment(None).unwrap().merge(Toml::string(contents));
        let err = Config::from_figment(figment).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { field: f, .. } if *f == field));
    }

    #[test]
    fn test_nan_threshold_is_invalid() {
        let mut config = Config::default();
        config.resolution.threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_path_names_config_toml() {
        if let Some(path) = Config::default_path() {
            assert_eq!(path.file_name().and_then(|name| name.to_str()), Some("config.toml"));
        }
    }
}
