use openyolo_model::FingerprintAlgorithm;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "OPENYOLO_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "OPENYOLO_CONFIG_JSON";
pub const DEFAULT_CONFIG_FILE: &str = "openyoloctl.toml";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML config {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid JSON config {origin}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("self_package must not be empty when set")]
    EmptySelfPackage,
}

/// Source that produced the CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CtlConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
    Flag(PathBuf),
}

/// Settings shared by every `openyoloctl` command. Command-line flags win
/// over anything set here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CtlConfig {
    /// Algorithm used when minting or resolving Android domains.
    pub fingerprint_algorithm: FingerprintAlgorithm,
    /// Directory laid out as `<root>/<package>/<cert>.der`, used by `resolve`
    /// and `self` when `--store` is not given.
    pub signature_store: Option<PathBuf>,
    /// Tracing filter directive, consulted when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
    /// Package name reported as the running application by `self`.
    pub self_package: Option<String>,
}

impl CtlConfig {
    /// Evaluation order:
    /// 1) `$OPENYOLO_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$OPENYOLO_CONFIG_JSON` (inline JSON),
    /// 3) `./openyoloctl.toml`,
    /// 4) defaults.
    pub fn load_from_env() -> Result<(Self, CtlConfigSource), ConfigLoadError>
    {
        if let Ok(path_str) = env::var(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, CtlConfigSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let config = Self::parse_json(&raw, CONFIG_JSON_ENV)?;
            return Ok((config, CtlConfigSource::EnvInline));
        }

        let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            let config = Self::load_from_file(&default_path)?;
            return Ok((config, CtlConfigSource::File(default_path)));
        }

        Ok((Self::default(), CtlConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                Self::parse_json(&contents, &path.display().to_string())
            }
            _ => Self::parse_toml(&contents, path),
        }
    }

    fn parse_toml(
        contents: &str,
        path: &Path,
    ) -> Result<Self, ConfigLoadError> {
        let config: Self =
            toml::from_str(contents).map_err(|source| ConfigLoadError::Toml {
                path: path.to_path_buf(),
                source,
            })?;
        config.validated()
    }

    fn parse_json(
        contents: &str,
        origin: &str,
    ) -> Result<Self, ConfigLoadError> {
        let config: Self = serde_json::from_str(contents).map_err(|source| {
            ConfigLoadError::Json {
                origin: origin.to_string(),
                source,
            }
        })?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigLoadError> {
        if self
            .self_package
            .as_deref()
            .is_some_and(|package| package.trim().is_empty())
        {
            return Err(ConfigLoadError::EmptySelfPackage);
        }
        Ok(self)
    }
}
