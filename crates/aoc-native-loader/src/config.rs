//! Loader configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::extract::DEFAULT_TEMP_PREFIX;
use crate::platform::MatchPolicy;

/// Base name the packaging step gives the solver artifact.
pub const DEFAULT_BASE_NAME: &str = "advent_of_code_native";

/// Overrides [`LoaderConfig::base_name`].
pub const ENV_BASE_NAME: &str = "AOC_NATIVE_BASE_NAME";
/// Overrides [`LoaderConfig::match_policy`]: `strict` or `permissive`.
pub const ENV_MATCH_POLICY: &str = "AOC_NATIVE_MATCH_POLICY";
/// Sets [`LoaderConfig::resource_dir`].
pub const ENV_RESOURCE_DIR: &str = "AOC_NATIVE_RESOURCE_DIR";

/// Configuration for locating and loading the solver module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Artifact base name; see [`crate::library_name`] for the full grammar.
    pub base_name: String,
    /// How architecture names are matched.
    pub match_policy: MatchPolicy,
    /// Prefix of extracted temp files.
    pub temp_prefix: String,
    /// Load artifacts from this directory instead of the embedded table.
    pub resource_dir: Option<PathBuf>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl LoaderConfig {
    /// Exact architecture matching (default).
    pub fn strict() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_owned(),
            match_policy: MatchPolicy::Strict,
            temp_prefix: DEFAULT_TEMP_PREFIX.to_owned(),
            resource_dir: None,
        }
    }

    /// Legacy architecture fallback.
    pub fn permissive() -> Self {
        Self {
            match_policy: MatchPolicy::Permissive,
            ..Self::strict()
        }
    }

    /// Use `base_name` for the artifact.
    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    /// Read artifacts from `dir`.
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }

    /// Strict defaults overridden by `AOC_NATIVE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown match policy or an unusable
    /// base name.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`LoaderConfig::from_env`], reading variables through `lookup`.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// See [`LoaderConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let (config, errors) = Self::from_lookup_lenient(lookup);
        match errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(config),
        }
    }

    /// Like [`LoaderConfig::from_env`], but an invalid variable keeps its
    /// default and is reported alongside the config instead.
    pub fn from_env_lenient() -> (Self, Vec<ConfigError>) {
        Self::from_lookup_lenient(|key| std::env::var(key).ok())
    }

    /// Like [`LoaderConfig::from_env_lenient`], reading variables through
    /// `lookup`.
    pub fn from_lookup_lenient(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<ConfigError>) {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::strict();
        let mut errors = Vec::new();

        if let Some(base_name) = var(ENV_BASE_NAME) {
            let candidate = config.clone().with_base_name(base_name.trim());
            match candidate.validate() {
                Ok(()) => config = candidate,
                Err(error) => errors.push(error),
            }
        }
        if let Some(policy) = var(ENV_MATCH_POLICY) {
            match policy.parse::<MatchPolicy>() {
                Ok(policy) => config.match_policy = policy,
                Err(error) => errors.push(error),
            }
        }
        if let Some(dir) = var(ENV_RESOURCE_DIR) {
            config.resource_dir = Some(PathBuf::from(dir));
        }

        (config, errors)
    }

    /// Check that the base name can form an artifact filename.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseName`] for an empty name or one
    /// containing a path separator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = &self.base_name;
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(ConfigError::InvalidBaseName(name.clone()));
        }
        Ok(())
    }
}
