//! Configuration Loader
//!
//! Layers defaults, an optional TOML/YAML/JSON file and `MODERATION_*`
//! environment variables into a validated [`ModerationConfig`].

use super::error::ConfigResult;
use super::ModerationConfig;
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix, e.g. `MODERATION_STRICT=true`
pub const ENV_PREFIX: &str = "MODERATION";

/// Nested key separator, e.g. `MODERATION_STATUS__APPROVED=live`
pub const ENV_SEPARATOR: &str = "__";

/// Default file location relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config/moderation.toml";

/// Builder that resolves a [`ModerationConfig`] from its sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_overrides: Option<config::Map<String, String>>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an optional configuration file; a missing file is not an error
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use the given variables instead of the process environment
    ///
    /// Keys keep their `MODERATION_` prefix. Mainly useful in tests, where
    /// mutating the process environment races with other tests.
    pub fn with_env_overrides<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_overrides = Some(
            vars.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Load from `config/moderation.toml` (if present) and the process environment
    pub fn load_default() -> ConfigResult<ModerationConfig> {
        Self::new().with_file(DEFAULT_CONFIG_FILE).load()
    }

    /// Resolve and validate the configuration
    pub fn load(self) -> ConfigResult<ModerationConfig> {
        let mut builder = Config::builder();

        if let Some(ref path) = self.file {
            debug!(path = %path.display(), "Adding moderation configuration file source");
            builder = builder.add_source(File::from(path.as_path()).required(false));
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(self.env_overrides);
        builder = builder.add_source(environment);

        let config: ModerationConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            strict = config.strict,
            pending = %config.status.pending,
            approved = %config.status.approved,
            rejected = %config.status.rejected,
            postponed = %config.status.postponed,
            "Moderation configuration loaded"
        );

        Ok(config)
    }
}
