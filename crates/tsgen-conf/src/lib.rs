//! Per-invocation generator settings.
//!
//! Hosts that already hold the values (the usual case for a compiler plugin)
//! construct [`Settings`] programmatically. The layered TOML loader exists
//! for standalone use: an optional user-level config file is applied first,
//! then the project's `tsgen.toml`, so project settings win.

mod version;

use camino::Utf8Path;
use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
use serde::Deserialize;
use thiserror::Error;

pub use version::LanguageVersion;
pub use version::ParseLanguageVersionError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
    #[error("Invalid language version")]
    LanguageVersion(#[from] ParseLanguageVersionError),
}

/// Settings for one generator invocation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root namespace generated types are placed under.
    pub root_namespace: String,
    /// Host language version the generated code must parse under.
    pub language_version: LanguageVersion,
    /// Suppress checksum attributes in emitted metadata.
    pub suppress_checksum_attributes: bool,
    /// Block at startup until a debugger attaches.
    pub wait_for_debugger: bool,
    /// Worker-pool ceiling for the generation batches. `None` defers to the
    /// runtime's default degree of parallelism.
    pub max_parallelism: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_namespace: "App".to_string(),
            language_version: LanguageVersion::LATEST,
            suppress_checksum_attributes: false,
            wait_for_debugger: false,
            max_parallelism: None,
        }
    }
}

impl Settings {
    pub fn new(project_root: &Utf8Path, user_config_path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder =
                builder.add_source(File::new(path.as_str(), FileFormat::Toml).required(false));
        }

        let project_config = project_root.join("tsgen.toml");
        builder =
            builder.add_source(File::new(project_config.as_str(), FileFormat::Toml).required(false));

        let settings: Settings = builder.build()?.try_deserialize()?;
        tracing::debug!(?settings, "loaded generator settings");
        Ok(settings)
    }
}
