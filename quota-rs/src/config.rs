use crate::constraints::{Constraints, PlanCatalog};
use crate::error::{QuotaError, Result};
use crate::size::ByteSize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Environment variable prefix, e.g. `QUOTA__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "QUOTA";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
    /// Plan templates by name
    pub plans: HashMap<String, Constraints>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Storage the platform can hand out to a single Space's mailboxes.
    /// Caps the mailbox storage budget together with the Space's own limit.
    pub platform_available_storage: ByteSize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty`, `compact` or `json`
    pub format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            platform_available_storage: ByteSize::gib(100),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        toml::from_str(&content).map_err(|e| QuotaError::Config(e.to_string()))
    }

    /// Layer `QUOTA__*` environment variables over an optional TOML file
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::from(path.as_ref()).format(::config::FileFormat::Toml),
            );
        }

        builder
            .add_source(::config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| QuotaError::Config(e.to_string()))
    }

    pub fn plan_catalog(&self) -> PlanCatalog {
        PlanCatalog::new(self.plans.clone())
    }
}
