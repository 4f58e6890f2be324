//! Configuration loader with layered sources
//!
//! Loads configuration from, in increasing priority:
//! 1. Default values
//! 2. User-level config: ~/.avaliador/avaliador.toml
//! 3. Project-level config: ./avaliador.toml
//! 4. An explicit file (`--config`), which must exist
//! 5. Environment overrides (`AVALIADOR_*`)
//! 6. Command-line overrides
//!
//! Files are merged key by key, so a later file only replaces the keys it
//! sets.

use crate::config::schema::AvaliadorConfig;
use crate::error::{AvaliadorError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tooling::config::{build_env_key, get_env, get_env_parse};
use tracing::{debug, info};

/// Prefix of the environment overrides.
pub const ENV_PREFIX: &str = "AVALIADOR_";

/// Single-value overrides applied on top of the merged files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub reviews: Option<PathBuf>,
    pub max_attempts_per_stage: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

impl ConfigOverrides {
    /// Read `AVALIADOR_PROVIDER`, `AVALIADOR_MODEL`, `AVALIADOR_API_BASE`,
    /// `AVALIADOR_REVIEWS`, `AVALIADOR_MAX_ATTEMPTS` and
    /// `AVALIADOR_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let key = |name: &str| build_env_key(ENV_PREFIX, name);

        Ok(Self {
            provider: get_env(&key("provider"))?,
            model: get_env(&key("model"))?,
            api_base: get_env(&key("api_base"))?,
            reviews: get_env(&key("reviews"))?.map(PathBuf::from),
            max_attempts_per_stage: get_env_parse(&key("max_attempts"))?,
            request_timeout_secs: get_env_parse(&key("timeout_secs"))?,
        })
    }

    pub fn apply(&self, config: &mut AvaliadorConfig) {
        if let Some(provider) = &self.provider {
            config.llm.provider = provider.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(api_base) = &self.api_base {
            config.llm.api_base = Some(api_base.clone());
        }
        if let Some(reviews) = &self.reviews {
            config.reviews.path = reviews.clone();
        }
        if let Some(attempts) = self.max_attempts_per_stage {
            config.pipeline.max_attempts_per_stage = attempts;
        }
        if let Some(timeout) = self.request_timeout_secs {
            config.pipeline.request_timeout_secs = timeout;
        }
    }
}

/// Configuration loader that merges user, project and explicit files
pub struct ConfigLoader {
    user_config_path: Option<PathBuf>,
    project_config_path: PathBuf,
    explicit_config_path: Option<PathBuf>,
    read_env: bool,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            user_config_path: Self::user_config_path(),
            project_config_path: PathBuf::from("avaliador.toml"),
            explicit_config_path: None,
            read_env: true,
        }
    }

    /// Loader that reads only `path`: no user or project files and no
    /// environment overrides.
    pub fn isolated(path: impl Into<PathBuf>) -> Self {
        Self {
            user_config_path: None,
            project_config_path: PathBuf::new(),
            explicit_config_path: Some(path.into()),
            read_env: false,
        }
    }

    /// Add an explicit config file; it is required to exist.
    pub fn with_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_config_path = Some(path.into());
        self
    }

    /// User-level config path (~/.avaliador/avaliador.toml)
    fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".avaliador").join("avaliador.toml"))
    }

    pub fn get_user_config_path(&self) -> Option<&Path> {
        self.user_config_path.as_deref()
    }

    pub fn get_project_config_path(&self) -> &Path {
        &self.project_config_path
    }

    /// Load, merge and resolve the configuration.
    ///
    /// `cli` overrides are applied last. The result is not validated; call
    /// [`AvaliadorConfig::validate`] before use.
    pub async fn load(&self, cli: &ConfigOverrides) -> Result<AvaliadorConfig> {
        let mut merged = toml::Value::Table(toml::map::Map::new());
        info!("Loading configuration with defaults");

        let optional = self
            .user_config_path
            .iter()
            .chain(std::iter::once(&self.project_config_path));
        for path in optional {
            if path.as_os_str().is_empty() {
                continue;
            }
            match Self::read_optional(path).await? {
                Some(layer) => {
                    debug!(path = %path.display(), "Loaded config file");
                    merge_values(&mut merged, layer);
                }
                None => debug!(path = %path.display(), "Config file not found"),
            }
        }

        if let Some(path) = &self.explicit_config_path {
            let layer = Self::read_optional(path).await?.ok_or_else(|| {
                AvaliadorError::Config(format!("Config file not found: {}", path.display()))
            })?;
            debug!(path = %path.display(), "Loaded explicit config file");
            merge_values(&mut merged, layer);
        }

        let mut config = merged.try_into::<AvaliadorConfig>()?;

        if self.read_env {
            ConfigOverrides::from_env()?.apply(&mut config);
        }
        cli.apply(&mut config);
        config.resolve_env_vars()?;

        info!(
            provider = %config.llm.provider,
            model = %config.llm.model,
            "Configuration loaded successfully"
        );
        Ok(config)
    }

    async fn read_optional(path: &Path) -> Result<Option<toml::Value>> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Ok(None);
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            AvaliadorError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let value = content.parse::<toml::Value>().map_err(|e| {
            AvaliadorError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })?;

        Ok(Some(value))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively merge `layer` into `base`; tables merge, everything else
/// replaces.
fn merge_values(base: &mut toml::Value, layer: toml::Value) {
    match (base, layer) {
        (toml::Value::Table(base_table), toml::Value::Table(layer_table)) => {
            for (key, value) in layer_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}
