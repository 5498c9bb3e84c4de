//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::{Config, Lifetime, ServiceDescriptor};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Service descriptor {index} in `{group}` group has an empty interface name")]
    EmptyInterface { group: Lifetime, index: usize },

    #[error("Service descriptor {index} in `{group}` group has an empty implementation name")]
    EmptyImplementation { group: Lifetime, index: usize },

    #[error("Service {interface} declares an empty interception behavior identifier")]
    EmptyBehavior { interface: String },

    #[error("Cache policy for {0} has a zero-second window")]
    ZeroWindow(String),

    #[error("Cache policy target {0} is not of the form interface::method")]
    BadPolicyTarget(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. entwine.yaml in the working directory (optional)
    /// 3. Environment variables (ENTWINE_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("entwine.yaml"))
            .merge(Env::prefixed("ENTWINE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        for (group, descriptors) in [
            (Lifetime::Singleton, &config.services.singleton),
            (Lifetime::Transient, &config.services.transient),
            (Lifetime::Scoped, &config.services.scoped),
        ] {
            for (index, descriptor) in descriptors.iter().enumerate() {
                Self::validate_descriptor(group, index, descriptor)?;
            }
        }

        for (target, policy) in &config.cache_policies {
            if target.split_once("::").is_none() {
                return Err(ConfigError::BadPolicyTarget(target.clone()));
            }
            if policy.window_secs == Some(0) {
                return Err(ConfigError::ZeroWindow(target.clone()));
            }
        }

        Ok(())
    }

    fn validate_descriptor(
        group: Lifetime,
        index: usize,
        descriptor: &ServiceDescriptor,
    ) -> Result<(), ConfigError> {
        if descriptor.interface.is_empty() {
            return Err(ConfigError::EmptyInterface { group, index });
        }
        if descriptor.implementation.is_empty() {
            return Err(ConfigError::EmptyImplementation { group, index });
        }
        if descriptor.interception_behaviors.iter().any(String::is_empty) {
            return Err(ConfigError::EmptyBehavior {
                interface: descriptor.interface.clone(),
            });
        }
        Ok(())
    }
}
