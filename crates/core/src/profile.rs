//! Profile management
//!
//! A profile names an S3 endpoint and, optionally, static credentials. When no
//! credentials are stored the AWS default provider chain (environment, shared
//! config, instance metadata) supplies them.

use serde::{Deserialize, Serialize};

use crate::config::ConfigManager;
use crate::error::{Error, Result};

/// Name given to the implicit profile built from the environment
pub const AMBIENT_PROFILE: &str = "default";

/// Connection settings for an S3-compatible service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,

    /// Custom endpoint URL; AWS S3 when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// AWS region; the configured default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Access key ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Secret access key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Use path-style bucket addressing
    #[serde(default)]
    pub path_style: bool,
}

impl Profile {
    /// Create a profile with only a name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: None,
            region: None,
            access_key: None,
            secret_key: None,
            path_style: false,
        }
    }

    /// Profile that defers everything to the AWS environment
    pub fn ambient() -> Self {
        Self::new(AMBIENT_PROFILE)
    }

    /// Static credentials, if both halves are present
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Some((access, secret)),
            _ => None,
        }
    }

    /// Check the endpoint is a valid URL and credentials come in pairs
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint)?;
        }
        if self.access_key.is_some() != self.secret_key.is_some() {
            return Err(Error::Config(format!(
                "Profile '{}' must set both access_key and secret_key, or neither",
                self.name
            )));
        }
        Ok(())
    }
}

/// Manager for profile operations
pub struct ProfileManager {
    config_manager: ConfigManager,
}

impl ProfileManager {
    /// Create a new ProfileManager with a specific ConfigManager
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Create a new ProfileManager using the default config location
    pub fn new() -> Result<Self> {
        let config_manager = ConfigManager::new()?;
        Ok(Self { config_manager })
    }

    /// List all configured profiles
    pub fn list(&self) -> Result<Vec<Profile>> {
        let config = self.config_manager.load()?;
        Ok(config.profiles)
    }

    /// Get a profile by name
    pub fn get(&self, name: &str) -> Result<Profile> {
        let config = self.config_manager.load()?;
        config
            .profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()))
    }

    /// Resolve the profile a command should connect with
    pub fn resolve(&self, name: Option<&str>) -> Result<Profile> {
        self.config_manager.load()?.resolve_profile(name)
    }

    /// Add or update a profile
    pub fn set(&self, profile: Profile) -> Result<()> {
        profile.validate()?;
        let mut config = self.config_manager.load()?;

        config.profiles.retain(|p| p.name != profile.name);
        config.profiles.push(profile);

        self.config_manager.save(&config)
    }

    /// Remove a profile
    pub fn remove(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        let original_len = config.profiles.len();

        config.profiles.retain(|p| p.name != name);

        if config.profiles.len() == original_len {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        if config.defaults.profile.as_deref() == Some(name) {
            config.defaults.profile = None;
        }

        self.config_manager.save(&config)
    }

    /// Make `name` the profile used when none is given
    pub fn set_default(&self, name: &str) -> Result<()> {
        let mut config = self.config_manager.load()?;
        if !config.profiles.iter().any(|p| p.name == name) {
            return Err(Error::ProfileNotFound(name.to_string()));
        }
        config.defaults.profile = Some(name.to_string());
        self.config_manager.save(&config)
    }

    /// Name of the default profile, if one is set
    pub fn default_name(&self) -> Result<Option<String>> {
        Ok(self.config_manager.load()?.defaults.profile)
    }
}
