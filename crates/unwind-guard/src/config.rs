//! Guard configuration
//!
//! Guards work with [`GuardConfig::default`]. Applications that want to
//! tune them can keep the settings in YAML.
//!
//! # Configuration Files
//!
//! - `unwind-guard.yaml` - looked up when [`GuardConfig::load`] is given a directory

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// File name searched for when loading from a directory
pub const CONFIG_FILE_NAME: &str = "unwind-guard.yaml";

/// Settings for an [`ExceptionGuard`](crate::ExceptionGuard)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Domain reported for plain `panic!` payloads
    #[serde(default = "default_panic_domain")]
    pub panic_domain: String,

    /// Record where the panic started in [`GuardError::location`](crate::GuardError)
    #[serde(default = "default_true")]
    pub capture_location: bool,

    /// Keep [`Exception`](crate::Exception) payloads raised under the guard
    /// from being printed by the panic hook.
    ///
    /// Plain `panic!` payloads are always printed. An exception the work
    /// item catches itself is silenced too, if it is the first panic of
    /// the guarded call.
    #[serde(default = "default_true")]
    pub quiet: bool,
}

fn default_panic_domain() -> String {
    "RustPanic".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            panic_domain: default_panic_domain(),
            capture_location: true,
            quiet: true,
        }
    }
}

impl GuardConfig {
    /// Load configuration from a directory or YAML file
    ///
    /// # Arguments
    ///
    /// * `path` - Directory containing `unwind-guard.yaml`, or the file itself
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let config = GuardConfig::load("./config")?;
    /// let guard = ExceptionGuard::new(config);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE_NAME)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: GuardConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.panic_domain.trim().is_empty() {
            return Err(Error::ConfigInvalid {
                message: "panic_domain must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
