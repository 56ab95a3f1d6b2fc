//! Bridge configuration via `labelbridge.toml`
//!
//! A default file is written on first use; edit it and restart the host to
//! change settings. Every key is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;

use labelbridge_core::{Error, Result};

/// Config file name placed in the bridge's data directory.
pub const CONFIG_FILE_NAME: &str = "labelbridge.toml";

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_main_queue_capacity() -> usize {
    1024
}

fn default_main_thread_name() -> String {
    "labelbridge-main".to_string()
}

fn default_continue_on_unacknowledged_emit() -> bool {
    true
}

/// Bridge configuration loaded from `labelbridge.toml`.
///
/// # Example
///
/// ```toml
/// log_filter = "labelbridge=debug,info"
/// main_queue_capacity = 1024
/// main_thread_name = "labelbridge-main"
/// continue_on_unacknowledged_emit = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Default `tracing` filter directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Maximum closures waiting on the main context.
    #[serde(default = "default_main_queue_capacity")]
    pub main_queue_capacity: usize,
    /// Name of the main context worker thread.
    #[serde(default = "default_main_thread_name")]
    pub main_thread_name: String,
    /// Whether a mode keeps processing when its session update could not be
    /// delivered to the host at all.
    #[serde(default = "default_continue_on_unacknowledged_emit")]
    pub continue_on_unacknowledged_emit: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            main_queue_capacity: default_main_queue_capacity(),
            main_thread_name: default_main_thread_name(),
            continue_on_unacknowledged_emit: default_continue_on_unacknowledged_emit(),
        }
    }
}

impl BridgeConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Labelbridge configuration
#
# Default tracing filter, used when RUST_LOG is not set.
log_filter = "info"

# Maximum number of overlay operations waiting on the main context.
# Submissions beyond this are rejected and logged.
main_queue_capacity = 1024

# Name of the main context worker thread.
main_thread_name = "labelbridge-main"

# Keep processing frames when a session update could not be delivered to
# the host (no acknowledgement will ever arrive).
continue_on_unacknowledged_emit = true
"#
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BridgeConfig = toml::from_str(content)
            .map_err(|e| Error::deserialization(format!("invalid {}: {}", CONFIG_FILE_NAME, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::internal(format!("failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file into `dir` if it does not exist yet,
    /// then load it.
    pub fn write_default_if_missing(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            std::fs::write(&path, Self::default_toml()).map_err(|e| {
                Error::internal(format!(
                    "failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Self::from_file(&path)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::internal(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::internal(format!("failed to write config file '{}': {}", path.display(), e))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.main_queue_capacity == 0 {
            return Err(Error::deserialization(
                "main_queue_capacity must be at least 1",
            ));
        }
        if self.main_thread_name.is_empty() {
            return Err(Error::deserialization("main_thread_name must not be empty"));
        }
        Ok(())
    }
}
