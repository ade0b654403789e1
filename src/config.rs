//! The persisted board/port selection.
//!
//! The configuration is a two-field record kept in a small JSON file in the
//! sketch directory:
//!
//! ```text
//! {"FQBN": "arduino:avr:uno", "Port": "/dev/ttyUSB0"}
//! ```
//!
//! A missing or malformed file is normal on first run; callers turn the
//! `load` error into a default [`Configuration`].

use std::{fs, path::PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// =============================================================================
// Public Interface
// =============================================================================

/// The board and serial port used by the compile and upload actions.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// The fully qualified board name, passed verbatim to the toolchain.
    #[serde(rename = "FQBN", default)]
    pub board: String,
    /// The serial device path, e.g. `/dev/ttyACM0`.
    #[serde(rename = "Port", default)]
    pub port: String,
}

/// Loads and saves a [`Configuration`].
pub trait ConfigStore {
    fn load(&self) -> Result<Configuration>;
    fn save(&mut self, config: &Configuration) -> Result<()>;
}

/// A [`ConfigStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}
impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}
impl ConfigStore for JsonFileStore {
    fn load(&self) -> Result<Configuration> {
        let data = fs::read(&self.path).map_err(|source| Error::ConfigIo {
            path: self.path.clone(),
            source,
        })?;
        let config = serde_json::from_slice(&data).map_err(|source| Error::ConfigFormat {
            path: self.path.clone(),
            source,
        })?;
        debug!("loaded {:?} from {}", config, self.path.display());
        Ok(config)
    }

    /// Replaces the whole file content; the file is created if absent.
    fn save(&mut self, config: &Configuration) -> Result<()> {
        let json = serde_json::to_string(config).map_err(|source| Error::ConfigFormat {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, json).map_err(|source| Error::ConfigIo {
            path: self.path.clone(),
            source,
        })?;
        debug!("saved {:?} to {}", config, self.path.display());
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_toolchain_key_names() {
        let config = Configuration {
            board: "arduino:avr:uno".into(),
            port: "/dev/ttyUSB0".into(),
        };
        assert_eq!(
            serde_json::to_string(&config).unwrap(),
            r#"{"FQBN":"arduino:avr:uno","Port":"/dev/ttyUSB0"}"#
        );
    }

    #[test]
    fn accepts_spaced_layout() {
        let config: Configuration =
            serde_json::from_str(r#"{"FQBN": "esp32:esp32:esp32", "Port": "/dev/ttyACM1"}"#)
                .unwrap();
        assert_eq!(config.board, "esp32:esp32:esp32");
        assert_eq!(config.port, "/dev/ttyACM1");
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let config: Configuration = serde_json::from_str(r#"{"FQBN": "arduino:avr:nano"}"#).unwrap();
        assert_eq!(config.board, "arduino:avr:nano");
        assert!(config.port.is_empty());
    }
}
