// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interfaces for parsing configuration files and working with the simulated
//! storage service configuration

use camino::{Utf8Path, Utf8PathBuf};
use dropshot::{ConfigDropshot, ConfigLogging};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Configuration of one simulated drive.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConfigDrive {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Descriptive fields passed through to the drive resource untouched.
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Configuration of one simulated storage controller and its drives.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConfigStorage {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub drives: Vec<ConfigDrive>,
}

/// Configuration of one simulated system.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConfigSystem {
    pub id: String,
    /// Initial power state. Storage reads and the reset action require the
    /// owning system to be powered on.
    #[serde(default = "default_powered_on")]
    pub powered_on: bool,
    #[serde(default)]
    pub storage: Vec<ConfigStorage>,
}

fn default_powered_on() -> bool {
    true
}

/// Configuration for the simulated Redfish storage service.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Simulated duration of a secure-erase operation, in milliseconds.
    pub secure_erase_time_ms: u64,
    /// The simulated resource tree served by this process.
    #[serde(default)]
    pub systems: Vec<ConfigSystem>,
    /// Configuration for the dropshot server.
    pub dropshot: ConfigDropshot,
    /// Server-wide logging configuration.
    pub log: ConfigLogging,
}

impl Config {
    /// Load a `Config` from the given TOML file
    ///
    /// This config object can then be used to create a new simulated storage
    /// service.
    pub fn from_file(path: &Utf8Path) -> Result<Config, LoadError> {
        let file_contents = std::fs::read_to_string(path)
            .map_err(|err| LoadError::Io { path: path.into(), err })?;
        let config_parsed: Config = toml::from_str(&file_contents)
            .map_err(|err| LoadError::Parse { path: path.into(), err })?;
        Ok(config_parsed)
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("error reading \"{path}\": {err}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("error parsing \"{path}\": {err}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        err: toml::de::Error,
    },
}
