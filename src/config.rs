//! Configuration of the sysfs source and of the agent running it.
//!
//! The source is configured with a [`Config`] holding the attribute whitelist, loaded
//! from a JSON document:
//!
//! ```json
//! { "sysfsWhitelist": ["class/power_supply/BAT0/capacity", "kernel/mm/transparent_hugepage"] }
//! ```
//!
//! Whitelist entries are relative to the sysfs root. A leading `/sys` segment is
//! accepted and dropped, so `/sys/class/net` and `class/net` name the same directory.
//!
//! The agent itself is configured through environment variables, see [`Settings`].
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fsutil;

/// Upper bound for a configuration file.
const MAX_CONFIG_BYTES: u64 = 1024 * 1024;

/// Errors that may occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    FileRead(#[from] fsutil::FileReadError),
    #[error("failed to parse config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config shape: {0}")]
    InvalidShape(#[source] serde_json::Error),
    #[error("invalid value `{value}` for environment variable `{name}`: {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration of the sysfs source.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Attribute paths to read, relative to the sysfs root.
    #[serde(default = "default_whitelist")]
    pub sysfs_whitelist: Vec<String>,
}

fn default_whitelist() -> Vec<String> {
    vec![String::new()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sysfs_whitelist: default_whitelist(),
        }
    }
}

impl Config {
    /// Converts a dynamically typed configuration value into a [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if the value does not have the shape of a
    /// [`Config`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use sysfs_discovery::config::Config;
    /// let value = serde_json::json!({ "sysfsWhitelist": ["class/net/eth0/mtu"] });
    /// let config = Config::from_value(value).unwrap();
    /// assert_eq!(config.sysfs_whitelist, vec!["class/net/eth0/mtu"]);
    ///
    /// assert!(Config::from_value(serde_json::json!({ "sysfsWhitelist": "class" })).is_err());
    /// ```
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(Error::InvalidShape)
    }

    /// Loads a [`Config`] from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] if the file cannot be read and [`Error::Parse`] if it is
    /// not a valid configuration document.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fsutil::read_bounded(path, MAX_CONFIG_BYTES)?;
        serde_json::from_slice(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds a [`Config`] from a comma-separated whitelist.
    ///
    /// Surrounding whitespace is trimmed from every entry; an empty list yields the
    /// default whitelist.
    pub fn from_list(list: &str) -> Self {
        let sysfs_whitelist: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_owned)
            .collect();

        if sysfs_whitelist.is_empty() {
            return Self::default();
        }

        Self { sysfs_whitelist }
    }
}

const DEFAULT_INTERVAL_SECS: u64 = 60;
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_ROOTFS_MOUNT_PATH: &str = "/rootfs";

/// Settings of the discovery agent, read from the environment.
///
/// | Variable                  | Default        | Meaning                                   |
/// |---------------------------|----------------|-------------------------------------------|
/// | `SYSFS_DISCOVERY_CONFIG`  | unset          | JSON file holding a [`Config`]            |
/// | `SYSFS_WHITELIST`         | unset          | comma-separated whitelist, overrides file |
/// | `DISCOVERY_INTERVAL_SECS` | `60`           | seconds between discovery runs            |
/// | `LISTEN_ADDR`             | `0.0.0.0:3000` | address of the label API                  |
/// | `ROOTFS_MOUNT_PATH`       | `/rootfs`      | host root mount inside a container        |
/// | `SYSFS_ROOT`              | unset          | sysfs directory, skips detection          |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub config: Config,
    pub interval: Duration,
    pub listen_addr: SocketAddr,
    pub rootfs_mount: PathBuf,
    pub sysfs_root: Option<PathBuf>,
}

impl Settings {
    /// Reads the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] if a variable holds an invalid value or the config file cannot
    /// be loaded.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the settings through `lookup`, which returns the value of a variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup("SYSFS_DISCOVERY_CONFIG") {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(list) = lookup("SYSFS_WHITELIST") {
            config = Config::from_list(&list);
        }

        let interval = match lookup("DISCOVERY_INTERVAL_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(Error::InvalidEnv {
                        name: "DISCOVERY_INTERVAL_SECS",
                        value,
                        reason: "must be greater than zero".to_owned(),
                    });
                }
                Ok(secs) => Duration::from_secs(secs),
                Err(err) => {
                    return Err(Error::InvalidEnv {
                        name: "DISCOVERY_INTERVAL_SECS",
                        value,
                        reason: err.to_string(),
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_INTERVAL_SECS),
        };

        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
        let listen_addr = listen_addr
            .parse::<SocketAddr>()
            .map_err(|err| Error::InvalidEnv {
                name: "LISTEN_ADDR",
                value: listen_addr.clone(),
                reason: err.to_string(),
            })?;

        let rootfs_mount = lookup("ROOTFS_MOUNT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOTFS_MOUNT_PATH));
        let sysfs_root = lookup("SYSFS_ROOT").map(PathBuf::from);

        Ok(Self {
            config,
            interval,
            listen_addr,
            rootfs_mount,
            sysfs_root,
        })
    }
}
