//! The sysfs feature source.
//!
//! [`SysfsSource`] is a discovery session: it owns a snapshot of its [`Config`], the
//! resolver mapping the logical sysfs tree onto the real mount, and the features found
//! by the last run. Each call to [`FeatureSource::discover`] rebuilds the features from
//! scratch.
//!
//! # Example
//!
//! ```no_run
//! use sysfs_discovery::config::Config;
//! use sysfs_discovery::hostpath::HostDir;
//! use sysfs_discovery::source::{FeatureSource, LabelSource, SysfsSource};
//!
//! let config = Config {
//!     sysfs_whitelist: vec!["class/power_supply/BAT0/capacity".to_owned()],
//! };
//! let mut source = SysfsSource::new(config, HostDir::new("/sys"));
//! source.discover();
//! for (name, value) in source.labels() {
//!     println!("{name}={value}");
//! }
//! ```
mod features;
mod labels;

pub use features::{AttributeFeatureSet, FeatureLabels, Features};
pub use labels::label_safe;

use std::collections::BTreeMap;

use crate::config::{self, Config};
use crate::hostpath::{HostDir, PathResolver};
use crate::sysfs;

/// Name of the sysfs feature source.
pub const NAME: &str = "sysfs";

/// Name of the attribute feature set the source fills.
pub const ATTRIBUTE_FEATURE: &str = "attribute";

/// Outcome counters of a single discovery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoverySummary {
    /// Whitelist entries recorded in the feature set.
    pub discovered: usize,
    /// Whitelist entries skipped because they were missing or unreadable.
    pub skipped: usize,
}

/// A source of discovered features.
pub trait FeatureSource {
    /// Returns the name of the source.
    fn name(&self) -> &'static str;

    /// Runs discovery, replacing the previously discovered features.
    ///
    /// Failures of individual entries are logged and never abort the run.
    fn discover(&mut self) -> DiscoverySummary;

    /// Returns the features found by the last run.
    fn features(&self) -> &Features;
}

/// A source whose features are exported as labels.
pub trait LabelSource {
    fn labels(&self) -> FeatureLabels;

    /// Ordering among label sources; lower runs first.
    fn priority(&self) -> i32;
}

/// A source carrying its own typed configuration.
pub trait ConfigurableSource {
    type Config;

    /// Returns a configuration populated with defaults.
    fn new_config(&self) -> Self::Config;

    fn config(&self) -> &Self::Config;

    fn set_config(&mut self, config: Self::Config);
}

/// Discovers whitelisted sysfs attributes.
#[derive(Debug)]
pub struct SysfsSource<R = HostDir> {
    config: Config,
    resolver: R,
    features: Features,
}

impl<R: PathResolver> SysfsSource<R> {
    pub fn new(config: Config, resolver: R) -> Self {
        Self {
            config,
            resolver,
            features: Features::new(),
        }
    }

    /// Replaces the configuration with a dynamically typed value.
    ///
    /// # Errors
    ///
    /// Returns [`config::Error::InvalidShape`] and keeps the current configuration if the
    /// value is not a valid [`Config`].
    pub fn set_config_value(&mut self, value: serde_json::Value) -> config::Result<()> {
        self.config = Config::from_value(value)?;
        Ok(())
    }
}

impl<R: PathResolver> FeatureSource for SysfsSource<R> {
    fn name(&self) -> &'static str {
        NAME
    }

    fn discover(&mut self) -> DiscoverySummary {
        let mut summary = DiscoverySummary::default();
        let mut elements = BTreeMap::new();

        for entry in &self.config.sysfs_whitelist {
            match sysfs::read_entry(entry, &self.resolver) {
                Ok(attribute) => {
                    log::trace!("read attribute: {}={}", attribute.name, attribute.value);
                    elements.insert(attribute.name, attribute.value);
                    summary.discovered += 1;
                }
                Err(err) if err.is_not_found() => {
                    log::debug!("skipping missing parameter: parameter={}, error={}", entry, err);
                    summary.skipped += 1;
                }
                Err(err) => {
                    log::warn!("reading parameter failed: parameter={}, error={}", entry, err);
                    summary.skipped += 1;
                }
            }
        }

        let mut features = Features::new();
        features
            .attributes
            .insert(ATTRIBUTE_FEATURE.to_owned(), AttributeFeatureSet::new(elements));
        self.features = features;

        log::debug!(
            "{} discovery finished: discovered={}, skipped={}",
            NAME,
            summary.discovered,
            summary.skipped
        );
        summary
    }

    fn features(&self) -> &Features {
        &self.features
    }
}

impl<R: PathResolver> LabelSource for SysfsSource<R> {
    fn labels(&self) -> FeatureLabels {
        self.features
            .attribute_set(ATTRIBUTE_FEATURE)
            .map(|set| labels::export_labels(&set.elements))
            .unwrap_or_default()
    }

    fn priority(&self) -> i32 {
        0
    }
}

impl<R: PathResolver> ConfigurableSource for SysfsSource<R> {
    type Config = Config;

    fn new_config(&self) -> Config {
        Config::default()
    }

    fn config(&self) -> &Config {
        &self.config
    }

    fn set_config(&mut self, config: Config) {
        self.config = config;
    }
}
