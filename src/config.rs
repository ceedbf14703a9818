//! Runtime configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ```toml
//! exclude_classes = ["person"]
//! mirror_horizontal = true
//!
//! [tracker]
//! iou_threshold = 0.3
//! max_missed_frames = 10
//!
//! [depth]
//! near_area = 0.25
//! mid_area = 0.10
//!
//! [find]
//! search_timeout_frames = 300
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::direction::DepthConfig;
use crate::integration::NarratorConfig;
use crate::modes::{DetailsConfig, FindConfig, WhatConfig};
use crate::tracker::{MatcherConfig, TrackerConfig};
use crate::{Error, Result};

/// Environment variable naming the config file read by [`SpotterConfig::load`].
pub const CONFIG_ENV: &str = "SPOTTER_CONFIG";

/// Top-level configuration, one field per subsystem.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpotterConfig {
    /// Classes never picked as "the object" by WHAT/READ or locked by FIND.
    pub exclude_classes: Vec<String>,
    /// Swap left and right, for mirrored (selfie) cameras.
    pub mirror_horizontal: bool,
    pub tracker: TrackerConfig,
    pub matcher: MatcherConfig,
    pub depth: DepthConfig,
    pub find: FindConfig,
    pub what: WhatConfig,
    pub details: DetailsConfig,
    pub narrator: NarratorConfig,
}

impl Default for SpotterConfig {
    fn default() -> Self {
        Self {
            exclude_classes: vec!["person".to_string()],
            mirror_horizontal: false,
            tracker: TrackerConfig::default(),
            matcher: MatcherConfig::default(),
            depth: DepthConfig::default(),
            find: FindConfig::default(),
            what: WhatConfig::default(),
            details: DetailsConfig::default(),
            narrator: NarratorConfig::default(),
        }
    }
}

impl SpotterConfig {
    /// Load from the file named by `SPOTTER_CONFIG`, or defaults when unset.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim())),
            _ => {
                let cfg = Self::default();
                cfg.validate()?;
                Ok(cfg)
            }
        }
    }

    /// Read and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loading config from {}", path.display());
        Self::from_toml_str(&raw)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the handlers cannot work with.
    pub fn validate(&self) -> Result<()> {
        let t = &self.tracker;
        if !(t.iou_threshold > 0.0 && t.iou_threshold <= 1.0) {
            return Err(Error::Config(format!(
                "tracker.iou_threshold must be in (0, 1], got {}",
                t.iou_threshold
            )));
        }
        let d = &self.depth;
        if !(0.0..=1.0).contains(&d.mid_area) || !(0.0..=1.0).contains(&d.near_area) || d.mid_area >= d.near_area {
            return Err(Error::Config(
                "depth area bands must satisfy 0 <= mid_area < near_area <= 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&d.near_depth) || !(0.0..=1.0).contains(&d.mid_depth) || d.near_depth >= d.mid_depth {
            return Err(Error::Config(
                "depth bands must satisfy 0 <= near_depth < mid_depth <= 1".to_string(),
            ));
        }
        if self.what.wait_frames == 0 {
            return Err(Error::Config("what.wait_frames must be at least 1".to_string()));
        }
        if self.details.prompt.trim().is_empty() {
            return Err(Error::Config("details.prompt must not be empty".to_string()));
        }
        if self.narrator.queue_capacity == 0 {
            return Err(Error::Config("narrator.queue_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}
