//! Fire tuning. Loaded from a `.ron` file or built in code, and validated
//! before any simulation is created.

use serde::{Deserialize, Serialize};
use std::path::Path;

use physics::LayerMask;

use crate::ConfigError;

/// Per front-type tuning shared by every front of one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireConfig {
    /// Seconds between a front being lit and it trying to spread.
    #[serde(default = "default_spread_delay")]
    pub spread_delay: f32,
    /// Distance along the surface to the next front. Also the convergence
    /// threshold between a group's two leaves.
    #[serde(default = "default_spread_distance")]
    pub spread_distance: f32,
    /// Maximum length of the directional probe.
    #[serde(default = "default_probe_max_distance")]
    pub probe_max_distance: f32,
    /// Radius of the area probe used when the directional probe misses.
    #[serde(default = "default_fallback_probe_radius")]
    pub fallback_probe_radius: f32,
    /// How far above the candidate point (along local up) the directional probe starts.
    #[serde(default = "default_probe_lift")]
    pub probe_lift: f32,
    /// Seconds a dropped spark glows before trying to light a fire.
    #[serde(default = "default_spark_lifetime")]
    pub spark_lifetime: f32,
    /// Radius a spark searches for terrain to set alight.
    #[serde(default = "default_spark_radius")]
    pub spark_radius: f32,
    /// Collision group bits fire may burn along.
    #[serde(default = "default_ground_layers")]
    pub ground_layers: u32,
    /// Fronts parked in the pool when a simulation starts.
    #[serde(default)]
    pub pool_prewarm: usize,
}

fn default_spread_delay() -> f32 {
    1.0
}
fn default_spread_distance() -> f32 {
    2.0
}
fn default_probe_max_distance() -> f32 {
    100.0
}
fn default_fallback_probe_radius() -> f32 {
    1.0
}
fn default_probe_lift() -> f32 {
    0.5
}
fn default_spark_lifetime() -> f32 {
    1.0
}
fn default_spark_radius() -> f32 {
    1.5
}
fn default_ground_layers() -> u32 {
    LayerMask::TERRAIN.0
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            spread_delay: default_spread_delay(),
            spread_distance: default_spread_distance(),
            probe_max_distance: default_probe_max_distance(),
            fallback_probe_radius: default_fallback_probe_radius(),
            probe_lift: default_probe_lift(),
            spark_lifetime: default_spark_lifetime(),
            spark_radius: default_spark_radius(),
            ground_layers: default_ground_layers(),
            pool_prewarm: 0,
        }
    }
}

impl FireConfig {
    /// Check every tunable is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("spread_delay", self.spread_delay),
            ("spread_distance", self.spread_distance),
            ("probe_max_distance", self.probe_max_distance),
            ("fallback_probe_radius", self.fallback_probe_radius),
            ("probe_lift", self.probe_lift),
            ("spark_lifetime", self.spark_lifetime),
            ("spark_radius", self.spark_radius),
        ];
        for (field, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.ground_layers == 0 {
            return Err(ConfigError::EmptyLayerMask);
        }
        Ok(())
    }

    /// Parse and validate a config from RON text.
    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let config: FireConfig = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `path`. If the file is missing or invalid, returns default config.
    pub fn load(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match Self::from_ron_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid fire config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    pub fn ground_mask(&self) -> LayerMask {
        LayerMask(self.ground_layers)
    }
}
