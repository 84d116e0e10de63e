use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::fixed_math::FixedNum;

pub const DEFAULT_CONFIG_PATH: &str = "assets/ai_config.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Static AI configuration loaded once at startup.
///
/// Values are human-friendly floats. They are converted to fixed-point exactly
/// once (see [`SimAiConfig`]); changing them mid-match breaks determinism in
/// multiplayer, so every participant must load the same file before the first tick.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AiConfig {
    // Tick driver
    pub tick_rate: f64,

    // Pathfinding scheduler
    pub path_requests_per_tick: usize,
    pub order_path_priority: i64,
    pub pursuit_path_priority: i64,

    // Pursuit
    pub repath_interval: f32,
    pub repath_distance: f32,

    // Enemy search
    pub enemy_scan_interval: f32,

    // Formations
    pub formation_cluster_radius: f32,
    pub formation_unit_width: f32,
    pub formation_spacing: f32,
    pub fast_rearrange_distance_sq: f32,

    // Docking
    pub dock_sample_radius: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            path_requests_per_tick: 25,
            order_path_priority: 0,
            pursuit_path_priority: 10,
            repath_interval: 0.5,
            repath_distance: 1.0,
            enemy_scan_interval: 0.5,
            formation_cluster_radius: 5.0,
            formation_unit_width: 1.0,
            formation_spacing: 0.5,
            fast_rearrange_distance_sq: 25.0,
            dock_sample_radius: 2.0,
        }
    }
}

impl AiConfig {
    pub fn from_ron_str(contents: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str::<AiConfig>(contents)
    }

    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_ron_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Load synchronously, falling back to defaults on any error.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded AI config from {}", path);
                config
            }
            Err(e) => {
                error!("{}", e);
                error!("Using default AiConfig");
                Self::default()
            }
        }
    }

    /// Convert to the fixed-point form the simulation reads.
    pub fn to_sim(&self) -> SimAiConfig {
        let tick_rate = if self.tick_rate > 0.0 { self.tick_rate } else { 20.0 };
        SimAiConfig {
            tick_rate,
            tick_delta: FixedNum::ONE / FixedNum::from_num(tick_rate),
            path_requests_per_tick: self.path_requests_per_tick,
            order_path_priority: self.order_path_priority,
            pursuit_path_priority: self.pursuit_path_priority,
            repath_interval: FixedNum::from_num(self.repath_interval),
            repath_distance_sq: FixedNum::from_num(self.repath_distance * self.repath_distance),
            enemy_scan_interval: FixedNum::from_num(self.enemy_scan_interval),
            formation_cluster_radius: FixedNum::from_num(self.formation_cluster_radius),
            formation_slot_spacing: FixedNum::from_num(self.formation_unit_width)
                + FixedNum::from_num(self.formation_spacing),
            fast_rearrange_distance_sq: FixedNum::from_num(self.fast_rearrange_distance_sq),
            dock_sample_radius: FixedNum::from_num(self.dock_sample_radius),
        }
    }
}

/// Fixed-point AI configuration used inside the simulation.
///
/// Built once from [`AiConfig`] (the single float → fixed conversion point).
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SimAiConfig {
    pub tick_rate: f64,
    /// Seconds per tick, as handed to `on_tick`.
    pub tick_delta: FixedNum,
    pub path_requests_per_tick: usize,
    pub order_path_priority: i64,
    pub pursuit_path_priority: i64,
    pub repath_interval: FixedNum,
    pub repath_distance_sq: FixedNum,
    pub enemy_scan_interval: FixedNum,
    pub formation_cluster_radius: FixedNum,
    /// Unit width plus spacing: distance between neighboring slots.
    pub formation_slot_spacing: FixedNum,
    pub fast_rearrange_distance_sq: FixedNum,
    pub dock_sample_radius: FixedNum,
}

impl Default for SimAiConfig {
    fn default() -> Self {
        AiConfig::default().to_sim()
    }
}
