use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Tunables of the port assigner and path router.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutingConfig {
    /// Gap between two nodes along the tier axis that makes an edge run
    /// across tiers instead of alongside them.
    pub side_margin: f32,
    /// Spacing between neighbouring edges that share a port.
    pub port_step: f32,
    /// Clearance kept around every obstacle during collision tests.
    pub obstacle_padding: f32,
    /// Distance of the early/late turn from the start/end point.
    pub turn_offset: f32,
    /// How far the lifted candidate rises above the higher endpoint.
    pub lift_offset: f32,
    /// Clearance beside the blocker for the detour column.
    pub detour_padding: f32,
    /// Minimum distance of the detour branch and merge rows from the blocker.
    pub detour_gap: f32,
    /// A start point closer than this to the blocker's near edge branches
    /// sideways immediately.
    pub detour_start_tolerance: f32,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            side_margin: 20.0,
            port_step: 10.0,
            obstacle_padding: 5.0,
            turn_offset: 20.0,
            lift_offset: 40.0,
            detour_padding: 25.0,
            detour_gap: 20.0,
            detour_start_tolerance: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulerConfig {
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl SchedulerConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

/// Synthetic cell geometry for running without a rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub column_width: f32,
    pub row_height: f32,
    pub node_width: f32,
    pub node_height: f32,
    /// Tier label band in front of the first column (or row).
    pub header_size: f32,
    /// Extent of one tier in vertical orientation.
    pub tier_span: f32,
    /// Extent of one tier in horizontal orientation.
    pub horizontal_tier_span: f32,
    pub canvas_padding: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            column_width: 160.0,
            row_height: 180.0,
            node_width: 144.0,
            node_height: 120.0,
            header_size: 64.0,
            tier_span: 160.0,
            horizontal_tier_span: 220.0,
            canvas_padding: 16.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub routing: RoutingConfig,
    pub scheduler: SchedulerConfig,
    pub grid: GridConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    routing: Option<RoutingConfig>,
    scheduler: Option<SchedulerConfig>,
    grid: Option<GridConfig>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();
    if let Some(routing) = parsed.routing {
        config.routing = routing;
    }
    if let Some(scheduler) = parsed.scheduler {
        config.scheduler = scheduler;
    }
    if let Some(grid) = parsed.grid {
        config.grid = grid;
    }
    Ok(config)
}
