//! Engine tuning
//!
//! Every field has a default so a host page may override only what it needs.

use serde::{Deserialize, Serialize};

/// How a move between columns is sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStrategy {
    /// One `reorder` call carrying status and urgency
    #[default]
    Combined,
    /// `PATCH /tasks/{id}/` first, then `reorder`
    TwoStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VibrationConfig {
    pub start_ms: u32,
    pub drop_ms: u32,
}

impl Default for VibrationConfig {
    fn default() -> Self {
        Self { start_ms: 10, drop_ms: 20 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    pub interval_ms: u32,
    pub vertical_zone_px: f64,
    pub vertical_speed: f64,
    /// Exponent of the ease curve near the edge
    pub vertical_curve: f64,
    pub vertical_boost: f64,
    /// Steps at or below this are dropped
    pub min_step_px: f64,
    pub horizontal_zone_px: f64,
    pub horizontal_speed: f64,
    pub horizontal_min_factor: f64,
    /// Horizontal scrolling only below this viewport width
    pub mobile_breakpoint_px: f64,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 16,
            vertical_zone_px: 80.0,
            vertical_speed: 15.0,
            vertical_curve: 1.2,
            vertical_boost: 1.5,
            min_step_px: 0.5,
            horizontal_zone_px: 50.0,
            horizontal_speed: 12.0,
            horizontal_min_factor: 0.5,
            mobile_breakpoint_px: 768.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub long_press_delay_ms: u32,
    /// Pressed look appears after this much of the long press
    pub feedback_delay_ms: u32,
    pub move_threshold_px: f64,
    pub strategy: MoveStrategy,
    pub vibration: VibrationConfig,
    pub auto_scroll: AutoScrollConfig,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            long_press_delay_ms: 500,
            feedback_delay_ms: 300,
            move_threshold_px: 10.0,
            strategy: MoveStrategy::default(),
            vibration: VibrationConfig::default(),
            auto_scroll: AutoScrollConfig::default(),
        }
    }
}
