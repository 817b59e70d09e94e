//! Client-space geometry (CSS pixels, origin at the viewport's top-left)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// True when either axis moved further than `threshold`
    pub fn moved_beyond(&self, other: Point, threshold: f64) -> bool {
        (self.x - other.x).abs() > threshold || (self.y - other.y).abs() > threshold
    }
}

/// Axis-aligned box, as reported by `getBoundingClientRect`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn mid_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Half-open containment: left/top edges inclusive, right/bottom exclusive
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }
}
