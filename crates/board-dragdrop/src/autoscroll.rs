//! Edge auto-scroll while a touch drag is held near the screen border

use crate::config::AutoScrollConfig;
use crate::geometry::Point;

/// Scroll state sampled on each tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
    pub max_scroll_y: f64,
    /// Horizontal offset of the board container
    pub container_scroll_x: f64,
    pub container_max_scroll_x: f64,
}

impl Viewport {
    pub fn can_scroll_up(&self) -> bool {
        self.scroll_y > 0.0
    }

    pub fn can_scroll_down(&self) -> bool {
        self.scroll_y < self.max_scroll_y
    }

    pub fn can_scroll_left(&self) -> bool {
        self.container_scroll_x > 0.0
    }

    pub fn can_scroll_right(&self) -> bool {
        self.container_scroll_x < self.container_max_scroll_x
    }
}

/// Pixels to scroll this tick. Negative values move up / left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollStep {
    pub dx: f64,
    pub dy: f64,
}

impl ScrollStep {
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

pub fn scroll_step(at: Point, view: &Viewport, cfg: &AutoScrollConfig) -> ScrollStep {
    let mut step = ScrollStep::default();

    if view.width < cfg.mobile_breakpoint_px {
        let zone = cfg.horizontal_zone_px;
        let horizontal = |d: f64| cfg.horizontal_speed * ((zone - d.max(1.0)) / zone).max(cfg.horizontal_min_factor);
        if at.x < zone && view.can_scroll_left() {
            step.dx = -horizontal(at.x);
        } else if at.x > view.width - zone && view.can_scroll_right() {
            step.dx = horizontal(view.width - at.x);
        }
    }

    let zone = cfg.vertical_zone_px;
    let vertical = |d: f64| {
        let factor = ((zone - d.max(1.0)) / zone).max(0.0).powf(cfg.vertical_curve);
        cfg.vertical_speed * factor * cfg.vertical_boost
    };
    if at.y < zone && view.can_scroll_up() {
        let speed = vertical(at.y);
        if speed > cfg.min_step_px {
            step.dy = -speed;
        }
    } else if at.y > view.height - zone && view.can_scroll_down() {
        let speed = vertical(view.height - at.y);
        if speed > cfg.min_step_px {
            step.dy = speed;
        }
    }

    step
}
