//! Playable strip, which closes in once the boss is desperate

use serde::Serialize;

use crate::core::config::ArenaConfig;

/// Horizontal limits the player may move within
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArenaBounds {
    pub left: f32,
    pub right: f32,
}

impl ArenaBounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn contains(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }

    /// Clamp a body of the given half width inside the strip
    pub fn clamp_center(&self, x: f32, half_width: f32) -> f32 {
        x.max(self.left + half_width).min(self.right - half_width)
    }
}

#[derive(Debug, Clone)]
pub struct Arena {
    width: f32,
    shrink_per_tick: f32,
    min_half_width: f32,
    bounds: ArenaBounds,
}

impl Arena {
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            width: config.width,
            shrink_per_tick: config.shrink_per_tick,
            min_half_width: config.min_half_width,
            bounds: ArenaBounds {
                left: 0.0,
                right: config.width,
            },
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn bounds(&self) -> ArenaBounds {
        self.bounds
    }

    /// Close both walls one step toward the center
    ///
    /// Returns false once the strip is fully closed.
    pub fn shrink(&mut self) -> bool {
        let center = self.width / 2.0;
        let inner_left = center - self.min_half_width;
        let inner_right = center + self.min_half_width;

        self.bounds.left = (self.bounds.left + self.shrink_per_tick).min(inner_left);
        self.bounds.right = (self.bounds.right - self.shrink_per_tick).max(inner_right);

        self.bounds.left < inner_left || self.bounds.right > inner_right
    }

    pub fn is_fully_closed(&self) -> bool {
        self.bounds.width() <= self.min_half_width * 2.0
    }
}
