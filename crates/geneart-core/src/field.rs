use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::config::ArtConfig;
use crate::math::radial_angle;
use crate::noise::NoiseSource;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Frequency of the concentric swirl term, per px of distance from center.
const SWIRL_FREQUENCY: f32 = 0.01;

/// Grid of steering angles covering the canvas.
///
/// Each cell angle combines the direction from the canvas center, a noise
/// term and a concentric `sin(distance)` swirl. `depth` only ever increases,
/// which makes the field drift slowly between refreshes.
#[derive(Clone, Debug)]
pub struct FlowField {
    pub cols: usize,
    pub rows: usize,
    pub resolution: f32,
    pub scale: f32,
    pub depth: f32,
    pub depth_step: f32,
    center: Vec2,
    angles: Vec<f32>,
}

impl FlowField {
    pub fn new(width: f32, height: f32, resolution: f32, scale: f32, depth_step: f32) -> Self {
        let cols = (width / resolution).floor().max(0.0) as usize;
        let rows = (height / resolution).floor().max(0.0) as usize;
        Self {
            cols,
            rows,
            resolution,
            scale,
            depth: 0.0,
            depth_step,
            center: Vec2::new(width * 0.5, height * 0.5),
            angles: vec![0.0; cols * rows],
        }
    }

    pub fn from_config(config: &ArtConfig) -> Self {
        Self::new(
            config.width,
            config.height,
            config.field_resolution,
            config.field_scale,
            config.field_depth_step,
        )
    }

    /// Angle for cell `(cell_x, cell_y)` at `depth`. Pure: repeated calls with
    /// the same arguments return the same value.
    pub fn angle_at(&self, noise: &NoiseSource, cell_x: f32, cell_y: f32, depth: f32) -> f32 {
        let dx = cell_x * self.resolution - self.center.x;
        let dy = cell_y * self.resolution - self.center.y;
        let distance = (dx * dx + dy * dy).sqrt();

        radial_angle(dx, dy)
            + noise.sample(cell_x * self.scale, cell_y * self.scale, depth) * TAU
            + (distance * SWIRL_FREQUENCY).sin() * PI
    }

    /// Recompute every cell at the current depth, then advance the depth.
    pub fn refresh(&mut self, noise: &NoiseSource) {
        let cols = self.cols;
        let depth = self.depth;

        #[cfg(feature = "parallel")]
        {
            let field = &*self;
            let angles: Vec<f32> = (0..cols * field.rows)
                .into_par_iter()
                .map(|idx| field.angle_at(noise, (idx % cols) as f32, (idx / cols) as f32, depth))
                .collect();
            self.angles = angles;
        }

        #[cfg(not(feature = "parallel"))]
        {
            for idx in 0..self.angles.len() {
                let angle = self.angle_at(noise, (idx % cols) as f32, (idx / cols) as f32, depth);
                self.angles[idx] = angle;
            }
        }

        self.depth += self.depth_step;
    }

    /// Stored angle of cell `(col, row)`, if inside the grid.
    pub fn cell(&self, col: usize, row: usize) -> Option<f32> {
        if col < self.cols && row < self.rows {
            Some(self.angles[row * self.cols + col])
        } else {
            None
        }
    }

    /// Stored angle of the cell under a pixel position, clamped to the grid.
    /// An empty grid yields 0.
    pub fn sample(&self, position: Vec2) -> f32 {
        if self.angles.is_empty() {
            return 0.0;
        }
        let col = (position.x / self.resolution).floor().clamp(0.0, (self.cols - 1) as f32) as usize;
        let row = (position.y / self.resolution).floor().clamp(0.0, (self.rows - 1) as f32) as usize;
        self.angles[row * self.cols + col]
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles
    }
}
