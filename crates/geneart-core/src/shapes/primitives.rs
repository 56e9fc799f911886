//! Analytic 2D layout curves.
//!
//! Each generator takes the normalised particle index `t = i / n` in `[0, 1)`
//! and returns a pixel position relative to the canvas described by
//! `center` and `size`.

use std::f32::consts::TAU;

use glam::Vec2;

/// Double-helix strand: four full turns swept top to bottom.
pub fn shape_helix(t: f32, center: Vec2, size: Vec2) -> Vec2 {
    let turns = 4.0_f32;
    let amplitude = 100.0_f32;
    let angle = t * TAU * turns;
    Vec2::new(center.x + angle.sin() * amplitude, t * size.y)
}

/// Ring with a radius ripple driven by the raw particle index.
pub fn shape_circle(t: f32, index: usize, center: Vec2) -> Vec2 {
    let angle = t * TAU;
    let radius = 150.0 + (index as f32 * 0.1).sin() * 50.0;
    center + Vec2::from_angle(angle) * radius
}

/// Horizontal sine wave across the full canvas width.
pub fn shape_wave(t: f32, center: Vec2, size: Vec2) -> Vec2 {
    let x = t * size.x;
    Vec2::new(x, center.y + (x * 0.02).sin() * 100.0)
}
