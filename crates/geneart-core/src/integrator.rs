//! Per-tick particle update.
//!
//! The default [`MovementMode::Flow`] steers every particle through
//! multi-octave noise, caps and damps its velocity and then applies the soft
//! margin plus wraparound boundary. The helix and network modes are
//! alternative pure update rules selected by configuration.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::config::{ArtConfig, MovementMode};
use crate::field::FlowField;
use crate::math::{clamp_speed, margin_push, wrap_coordinate};
use crate::noise::NoiseSource;
use crate::particle::ParticleSet;

/// Orbit radius of the helix mode (px); the vertical radius is half of it.
const HELIX_RADIUS: f32 = 150.0;
/// Heading perturbation amplitude applied on mutation (radians).
const MUTATION_SPREAD: f32 = 0.5;

/// Read-only inputs of one tick.
pub struct StepContext<'a> {
    pub config: &'a ArtConfig,
    pub noise: &'a NoiseSource,
    pub field: &'a FlowField,
    /// Scaled simulation time (`tick * time_scale`), drives the noise.
    pub time: f32,
    /// Raw tick count, drives the helix phase and the network drift.
    pub frame: f32,
}

/// Flow-mode velocity update (steer, cap, damp) for one particle.
pub fn steer(pos: Vec2, vel: Vec2, ctx: &StepContext) -> Vec2 {
    let cfg = ctx.config;
    let n = ctx.noise.octaves(pos.x * cfg.noise_scale, pos.y * cfg.noise_scale, ctx.time);
    let angle = n * TAU;

    let mut dir = Vec2::from_angle(angle);
    if cfg.field_blend > 0.0 {
        let field_dir = Vec2::from_angle(ctx.field.sample(pos));
        dir = dir.lerp(field_dir, cfg.field_blend).normalize_or_zero();
    }

    let vel = clamp_speed(vel + dir * cfg.flow_speed, cfg.particle_speed);
    vel * cfg.friction
}

/// Soft margin push followed by the toroidal wrap. Returns the new position
/// and velocity; the velocity is re-capped after the push.
pub fn apply_boundaries(pos: Vec2, vel: Vec2, cfg: &ArtConfig) -> (Vec2, Vec2) {
    let push = Vec2::new(
        margin_push(pos.x, cfg.width, cfg.margin, cfg.boundary_stiffness),
        margin_push(pos.y, cfg.height, cfg.margin, cfg.boundary_stiffness),
    );
    let vel = clamp_speed(vel + push, cfg.particle_speed);
    let pos = Vec2::new(
        wrap_coordinate(pos.x, cfg.width, cfg.margin),
        wrap_coordinate(pos.y, cfg.height, cfg.margin),
    );
    (pos, vel)
}

/// Helix mode: orbit the center on an ellipse. Returns `(position, angle)`.
/// The phase advances one radian per frame on top of `angle`.
pub fn helix_motion(center: Vec2, angle: f32, speed: f32, frame: f32) -> (Vec2, f32) {
    let phase = angle + frame;
    let pos = center + Vec2::new(phase.cos() * HELIX_RADIUS, phase.sin() * HELIX_RADIUS * 0.5);
    (pos, angle + speed * 0.01)
}

/// Network mode: advance along the heading, which drifts sinusoidally.
pub fn network_motion(pos: Vec2, angle: f32, speed: f32, frame: f32) -> (Vec2, f32) {
    let pos = pos + Vec2::from_angle(angle) * speed;
    (pos, angle + (frame * speed).sin() * 0.1)
}

/// Hard clamp into the inner rectangle `[margin, extent - margin]`.
pub fn constrain(pos: Vec2, cfg: &ArtConfig) -> Vec2 {
    let lo = Vec2::splat(cfg.margin);
    let hi = Vec2::new(cfg.width - cfg.margin, cfg.height - cfg.margin).max(lo);
    pos.clamp(lo, hi)
}

/// Advance every particle by one tick under the configured movement mode.
pub fn step<R: Rng + ?Sized>(particles: &mut ParticleSet, ctx: &StepContext, rng: &mut R) {
    match ctx.config.movement {
        MovementMode::Flow => step_flow(particles, ctx),
        MovementMode::Helix | MovementMode::Network => step_patterned(particles, ctx, rng),
    }
}

fn step_flow(particles: &mut ParticleSet, ctx: &StepContext) {
    for i in 0..particles.count {
        let vel = steer(particles.position[i], particles.velocity[i], ctx);
        let pos = particles.position[i] + vel;
        let (pos, vel) = apply_boundaries(pos, vel, ctx.config);
        particles.position[i] = pos;
        particles.velocity[i] = vel;
    }
}

fn step_patterned<R: Rng + ?Sized>(particles: &mut ParticleSet, ctx: &StepContext, rng: &mut R) {
    let cfg = ctx.config;
    let center = cfg.center();

    for i in 0..particles.count {
        let prev = particles.position[i];
        let (pos, mut angle) = match cfg.movement {
            MovementMode::Helix => helix_motion(center, particles.angle[i], particles.speed[i], ctx.frame),
            _ => network_motion(prev, particles.angle[i], particles.speed[i], ctx.frame),
        };

        if rng.gen::<f32>() < cfg.mutation_rate {
            angle += (rng.gen::<f32>() - 0.5) * MUTATION_SPREAD;
        }

        let pos = constrain(pos, cfg);
        particles.position[i] = pos;
        particles.angle[i] = angle;
        particles.velocity[i] = clamp_speed(pos - prev, cfg.particle_speed);
    }
}

/// Move each particle a fraction `speed` of the way toward its target.
/// Extra particles or targets beyond the shorter slice are left alone.
pub fn morph_toward(particles: &mut ParticleSet, targets: &[Vec2], speed: f32) {
    for (pos, target) in particles.position.iter_mut().zip(targets) {
        *pos = pos.lerp(*target, speed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helix_motion_stays_on_ellipse() {
        let center = Vec2::new(400.0, 300.0);
        let (pos, angle) = helix_motion(center, 0.3, 1.0, 0.2);
        let rel = pos - center;
        let e = (rel.x / 150.0).powi(2) + (rel.y / 75.0).powi(2);
        assert!((e - 1.0).abs() < 1e-4, "not on ellipse: {}", e);
        assert!((angle - 0.31).abs() < 1e-6);
    }

    #[test]
    fn test_network_motion_moves_by_speed() {
        let (pos, _) = network_motion(Vec2::new(100.0, 100.0), 0.0, 1.5, 0.0);
        assert!((pos - Vec2::new(101.5, 100.0)).length() < 1e-5);
    }

    #[test]
    fn test_constrain_clamps_into_inner_rect() {
        let cfg = ArtConfig::default();
        let p = constrain(Vec2::new(-10.0, 900.0), &cfg);
        assert_eq!(p, Vec2::new(50.0, 550.0));
    }
}
