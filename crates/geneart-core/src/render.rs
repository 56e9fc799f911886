//! Painting particles onto a 2D drawing surface.
//!
//! [`Surface`] is the small set of canvas primitives the engine needs. The
//! browser front end implements it on a `CanvasRenderingContext2d`;
//! [`CommandBuffer`] records the calls for headless use and tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::ArtConfig;
use crate::connections::find_connections;
use crate::particle::{Category, ParticleSet};

/// Amplitude of the per-channel color oscillation.
const TINT_AMPLITUDE: f32 = 30.0;
/// Hue advance in degrees per tick.
const HUE_RATE: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba { rgb: self, a }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f32,
}

impl Rgba {
    /// CSS `rgba(...)` string.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.rgb.r, self.rgb.g, self.rgb.b, self.a)
    }
}

/// Base color per category, total over [`Category`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorTable {
    pub adenine: Rgb,
    pub thymine: Rgb,
    pub guanine: Rgb,
    pub cytosine: Rgb,
    /// Used for characters outside the alphabet
    pub fallback: Rgb,
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            adenine: Rgb::new(30, 77, 140),
            thymine: Rgb::new(219, 166, 50),
            guanine: Rgb::new(46, 93, 59),
            cytosine: Rgb::new(139, 69, 19),
            fallback: Rgb::new(200, 200, 200),
        }
    }
}

impl ColorTable {
    pub fn color(&self, category: Category) -> Rgb {
        match category {
            Category::Adenine => self.adenine,
            Category::Thymine => self.thymine,
            Category::Guanine => self.guanine,
            Category::Cytosine => self.cytosine,
            Category::Unknown => self.fallback,
        }
    }
}

/// Cyclic tint: channel offsets are sines of the hue 120° apart, added to
/// `base` and clamped to `[0, 255]`.
pub fn tint(base: Rgb, frame: u64) -> Rgb {
    let hue = (frame as f32 * HUE_RATE) % 360.0;
    let channel = |v: u8, phase: f32| {
        let shifted = v as f32 + (hue + phase).to_radians().sin() * TINT_AMPLITUDE;
        shifted.floor().clamp(0.0, 255.0) as u8
    };
    Rgb::new(channel(base.r, 0.0), channel(base.g, 120.0), channel(base.b, 240.0))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleStyle {
    /// Radial-gradient glow with a motion trail.
    #[default]
    Glow,
    /// Rotating filled polygon.
    Polygon { sides: u32 },
}

pub trait Surface {
    fn clear(&mut self);
    fn set_shadow(&mut self, blur: f32, color: Rgba);
    /// Fill a disc of `radius` with a radial gradient running from `inner`
    /// at the center to `outer` at `gradient_radius`.
    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, gradient_radius: f32, inner: Rgba, outer: Rgba);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Shadow { blur: f32, color: Rgba },
    Glow { center: Vec2, radius: f32, gradient_radius: f32, inner: Rgba, outer: Rgba },
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },
    Polygon { points: Vec<Vec2>, color: Rgba },
    Circle { center: Vec2, radius: f32, width: f32, color: Rgba },
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
}

/// Surface that records every call in order.
#[derive(Clone, Debug, Default)]
pub struct CommandBuffer {
    pub commands: Vec<DrawCommand>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for CommandBuffer {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn set_shadow(&mut self, blur: f32, color: Rgba) {
        self.commands.push(DrawCommand::Shadow { blur, color });
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, gradient_radius: f32, inner: Rgba, outer: Rgba) {
        self.commands.push(DrawCommand::Glow { center, radius, gradient_radius, inner, outer });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line { from, to, width, color });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.commands.push(DrawCommand::Polygon { points: points.to_vec(), color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, width, color });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCommand::Rotate(angle));
    }
}

pub struct Renderer {
    pub colors: ColorTable,
    pub style: ParticleStyle,
    pub glow_blur: f32,
    pub trail_threshold: f32,
    pub draw_connections: bool,
    pub connection_radius: f32,
    pub max_connections: usize,
}

impl Renderer {
    pub fn from_config(config: &ArtConfig) -> Self {
        Self {
            colors: ColorTable::default(),
            style: config.style,
            glow_blur: config.glow_blur,
            trail_threshold: config.trail_threshold,
            draw_connections: config.draw_connections,
            connection_radius: config.connection_radius,
            max_connections: config.max_connections,
        }
    }

    /// Paint one frame. The surface is not cleared; earlier frames stay
    /// underneath and build up the trails.
    pub fn draw_frame<S: Surface + ?Sized>(&self, particles: &ParticleSet, frame: u64, surface: &mut S) {
        if self.draw_connections {
            self.draw_connections(particles, frame, surface);
        }
        for i in 0..particles.count {
            match self.style {
                ParticleStyle::Glow => self.draw_glow(particles, i, frame, surface),
                ParticleStyle::Polygon { sides } => self.draw_polygon(particles, i, sides, frame, surface),
            }
        }
    }

    fn draw_glow<S: Surface + ?Sized>(&self, particles: &ParticleSet, i: usize, frame: u64, surface: &mut S) {
        let pos = particles.position[i];
        let vel = particles.velocity[i];
        let speed = vel.length();
        let size = particles.size[i] * (1.0 + speed * 0.2);
        let color = tint(self.colors.color(particles.category[i]), frame);

        surface.set_shadow(self.glow_blur, color.with_alpha(0.5));
        surface.fill_radial_glow(pos, size, size * 2.0, color.with_alpha(0.8), color.with_alpha(0.0));

        if speed > self.trail_threshold {
            surface.stroke_line(pos - vel * 3.0, pos, size * 0.5, color.with_alpha(0.2));
        }
    }

    fn draw_polygon<S: Surface + ?Sized>(
        &self,
        particles: &ParticleSet,
        i: usize,
        sides: u32,
        frame: u64,
        surface: &mut S,
    ) {
        let sides = sides.max(3);
        let time = frame as f32;
        let size = particles.size[i];
        let radius = size * (1.0 + time.sin() * 0.1);
        let color = tint(self.colors.color(particles.category[i]), frame);

        surface.save();
        surface.translate(particles.position[i]);
        surface.rotate(time * particles.speed[i] * 0.5);

        let points: Vec<Vec2> = (0..sides)
            .map(|k| Vec2::from_angle(k as f32 / sides as f32 * std::f32::consts::TAU) * radius)
            .collect();
        surface.fill_polygon(&points, color.with_alpha(1.0));

        if size > 10.0 {
            surface.stroke_circle(Vec2::ZERO, radius * 0.5, 1.0, Rgb::new(255, 255, 255).with_alpha(1.0));
        }
        surface.restore();
    }

    fn draw_connections<S: Surface + ?Sized>(&self, particles: &ParticleSet, frame: u64, surface: &mut S) {
        for conn in find_connections(&particles.position, self.connection_radius, self.max_connections) {
            let color = tint(self.colors.color(particles.category[conn.a]), frame);
            surface.stroke_line(
                particles.position[conn.a],
                particles.position[conn.b],
                conn.strength * 2.0,
                color.with_alpha(conn.strength * 0.5),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_at_frame_zero() {
        // hue 0: r + 0, g + sin(120°)*30, b + sin(240°)*30
        let c = tint(Rgb::new(100, 100, 100), 0);
        assert_eq!(c.r, 100);
        assert_eq!(c.g, 125);
        assert_eq!(c.b, 74);
    }

    #[test]
    fn test_tint_clamps_channels() {
        for frame in 0..800 {
            let hi = tint(Rgb::new(255, 255, 255), frame);
            let lo = tint(Rgb::new(0, 0, 0), frame);
            assert!(hi.r >= 225 && lo.r <= 30, "frame {frame}");
        }
    }

    #[test]
    fn test_unknown_category_uses_fallback() {
        let table = ColorTable::default();
        assert_eq!(table.color(Category::Unknown), table.fallback);
        assert_eq!(table.color(Category::Thymine), Rgb::new(219, 166, 50));
    }
}
