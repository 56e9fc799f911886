use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use geneart_core::config::{ArtConfig, MovementMode};
use geneart_core::particle::PackedParticle;
use geneart_core::render::{Rgba, Surface};
use geneart_core::shapes::ShapeKind;
use geneart_core::visualizer::{FrameOutcome, Visualizer};
use geneart_core::GeneArtError;
use glam::Vec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

fn to_js(err: GeneArtError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// `Surface` backed by a 2D canvas context.
struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
    }

    fn set_shadow(&mut self, blur: f32, color: Rgba) {
        self.ctx.set_shadow_blur(blur as f64);
        self.ctx.set_shadow_color(&color.css());
    }

    fn fill_radial_glow(&mut self, center: Vec2, radius: f32, gradient_radius: f32, inner: Rgba, outer: Rgba) {
        let (x, y) = (center.x as f64, center.y as f64);
        let gradient = match self.ctx.create_radial_gradient(x, y, 0.0, x, y, gradient_radius as f64) {
            Ok(g) => g,
            Err(e) => {
                log::warn!("radial gradient rejected: {:?}", e);
                return;
            }
        };
        let _ = gradient.add_color_stop(0.0, &inner.css());
        let _ = gradient.add_color_stop(1.0, &outer.css());

        self.ctx.begin_path();
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        let _ = self.ctx.arc(x, y, radius as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        let _ = self.ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.stroke();
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x as f64, offset.y as f64);
    }

    fn rotate(&mut self, angle: f32) {
        let _ = self.ctx.rotate(angle as f64);
    }
}

struct Inner {
    visualizer: Visualizer,
    surface: CanvasSurface,
    pending_frame: Option<i32>,
    callback: Option<FrameCallback>,
    packed: Vec<PackedParticle>,
}

/// Browser handle of the gene art visualizer.
///
/// The page fetches sequences itself and reports the outcome through
/// `load_sequence` / `report_fetch_failure`; everything after that (particle
/// seeding, the frame loop, drawing) runs here.
#[wasm_bindgen]
pub struct GeneArt {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl GeneArt {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, config_json: Option<String>) -> Result<GeneArt, JsValue> {
        let config = match config_json {
            Some(json) => ArtConfig::from_json(&json).map_err(to_js)?,
            None => ArtConfig::default(),
        };
        canvas.set_width(config.width as u32);
        canvas.set_height(config.height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        ctx.set_global_composite_operation("screen")?;
        ctx.set_shadow_blur(config.glow_blur as f64);

        log::info!(
            "GeneArt created: {}x{} canvas, {} particles",
            config.width,
            config.height,
            config.particle_count
        );

        let surface = CanvasSurface {
            ctx,
            width: config.width as f64,
            height: config.height as f64,
        };
        let visualizer = Visualizer::new(config).map_err(to_js)?;

        Ok(GeneArt {
            inner: Rc::new(RefCell::new(Inner {
                visualizer,
                surface,
                pending_frame: None,
                callback: None,
                packed: Vec::new(),
            })),
        })
    }

    /// True when `id` can be generated without a fetch.
    #[wasm_bindgen]
    pub fn has_cached(&self, id: &str) -> bool {
        self.inner.borrow().visualizer.cache().contains(id)
    }

    /// Generate from the cached sequence of `id`. Returns false on a miss.
    #[wasm_bindgen]
    pub fn load_cached(&mut self, id: &str) -> Result<bool, JsValue> {
        let generation = {
            let mut inner = self.inner.borrow_mut();
            let Inner { visualizer, surface, .. } = &mut *inner;
            visualizer.load_cached(id, rand::random(), surface).map_err(to_js)?
        };
        match generation {
            Some(generation) => {
                self.restart_loop(generation)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[wasm_bindgen]
    pub fn begin_fetch(&mut self, id: &str) {
        self.inner.borrow_mut().visualizer.begin_fetch(id);
    }

    /// Hand over a fetched sequence (the JSON body of the sequence endpoint)
    /// and start animating it. A malformed body sets the error status.
    #[wasm_bindgen]
    pub fn load_sequence(&mut self, id: &str, json: &str) -> Result<(), JsValue> {
        let generation = {
            let mut inner = self.inner.borrow_mut();
            let Inner { visualizer, surface, .. } = &mut *inner;
            visualizer
                .load_sequence_json(id, json, rand::random(), surface)
                .map_err(to_js)?
        };
        self.restart_loop(generation)
    }

    #[wasm_bindgen]
    pub fn report_fetch_failure(&mut self, id: &str, message: &str) {
        self.inner.borrow_mut().visualizer.report_fetch_failure(id, message);
    }

    /// Re-seed the current gene with fresh randomness.
    #[wasm_bindgen]
    pub fn generate(&mut self) -> Result<(), JsValue> {
        let generation = {
            let mut inner = self.inner.borrow_mut();
            let Inner { visualizer, surface, .. } = &mut *inner;
            let id = visualizer
                .current_gene()
                .map(str::to_string)
                .ok_or_else(|| JsValue::from_str("no gene loaded"))?;
            visualizer.generate(&id, rand::random(), surface).map_err(to_js)?
        };
        self.restart_loop(generation)
    }

    #[wasm_bindgen]
    pub fn stop(&mut self) -> Result<(), JsValue> {
        self.inner.borrow_mut().visualizer.stop();
        cancel_pending(&self.inner)
    }

    #[wasm_bindgen]
    pub fn status(&self) -> String {
        self.inner.borrow().visualizer.status().to_string()
    }

    /// Replace the configuration with JSON overrides; applies from the next
    /// generation.
    #[wasm_bindgen]
    pub fn set_config(&mut self, json: &str) -> Result<(), JsValue> {
        let config = ArtConfig::from_json(json).map_err(to_js)?;
        self.inner.borrow_mut().visualizer.set_config(config).map_err(to_js)
    }

    /// `"helix"`, `"circle"`, `"wave"`, or `"none"` / empty to stop morphing.
    #[wasm_bindgen]
    pub fn set_shape(&mut self, name: &str) -> Result<(), JsValue> {
        let shape = match name {
            "" | "none" => None,
            other => Some(other.parse::<ShapeKind>().map_err(to_js)?),
        };
        self.inner.borrow_mut().visualizer.set_shape(shape);
        Ok(())
    }

    /// `"flow"`, `"helix"` or `"network"`; applies from the next generation.
    #[wasm_bindgen]
    pub fn set_movement(&mut self, name: &str) -> Result<(), JsValue> {
        let movement = name.parse::<MovementMode>().map_err(to_js)?;
        self.inner.borrow_mut().visualizer.set_movement(movement);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn particle_count(&self) -> usize {
        self.inner
            .borrow()
            .visualizer
            .simulation()
            .map_or(0, |sim| sim.particles.count)
    }

    /// Refresh the packed particle buffer and return its address in wasm
    /// memory. Read `particle_buffer_byte_length()` bytes from there.
    #[wasm_bindgen]
    pub fn particle_buffer_ptr(&self) -> *const f32 {
        let mut inner = self.inner.borrow_mut();
        let Inner { visualizer, packed, .. } = &mut *inner;
        match visualizer.simulation() {
            Some(sim) => sim.particles.pack_into(packed),
            None => packed.clear(),
        }
        bytemuck::cast_slice::<PackedParticle, f32>(packed.as_slice()).as_ptr()
    }

    #[wasm_bindgen]
    pub fn particle_buffer_byte_length(&self) -> usize {
        self.inner.borrow().packed.len() * std::mem::size_of::<PackedParticle>()
    }
}

impl GeneArt {
    fn restart_loop(&self, generation: u64) -> Result<(), JsValue> {
        cancel_pending(&self.inner)?;
        run_loop(self.inner.clone(), generation)
    }
}

/// Cancel the queued animation frame and free its callback.
fn cancel_pending(inner: &Rc<RefCell<Inner>>) -> Result<(), JsValue> {
    let (handle, callback) = {
        let mut state = inner.borrow_mut();
        (state.pending_frame.take(), state.callback.take())
    };
    if let Some(handle) = handle {
        window()?.cancel_animation_frame(handle)?;
    }
    if let Some(callback) = callback {
        callback.borrow_mut().take();
    }
    Ok(())
}

/// Drive `generation` with `requestAnimationFrame` until the visualizer
/// reports it is no longer current.
fn run_loop(inner: Rc<RefCell<Inner>>, generation: u64) -> Result<(), JsValue> {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let next = callback.clone();
    let state = inner.clone();

    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        let mut guard = state.borrow_mut();
        let Inner { visualizer, surface, pending_frame, .. } = &mut *guard;
        pending_frame.take();

        if visualizer.frame(generation, now, surface) == FrameOutcome::Stopped {
            let _ = next.borrow_mut().take();
            return;
        }

        let scheduled = match (web_sys::window(), next.borrow().as_ref()) {
            (Some(w), Some(cb)) => w.request_animation_frame(cb.as_ref().unchecked_ref()),
            _ => return,
        };
        match scheduled {
            Ok(handle) => *pending_frame = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }) as Box<dyn FnMut(f64)>));

    let handle = match callback.borrow().as_ref() {
        Some(cb) => window()?.request_animation_frame(cb.as_ref().unchecked_ref())?,
        None => return Ok(()),
    };

    let mut state = inner.borrow_mut();
    state.pending_frame = Some(handle);
    state.callback = Some(callback);
    Ok(())
}
