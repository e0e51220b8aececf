// glyph-rain-engine - Digital rain for the browser
//
// The host page owns the canvas, resize events and requestAnimationFrame.
// It builds a `MatrixRain` with the renderer it wants, forwards resizes and
// calls `frame(time)` once per display refresh.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, WebGl2RenderingContext};

mod clock;
mod console;
pub mod config;
pub mod glyphs;
pub mod grid;
pub mod render;
pub mod sim;

use clock::FrameClock;
use config::RainConfig;
use render::{js_err, GlRenderer, Palette, Renderer, TextRenderer};
use sim::Simulator;

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console::init(log::LevelFilter::Info);
}

/// Change the console log level ("off", "error", "warn", "info", "debug", "trace")
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = level
        .parse::<log::LevelFilter>()
        .map_err(|_| js_err(&format!("unknown log level `{level}`")))?;
    console::init(filter);
    Ok(())
}

#[wasm_bindgen]
pub struct MatrixRain {
    canvas: HtmlCanvasElement,
    sim: Simulator,
    renderer: Box<dyn Renderer<Error = JsValue>>,
    clock: FrameClock,
}

#[wasm_bindgen]
impl MatrixRain {
    /// Rain drawn with one fillText call per glyph on a 2D canvas
    pub fn canvas2d(canvas: HtmlCanvasElement, config: Option<String>) -> Result<MatrixRain, JsValue> {
        let config = parse_config(config.as_deref())?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| js_err("2D canvas not supported"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let renderer = TextRenderer::new(ctx, Palette::from_config(&config), config.font_family.clone());
        log::info!("text renderer ready");
        Self::assemble(canvas, config, Box::new(renderer))
    }

    /// Rain drawn by a WebGL2 shader from a per-cell texture.
    /// `atlas` must be a loaded image of the 48 glyphs stacked vertically.
    pub fn webgl(
        canvas: HtmlCanvasElement,
        atlas: HtmlImageElement,
        config: Option<String>,
    ) -> Result<MatrixRain, JsValue> {
        let config = parse_config(config.as_deref())?;
        let gl = canvas
            .get_context("webgl2")?
            .ok_or_else(|| js_err("WebGL2 not supported"))?
            .dyn_into::<WebGl2RenderingContext>()?;
        let renderer = GlRenderer::new(gl, &atlas, Palette::from_config(&config))?;
        log::info!("WebGL renderer ready");
        Self::assemble(canvas, config, Box::new(renderer))
    }

    /// New surface size in CSS pixels. Resets all streams.
    pub fn resize(&mut self, width: f64, height: f64, pixel_ratio: f64) -> Result<(), JsValue> {
        let geometry = self.sim.resize_surface(width as f32, height as f32, pixel_ratio as f32);
        self.canvas.set_width(geometry.canvas_width);
        self.canvas.set_height(geometry.canvas_height);
        self.renderer.resize(&geometry)
    }

    /// Advance to `time_ms` (a requestAnimationFrame timestamp) and draw
    pub fn frame(&mut self, time_ms: f64) -> Result<(), JsValue> {
        let dt = self.clock.delta(time_ms);
        self.sim.tick(dt);
        self.renderer.render(self.sim.geometry(), self.sim.grid())
    }

    #[wasm_bindgen(getter)]
    pub fn stream_count(&self) -> usize { self.sim.streams().len() }

    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> usize { self.sim.geometry().rows }

    #[wasm_bindgen(getter)]
    pub fn cols(&self) -> usize { self.sim.geometry().cols }

    #[wasm_bindgen(getter)]
    pub fn cell_size(&self) -> f32 { self.sim.geometry().cell_size }
}

impl MatrixRain {
    fn assemble(
        canvas: HtmlCanvasElement,
        config: RainConfig,
        renderer: Box<dyn Renderer<Error = JsValue>>,
    ) -> Result<Self, JsValue> {
        let clock = FrameClock::new(config.max_frame_secs);
        let sim = Simulator::new(config).map_err(|e| js_err(&e.to_string()))?;
        Ok(Self { canvas, sim, renderer, clock })
    }
}

fn parse_config(json: Option<&str>) -> Result<RainConfig, JsValue> {
    match json {
        Some(json) => RainConfig::from_json(json).map_err(|e| js_err(&e.to_string())),
        None => Ok(RainConfig::default()),
    }
}
