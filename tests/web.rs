// web.rs - Browser tests for the wasm entry points
//
// Run with `wasm-pack test --headless --firefox` (or --chrome).

#![cfg(target_arch = "wasm32")]

use glyph_rain_engine::config::RainConfig;
use glyph_rain_engine::render::{GlRenderer, Palette, Renderer};
use glyph_rain_engine::sim::Simulator;
use glyph_rain_engine::MatrixRain;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as GL};

wasm_bindgen_test_configure!(run_in_browser);

fn canvas() -> HtmlCanvasElement {
    web_sys::window()
        .and_then(|w| w.document())
        .expect("document")
        .create_element("canvas")
        .expect("canvas element")
        .dyn_into::<HtmlCanvasElement>()
        .expect("HtmlCanvasElement")
}

#[wasm_bindgen_test]
fn resize_sizes_canvas_and_grid() {
    let canvas = canvas();
    let mut rain = MatrixRain::canvas2d(canvas.clone(), None).unwrap();
    rain.resize(320.0, 240.0, 2.0).unwrap();

    assert_eq!((canvas.width(), canvas.height()), (640, 480));
    assert_eq!(rain.cell_size(), 32.0);
    assert_eq!((rain.cols(), rain.rows()), (20, 15));
}

#[wasm_bindgen_test]
fn text_renderer_runs_frames() {
    let mut rain = MatrixRain::canvas2d(canvas(), Some(r#"{ "spawn_rate": 2.0 }"#.to_string())).unwrap();
    rain.resize(320.0, 240.0, 1.0).unwrap();
    for frame in 1..=120 {
        rain.frame(frame as f64 * 16.0).unwrap();
    }
    assert!(rain.stream_count() > 0);

    rain.resize(100.0, 100.0, 1.0).unwrap();
    assert_eq!(rain.stream_count(), 0);
}

#[wasm_bindgen_test]
fn zero_sized_surface_is_harmless() {
    let mut rain = MatrixRain::canvas2d(canvas(), None).unwrap();
    rain.resize(0.0, 0.0, 1.0).unwrap();
    for frame in 1..=10 {
        rain.frame(frame as f64 * 100.0).unwrap();
    }
    assert_eq!(rain.stream_count(), 0);
}

#[wasm_bindgen_test]
fn invalid_config_is_rejected() {
    assert!(MatrixRain::canvas2d(canvas(), Some(r#"{ "trail_min": 0 }"#.to_string())).is_err());
    assert!(MatrixRain::canvas2d(canvas(), Some("not json".to_string())).is_err());
    assert!(MatrixRain::canvas2d(canvas(), Some(r#"{ "max_frame_secs": 1e6 }"#.to_string())).is_err());
}

fn pixel(gl: &GL, x: i32, y: i32) -> [u8; 4] {
    let mut px = [0u8; 4];
    gl.read_pixels_with_opt_u8_array(x, y, 1, 1, GL::RGBA, GL::UNSIGNED_BYTE, Some(&mut px))
        .unwrap();
    px
}

#[wasm_bindgen_test]
fn gl_renderer_draws_head_cell() {
    let canvas = canvas();
    // Headless runners without a GPU have no WebGL2
    let Some(gl) = canvas.get_context("webgl2").ok().flatten() else { return };
    let gl: GL = gl.dyn_into().unwrap();

    // Solid white atlas, 4 px wide, one row per glyph
    let atlas = vec![255u8; 4 * 4 * 48];
    assert!(GlRenderer::from_rgba(gl.clone(), &atlas[..7], 4, Palette::default()).is_err());
    let mut renderer = GlRenderer::from_rgba(gl.clone(), &atlas, 4, Palette::default()).unwrap();

    let mut sim = Simulator::new(RainConfig { spawn_rate: 0.0, ..RainConfig::default() }).unwrap();
    let geometry = sim.resize_surface(64.0, 48.0, 1.0);
    canvas.set_width(geometry.canvas_width);
    canvas.set_height(geometry.canvas_height);
    renderer.resize(&geometry).unwrap();

    assert!(sim.spawn_stream(0, 2.0, 4));
    sim.tick(0.5);
    renderer.render(sim.geometry(), sim.grid()).unwrap();
    assert_eq!(gl.get_error(), GL::NO_ERROR);

    // Row 0 is at the top of the canvas; GL reads bottom-up
    let head = pixel(&gl, 8, 40);
    assert!(head[1] > 200 && head[0] < head[1], "head pixel {head:?}");
    assert_eq!(pixel(&gl, 56, 8), [0, 0, 0, 255]);
}
