// render/ - Grid renderers
//
// Two interchangeable consumers of the same grid buffer:
//   text.rs    - one fillText call per occupied cell on a 2D canvas
//   gl.rs      - cells packed into an RGBA texture, one full-screen draw
//   texture.rs - the CPU side of that packing
//
// Cell colour: head cells use the head colour, trail cells the trail colour
// scaled by their brightness. Both renderers share this through `Palette`.

mod gl;
mod shaders;
mod text;
mod texture;

pub use gl::GlRenderer;
pub use text::{TextRenderer, TextSurface};
pub use texture::CellTexture;

use wasm_bindgen::JsValue;

use crate::config::RainConfig;
use crate::grid::{Geometry, GridBuffer, Shade};

/// Something that can put a grid on screen
pub trait Renderer {
    type Error;

    /// Called after every geometry change, before the next `render`
    fn resize(&mut self, geometry: &Geometry) -> Result<(), Self::Error>;

    /// Draw one frame. The grid is only borrowed for the duration of the call.
    fn render(&mut self, geometry: &Geometry, grid: &GridBuffer) -> Result<(), Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub head: [u8; 3],
    pub trail: [u8; 3],
}

impl Palette {
    pub fn from_config(config: &RainConfig) -> Self {
        Self { head: config.head_color, trail: config.trail_color }
    }

    #[inline]
    pub fn rgb(&self, shade: Shade) -> [u8; 3] {
        match shade {
            Shade::Head => self.head,
            Shade::Trail(b) => {
                let b = b.clamp(0.0, 1.0);
                self.trail.map(|c| (c as f32 * b).round() as u8)
            }
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&RainConfig::default())
    }
}

pub(crate) fn js_err(message: &str) -> JsValue {
    JsValue::from_str(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_ignores_brightness() {
        let p = Palette { head: [1, 2, 3], trail: [100, 200, 50] };
        assert_eq!(p.rgb(Shade::Head), [1, 2, 3]);
    }

    #[test]
    fn trail_scales_linearly() {
        let p = Palette { head: [255; 3], trail: [100, 200, 50] };
        assert_eq!(p.rgb(Shade::Trail(1.0)), [100, 200, 50]);
        assert_eq!(p.rgb(Shade::Trail(0.5)), [50, 100, 25]);
        assert_eq!(p.rgb(Shade::Trail(0.0)), [0, 0, 0]);
        assert_eq!(p.rgb(Shade::Trail(3.0)), [100, 200, 50]);
    }
}
