// text.rs - Immediate-mode text renderer
//
// Clears the surface and draws every occupied cell's glyph with its own
// fill colour, top-aligned, with a font as tall as a cell.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::{Palette, Renderer};
use crate::glyphs;
use crate::grid::{Geometry, GridBuffer};

/// The drawing calls the text renderer needs
pub trait TextSurface {
    type Error;

    fn clear_surface(&mut self, width: f64, height: f64);
    /// Font of `px` device pixels; text baseline at the top of the glyph box
    fn set_font_px(&mut self, px: f64, family: &str);
    fn set_fill_rgb(&mut self, rgb: [u8; 3]);
    fn draw_glyph(&mut self, glyph: &str, x: f64, y: f64) -> Result<(), Self::Error>;
}

impl TextSurface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn clear_surface(&mut self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn set_font_px(&mut self, px: f64, family: &str) {
        CanvasRenderingContext2d::set_text_baseline(self, "top");
        CanvasRenderingContext2d::set_font(self, &format!("{px}px {family}"));
    }

    fn set_fill_rgb(&mut self, [r, g, b]: [u8; 3]) {
        CanvasRenderingContext2d::set_fill_style_str(self, &format!("rgb({r}, {g}, {b})"));
    }

    fn draw_glyph(&mut self, glyph: &str, x: f64, y: f64) -> Result<(), JsValue> {
        self.fill_text(glyph, x, y)
    }
}

pub struct TextRenderer<S> {
    surface: S,
    palette: Palette,
    font_family: String,
}

impl<S: TextSurface> TextRenderer<S> {
    pub fn new(surface: S, palette: Palette, font_family: impl Into<String>) -> Self {
        Self { surface, palette, font_family: font_family.into() }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: TextSurface> Renderer for TextRenderer<S> {
    type Error = S::Error;

    fn resize(&mut self, _geometry: &Geometry) -> Result<(), S::Error> {
        Ok(())
    }

    fn render(&mut self, geometry: &Geometry, grid: &GridBuffer) -> Result<(), S::Error> {
        self.surface
            .clear_surface(geometry.canvas_width as f64, geometry.canvas_height as f64);
        if geometry.is_empty() { return Ok(()); }

        self.surface.set_font_px(geometry.cell_size as f64, &self.font_family);

        let mut fill = None;
        for (row, col, cell) in grid.occupied() {
            let rgb = self.palette.rgb(cell.shade);
            if fill != Some(rgb) {
                self.surface.set_fill_rgb(rgb);
                fill = Some(rgb);
            }
            let (x, y) = geometry.cell_origin(row, col);
            self.surface.draw_glyph(glyphs::glyph(cell.glyph), x as f64, y as f64)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::grid::{Cell, Shade};

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear(f64, f64),
        Font(f64, String),
        Fill([u8; 3]),
        Glyph(String, f64, f64),
    }

    #[derive(Default)]
    struct Recorder(Vec<Op>);

    impl TextSurface for Recorder {
        type Error = Infallible;

        fn clear_surface(&mut self, width: f64, height: f64) {
            self.0.push(Op::Clear(width, height));
        }
        fn set_font_px(&mut self, px: f64, family: &str) {
            self.0.push(Op::Font(px, family.to_string()));
        }
        fn set_fill_rgb(&mut self, rgb: [u8; 3]) {
            self.0.push(Op::Fill(rgb));
        }
        fn draw_glyph(&mut self, glyph: &str, x: f64, y: f64) -> Result<(), Infallible> {
            self.0.push(Op::Glyph(glyph.to_string(), x, y));
            Ok(())
        }
    }

    fn palette() -> Palette {
        Palette { head: [200, 255, 200], trail: [0, 200, 0] }
    }

    #[test]
    fn draws_cells_row_major_at_cell_origins() {
        let geometry = Geometry::new(40.0, 40.0, 1.0, 20.0); // 2x2
        let mut grid = GridBuffer::new(2, 2);
        grid.set(1, 0, Cell { glyph: 1, shade: Shade::Trail(0.5) });
        grid.set(0, 1, Cell { glyph: 0, shade: Shade::Head });

        let mut r = TextRenderer::new(Recorder::default(), palette(), "monospace");
        r.render(&geometry, &grid).unwrap();

        assert_eq!(
            r.surface().0,
            vec![
                Op::Clear(40.0, 40.0),
                Op::Font(20.0, "monospace".to_string()),
                Op::Fill([200, 255, 200]),
                Op::Glyph("ア".to_string(), 20.0, 0.0),
                Op::Fill([0, 100, 0]),
                Op::Glyph("イ".to_string(), 0.0, 20.0),
            ]
        );
    }

    #[test]
    fn repeated_colours_are_set_once() {
        let geometry = Geometry::new(60.0, 20.0, 1.0, 20.0); // 1x3
        let mut grid = GridBuffer::new(1, 3);
        for col in 0..3 {
            grid.set(0, col, Cell { glyph: 2, shade: Shade::Head });
        }

        let mut r = TextRenderer::new(Recorder::default(), palette(), "sans-serif");
        r.render(&geometry, &grid).unwrap();

        let fills = r.surface().0.iter().filter(|op| matches!(op, Op::Fill(_))).count();
        let glyphs = r.surface().0.iter().filter(|op| matches!(op, Op::Glyph(..))).count();
        assert_eq!((fills, glyphs), (1, 3));
    }

    #[test]
    fn empty_geometry_only_clears() {
        let geometry = Geometry::empty();
        let grid = GridBuffer::new(0, 0);
        let mut r = TextRenderer::new(Recorder::default(), palette(), "sans-serif");
        r.render(&geometry, &grid).unwrap();
        assert_eq!(r.surface().0, vec![Op::Clear(0.0, 0.0)]);
    }
}
