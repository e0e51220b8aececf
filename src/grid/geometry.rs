// geometry.rs - Surface size to cell grid
//
// Surface sizes come in CSS pixels; cell size and canvas size are in
// device pixels.

/// Rows, columns and cell size for one surface size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub cell_size: f32,
    pub rows: usize,
    pub cols: usize,
    /// Backing canvas size in device pixels
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Geometry {
    /// Derive the grid for a surface.
    ///
    /// `cell_size = pixel_density * base_cell_size`, and each axis gets
    /// `ceil(surface_px * pixel_density / cell_size)` cells so partially
    /// visible cells at the right and bottom edges are still covered.
    /// Degenerate input (zero area, non-positive or non-finite density or
    /// cell size) yields an empty grid.
    pub fn new(
        surface_width: f32,
        surface_height: f32,
        pixel_density: f32,
        base_cell_size: f32,
    ) -> Self {
        let cell_size = pixel_density * base_cell_size;
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Self::empty();
        }

        let device_w = device_px(surface_width, pixel_density);
        let device_h = device_px(surface_height, pixel_density);

        Self {
            cell_size,
            rows: cells_along(device_h, cell_size),
            cols: cells_along(device_w, cell_size),
            canvas_width: device_w.round() as u32,
            canvas_height: device_h.round() as u32,
        }
    }

    pub const fn empty() -> Self {
        Self { cell_size: 0.0, rows: 0, cols: 0, canvas_width: 0, canvas_height: 0 }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Top-left pixel of a cell on the device-pixel canvas
    #[inline]
    pub fn cell_origin(&self, row: usize, col: usize) -> (f32, f32) {
        (col as f32 * self.cell_size, row as f32 * self.cell_size)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::empty()
    }
}

#[inline]
fn device_px(css_px: f32, pixel_density: f32) -> f32 {
    let px = css_px * pixel_density;
    if px.is_finite() && px > 0.0 { px } else { 0.0 }
}

#[inline]
fn cells_along(device_px: f32, cell_size: f32) -> usize {
    (device_px / cell_size).ceil() as usize
}
