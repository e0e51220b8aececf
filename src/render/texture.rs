// texture.rs - Encode the grid into a per-cell RGBA texture
//
// One texel per cell, row-major, row 0 at the top:
//   rgb = cell colour (head colour, or trail colour scaled by brightness)
//   a   = glyph index into the atlas
// Empty cells are all zero.

use super::Palette;
use crate::grid::GridBuffer;

pub const TEXEL_STRIDE: usize = 4;

pub struct CellTexture {
    data: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl CellTexture {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0; rows * cols * TEXEL_STRIDE],
            rows,
            cols,
        }
    }

    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.data.resize(rows * cols * TEXEL_STRIDE, 0);
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn bytes(&self) -> &[u8] { &self.data }

    /// Zero the buffer and write every occupied cell of `grid`
    pub fn encode(&mut self, grid: &GridBuffer, palette: &Palette) {
        if grid.rows() != self.rows || grid.cols() != self.cols {
            self.resize(grid.rows(), grid.cols());
        }
        self.clear();
        for (row, col, cell) in grid.occupied() {
            let [r, g, b] = palette.rgb(cell.shade);
            self.put(row, col, [r, g, b, cell.glyph]);
        }
    }

    #[cfg(test)]
    fn texel(&self, row: usize, col: usize) -> Option<[u8; 4]> {
        if row >= self.rows || col >= self.cols { return None; }
        let i = (row * self.cols + col) * TEXEL_STRIDE;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    #[inline]
    fn put(&mut self, row: usize, col: usize, texel: [u8; 4]) {
        if row < self.rows && col < self.cols {
            let i = (row * self.cols + col) * TEXEL_STRIDE;
            self.data[i..i + TEXEL_STRIDE].copy_from_slice(&texel);
        }
    }
}
